//! Catch-all for any non-blank message

use super::{CommandHandler, HandlerError};
use crate::context::ContextBundle;
use crate::generation::TextGenerator;
use crate::response::ResponseEnvelope;
use async_trait::async_trait;
use std::sync::Arc;

const CHAT_PROMPT: &str = "You are a friendly Korean travel assistant. Answer in Korean in at most three sentences. If the user seems to want a trip plan or place recommendations, invite them to name a region, dates, or a category.\n\nUser:";

const CANNED_REPLY: &str =
    "여행지, 일정, 맛집이나 카페 추천 등 여행에 관한 것을 물어봐 주세요.";

pub struct GeneralChatHandler {
    generator: Option<Arc<dyn TextGenerator>>,
}

impl GeneralChatHandler {
    pub fn new(generator: Option<Arc<dyn TextGenerator>>) -> Self {
        Self { generator }
    }
}

#[async_trait]
impl CommandHandler for GeneralChatHandler {
    fn name(&self) -> &'static str {
        "general_chat"
    }

    fn priority(&self) -> i32 {
        1000
    }

    /// Blank messages stay unclaimed
    fn applies(&self, message: &str, _ctx: &ContextBundle<'_>) -> Result<bool, HandlerError> {
        Ok(!message.trim().is_empty())
    }

    async fn execute(
        &self,
        message: &str,
        _ctx: &ContextBundle<'_>,
    ) -> Result<ResponseEnvelope, HandlerError> {
        let Some(generator) = &self.generator else {
            return Ok(ResponseEnvelope::ok(CANNED_REPLY));
        };

        let prompt = format!("{CHAT_PROMPT} {}", message.trim());
        match generator.generate(&prompt).await {
            Ok(text) if !text.trim().is_empty() => Ok(ResponseEnvelope::ok(text.trim())),
            Ok(_) => Ok(ResponseEnvelope::ok(CANNED_REPLY)),
            Err(e) => {
                tracing::warn!(error = %e, "Chat generation failed; using canned reply");
                Ok(ResponseEnvelope::ok(CANNED_REPLY))
            }
        }
    }
}
