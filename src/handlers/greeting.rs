//! Greeting handler

use super::{CommandHandler, HandlerError};
use crate::context::ContextBundle;
use crate::response::ResponseEnvelope;
use async_trait::async_trait;

const KOREAN_GREETINGS: &[&str] = &["안녕", "하이", "반가워", "반갑습니다"];
const ENGLISH_GREETINGS: &[&str] = &["hi", "hello", "hey"];

/// Longer messages are requests that happen to open politely
const MAX_GREETING_WORDS: usize = 3;

const WELCOME: &str = "안녕하세요! 여행 도우미입니다.
가고 싶은 지역이나 일정(예: \"부산 2박3일 10월 4일부터\")을 알려주시면 여행 계획을 세워 드릴게요.
맛집, 카페, 관광지 추천도 물어봐 주세요.";

pub struct GreetingHandler;

impl GreetingHandler {
    fn is_greeting(message: &str) -> bool {
        let message = super::normalize(message);
        let words: Vec<&str> = message.split_whitespace().collect();
        let Some(first) = words.first() else {
            return false;
        };
        if words.len() > MAX_GREETING_WORDS || super::carries_request(&message) {
            return false;
        }
        let first = first.trim_end_matches(|c: char| c.is_ascii_punctuation() || c == '~');
        ENGLISH_GREETINGS.contains(&first)
            || KOREAN_GREETINGS.iter().any(|g| first.starts_with(g))
    }
}

#[async_trait]
impl CommandHandler for GreetingHandler {
    fn name(&self) -> &'static str {
        "greeting"
    }

    fn priority(&self) -> i32 {
        10
    }

    fn applies(&self, message: &str, _ctx: &ContextBundle<'_>) -> Result<bool, HandlerError> {
        Ok(Self::is_greeting(message))
    }

    async fn execute(
        &self,
        _message: &str,
        _ctx: &ContextBundle<'_>,
    ) -> Result<ResponseEnvelope, HandlerError> {
        Ok(ResponseEnvelope::ok(WELCOME))
    }
}
