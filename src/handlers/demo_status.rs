//! Reports demo mode state to whoever asks in chat. Switching it stays an
//! operator action (see the API).

use super::{CommandHandler, HandlerError};
use crate::context::ContextBundle;
use crate::demo_mode::DemoModeGate;
use crate::response::ResponseEnvelope;
use async_trait::async_trait;
use std::sync::Arc;

const CUES: &[&str] = &["데모 모드", "데모모드", "demo mode"];

pub struct DemoStatusHandler {
    demo: Arc<DemoModeGate>,
}

impl DemoStatusHandler {
    pub fn new(demo: Arc<DemoModeGate>) -> Self {
        Self { demo }
    }
}

#[async_trait]
impl CommandHandler for DemoStatusHandler {
    fn name(&self) -> &'static str {
        "demo_status"
    }

    fn priority(&self) -> i32 {
        30
    }

    fn applies(&self, message: &str, _ctx: &ContextBundle<'_>) -> Result<bool, HandlerError> {
        Ok(super::mentions_any(message, CUES))
    }

    async fn execute(
        &self,
        _message: &str,
        _ctx: &ContextBundle<'_>,
    ) -> Result<ResponseEnvelope, HandlerError> {
        let status = self.demo.status();
        let text = if status.enabled {
            format!(
                "데모 모드가 켜져 있어요. 추천 장소 {}곳: {}",
                status.place_count,
                status.places.join(", ")
            )
        } else {
            "데모 모드가 꺼져 있어요.".to_string()
        };
        Ok(ResponseEnvelope::ok(text).with_places(self.demo.canned_places()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_reports_current_state() {
        let demo = Arc::new(DemoModeGate::from_csv(false, "해운대,광안리"));
        let handler = DemoStatusHandler::new(Arc::clone(&demo));
        let ctx = ContextBundle::detached("u", "s");

        assert!(handler.applies("지금 데모 모드야?", &ctx).unwrap());

        let off = handler.execute("데모 모드", &ctx).await.unwrap();
        assert!(off.response.contains("꺼져"));

        demo.enable();
        let on = handler.execute("데모 모드", &ctx).await.unwrap();
        assert!(on.response.contains("2곳: 해운대, 광안리"));
        assert_eq!(on.places.map(|p| p.len()), Some(2));
    }
}
