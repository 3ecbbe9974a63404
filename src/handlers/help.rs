//! Usage guide

use super::{CommandHandler, HandlerError};
use crate::context::ContextBundle;
use crate::response::ResponseEnvelope;
use async_trait::async_trait;

const CUES: &[&str] = &["도움말", "사용법", "도와줘", "뭘 할 수", "무엇을 할 수", "help"];

const GUIDE: &str = "이렇게 물어보실 수 있어요.
- 여행 계획: \"제주 3박4일 가족 여행 일정 짜줘\"
- 장소 추천: \"강릉 카페 추천해줘\"
- 날짜 지정: \"부산 2박3일 10월 4일부터\"
날짜를 알려주시면 일자별 일정으로 정리해 드려요.";

pub struct HelpHandler;

#[async_trait]
impl CommandHandler for HelpHandler {
    fn name(&self) -> &'static str {
        "help"
    }

    fn priority(&self) -> i32 {
        20
    }

    fn applies(&self, message: &str, _ctx: &ContextBundle<'_>) -> Result<bool, HandlerError> {
        Ok(super::mentions_any(message, CUES))
    }

    async fn execute(
        &self,
        _message: &str,
        _ctx: &ContextBundle<'_>,
    ) -> Result<ResponseEnvelope, HandlerError> {
        Ok(ResponseEnvelope::ok(GUIDE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_applies() {
        let ctx = ContextBundle::detached("u", "s");
        assert!(HelpHandler.applies("도움말", &ctx).unwrap());
        assert!(HelpHandler.applies("HELP me", &ctx).unwrap());
        assert!(!HelpHandler.applies("부산 여행", &ctx).unwrap());
    }
}
