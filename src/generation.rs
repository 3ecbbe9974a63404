//! Text-generation capability consumed by the extractor and chat handler
//!
//! The core only needs "prompt in, text out". Provider selection, auth and
//! transport live in [`crate::llm`].

use crate::llm::{LlmError, LlmRequest, LlmService};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;

/// Room for the extraction JSON or a short chat reply
const MAX_TOKENS: u32 = 1024;

/// Generate text from a fully rendered prompt
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError>;
}

/// [`TextGenerator`] backed by an [`LlmService`] with a per-call deadline.
///
/// Dropping the returned future drops the in-flight HTTP request with it.
pub struct LlmTextGenerator {
    service: Arc<dyn LlmService>,
    deadline: Duration,
}

impl LlmTextGenerator {
    pub fn new(service: Arc<dyn LlmService>, deadline: Duration) -> Self {
        Self { service, deadline }
    }

    pub fn model_id(&self) -> &str {
        self.service.model_id()
    }
}

#[async_trait]
impl TextGenerator for LlmTextGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        // Low temperature: callers parse the output
        let request = LlmRequest::user_prompt(prompt)
            .with_max_tokens(MAX_TOKENS)
            .with_temperature(0.1);

        match timeout(self.deadline, self.service.complete(&request)).await {
            Ok(result) => result.map(|response| response.text),
            Err(_) => Err(LlmError::timeout(self.deadline)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::error::LlmErrorKind;
    use crate::llm::{LlmResponse, Usage};

    struct SlowService;

    #[async_trait]
    impl LlmService for SlowService {
        async fn complete(&self, _request: &LlmRequest) -> Result<LlmResponse, LlmError> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(LlmResponse {
                text: "late".to_string(),
                usage: Usage::default(),
            })
        }

        fn model_id(&self) -> &str {
            "slow"
        }
    }

    struct EchoService;

    #[async_trait]
    impl LlmService for EchoService {
        async fn complete(&self, request: &LlmRequest) -> Result<LlmResponse, LlmError> {
            assert_eq!(request.max_tokens, Some(MAX_TOKENS));
            assert_eq!(request.temperature, Some(0.1));
            Ok(LlmResponse {
                text: request.prompt.clone(),
                usage: Usage::default(),
            })
        }

        fn model_id(&self) -> &str {
            "echo"
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_deadline_maps_to_timeout_error() {
        let generator = LlmTextGenerator::new(Arc::new(SlowService), Duration::from_secs(5));
        let err = generator.generate("hello").await.unwrap_err();
        assert_eq!(err.kind, LlmErrorKind::Timeout);
    }

    #[tokio::test]
    async fn test_returns_response_text() {
        let generator = LlmTextGenerator::new(Arc::new(EchoService), Duration::from_secs(5));
        assert_eq!(generator.generate("부산").await.unwrap(), "부산");
        assert_eq!(generator.model_id(), "echo");
    }
}
