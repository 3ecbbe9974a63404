//! Model provider clients
//!
//! Entity extraction and chat replies reach a model through
//! [`crate::generation::TextGenerator`]. This module holds what sits behind
//! it: one HTTP client per provider, the table of known models, and the
//! registry that decides which of them have credentials.

mod anthropic;
pub mod error;
mod models;
mod openai;
mod registry;
mod types;

pub use anthropic::AnthropicService;
pub use error::LlmError;
pub use models::{all_models, ModelDef, Provider};
pub use openai::OpenAIService;
pub use registry::{LlmConfig, ModelRegistry};
pub use types::*;

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Instant;

/// One provider-specific completion endpoint
#[async_trait]
pub trait LlmService: Send + Sync {
    async fn complete(&self, request: &LlmRequest) -> Result<LlmResponse, LlmError>;

    /// Registry id, not the provider's wire name
    fn model_id(&self) -> &str;
}

/// Records latency and token use of every completion the assistant makes
pub struct TracedService {
    inner: Arc<dyn LlmService>,
    model_id: String,
}

impl TracedService {
    pub fn new(inner: Arc<dyn LlmService>) -> Self {
        let model_id = inner.model_id().to_string();
        Self { inner, model_id }
    }
}

#[async_trait]
impl LlmService for TracedService {
    async fn complete(&self, request: &LlmRequest) -> Result<LlmResponse, LlmError> {
        let started = Instant::now();
        let outcome = self.inner.complete(request).await;
        let elapsed_ms = started.elapsed().as_millis();

        match &outcome {
            Ok(response) => tracing::info!(
                model = %self.model_id,
                %elapsed_ms,
                prompt_chars = request.prompt.chars().count(),
                input_tokens = response.usage.input_tokens,
                output_tokens = response.usage.output_tokens,
                "Model answered"
            ),
            Err(e) => tracing::warn!(
                model = %self.model_id,
                %elapsed_ms,
                kind = ?e.kind,
                transient = e.kind.is_retryable(),
                error = %e.message,
                "Model call failed; callers fall back"
            ),
        }

        outcome
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }
}
