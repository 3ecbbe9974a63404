//! Model definitions for the providers the assistant can talk to
//!
//! Extraction prompts are short and latency-sensitive, so the list favours
//! small fast models.

use super::{AnthropicService, LlmService, OpenAIService};
use std::sync::Arc;

/// LLM provider enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Provider {
    Anthropic,
    OpenAI,
}

impl Provider {
    pub fn display_name(self) -> &'static str {
        match self {
            Provider::Anthropic => "Anthropic",
            Provider::OpenAI => "OpenAI",
        }
    }
}

/// Settings a factory needs beyond the API key
#[derive(Debug, Clone, Copy, Default)]
pub struct Endpoint<'a> {
    pub gateway: Option<&'a str>,
    pub openai_base_url: Option<&'a str>,
}

/// Builds the service for `def` from an API key and endpoint settings
pub type ModelFactory =
    fn(&ModelDef, &str, Endpoint<'_>) -> Result<Arc<dyn LlmService>, String>;

/// Model definition with metadata
#[derive(Debug, Clone)]
pub struct ModelDef {
    /// User-facing model ID (e.g., "claude-4.5-haiku")
    pub id: &'static str,
    pub provider: Provider,
    /// API name used by the provider
    pub api_name: &'static str,
    pub description: &'static str,
    pub factory: ModelFactory,
}

fn anthropic(
    def: &ModelDef,
    api_key: &str,
    endpoint: Endpoint<'_>,
) -> Result<Arc<dyn LlmService>, String> {
    let service = AnthropicService::new(api_key.to_string(), def.id, def.api_name, endpoint.gateway)
        .map_err(|e| e.message)?;
    Ok(Arc::new(service))
}

fn openai(
    def: &ModelDef,
    api_key: &str,
    endpoint: Endpoint<'_>,
) -> Result<Arc<dyn LlmService>, String> {
    let service = OpenAIService::new(
        api_key.to_string(),
        def.id,
        def.api_name,
        endpoint.gateway,
        endpoint.openai_base_url,
    )
    .map_err(|e| e.message)?;
    Ok(Arc::new(service))
}

static MODELS: &[ModelDef] = &[
    ModelDef {
        id: "claude-4.5-haiku",
        provider: Provider::Anthropic,
        api_name: "claude-haiku-4-5-20251001",
        description: "Claude Haiku 4.5 (fast, efficient)",
        factory: anthropic,
    },
    ModelDef {
        id: "claude-4.5-sonnet",
        provider: Provider::Anthropic,
        api_name: "claude-sonnet-4-5-20250929",
        description: "Claude Sonnet 4.5 (balanced performance)",
        factory: anthropic,
    },
    ModelDef {
        id: "gpt-4o-mini",
        provider: Provider::OpenAI,
        api_name: "gpt-4o-mini",
        description: "GPT-4o mini (fast, inexpensive)",
        factory: openai,
    },
    ModelDef {
        id: "gpt-4o",
        provider: Provider::OpenAI,
        api_name: "gpt-4o",
        description: "GPT-4o (general purpose)",
        factory: openai,
    },
];

/// Get all available model definitions
pub fn all_models() -> &'static [ModelDef] {
    MODELS
}
