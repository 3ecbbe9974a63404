//! Model registry for managing available LLM providers

use super::models::Endpoint;
use super::{all_models, LlmService, TracedService, ModelDef, Provider};
use std::collections::HashMap;
use std::sync::Arc;

/// Configuration for LLM providers
#[derive(Debug, Clone, Default)]
pub struct LlmConfig {
    pub anthropic_api_key: Option<String>,
    pub openai_api_key: Option<String>,
    /// Root of an OpenAI-compatible API (e.g., `http://localhost:11434/v1`)
    pub openai_base_url: Option<String>,
    /// Gateway URL; when set every model is reachable without provider keys
    pub gateway: Option<String>,
    /// Default model ID
    pub default_model: Option<String>,
}

impl LlmConfig {
    pub fn from_env() -> Self {
        Self {
            anthropic_api_key: std::env::var("ANTHROPIC_API_KEY").ok(),
            openai_api_key: std::env::var("OPENAI_API_KEY").ok(),
            openai_base_url: std::env::var("OPENAI_BASE_URL").ok(),
            gateway: std::env::var("LLM_GATEWAY").ok(),
            default_model: std::env::var("DEFAULT_MODEL").ok(),
        }
    }
}

/// Registry of available LLM models
pub struct ModelRegistry {
    services: HashMap<String, Arc<dyn LlmService>>,
    default_model: Option<String>,
}

impl ModelRegistry {
    pub fn new(config: &LlmConfig) -> Self {
        let services: HashMap<String, Arc<dyn LlmService>> = all_models()
            .iter()
            .filter_map(|def| {
                Self::try_create_model(def, config).map(|svc| (def.id.to_string(), svc))
            })
            .collect();

        // Preference: configured default, then the cheapest available model
        let default_model = config
            .default_model
            .clone()
            .filter(|id| services.contains_key(id))
            .or_else(|| {
                all_models()
                    .iter()
                    .map(|def| def.id)
                    .find(|id| services.contains_key(*id))
                    .map(str::to_string)
            });

        Self {
            services,
            default_model,
        }
    }

    /// Try to create a model service, validating prerequisites
    fn try_create_model(def: &ModelDef, config: &LlmConfig) -> Option<Arc<dyn LlmService>> {
        let api_key = if config.gateway.is_some() {
            "implicit".to_string()
        } else {
            match def.provider {
                Provider::Anthropic => config.anthropic_api_key.as_ref()?,
                Provider::OpenAI => config.openai_api_key.as_ref()?,
            }
            .clone()
        };

        if api_key.is_empty() {
            return None;
        }

        let endpoint = Endpoint {
            gateway: config.gateway.as_deref(),
            openai_base_url: config.openai_base_url.as_deref(),
        };

        match (def.factory)(def, &api_key, endpoint) {
            Ok(service) => Some(Arc::new(TracedService::new(service))),
            Err(e) => {
                tracing::warn!(
                    model = def.id,
                    provider = def.provider.display_name(),
                    error = %e,
                    "Skipping model"
                );
                None
            }
        }
    }

    /// Get a model by ID
    pub fn get(&self, model_id: &str) -> Option<Arc<dyn LlmService>> {
        self.services.get(model_id).cloned()
    }

    /// Get the default model
    pub fn default_service(&self) -> Option<Arc<dyn LlmService>> {
        self.default_model.as_deref().and_then(|id| self.get(id))
    }

    pub fn default_model_id(&self) -> Option<&str> {
        self.default_model.as_deref()
    }

    /// List all available model IDs
    pub fn available_models(&self) -> Vec<String> {
        let mut models: Vec<_> = self.services.keys().cloned().collect();
        models.sort();
        models
    }

    pub fn has_models(&self) -> bool {
        !self.services.is_empty()
    }

    /// Definitions of the models that have a usable service, in table order
    pub fn available_defs(&self) -> Vec<&'static ModelDef> {
        all_models()
            .iter()
            .filter(|def| self.services.contains_key(def.id))
            .collect()
    }
}
