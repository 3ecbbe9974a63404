//! API request and response types

use crate::demo_mode::DemoStatus;
use serde::{Deserialize, Serialize};

/// One inbound chat message
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub user_id: String,
    pub session_id: String,
    pub message: String,
}

/// Result of a demo-mode switch
#[derive(Debug, Serialize)]
pub struct DemoModeResponse {
    pub message: String,
    pub status: DemoStatus,
}

#[derive(Debug, Serialize)]
pub struct ExchangeEntry {
    pub message: String,
    pub response: String,
}

/// Logged exchanges for one session, oldest first
#[derive(Debug, Serialize)]
pub struct SessionHistoryResponse {
    pub session_id: String,
    pub exchanges: Vec<ExchangeEntry>,
}

/// A model the assistant can generate with
#[derive(Debug, Serialize)]
pub struct ModelInfo {
    pub id: String,
    pub provider: String,
    pub description: String,
}

/// Configured models; `default` is the one extraction and chat use
#[derive(Debug, Serialize)]
pub struct ModelsResponse {
    pub models: Vec<ModelInfo>,
    pub default: Option<String>,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}
