//! HTTP API for the travel assistant

mod handlers;
mod types;

pub use handlers::create_router;

use crate::assistant::Assistant;
use crate::demo_mode::DemoModeGate;
use crate::llm::ModelRegistry;
use crate::store::Database;
use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub assistant: Arc<Assistant>,
    pub demo: Arc<DemoModeGate>,
    pub db: Database,
    pub llm_registry: Arc<ModelRegistry>,
}

impl AppState {
    pub fn new(
        assistant: Assistant,
        demo: Arc<DemoModeGate>,
        db: Database,
        llm_registry: Arc<ModelRegistry>,
    ) -> Self {
        Self {
            assistant: Arc::new(assistant),
            demo,
            db,
            llm_registry,
        }
    }
}
