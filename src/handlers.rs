//! Command handlers
//!
//! Each handler decides whether it claims a message and, if so, produces
//! the response. Handlers hold no per-message state; identifiers and the
//! persistence handle arrive through [`ContextBundle`].

mod demo_status;
mod general_chat;
mod greeting;
mod help;
mod place_search;
mod travel_plan;

pub use demo_status::DemoStatusHandler;
pub use general_chat::GeneralChatHandler;
pub use greeting::GreetingHandler;
pub use help::HelpHandler;
pub use place_search::PlaceSearchHandler;
pub use travel_plan::TravelPlanHandler;

use crate::context::ContextBundle;
use crate::demo_mode::DemoModeGate;
use crate::entities::{EntityExtractor, EntityResult};
use crate::generation::TextGenerator;
use crate::places::{Place, PlaceSearch, SearchError};
use crate::response::ResponseEnvelope;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum HandlerError {
    #[error(transparent)]
    Search(#[from] SearchError),
}

/// A unit of capability the dispatcher can route a message to
#[async_trait]
pub trait CommandHandler: Send + Sync {
    /// Unique within a dispatcher
    fn name(&self) -> &str;

    /// Lower runs first
    fn priority(&self) -> i32;

    /// Whether this handler claims `message`
    fn applies(&self, message: &str, ctx: &ContextBundle<'_>) -> Result<bool, HandlerError>;

    async fn execute(
        &self,
        message: &str,
        ctx: &ContextBundle<'_>,
    ) -> Result<ResponseEnvelope, HandlerError>;
}

/// Long-lived dependencies handed to handlers when they are built
#[derive(Clone)]
pub struct HandlerServices {
    pub extractor: Arc<EntityExtractor>,
    pub places: Arc<dyn PlaceSearch>,
    pub demo: Arc<DemoModeGate>,
    pub generator: Option<Arc<dyn TextGenerator>>,
}

impl HandlerServices {
    /// Demo places while demo mode is on, otherwise a directory search
    pub async fn find_places(
        &self,
        entities: &EntityResult,
        limit: usize,
    ) -> Result<Vec<Place>, SearchError> {
        if self.demo.is_enabled() {
            tracing::debug!("Demo mode on; using canned places");
            return Ok(self.demo.canned_places().into_iter().take(limit).collect());
        }
        self.places.search(entities, limit).await
    }
}

/// Handler set used by the service, in no particular order
pub fn standard_handlers(services: &HandlerServices) -> Vec<Arc<dyn CommandHandler>> {
    vec![
        Arc::new(GreetingHandler),
        Arc::new(HelpHandler),
        Arc::new(DemoStatusHandler::new(Arc::clone(&services.demo))),
        Arc::new(TravelPlanHandler::new(services.clone())),
        Arc::new(PlaceSearchHandler::new(services.clone())),
        Arc::new(GeneralChatHandler::new(services.generator.clone())),
    ]
}

/// Lowercased, trimmed copy for keyword checks
fn normalize(message: &str) -> String {
    message.trim().to_lowercase()
}

fn mentions_any(message: &str, cues: &[&str]) -> bool {
    let message = normalize(message);
    cues.iter().any(|cue| message.contains(cue))
}

/// Planning or search cue that a travel handler would claim
fn carries_request(message: &str) -> bool {
    mentions_any(message, travel_plan::CUES)
        || mentions_any(message, place_search::CUES)
        || travel_plan::STAY_LENGTH.is_match(message)
}
