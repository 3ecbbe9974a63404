//! Entry point for one inbound message
//!
//! Builds the context bundle, dispatches, adds renderings, echoes the
//! session id and returns the serialized envelope.

use crate::context::ContextBundle;
use crate::dispatcher::Dispatcher;
use crate::response::ResponseEnvelope;
use crate::store::TripStore;
use serde_json::Value;

pub struct Assistant {
    dispatcher: Dispatcher,
}

impl Assistant {
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self { dispatcher }
    }

    pub fn handler_names(&self) -> Vec<&str> {
        self.dispatcher.handler_names()
    }

    /// Serialized envelope with every optional field present
    pub async fn handle_message(
        &self,
        user_id: &str,
        session_id: &str,
        message: &str,
        store: Option<&dyn TripStore>,
    ) -> Value {
        self.respond(user_id, session_id, message, store)
            .await
            .to_value()
    }

    /// Typed form of [`Self::handle_message`]
    pub async fn respond(
        &self,
        user_id: &str,
        session_id: &str,
        message: &str,
        store: Option<&dyn TripStore>,
    ) -> ResponseEnvelope {
        let started = std::time::Instant::now();
        let ctx = ContextBundle::new(user_id, session_id, store);
        let envelope = self
            .dispatcher
            .dispatch(message, &ctx)
            .await
            .with_renderings()
            .with_session(session_id);

        if let Some(store) = store {
            if let Err(e) = store.record_exchange(user_id, session_id, message, &envelope.response)
            {
                tracing::warn!(error = %e, session_id, "Failed to record exchange");
            }
        }

        tracing::info!(
            user_id,
            session_id,
            success = envelope.success,
            duration_ms = %started.elapsed().as_millis(),
            "Message handled"
        );
        envelope
    }
}
