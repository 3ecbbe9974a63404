//! Routes each message to exactly one command handler
//!
//! Handlers are consulted in ascending priority (registration order breaks
//! ties). The first one that claims the message runs; nothing after it is
//! asked. Faults in a handler never escape: a failing applicability check
//! counts as "does not apply", a failing execution becomes a failed
//! envelope.

#[cfg(test)]
mod proptests;

use crate::context::ContextBundle;
use crate::handlers::CommandHandler;
use crate::response::ResponseEnvelope;
use futures::FutureExt;
use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use thiserror::Error;

const UNHANDLED_RESPONSE: &str =
    "요청을 이해하지 못했어요. 여행지나 일정, 추천받고 싶은 장소를 알려주세요.";
const UNHANDLED_ERROR: &str = "No handler could process the message";
const FAULT_RESPONSE: &str = "요청을 처리하는 중 문제가 발생했어요. 잠시 후 다시 시도해 주세요.";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Handler already registered: {0}")]
    DuplicateName(String),
}

/// Priority-ordered handler registry
#[derive(Default)]
pub struct Dispatcher {
    handlers: Vec<Arc<dyn CommandHandler>>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_handlers(
        handlers: impl IntoIterator<Item = Arc<dyn CommandHandler>>,
    ) -> Result<Self, RegistryError> {
        let mut dispatcher = Self::new();
        for handler in handlers {
            dispatcher.register(handler)?;
        }
        Ok(dispatcher)
    }

    /// Insert after every handler of equal or lower priority value
    pub fn register(&mut self, handler: Arc<dyn CommandHandler>) -> Result<(), RegistryError> {
        if self.handlers.iter().any(|h| h.name() == handler.name()) {
            return Err(RegistryError::DuplicateName(handler.name().to_string()));
        }
        let priority = handler.priority();
        let at = self
            .handlers
            .iter()
            .position(|h| h.priority() > priority)
            .unwrap_or(self.handlers.len());
        self.handlers.insert(at, handler);
        Ok(())
    }

    /// Handler names in consultation order
    pub fn handler_names(&self) -> Vec<&str> {
        self.handlers.iter().map(|h| h.name()).collect()
    }

    pub async fn dispatch(&self, message: &str, ctx: &ContextBundle<'_>) -> ResponseEnvelope {
        for handler in &self.handlers {
            let name = handler.name();

            let claimed = match catch_unwind(AssertUnwindSafe(|| handler.applies(message, ctx))) {
                Ok(Ok(claimed)) => claimed,
                Ok(Err(e)) => {
                    tracing::warn!(handler = name, error = %e, "Applicability check failed; skipping handler");
                    false
                }
                Err(panic) => {
                    tracing::warn!(
                        handler = name,
                        panic = %panic_message(panic.as_ref()),
                        "Applicability check panicked; skipping handler"
                    );
                    false
                }
            };
            if !claimed {
                continue;
            }

            tracing::debug!(handler = name, session_id = %ctx.session_id, "Handler claimed message");

            return match AssertUnwindSafe(handler.execute(message, ctx))
                .catch_unwind()
                .await
            {
                Ok(Ok(envelope)) => envelope,
                Ok(Err(e)) => {
                    tracing::error!(handler = name, error = %e, "Handler execution failed");
                    ResponseEnvelope::failure(FAULT_RESPONSE, e.to_string())
                }
                Err(panic) => {
                    let detail = panic_message(panic.as_ref());
                    tracing::error!(handler = name, panic = %detail, "Handler execution panicked");
                    ResponseEnvelope::failure(FAULT_RESPONSE, format!("{name} failed: {detail}"))
                }
            };
        }

        tracing::warn!(session_id = %ctx.session_id, "No handler claimed message");
        ResponseEnvelope::failure(UNHANDLED_RESPONSE, UNHANDLED_ERROR)
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    panic
        .downcast_ref::<&str>()
        .map(ToString::to_string)
        .or_else(|| panic.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Applies, Executes, StubHandler};

    fn ctx() -> ContextBundle<'static> {
        ContextBundle::detached("u", "s")
    }

    #[test]
    fn test_priority_order_stable() {
        let dispatcher = Dispatcher::with_handlers([
            StubHandler::new("late", 50).arc(),
            StubHandler::new("first_tie", 10).arc(),
            StubHandler::new("second_tie", 10).arc(),
            StubHandler::new("early", 5).arc(),
        ])
        .unwrap();
        assert_eq!(
            dispatcher.handler_names(),
            vec!["early", "first_tie", "second_tie", "late"]
        );
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let mut dispatcher = Dispatcher::new();
        dispatcher.register(StubHandler::new("a", 1).arc()).unwrap();
        assert_eq!(
            dispatcher.register(StubHandler::new("a", 2).arc()),
            Err(RegistryError::DuplicateName("a".to_string()))
        );
    }

    #[tokio::test]
    async fn test_first_claiming_handler_wins() {
        let skipped = StubHandler::new("skipped", 1).claiming(Applies::No);
        let winner = StubHandler::new("winner", 2).executing(Executes::Reply("from winner"));
        let shadowed = StubHandler::new("shadowed", 3);
        let (winner_runs, shadowed_checks) = (winner.executions(), shadowed.checks());

        let dispatcher =
            Dispatcher::with_handlers([shadowed.arc(), winner.arc(), skipped.arc()]).unwrap();
        let envelope = dispatcher.dispatch("hi", &ctx()).await;

        assert_eq!(envelope.response, "from winner");
        assert_eq!(winner_runs.get(), 1);
        assert_eq!(shadowed_checks.get(), 0);
    }

    #[tokio::test]
    async fn test_unhandled_is_failure() {
        let dispatcher =
            Dispatcher::with_handlers([StubHandler::new("no", 1).claiming(Applies::No).arc()])
                .unwrap();
        let envelope = dispatcher.dispatch("anything", &ctx()).await;
        assert!(!envelope.success);
        assert_eq!(envelope.error.as_deref(), Some(UNHANDLED_ERROR));

        let empty = Dispatcher::new().dispatch("anything", &ctx()).await;
        assert!(!empty.success);
    }

    #[tokio::test]
    async fn test_faulty_applicability_skipped() {
        let dispatcher = Dispatcher::with_handlers([
            StubHandler::new("errs", 1).claiming(Applies::Fail).arc(),
            StubHandler::new("panics", 2).claiming(Applies::Panic).arc(),
            StubHandler::new("works", 3).executing(Executes::Reply("ok")).arc(),
        ])
        .unwrap();
        let envelope = dispatcher.dispatch("x", &ctx()).await;
        assert!(envelope.success);
        assert_eq!(envelope.response, "ok");
    }

    #[tokio::test]
    async fn test_execution_error_becomes_failure() {
        let dispatcher = Dispatcher::with_handlers([
            StubHandler::new("broken", 1).executing(Executes::Fail("db down")).arc(),
            StubHandler::new("never", 2).arc(),
        ])
        .unwrap();
        let envelope = dispatcher.dispatch("x", &ctx()).await;
        assert!(!envelope.success);
        assert_eq!(
            envelope.error.as_deref(),
            Some("Place search unavailable: db down")
        );
        assert_eq!(envelope.response, FAULT_RESPONSE);
    }

    #[tokio::test]
    async fn test_execution_panic_becomes_failure() {
        let dispatcher =
            Dispatcher::with_handlers([StubHandler::new("boom", 1).executing(Executes::Panic).arc()])
                .unwrap();
        let envelope = dispatcher.dispatch("x", &ctx()).await;
        assert!(!envelope.success);
        assert!(envelope
            .error
            .as_deref()
            .is_some_and(|e| e.starts_with("boom failed:")));
    }

    #[test]
    fn test_panic_message_kinds() {
        let boxed: Box<dyn Any + Send> = Box::new("static");
        assert_eq!(panic_message(boxed.as_ref()), "static");
        let boxed: Box<dyn Any + Send> = Box::new(String::from("owned"));
        assert_eq!(panic_message(boxed.as_ref()), "owned");
        let boxed: Box<dyn Any + Send> = Box::new(42);
        assert_eq!(panic_message(boxed.as_ref()), "unknown panic");
    }
}
