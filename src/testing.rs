//! Test doubles shared across module tests

use crate::catalog::Catalog;
use crate::context::ContextBundle;
use crate::demo_mode::DemoModeGate;
use crate::entities::EntityExtractor;
use crate::generation::TextGenerator;
use crate::handlers::{CommandHandler, HandlerError, HandlerServices};
use crate::llm::LlmError;
use crate::places::{Place, PlaceDirectory, SearchError};
use crate::plan::TravelPlan;
use crate::response::ResponseEnvelope;
use crate::store::{StoreError, StoreResult, TripStore};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

// ============================================================================
// Generator
// ============================================================================

/// Generator with a fixed reply (or a fixed failure) that records prompts
pub struct ScriptedGenerator {
    reply: Option<String>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedGenerator {
    pub fn replying(reply: impl Into<String>) -> Self {
        Self {
            reply: Some(reply.into()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            reply: None,
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.reply
            .clone()
            .ok_or_else(|| LlmError::network("scripted failure"))
    }
}

// ============================================================================
// Handlers
// ============================================================================

#[derive(Clone, Default)]
pub struct Counter(Arc<AtomicUsize>);

impl Counter {
    pub fn get(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }

    fn bump(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

#[derive(Clone, Copy, Debug)]
pub enum Applies {
    Yes,
    No,
    Fail,
    Panic,
}

#[derive(Clone, Copy, Debug)]
pub enum Executes {
    /// Reply with the handler's own name
    Echo,
    Reply(&'static str),
    Fail(&'static str),
    Panic,
}

/// Configurable handler that counts how often it is consulted
pub struct StubHandler {
    name: String,
    priority: i32,
    applies: Applies,
    executes: Executes,
    checks: Counter,
    executions: Counter,
}

impl StubHandler {
    pub fn new(name: impl Into<String>, priority: i32) -> Self {
        Self {
            name: name.into(),
            priority,
            applies: Applies::Yes,
            executes: Executes::Echo,
            checks: Counter::default(),
            executions: Counter::default(),
        }
    }

    pub fn claiming(mut self, applies: Applies) -> Self {
        self.applies = applies;
        self
    }

    pub fn executing(mut self, executes: Executes) -> Self {
        self.executes = executes;
        self
    }

    pub fn checks(&self) -> Counter {
        self.checks.clone()
    }

    pub fn executions(&self) -> Counter {
        self.executions.clone()
    }

    pub fn arc(self) -> Arc<dyn CommandHandler> {
        Arc::new(self)
    }
}

#[async_trait]
impl CommandHandler for StubHandler {
    fn name(&self) -> &str {
        &self.name
    }

    fn priority(&self) -> i32 {
        self.priority
    }

    fn applies(&self, _message: &str, _ctx: &ContextBundle<'_>) -> Result<bool, HandlerError> {
        self.checks.bump();
        match self.applies {
            Applies::Yes => Ok(true),
            Applies::No => Ok(false),
            Applies::Fail => Err(SearchError::Unavailable("check failed".to_string()).into()),
            Applies::Panic => panic!("check panicked"),
        }
    }

    async fn execute(
        &self,
        _message: &str,
        _ctx: &ContextBundle<'_>,
    ) -> Result<ResponseEnvelope, HandlerError> {
        self.executions.bump();
        match self.executes {
            Executes::Echo => Ok(ResponseEnvelope::ok(self.name.clone())),
            Executes::Reply(text) => Ok(ResponseEnvelope::ok(text)),
            Executes::Fail(error) => Err(SearchError::Unavailable(error.to_string()).into()),
            Executes::Panic => panic!("execution panicked"),
        }
    }
}

/// Services over an in-memory directory and the given catalog
pub fn handler_services(
    catalog: Catalog,
    places: Vec<Place>,
    demo: DemoModeGate,
    generator: Option<Arc<dyn TextGenerator>>,
) -> HandlerServices {
    HandlerServices {
        extractor: Arc::new(EntityExtractor::new(generator.clone(), Arc::new(catalog))),
        places: Arc::new(PlaceDirectory::new(places)),
        demo: Arc::new(demo),
        generator,
    }
}

// ============================================================================
// Store
// ============================================================================

/// Store whose every write fails
pub struct FailingStore;

impl TripStore for FailingStore {
    fn save_trip(&self, _user_id: &str, _session_id: &str, _plan: &TravelPlan) -> StoreResult<String> {
        Err(StoreError::Poisoned)
    }

    fn record_exchange(
        &self,
        _user_id: &str,
        _session_id: &str,
        _message: &str,
        _response: &str,
    ) -> StoreResult<()> {
        Err(StoreError::Poisoned)
    }
}
