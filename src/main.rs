//! Tripmate - conversational travel assistant
//!
//! Routes each chat message to the first command handler that claims it
//! and answers with a uniform response envelope.

mod api;
mod assistant;
mod catalog;
mod config;
mod context;
mod demo_mode;
mod dispatcher;
mod entities;
mod generation;
mod handlers;
mod llm;
mod places;
mod plan;
mod render;
mod response;
mod store;
#[cfg(test)]
mod testing;

use api::{create_router, AppState};
use assistant::Assistant;
use config::AppConfig;
use demo_mode::DemoModeGate;
use dispatcher::Dispatcher;
use entities::EntityExtractor;
use generation::{LlmTextGenerator, TextGenerator};
use handlers::{standard_handlers, HandlerServices};
use llm::ModelRegistry;
use std::net::SocketAddr;
use std::sync::Arc;
use store::Database;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tripmate=info,tower_http=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false),
        )
        .init();

    let config = AppConfig::from_env();

    // Catalog and place directory
    let (catalog, directory) = catalog::load(config.catalog_path.as_deref())?;
    if directory.is_empty() {
        tracing::warn!("Place directory is empty; place search is unavailable");
    } else {
        tracing::info!(places = directory.len(), "Place directory ready");
    }

    let demo = Arc::new(DemoModeGate::from_csv(config.demo_mode, &config.demo_places));
    if demo.is_enabled() {
        tracing::info!(places = demo.places().len(), "Demo mode enabled at startup");
    }

    // Text generation is optional; extraction and chat fall back without it
    let llm_registry = Arc::new(ModelRegistry::new(&config.llm));
    if llm_registry.has_models() {
        tracing::info!(
            models = ?llm_registry.available_models(),
            default = llm_registry.default_model_id().unwrap_or_default(),
            "LLM registry initialized"
        );
    } else {
        tracing::warn!(
            "No LLM API keys configured. Set ANTHROPIC_API_KEY, OPENAI_API_KEY or LLM_GATEWAY."
        );
    }
    let generator = llm_registry.default_service().map(|service| {
        let generator = LlmTextGenerator::new(service, config.generation_timeout);
        tracing::info!(
            model = generator.model_id(),
            timeout_secs = config.generation_timeout.as_secs(),
            "Text generation enabled"
        );
        Arc::new(generator) as Arc<dyn TextGenerator>
    });

    let services = HandlerServices {
        extractor: Arc::new(EntityExtractor::new(generator.clone(), Arc::new(catalog))),
        places: Arc::new(directory),
        demo: Arc::clone(&demo),
        generator,
    };
    let assistant = Assistant::new(Dispatcher::with_handlers(standard_handlers(&services))?);
    tracing::info!(handlers = ?assistant.handler_names(), "Handlers registered");

    // Ensure database directory exists
    if let Some(parent) = config.db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    tracing::info!(path = %config.db_path.display(), "Opening database");
    let db = Database::open(&config.db_path)?;

    let state = AppState::new(assistant, demo, db, llm_registry);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = create_router(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Tripmate server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
