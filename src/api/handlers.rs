//! HTTP request handlers

use super::types::{
    ChatRequest, DemoModeResponse, ErrorResponse, ExchangeEntry, ModelInfo, ModelsResponse,
    SessionHistoryResponse,
};
use super::AppState;
use crate::demo_mode::DemoStatus;
use crate::plan::TravelPlan;
use crate::store::TripStore;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::Value;

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/chat", post(chat))
        .route("/api/demo-mode", get(demo_status))
        .route("/api/demo-mode/enable", post(enable_demo))
        .route("/api/demo-mode/disable", post(disable_demo))
        .route("/api/demo-mode/toggle", post(toggle_demo))
        .route("/api/trips/:id", get(get_trip))
        .route("/api/sessions/:id/exchanges", get(session_history))
        .route("/api/models", get(list_models))
        .route("/version", get(get_version))
        .with_state(state)
}

// ============================================================
// Chat
// ============================================================

async fn chat(
    State(state): State<AppState>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<Value>, AppError> {
    if req.user_id.trim().is_empty() || req.session_id.trim().is_empty() {
        return Err(AppError::BadRequest(
            "user_id and session_id are required".to_string(),
        ));
    }

    let store: &dyn TripStore = &state.db;
    let body = state
        .assistant
        .handle_message(&req.user_id, &req.session_id, &req.message, Some(store))
        .await;
    Ok(Json(body))
}

// ============================================================
// Demo mode
// ============================================================

async fn demo_status(State(state): State<AppState>) -> Json<DemoStatus> {
    Json(state.demo.status())
}

async fn enable_demo(State(state): State<AppState>) -> Json<DemoModeResponse> {
    let message = state.demo.enable();
    switched(&state, message)
}

async fn disable_demo(State(state): State<AppState>) -> Json<DemoModeResponse> {
    let message = state.demo.disable();
    switched(&state, message)
}

async fn toggle_demo(State(state): State<AppState>) -> Json<DemoModeResponse> {
    let message = state.demo.toggle();
    switched(&state, message)
}

fn switched(state: &AppState, message: String) -> Json<DemoModeResponse> {
    tracing::info!(enabled = state.demo.is_enabled(), "{message}");
    Json(DemoModeResponse {
        message,
        status: state.demo.status(),
    })
}

// ============================================================
// Trips
// ============================================================

async fn get_trip(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<TravelPlan>, AppError> {
    state
        .db
        .get_trip(&id)
        .map_err(|e| AppError::Internal(e.to_string()))?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Trip not found: {id}")))
}

async fn session_history(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SessionHistoryResponse>, AppError> {
    let exchanges = state
        .db
        .session_exchanges(&id)
        .map_err(|e| AppError::Internal(e.to_string()))?
        .into_iter()
        .map(|(message, response)| ExchangeEntry { message, response })
        .collect();
    Ok(Json(SessionHistoryResponse {
        session_id: id,
        exchanges,
    }))
}

// ============================================================
// Models
// ============================================================

async fn list_models(State(state): State<AppState>) -> Json<ModelsResponse> {
    let models = state
        .llm_registry
        .available_defs()
        .into_iter()
        .map(|def| ModelInfo {
            id: def.id.to_string(),
            provider: def.provider.display_name().to_string(),
            description: def.description.to_string(),
        })
        .collect();

    Json(ModelsResponse {
        models,
        default: state.llm_registry.default_model_id().map(str::to_string),
    })
}

// ============================================================
// Version
// ============================================================

async fn get_version() -> &'static str {
    concat!("tripmate ", env!("CARGO_PKG_VERSION"))
}

// ============================================================
// Error Handling
// ============================================================

#[derive(Debug)]
enum AppError {
    BadRequest(String),
    NotFound(String),
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(ErrorResponse::new(message));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assistant::Assistant;
    use crate::catalog::Catalog;
    use crate::demo_mode::DemoModeGate;
    use crate::dispatcher::Dispatcher;
    use crate::handlers::standard_handlers;
    use crate::llm::{LlmConfig, ModelRegistry};
    use crate::store::Database;
    use crate::testing::handler_services;
    use std::sync::Arc;

    fn state() -> AppState {
        state_with(&LlmConfig::default())
    }

    fn state_with(llm: &LlmConfig) -> AppState {
        let services = handler_services(
            Catalog::default(),
            Vec::new(),
            DemoModeGate::from_csv(false, "감천문화마을, 해운대"),
            None,
        );
        let dispatcher = Dispatcher::with_handlers(standard_handlers(&services)).unwrap();
        AppState::new(
            Assistant::new(dispatcher),
            services.demo,
            Database::open_in_memory().unwrap(),
            Arc::new(ModelRegistry::new(llm)),
        )
    }

    fn chat_request(message: &str) -> Json<ChatRequest> {
        Json(ChatRequest {
            user_id: "u-1".to_string(),
            session_id: "s-1".to_string(),
            message: message.to_string(),
        })
    }

    #[tokio::test]
    async fn test_chat_returns_envelope_and_logs_exchange() {
        let state = state();
        let Json(body) = chat(State(state.clone()), chat_request("도움말"))
            .await
            .unwrap();
        assert_eq!(body["success"], true);
        assert_eq!(body["session_id"], "s-1");

        let Json(history) = session_history(State(state), Path("s-1".to_string()))
            .await
            .unwrap();
        assert_eq!(history.exchanges.len(), 1);
        assert_eq!(history.exchanges[0].message, "도움말");
    }

    #[tokio::test]
    async fn test_chat_requires_ids() {
        let req = Json(ChatRequest {
            user_id: " ".to_string(),
            session_id: "s".to_string(),
            message: "hi".to_string(),
        });
        let err = chat(State(state()), req).await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[tokio::test]
    async fn test_demo_switches() {
        let state = state();
        let Json(on) = enable_demo(State(state.clone())).await;
        assert_eq!(on.message, "Demo mode enabled (2 places)");
        assert!(on.status.enabled);

        let Json(off) = toggle_demo(State(state.clone())).await;
        assert!(!off.status.enabled);

        let Json(status) = demo_status(State(state)).await;
        assert!(!status.enabled);
        assert_eq!(status.place_count, 2);
    }

    #[tokio::test]
    async fn test_models_listed_with_default() {
        let Json(none) = list_models(State(state())).await;
        assert!(none.models.is_empty());
        assert_eq!(none.default, None);

        let config = LlmConfig {
            anthropic_api_key: Some("test-key".to_string()),
            ..LlmConfig::default()
        };
        let Json(listed) = list_models(State(state_with(&config))).await;
        let ids: Vec<_> = listed.models.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["claude-4.5-haiku", "claude-4.5-sonnet"]);
        assert_eq!(listed.models[0].provider, "Anthropic");
        assert_eq!(listed.default.as_deref(), Some("claude-4.5-haiku"));
    }

    #[tokio::test]
    async fn test_unknown_trip_is_not_found() {
        let err = get_trip(State(state()), Path("missing".to_string()))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
