//! Router assembly and shared application state.

use std::sync::Arc;

use axum::http::HeaderValue;
use axum::routing::get;
use axum::{Json, Router};
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use crate::business;
use crate::config::Settings;
use crate::knowledge_base;
use crate::onboarding;
use crate::phone_numbers;
use crate::providers::storage::FileStorage;
use crate::providers::telephony::NumberProvider;
use crate::store::EntityStore;
use crate::voice_assistant;
use crate::wizard_config;

/// State shared across all handlers. The store and providers are built once
/// at startup and passed here by reference — no globals, so tests construct
/// isolated instances freely.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<EntityStore>,
    pub storage: Arc<FileStorage>,
    pub numbers: Arc<dyn NumberProvider>,
    pub settings: Arc<Settings>,
}

/// Build the full application router.
pub fn app(state: AppState) -> Router {
    let api = Router::new()
        .merge(business::routes::routes())
        .merge(knowledge_base::routes::routes(&state.settings))
        .merge(phone_numbers::routes::routes())
        .merge(voice_assistant::routes::routes())
        .merge(onboarding::routes::routes())
        .merge(wizard_config::routes());

    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .nest("/api/v1", api)
        .layer(ServiceBuilder::new().layer(cors_layer(&state.settings)))
        .with_state(state)
}

fn cors_layer(settings: &Settings) -> CorsLayer {
    let origin = if settings.cors_origins.iter().any(|o| o == "*") {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(
            settings
                .cors_origins
                .iter()
                .filter_map(|o| o.parse::<HeaderValue>().ok()),
        )
    };
    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods(Any)
        .allow_headers(Any)
}

async fn root() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "message": "Welcome to the Voiceline API",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "service": "voiceline",
    }))
}
