//! REST endpoints for voice-assistant configuration.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use uuid::Uuid;

use super::model::{
    CreateVoiceAssistant, UpdateVoiceAssistant, VoiceAssistant, VoiceOptionsResponse,
};
use crate::error::ApiError;
use crate::server::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/voice-assistant/options", get(options))
        .route(
            "/voice-assistant/{business_id}",
            get(list).post(create),
        )
        .route(
            "/voice-assistant/{business_id}/{assistant_id}",
            get(get_one).patch(update).delete(delete_one),
        )
}

async fn options() -> Json<VoiceOptionsResponse> {
    Json(VoiceOptionsResponse::catalog())
}

async fn create(
    State(state): State<AppState>,
    Path(business_id): Path<Uuid>,
    Json(req): Json<CreateVoiceAssistant>,
) -> Result<(StatusCode, Json<VoiceAssistant>), ApiError> {
    require_business(&state, business_id)?;
    req.validate()?;
    let assistant = state.store.create_voice_assistant(business_id, req);
    tracing::info!(business_id = %business_id, assistant_id = %assistant.id, name = %assistant.name, "Voice assistant created");
    Ok((StatusCode::CREATED, Json(assistant)))
}

async fn list(
    State(state): State<AppState>,
    Path(business_id): Path<Uuid>,
) -> Result<Json<Vec<VoiceAssistant>>, ApiError> {
    require_business(&state, business_id)?;
    Ok(Json(state.store.list_voice_assistants(business_id)))
}

async fn get_one(
    State(state): State<AppState>,
    Path((business_id, assistant_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<VoiceAssistant>, ApiError> {
    require_business(&state, business_id)?;
    state
        .store
        .get_voice_assistant(business_id, assistant_id)
        .map(Json)
        .ok_or_else(|| {
            ApiError::NotFound(format!("Voice assistant with ID {assistant_id} not found"))
        })
}

async fn update(
    State(state): State<AppState>,
    Path((business_id, assistant_id)): Path<(Uuid, Uuid)>,
    Json(req): Json<UpdateVoiceAssistant>,
) -> Result<Json<VoiceAssistant>, ApiError> {
    require_business(&state, business_id)?;
    req.validate()?;
    state
        .store
        .update_voice_assistant(business_id, assistant_id, req)
        .map(Json)
        .ok_or_else(|| {
            ApiError::NotFound(format!("Voice assistant with ID {assistant_id} not found"))
        })
}

async fn delete_one(
    State(state): State<AppState>,
    Path((business_id, assistant_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, ApiError> {
    require_business(&state, business_id)?;
    if state.store.delete_voice_assistant(business_id, assistant_id) {
        tracing::info!(business_id = %business_id, assistant_id = %assistant_id, "Voice assistant deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound(format!(
            "Voice assistant with ID {assistant_id} not found"
        )))
    }
}

fn require_business(state: &AppState, business_id: Uuid) -> Result<(), ApiError> {
    state
        .store
        .get_business(business_id)
        .map(|_| ())
        .ok_or_else(|| ApiError::NotFound(format!("Business with ID {business_id} not found")))
}
