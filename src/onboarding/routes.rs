//! REST endpoints for onboarding sessions and completion.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use uuid::Uuid;

use super::model::{
    CompleteRequest, CompleteResponse, OnboardingSession, UpdateOnboardingSession,
};
use crate::error::ApiError;
use crate::server::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/onboarding/session", post(create_session))
        .route(
            "/onboarding/session/{id}",
            get(get_session).patch(update_session),
        )
        .route("/onboarding/complete", post(complete))
}

async fn create_session(
    State(state): State<AppState>,
) -> (StatusCode, Json<OnboardingSession>) {
    let session = state.store.create_onboarding_session();
    tracing::info!(session_id = %session.id, "Onboarding session created");
    (StatusCode::CREATED, Json(session))
}

async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<OnboardingSession>, ApiError> {
    state
        .store
        .get_onboarding_session(id)
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Onboarding session {id} not found")))
}

async fn update_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateOnboardingSession>,
) -> Result<Json<OnboardingSession>, ApiError> {
    state
        .store
        .update_onboarding_session(id, req)
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Onboarding session {id} not found")))
}

/// The completion gate: a business finishes onboarding only once it has at
/// least one knowledge-base document, one phone number, and one assistant.
async fn complete(
    State(state): State<AppState>,
    Json(req): Json<CompleteRequest>,
) -> Result<Json<CompleteResponse>, ApiError> {
    let business_id = req.business_id;
    state
        .store
        .get_business(business_id)
        .ok_or_else(|| ApiError::NotFound(format!("Business with ID {business_id} not found")))?;

    if state.store.list_knowledge_base_files(business_id).is_empty() {
        return Err(ApiError::Validation(
            "Knowledge base documents are required".into(),
        ));
    }
    if state.store.list_phone_numbers(business_id).is_empty() {
        return Err(ApiError::Validation("Phone number is required".into()));
    }
    if state.store.list_voice_assistants(business_id).is_empty() {
        return Err(ApiError::Validation(
            "Voice assistant configuration is required".into(),
        ));
    }

    tracing::info!(business_id = %business_id, "Onboarding completed");
    Ok(Json(CompleteResponse {
        message: "Onboarding completed successfully!".into(),
        business_id,
        dashboard_url: format!("/dashboard/{business_id}"),
    }))
}
