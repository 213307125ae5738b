//! REST endpoints for business profiles.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use uuid::Uuid;

use super::model::{Business, CreateBusiness, UpdateBusiness};
use crate::error::ApiError;
use crate::server::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/business", post(create).get(list))
        .route(
            "/business/{id}",
            get(get_one).patch(update).delete(delete_one),
        )
}

async fn create(
    State(state): State<AppState>,
    Json(req): Json<CreateBusiness>,
) -> Result<(StatusCode, Json<Business>), ApiError> {
    req.validate()?;
    let business = state.store.create_business(req);
    tracing::info!(business_id = %business.id, name = %business.name, "Business created");
    Ok((StatusCode::CREATED, Json(business)))
}

async fn list(State(state): State<AppState>) -> Json<Vec<Business>> {
    Json(state.store.list_businesses())
}

async fn get_one(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Business>, ApiError> {
    state
        .store
        .get_business(id)
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Business with ID {id} not found")))
}

async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateBusiness>,
) -> Result<Json<Business>, ApiError> {
    req.validate()?;
    state
        .store
        .update_business(id, req)
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Business with ID {id} not found")))
}

async fn delete_one(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    if state.store.delete_business(id) {
        tracing::info!(business_id = %id, "Business deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound(format!("Business with ID {id} not found")))
    }
}
