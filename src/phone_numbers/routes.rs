//! REST endpoints for phone-number search, purchase, and assignment.

use axum::extract::{Path, Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use uuid::Uuid;

use super::model::{
    AvailableNumbersResponse, DeleteResponse, NewPhoneNumber, PhoneNumber, ProviderStatus,
    PurchaseRequest, SearchQuery,
};
use crate::error::ApiError;
use crate::providers::telephony::SearchParams;
use crate::server::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/phone-numbers/available", get(search_available))
        .route("/phone-numbers/status", get(provider_status))
        .route("/phone-numbers/purchase/{business_id}", post(purchase))
        .route("/phone-numbers/{business_id}", get(list))
        .route(
            "/phone-numbers/{business_id}/{phone_id}",
            get(get_one).delete(delete_one),
        )
}

async fn search_available(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<AvailableNumbersResponse>, ApiError> {
    query.validate()?;
    let params = SearchParams {
        country_code: query.country_code,
        area_code: query.area_code,
        number_type: query.number_type,
        contains: query.contains,
        limit: query.limit,
    };
    let numbers = state.numbers.search(&params).await;
    let total = numbers.len();
    Ok(Json(AvailableNumbersResponse { numbers, total }))
}

async fn provider_status(State(state): State<AppState>) -> Json<ProviderStatus> {
    let configured = state.numbers.is_configured();
    Json(ProviderStatus {
        configured,
        provider: if configured { "twilio" } else { "mock" }.to_string(),
    })
}

async fn purchase(
    State(state): State<AppState>,
    Path(business_id): Path<Uuid>,
    Json(req): Json<PurchaseRequest>,
) -> Result<Json<PhoneNumber>, ApiError> {
    let business = state
        .store
        .get_business(business_id)
        .ok_or_else(|| ApiError::NotFound(format!("Business with ID {business_id} not found")))?;

    let friendly_name = req.friendly_name.unwrap_or_else(|| business.name.clone());
    let purchased = state
        .numbers
        .purchase(&req.phone_number, Some(&friendly_name))
        .await?;

    let record = state.store.add_phone_number(
        business_id,
        NewPhoneNumber {
            phone_number: purchased.phone_number,
            friendly_name: Some(purchased.friendly_name),
            sid: Some(purchased.sid),
            status: purchased.status,
        },
    );
    tracing::info!(business_id = %business_id, phone = %record.phone_number, "Phone number purchased");
    Ok(Json(record))
}

async fn list(
    State(state): State<AppState>,
    Path(business_id): Path<Uuid>,
) -> Result<Json<Vec<PhoneNumber>>, ApiError> {
    require_business(&state, business_id)?;
    Ok(Json(state.store.list_phone_numbers(business_id)))
}

async fn get_one(
    State(state): State<AppState>,
    Path((business_id, phone_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<PhoneNumber>, ApiError> {
    require_business(&state, business_id)?;
    state
        .store
        .get_phone_number(business_id, phone_id)
        .map(Json)
        .ok_or_else(|| {
            ApiError::NotFound(format!("Phone number with ID {phone_id} not found"))
        })
}

async fn delete_one(
    State(state): State<AppState>,
    Path((business_id, phone_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<DeleteResponse>, ApiError> {
    require_business(&state, business_id)?;
    let record = state
        .store
        .get_phone_number(business_id, phone_id)
        .ok_or_else(|| {
            ApiError::NotFound(format!("Phone number with ID {phone_id} not found"))
        })?;

    // Release with the provider before dropping the record; a failed release
    // keeps the record so the number is not orphaned upstream.
    if let Some(ref sid) = record.sid {
        state.numbers.release(sid).await?;
    }

    state.store.delete_phone_number(business_id, phone_id);
    tracing::info!(business_id = %business_id, phone = %record.phone_number, "Phone number released");

    Ok(Json(DeleteResponse {
        message: "Phone number released successfully".into(),
        deleted_phone_id: phone_id,
    }))
}

fn require_business(state: &AppState, business_id: Uuid) -> Result<(), ApiError> {
    state
        .store
        .get_business(business_id)
        .map(|_| ())
        .ok_or_else(|| ApiError::NotFound(format!("Business with ID {business_id} not found")))
}
