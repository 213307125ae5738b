//! Onboarding session data models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Wizard progress tracker. `business_id` is set once the business step
/// completes; the session is never cascade-deleted with the business.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OnboardingSession {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub current_step: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business_id: Option<Uuid>,
    pub completed: bool,
}

/// Request body for `PATCH /onboarding/session/{id}`. Absent fields are
/// left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateOnboardingSession {
    #[serde(default)]
    pub current_step: Option<u32>,
    #[serde(default)]
    pub business_id: Option<Uuid>,
    #[serde(default)]
    pub completed: Option<bool>,
}

/// Request body for `POST /onboarding/complete`.
#[derive(Debug, Clone, Deserialize)]
pub struct CompleteRequest {
    pub business_id: Uuid,
}

/// Response body for `POST /onboarding/complete`.
#[derive(Debug, Serialize, Deserialize)]
pub struct CompleteResponse {
    pub message: String,
    pub business_id: Uuid,
    pub dashboard_url: String,
}
