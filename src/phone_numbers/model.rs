//! Phone-number data models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ApiError;

/// Search limit bounds for `GET /phone-numbers/available`.
pub const MIN_SEARCH_LIMIT: usize = 1;
pub const MAX_SEARCH_LIMIT: usize = 50;

/// Category of number offered by the telephony provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhoneNumberType {
    Local,
    TollFree,
    Mobile,
}

impl Default for PhoneNumberType {
    fn default() -> Self {
        Self::Local
    }
}

impl PhoneNumberType {
    /// Resource segment used by the Twilio AvailablePhoneNumbers API.
    pub fn twilio_segment(&self) -> &'static str {
        match self {
            Self::Local => "Local",
            Self::TollFree => "TollFree",
            Self::Mobile => "Mobile",
        }
    }
}

/// Voice/SMS/MMS capability flags of a candidate number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capabilities {
    pub voice: bool,
    pub sms: bool,
    pub mms: bool,
}

/// A candidate number returned by a search, real or synthetic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvailableNumber {
    pub phone_number: String,
    pub friendly_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locality: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    pub country_code: String,
    pub capabilities: Capabilities,
    pub price_monthly: f64,
    pub number_type: PhoneNumberType,
}

/// A number purchased for a business. Creation-only (no `updated_at`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhoneNumber {
    pub id: Uuid,
    pub business_id: Uuid,
    pub phone_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub friendly_name: Option<String>,
    /// Provider reference (Twilio SID) used for release.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sid: Option<String>,
    pub status: String,
    pub purchased_at: DateTime<Utc>,
}

/// Fields supplied by the purchase handler when inserting a number record.
#[derive(Debug, Clone)]
pub struct NewPhoneNumber {
    pub phone_number: String,
    pub friendly_name: Option<String>,
    pub sid: Option<String>,
    pub status: String,
}

/// Query parameters for `GET /phone-numbers/available`.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchQuery {
    #[serde(default = "default_country_code")]
    pub country_code: String,
    #[serde(default)]
    pub area_code: Option<String>,
    #[serde(default)]
    pub number_type: PhoneNumberType,
    #[serde(default)]
    pub contains: Option<String>,
    #[serde(default = "default_search_limit")]
    pub limit: usize,
}

fn default_country_code() -> String {
    "US".to_string()
}

fn default_search_limit() -> usize {
    20
}

impl SearchQuery {
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.limit < MIN_SEARCH_LIMIT || self.limit > MAX_SEARCH_LIMIT {
            return Err(ApiError::Validation(format!(
                "limit must be between {MIN_SEARCH_LIMIT} and {MAX_SEARCH_LIMIT}"
            )));
        }
        Ok(())
    }
}

/// Request body for `POST /phone-numbers/purchase/{business_id}`.
#[derive(Debug, Clone, Deserialize)]
pub struct PurchaseRequest {
    pub phone_number: String,
    #[serde(default)]
    pub friendly_name: Option<String>,
}

/// Response body for `GET /phone-numbers/available`.
#[derive(Debug, Serialize, Deserialize)]
pub struct AvailableNumbersResponse {
    pub numbers: Vec<AvailableNumber>,
    pub total: usize,
}

/// Response body for `GET /phone-numbers/status`.
#[derive(Debug, Serialize, Deserialize)]
pub struct ProviderStatus {
    pub configured: bool,
    pub provider: String,
}

/// Response body for `DELETE /phone-numbers/{business_id}/{phone_id}`.
#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub message: String,
    pub deleted_phone_id: Uuid,
}
