//! Business data models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ApiError;

pub const MAX_NAME_LEN: usize = 255;
pub const MAX_DESCRIPTION_LEN: usize = 2000;

/// A registered business. Root entity; every other record carries its id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Business {
    pub id: Uuid,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request body for `POST /business`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateBusiness {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl CreateBusiness {
    pub fn validate(&self) -> Result<(), ApiError> {
        validate_name(&self.name)?;
        if let Some(ref description) = self.description {
            validate_description(description)?;
        }
        Ok(())
    }
}

/// Request body for `PATCH /business/{id}`. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateBusiness {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl UpdateBusiness {
    pub fn validate(&self) -> Result<(), ApiError> {
        if let Some(ref name) = self.name {
            validate_name(name)?;
        }
        if let Some(ref description) = self.description {
            validate_description(description)?;
        }
        Ok(())
    }
}

fn validate_name(name: &str) -> Result<(), ApiError> {
    let len = name.chars().count();
    if len == 0 {
        return Err(ApiError::Validation("Business name must not be empty".into()));
    }
    if len > MAX_NAME_LEN {
        return Err(ApiError::Validation(format!(
            "Business name must be at most {MAX_NAME_LEN} characters"
        )));
    }
    Ok(())
}

fn validate_description(description: &str) -> Result<(), ApiError> {
    if description.chars().count() > MAX_DESCRIPTION_LEN {
        return Err(ApiError::Validation(format!(
            "Business description must be at most {MAX_DESCRIPTION_LEN} characters"
        )));
    }
    Ok(())
}
