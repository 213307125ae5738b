//! Knowledge-base data models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Metadata record for one uploaded document. The bytes themselves live on
/// disk at `storage_path`; this record is creation-only (no `updated_at`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnowledgeBaseFile {
    pub id: Uuid,
    pub business_id: Uuid,
    pub filename: String,
    pub file_type: String,
    pub file_size: u64,
    pub storage_path: String,
    pub uploaded_at: DateTime<Utc>,
}

/// Fields supplied by the upload handler when inserting a file record.
#[derive(Debug, Clone)]
pub struct NewKnowledgeBaseFile {
    pub filename: String,
    pub file_type: String,
    pub file_size: u64,
    pub storage_path: String,
}

/// Response body for `POST /knowledge-base/upload/{business_id}`.
#[derive(Debug, Serialize, Deserialize)]
pub struct UploadResponse {
    pub message: String,
    pub files: Vec<KnowledgeBaseFile>,
    pub total_files: usize,
}

/// Response body for `DELETE /knowledge-base/{business_id}/{file_id}`.
#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub message: String,
    pub deleted_file_id: Uuid,
}
