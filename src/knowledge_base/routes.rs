//! REST endpoints for knowledge-base uploads.

use axum::extract::{DefaultBodyLimit, Multipart, Path, State};
use axum::http::header;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use uuid::Uuid;

use super::model::{DeleteResponse, KnowledgeBaseFile, NewKnowledgeBaseFile, UploadResponse};
use crate::config::Settings;
use crate::error::ApiError;
use crate::server::AppState;

/// Wizard cap on files per upload request; the body limit is sized so a
/// full batch of maximum-size files fits.
const MAX_FILES_PER_UPLOAD: u64 = 10;

pub fn routes(settings: &Settings) -> Router<AppState> {
    let body_limit = settings.max_file_size_bytes() * MAX_FILES_PER_UPLOAD + 1024 * 1024;
    Router::new()
        .route(
            "/knowledge-base/upload/{business_id}",
            axum::routing::post(upload).layer(DefaultBodyLimit::max(body_limit as usize)),
        )
        .route("/knowledge-base/{business_id}", get(list))
        .route(
            "/knowledge-base/{business_id}/{file_id}",
            get(download).delete(delete_file),
        )
}

async fn upload(
    State(state): State<AppState>,
    Path(business_id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    require_business(&state, business_id)?;

    let mut uploaded = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::Validation(format!("Malformed multipart body: {e}")))?
    {
        let Some(raw_name) = field.file_name().map(str::to_string) else {
            continue;
        };
        // Keep only the final path component so a crafted filename cannot
        // escape the business directory.
        let filename = std::path::Path::new(&raw_name)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("file")
            .to_string();

        let file_type = extension_of(&filename);
        if !state.settings.is_allowed_file_type(&file_type) {
            return Err(ApiError::Validation(format!(
                "File type {file_type} not allowed. Allowed types: {}",
                state.settings.allowed_file_types.join(", ")
            )));
        }

        let content = field
            .bytes()
            .await
            .map_err(|e| ApiError::Validation(format!("Failed to read upload {filename}: {e}")))?;

        if content.len() as u64 > state.settings.max_file_size_bytes() {
            return Err(ApiError::Validation(format!(
                "File {filename} exceeds maximum size of {}MB",
                state.settings.max_file_size_mb
            )));
        }

        let storage_path = state.storage.save(business_id, &filename, &content).await?;

        let record = state.store.add_knowledge_base_file(
            business_id,
            NewKnowledgeBaseFile {
                filename: filename.clone(),
                file_type,
                file_size: content.len() as u64,
                storage_path,
            },
        );
        tracing::info!(business_id = %business_id, file_id = %record.id, filename = %filename, "Knowledge-base file uploaded");
        uploaded.push(record);
    }

    if uploaded.is_empty() {
        return Err(ApiError::Validation("No files in upload request".into()));
    }

    let total_files = uploaded.len();
    Ok(Json(UploadResponse {
        message: format!("Successfully uploaded {total_files} file(s)"),
        files: uploaded,
        total_files,
    }))
}

async fn list(
    State(state): State<AppState>,
    Path(business_id): Path<Uuid>,
) -> Result<Json<Vec<KnowledgeBaseFile>>, ApiError> {
    require_business(&state, business_id)?;
    Ok(Json(state.store.list_knowledge_base_files(business_id)))
}

async fn download(
    State(state): State<AppState>,
    Path((business_id, file_id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse, ApiError> {
    require_business(&state, business_id)?;
    let record = find_file(&state, business_id, file_id)?;

    let bytes = state
        .storage
        .read(&record.storage_path)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Stored file for {file_id} is missing")))?;

    Ok((
        [
            (header::CONTENT_TYPE, "application/octet-stream".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", record.filename),
            ),
        ],
        bytes,
    ))
}

async fn delete_file(
    State(state): State<AppState>,
    Path((business_id, file_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<DeleteResponse>, ApiError> {
    require_business(&state, business_id)?;
    let record = find_file(&state, business_id, file_id)?;

    // Blob first, then the record. Deleting an already-missing blob is fine.
    state.storage.delete(&record.storage_path).await?;
    state.store.delete_knowledge_base_file(business_id, file_id);
    tracing::info!(business_id = %business_id, file_id = %file_id, "Knowledge-base file deleted");

    Ok(Json(DeleteResponse {
        message: "File deleted successfully".into(),
        deleted_file_id: file_id,
    }))
}

fn require_business(state: &AppState, business_id: Uuid) -> Result<(), ApiError> {
    state
        .store
        .get_business(business_id)
        .map(|_| ())
        .ok_or_else(|| ApiError::NotFound(format!("Business with ID {business_id} not found")))
}

fn find_file(
    state: &AppState,
    business_id: Uuid,
    file_id: Uuid,
) -> Result<KnowledgeBaseFile, ApiError> {
    state
        .store
        .list_knowledge_base_files(business_id)
        .into_iter()
        .find(|f| f.id == file_id)
        .ok_or_else(|| ApiError::NotFound(format!("File with ID {file_id} not found")))
}

/// Lowercased extension with leading dot, or empty string when absent.
fn extension_of(filename: &str) -> String {
    std::path::Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{}", e.to_lowercase()))
        .unwrap_or_default()
}
