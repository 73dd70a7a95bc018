use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use axum_typed_multipart::{FieldData, TryFromMultipart, TypedMultipart};
use bytes::Bytes;
use chrono::{DateTime, Utc};
use common::{
    error::AppError,
    storage::types::{
        document::Document,
        document_content::{DocumentContent, DocumentFormat},
    },
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

use crate::{api_state::ApiState, error::ApiError};

#[derive(Debug, TryFromMultipart)]
pub struct UploadParams {
    // The body-size ceiling is enforced by the route layer plus an explicit
    // check against the configured maximum below.
    #[form_data(limit = "unlimited")]
    pub file: FieldData<Bytes>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UploadResponse {
    pub document_id: String,
    pub file_name: String,
    pub status: String,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DocumentInfo {
    pub document_id: String,
    pub file_name: String,
    pub upload_date: DateTime<Utc>,
    pub file_size: u64,
    pub mime_type: String,
}

impl From<Document> for DocumentInfo {
    fn from(document: Document) -> Self {
        Self {
            document_id: document.id,
            file_name: document.file_name,
            upload_date: document.created_at,
            file_size: document.file_size,
            mime_type: document.mime_type,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ListDocumentsResponse {
    pub documents: Vec<DocumentInfo>,
    pub total: usize,
}

/// Upload a document: extract its text in memory and persist only the
/// extracted content plus metadata. The original bytes are dropped at the
/// end of this handler.
pub async fn upload_document(
    State(state): State<ApiState>,
    TypedMultipart(input): TypedMultipart<UploadParams>,
) -> Result<impl IntoResponse, ApiError> {
    let file_name = input
        .file
        .metadata
        .file_name
        .clone()
        .filter(|name| !name.is_empty())
        .ok_or_else(|| ApiError::ValidationError("No file provided".to_string()))?;

    let extension = extraction_pipeline::file_extension(&file_name)
        .filter(|extension| DocumentFormat::from_extension(extension).is_some())
        .ok_or_else(|| {
            ApiError::ValidationError(
                "File type not allowed. Allowed: .pdf, .txt, .docx, .xlsx, .zip".to_string(),
            )
        })?;

    let bytes = input.file.contents;
    if bytes.len() > state.config.max_file_size {
        return Err(ApiError::PayloadTooLarge(format!(
            "File too large. Max size: {} bytes",
            state.config.max_file_size
        )));
    }

    info!(
        file_name = %file_name,
        file_size = bytes.len(),
        "Received document upload"
    );

    // Metadata is derived before the bytes move into the blocking task.
    // The parsers are CPU-bound, so they run off the async executor.
    let document = Document::from_upload(file_name.clone(), &bytes);

    let extracted = tokio::task::spawn_blocking(move || {
        extraction_pipeline::extract_document(&bytes, &extension)
    })
    .await
    .map_err(AppError::from)?
    .map_err(ApiError::from)?;

    state
        .db
        .store_item(document.clone())
        .await
        .map_err(AppError::from)?;
    state
        .db
        .store_item(DocumentContent::new(document.id.clone(), extracted))
        .await
        .map_err(AppError::from)?;

    info!(document_id = %document.id, "Document processed and stored");

    Ok((
        StatusCode::OK,
        Json(UploadResponse {
            document_id: document.id,
            file_name,
            status: "success".to_string(),
            message: "Document processed successfully (in-memory, no file stored)".to_string(),
        }),
    ))
}

/// List the metadata records of every stored document.
pub async fn list_documents(
    State(state): State<ApiState>,
) -> Result<impl IntoResponse, ApiError> {
    let documents: Vec<Document> = state
        .db
        .get_all_stored_items()
        .await
        .map_err(AppError::from)?;

    let total = documents.len();
    let documents: Vec<DocumentInfo> = documents.into_iter().map(DocumentInfo::from).collect();

    Ok(Json(ListDocumentsResponse { documents, total }))
}

/// Delete a document's metadata and content records.
pub async fn delete_document(
    State(state): State<ApiState>,
    Path(document_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let metadata: Option<Document> = state
        .db
        .get_item(&document_id)
        .await
        .map_err(AppError::from)?;
    if metadata.is_none() {
        return Err(ApiError::NotFound("Document not found".to_string()));
    }

    Document::delete_with_content(&document_id, &state.db).await?;

    Ok(Json(json!({
        "message": "Document deleted successfully",
        "document_id": document_id
    })))
}
