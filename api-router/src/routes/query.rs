use answer_pipeline::answer_question;
use axum::{extract::State, Json};
use common::{error::AppError, storage::types::document_content::DocumentContent};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{api_state::ApiState, error::ApiError};

fn default_temperature() -> f32 {
    0.7
}

#[derive(Debug, Serialize, Deserialize)]
pub struct QueryRequest {
    pub document_id: String,
    pub question: String,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct QueryResponse {
    pub document_id: String,
    pub question: String,
    pub answer: String,
    pub model: String,
}

/// Answer a question about a stored document's extracted text.
pub async fn query_document(
    State(state): State<ApiState>,
    Json(request): Json<QueryRequest>,
) -> Result<Json<QueryResponse>, ApiError> {
    info!(
        document_id = %request.document_id,
        question_chars = request.question.len(),
        "Received query request"
    );

    let content: Option<DocumentContent> = state
        .db
        .get_item(&request.document_id)
        .await
        .map_err(AppError::from)?;
    let Some(content) = content else {
        return Err(ApiError::NotFound("Document not found".to_string()));
    };

    let document_text = content.extracted.combined_text();
    if document_text.is_empty() {
        return Err(ApiError::ValidationError(
            "Document has no extractable content".to_string(),
        ));
    }

    let answer = answer_question(
        &state.openai_client,
        &state.config,
        &document_text,
        &request.question,
        request.temperature,
    )
    .await?;

    Ok(Json(QueryResponse {
        document_id: request.document_id,
        question: request.question,
        answer,
        model: state.config.openrouter_model.clone(),
    }))
}
