use std::sync::Arc;

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::core::errors::ApiError;
use crate::state::AppState;

/// Upper bounds on caller-supplied candidate counts.
const MAX_TOP_K: usize = 100;
const MAX_TOP_N: usize = 50;

#[derive(Debug, Deserialize)]
pub struct AskRequest {
    #[serde(default)]
    pub query: String,
    pub top_k: Option<usize>,
    pub top_n: Option<usize>,
}

pub async fn ask(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<AskRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let query = payload.query.trim();
    if query.is_empty() {
        return Err(ApiError::BadRequest("query must not be empty".to_string()));
    }

    let top_k = payload.top_k.map(|k| k.min(MAX_TOP_K));
    let top_n = payload.top_n.map(|n| n.min(MAX_TOP_N));

    let request_id = Uuid::new_v4();
    let result = state.pipeline.answer_question(query, top_k, top_n).await?;
    info!(
        "ask {} answered with {} verses, confidence {:.2}",
        request_id,
        result.verses.len(),
        result.confidence
    );

    Ok(Json(result))
}
