use crate::error::{ServerError, ServerResult};
use crate::state::ServerState;
use crate::types::{sanitize_filename, FileRecord};
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Plain acknowledgement body
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// List all records, newest first
pub async fn list_files(State(state): State<Arc<ServerState>>) -> Json<Vec<FileRecord>> {
    Json(state.store.list().await)
}

/// Delete a stored file and its record.
///
/// Both steps are best effort: a missing file or an unknown filename still
/// answers 200.
pub async fn delete_file(
    State(state): State<Arc<ServerState>>,
    Path(filename): Path<String>,
) -> ServerResult<impl IntoResponse> {
    let stored_name = sanitize_filename(&filename)
        .ok_or_else(|| ServerError::BadRequest("Filename is required".to_string()))?;

    match state.store.remove_by_filename(&stored_name).await {
        Some(record) => tracing::info!(filename = %stored_name, id = %record.id, "Deleted file record"),
        None => tracing::debug!(filename = %stored_name, "No record matched delete"),
    }

    Ok(Json(MessageResponse {
        message: "File deleted successfully".to_string(),
    }))
}

/// `DELETE /api/files/` with no filename segment
pub async fn delete_without_filename() -> ServerError {
    ServerError::BadRequest("Filename is required".to_string())
}
