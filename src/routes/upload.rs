use crate::error::{ServerError, ServerResult};
use crate::state::ServerState;
use crate::types::{parse_tags, sanitize_filename, FileRecord, UploadMetadata};
use axum::body::Bytes;
use axum::extract::multipart::{Field, Multipart, MultipartRejection};
use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Multipart field carrying the file bytes
pub const FILE_FIELD: &str = "htmlFile";

/// Response from a successful upload
#[derive(Debug, Serialize, Deserialize)]
pub struct UploadResponse {
    pub message: String,
    pub file: FileRecord,
}

/// Parsed upload form
#[derive(Debug, Default)]
struct UploadForm {
    file: Option<UploadedFile>,
    metadata: UploadMetadata,
}

#[derive(Debug)]
struct UploadedFile {
    filename: Option<String>,
    data: Bytes,
}

/// Upload a file with its metadata
///
/// The file is written under its client filename (last path component only);
/// a later upload with the same name replaces both the bytes and the record.
pub async fn upload_file(
    State(state): State<Arc<ServerState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ServerResult<impl IntoResponse> {
    let limit = state.config.max_upload_size;
    let form = read_form(multipart?, limit).await?;

    let file = form.file.ok_or_else(|| {
        ServerError::BadRequest(format!(
            "Error retrieving the file: missing '{FILE_FIELD}' part"
        ))
    })?;
    let filename = file
        .filename
        .as_deref()
        .and_then(sanitize_filename)
        .ok_or_else(|| {
            ServerError::BadRequest("Error retrieving the file: invalid filename".to_string())
        })?;

    let metadata = form.metadata.with_defaults(&filename);
    let record = FileRecord::new(&filename, metadata, file.data.len() as u64);
    let replaced = state.store.upsert(record.clone(), &file.data).await?;

    tracing::info!(
        filename = %record.filename,
        id = %record.id,
        size = record.file_size,
        replaced,
        "Stored upload"
    );

    Ok(Json(UploadResponse {
        message: "File uploaded successfully".to_string(),
        file: record,
    }))
}

async fn read_form(mut multipart: Multipart, limit: usize) -> ServerResult<UploadForm> {
    let mut form = UploadForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ServerError::from_multipart(e, limit))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            FILE_FIELD => {
                let filename = field.file_name().map(str::to_string);
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| ServerError::from_multipart(e, limit))?;
                form.file = Some(UploadedFile { filename, data });
            }
            "title" => form.metadata.title = read_text(field, limit).await?,
            "description" => form.metadata.description = read_text(field, limit).await?,
            "category" => form.metadata.category = read_text(field, limit).await?,
            "tags" => form.metadata.tags = parse_tags(&read_text(field, limit).await?),
            "author" => form.metadata.author = read_text(field, limit).await?,
            "version" => form.metadata.version = read_text(field, limit).await?,
            other => tracing::debug!(field = %other, "Ignoring unknown form field"),
        }
    }

    Ok(form)
}

async fn read_text(field: Field<'_>, limit: usize) -> ServerResult<String> {
    field
        .text()
        .await
        .map_err(|e| ServerError::from_multipart(e, limit))
}
