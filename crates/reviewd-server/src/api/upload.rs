//! Multipart upload handler. The batch is all-or-nothing: every file is
//! validated before the first byte hits disk, and a mid-batch write failure
//! rolls back the files already stored.

use axum::{
    extract::{Multipart, State},
    Extension, Json,
};
use serde::Serialize;

use reviewd_media::{unique_filename, validate_upload, MediaKind};

use crate::middleware::RequestId;

use super::{ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(in crate::api) struct UploadedFile {
    pub filename: String,
    pub original_name: String,
    pub url: String,
    #[serde(rename = "type")]
    pub kind: MediaKind,
    pub size: u64,
    pub mime_type: String,
}

struct PendingFile {
    original_name: String,
    content_type: String,
    kind: MediaKind,
    bytes: axum::body::Bytes,
}

/// POST /upload — store a batch of review media files.
pub(in crate::api) async fn upload_files(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    mut multipart: Multipart,
) -> Result<Json<ApiResponse<Vec<UploadedFile>>>, ApiError> {
    let rid = &req_id.0;

    let mut pending = Vec::new();
    while let Some(field) = multipart.next_field().await.map_err(|e| {
        ApiError::new(rid, "bad_request", format!("malformed multipart body: {e}"))
    })? {
        if field.name() != Some("files") {
            continue;
        }
        let original_name = field.file_name().unwrap_or("upload").to_owned();
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_owned();
        let bytes = field.bytes().await.map_err(|e| {
            ApiError::new(rid, "bad_request", format!("failed to read upload: {e}"))
        })?;

        let kind = validate_upload(&original_name, &content_type, bytes.len() as u64)
            .map_err(|e| ApiError::new(rid, "validation_error", e.to_string()))?;

        pending.push(PendingFile {
            original_name,
            content_type,
            kind,
            bytes,
        });
    }

    if pending.is_empty() {
        return Err(ApiError::new(rid, "validation_error", "no files uploaded"));
    }

    let mut stored: Vec<UploadedFile> = Vec::with_capacity(pending.len());
    for file in &pending {
        let filename = unique_filename(&file.original_name, &file.content_type);
        match state.media.put(&filename, &file.bytes).await {
            Ok(url) => stored.push(UploadedFile {
                filename,
                original_name: file.original_name.clone(),
                url,
                kind: file.kind,
                size: file.bytes.len() as u64,
                mime_type: file.content_type.clone(),
            }),
            Err(e) => {
                tracing::error!(error = %e, filename = %filename, "media store write failed");
                for done in &stored {
                    if let Err(cleanup) = state.media.remove(&done.filename).await {
                        tracing::warn!(error = %cleanup, filename = %done.filename,
                            "failed to remove partially stored upload");
                    }
                }
                return Err(ApiError::new(
                    rid,
                    "internal_error",
                    "failed to store uploaded files",
                ));
            }
        }
    }

    Ok(Json(ApiResponse {
        data: stored,
        meta: ResponseMeta::new(req_id.0),
    }))
}
