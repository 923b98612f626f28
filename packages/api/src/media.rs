// ABOUTME: Image upload endpoint for admin forms
// ABOUTME: Reads the multipart `file` field and hands it to the configured media store

use axum::{
    extract::{Multipart, State},
    Json,
};
use storefront_core::ValidationErrors;
use storefront_media::{ImageUpload, UploadedMedia, MAX_UPLOAD_BYTES};
use tracing::info;

use crate::error::{ApiResult, AppError};
use crate::response::ApiResponse;
use crate::state::AppState;

/// Request body limit for the upload route: the file plus multipart framing
pub const MEDIA_BODY_LIMIT: usize = MAX_UPLOAD_BYTES + 64 * 1024;

pub async fn upload_media(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<Json<ApiResponse<UploadedMedia>>> {
    if !state.media.is_configured() {
        return Err(AppError::ServiceUnavailable);
    }

    let mut upload = None;
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some("file") {
            continue;
        }

        let file_name = field.file_name().unwrap_or("upload").to_string();
        let content_type = field.content_type().map(str::to_string);
        let data = field.bytes().await?;

        upload = Some(ImageUpload::new(file_name, content_type, data));
        break;
    }

    let upload =
        upload.ok_or_else(|| ValidationErrors::single("file", "No file was uploaded"))?;

    info!("Received upload {} ({} bytes)", upload.file_name, upload.len());

    let stored = state.media.upload(upload).await?;
    Ok(Json(ApiResponse::success(stored)))
}
