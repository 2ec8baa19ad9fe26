use axum::{
    extract::{
        multipart::{Field, MultipartError},
        Multipart, State,
    },
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use tracing::debug;

use crate::core::error::AppError;
use crate::features::media::dtos::{MediaResponseDto, UploadMediaDto};
use crate::features::media::services::MediaService;
use crate::modules::media::MediaFile;
use crate::shared::types::ApiResponse;

/// Map a multipart read failure to an API error.
///
/// A body cut off by `DefaultBodyLimit` surfaces here as a multipart error
/// carrying 413, so it stays a `PayloadTooLarge` instead of a bad request.
pub fn multipart_error(e: MultipartError, context: &str) -> AppError {
    debug!("{}: {}", context, e);

    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge("File too large for upload".to_string())
    } else {
        AppError::BadRequest(format!("{}: {}", context, e))
    }
}

/// Read a multipart file field into memory.
///
/// Returns `None` when the browser sent the field without choosing a file
/// (empty filename and no bytes), which is how an untouched file input arrives.
pub async fn read_media_field(field: Field<'_>) -> Result<Option<MediaFile>, AppError> {
    let content_type = field
        .content_type()
        .map(|s| s.to_string())
        .unwrap_or_else(|| "application/octet-stream".to_string());

    let file_name = field
        .file_name()
        .map(|s| s.to_string())
        .unwrap_or_default();

    let data = field
        .bytes()
        .await
        .map_err(|e| multipart_error(e, "Failed to read file data"))?;

    if data.is_empty() && file_name.is_empty() {
        return Ok(None);
    }

    Ok(Some(MediaFile {
        data: data.to_vec(),
        file_name: if file_name.is_empty() {
            "unnamed".to_string()
        } else {
            file_name
        },
        content_type,
    }))
}

/// Upload a photo or video
///
/// Accepts multipart/form-data with a single `file` field and returns the
/// public URL to store as a report's `imageUrl`.
#[utoipa::path(
    post,
    path = "/api/media/upload",
    tag = "media",
    request_body(
        content = UploadMediaDto,
        content_type = "multipart/form-data",
        description = "Photo or video of the pothole",
    ),
    responses(
        (status = 201, description = "File uploaded successfully", body = ApiResponse<MediaResponseDto>),
        (status = 400, description = "Missing file or unsupported type"),
        (status = 413, description = "File too large"),
        (status = 502, description = "Media host rejected the upload")
    )
)]
pub async fn upload_media(
    State(service): State<Arc<MediaService>>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<ApiResponse<MediaResponseDto>>), AppError> {
    let mut file: Option<MediaFile> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, "Failed to read multipart data"))?
    {
        let field_name = field.name().unwrap_or("").to_string();

        match field_name.as_str() {
            "file" => file = read_media_field(field).await?,
            _ => debug!("Ignoring unknown field: {}", field_name),
        }
    }

    let file = file.ok_or_else(|| AppError::BadRequest("File is required".to_string()))?;
    let content_type = file.content_type.clone();
    let size = file.size();

    let uploaded = service.upload(file).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(MediaResponseDto::new(uploaded, content_type, size)),
            None,
            None,
        )),
    ))
}
