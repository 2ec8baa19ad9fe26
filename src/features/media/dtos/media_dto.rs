use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::modules::media::{MediaKind, UploadedMedia};

/// Extra request body allowance on top of the file size limit for multipart framing
pub const MULTIPART_OVERHEAD: usize = 1024 * 1024;

/// Upload media request DTO for OpenAPI documentation
/// Note: The actual handler uses axum's Multipart extractor directly.
#[derive(Debug, ToSchema)]
#[allow(dead_code)]
pub struct UploadMediaDto {
    /// Photo or video of the pothole
    #[schema(format = Binary, content_media_type = "application/octet-stream")]
    pub file: String,
}

/// Response DTO for a finished upload
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MediaResponseDto {
    /// Public URL of the uploaded file
    pub url: String,
    pub kind: MediaKind,
    pub content_type: String,
    /// Size of the file in bytes
    pub size: usize,
}

impl MediaResponseDto {
    pub fn new(uploaded: UploadedMedia, content_type: String, size: usize) -> Self {
        Self {
            url: uploaded.url,
            kind: uploaded.kind,
            content_type,
            size,
        }
    }
}
