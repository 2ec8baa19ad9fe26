//! Media hosting for report photos and videos
//!
//! A single `MediaUploader` seam with two backends: Cloudinary unsigned
//! uploads (the default) and a MinIO/S3-compatible bucket.

mod cloudinary_client;
mod minio_client;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::core::error::AppError;

pub use cloudinary_client::CloudinaryClient;
pub use minio_client::MinIOClient;

/// Photo or video, decided by the upload's content type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    /// `video/*` is a video, everything else is treated as an image
    pub fn from_content_type(content_type: &str) -> Self {
        if content_type.to_ascii_lowercase().starts_with("video/") {
            MediaKind::Video
        } else {
            MediaKind::Image
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Image => "image",
            MediaKind::Video => "video",
        }
    }
}

impl std::fmt::Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A file received from a client, ready to forward
#[derive(Debug, Clone)]
pub struct MediaFile {
    pub data: Vec<u8>,
    pub file_name: String,
    pub content_type: String,
}

impl MediaFile {
    pub fn kind(&self) -> MediaKind {
        MediaKind::from_content_type(&self.content_type)
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }
}

/// Where an uploaded file can be fetched from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedMedia {
    pub url: String,
    pub kind: MediaKind,
}

/// Forwards one file to a media host and returns its public URL
#[async_trait]
pub trait MediaUploader: Send + Sync {
    async fn upload(&self, file: MediaFile) -> Result<UploadedMedia, AppError>;

    /// Short backend name for logs
    fn backend_name(&self) -> &'static str;
}

/// File extension for common photo and video types
pub fn extension_for(content_type: &str, file_name: &str) -> String {
    let known = match content_type {
        "image/jpeg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/gif" => Some("gif"),
        "image/webp" => Some("webp"),
        "image/heic" => Some("heic"),
        "video/mp4" => Some("mp4"),
        "video/quicktime" => Some("mov"),
        "video/webm" => Some("webm"),
        "video/3gpp" => Some("3gp"),
        _ => None,
    };

    match known {
        Some(ext) => ext.to_string(),
        None => file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
            .unwrap_or_else(|| "bin".to_string()),
    }
}
