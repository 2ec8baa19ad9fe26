use std::sync::Arc;
use tracing::info;

use crate::core::error::{AppError, Result};
use crate::modules::media::{MediaFile, MediaUploader, UploadedMedia};

/// Checks incoming files and forwards them to the configured media host
pub struct MediaService {
    uploader: Arc<dyn MediaUploader>,
    max_file_size: usize,
}

impl MediaService {
    pub fn new(uploader: Arc<dyn MediaUploader>, max_file_size: usize) -> Self {
        Self {
            uploader,
            max_file_size,
        }
    }

    pub fn max_file_size(&self) -> usize {
        self.max_file_size
    }

    /// Reject files the form would not have offered: only `image/*` and `video/*`
    pub fn check(&self, file: &MediaFile) -> Result<()> {
        if file.data.is_empty() {
            return Err(AppError::BadRequest("Uploaded file is empty".to_string()));
        }

        if file.size() > self.max_file_size {
            return Err(AppError::PayloadTooLarge(format!(
                "File too large. Maximum size is {} bytes ({} MB)",
                self.max_file_size,
                self.max_file_size / 1024 / 1024
            )));
        }

        let content_type = file.content_type.to_ascii_lowercase();
        if !(content_type.starts_with("image/") || content_type.starts_with("video/")) {
            return Err(AppError::BadRequest(format!(
                "File type '{}' is not allowed. Upload an image or a video",
                file.content_type
            )));
        }

        Ok(())
    }

    /// Check then upload a file, returning where it can be fetched from
    pub async fn upload(&self, file: MediaFile) -> Result<UploadedMedia> {
        self.check(&file)?;

        let file_name = file.file_name.clone();
        let size = file.size();
        let uploaded = self.uploader.upload(file).await?;

        info!(
            "Media uploaded via {}: name={}, kind={}, size={}",
            self.uploader.backend_name(),
            file_name,
            uploaded.kind,
            size
        );

        Ok(uploaded)
    }
}
