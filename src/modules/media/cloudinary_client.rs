//! Cloudinary upload client
//!
//! Posts the file with an unsigned upload preset to
//! `{api_base}/{cloud_name}/{image|video}/upload` and returns `secure_url`.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info};

use super::{MediaFile, MediaKind, MediaUploader, UploadedMedia};
use crate::core::config::CloudinaryConfig;
use crate::core::error::AppError;

/// Subset of the Cloudinary upload response we rely on
#[derive(Debug, Deserialize)]
struct CloudinaryUploadResponse {
    secure_url: Option<String>,
    public_id: Option<String>,
    bytes: Option<u64>,
    error: Option<CloudinaryErrorBody>,
}

#[derive(Debug, Deserialize)]
struct CloudinaryErrorBody {
    message: String,
}

pub struct CloudinaryClient {
    http_client: Client,
    api_base: String,
    cloud_name: String,
    upload_preset: String,
}

impl CloudinaryClient {
    pub fn new(config: CloudinaryConfig) -> Result<Self, AppError> {
        let http_client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        info!(
            "Cloudinary client initialized for cloud: {}, preset: {}",
            config.cloud_name, config.upload_preset
        );

        Ok(Self {
            http_client,
            api_base: config.api_base,
            cloud_name: config.cloud_name,
            upload_preset: config.upload_preset,
        })
    }

    /// Upload endpoint for the given kind of media
    pub fn upload_url(&self, kind: MediaKind) -> String {
        format!("{}/{}/{}/upload", self.api_base, self.cloud_name, kind)
    }
}

#[async_trait]
impl MediaUploader for CloudinaryClient {
    async fn upload(&self, file: MediaFile) -> Result<UploadedMedia, AppError> {
        let kind = file.kind();
        let url = self.upload_url(kind);
        let size = file.size();

        let part = Part::bytes(file.data)
            .file_name(file.file_name.clone())
            .mime_str(&file.content_type)
            .map_err(|e| {
                AppError::BadRequest(format!("Invalid content type '{}': {}", file.content_type, e))
            })?;

        let form = Form::new()
            .part("file", part)
            .text("upload_preset", self.upload_preset.clone());

        debug!("Uploading {} ({} bytes) to {}", file.file_name, size, url);

        let response = self
            .http_client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                AppError::ExternalServiceError(format!("Cloudinary request failed: {}", e))
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            AppError::ExternalServiceError(format!("Failed to read Cloudinary response: {}", e))
        })?;

        let parsed: Option<CloudinaryUploadResponse> = serde_json::from_str(&body).ok();

        if !status.is_success() {
            let reason = parsed
                .and_then(|p| p.error)
                .map(|e| e.message)
                .unwrap_or(body);
            return Err(AppError::ExternalServiceError(format!(
                "Cloudinary upload failed ({}): {}",
                status, reason
            )));
        }

        let parsed = parsed.ok_or_else(|| {
            AppError::ExternalServiceError("Cloudinary returned an unreadable response".into())
        })?;

        let secure_url = parsed.secure_url.ok_or_else(|| {
            AppError::ExternalServiceError("Cloudinary response has no secure_url".to_string())
        })?;

        info!(
            "Uploaded {} to Cloudinary: public_id={:?}, bytes={:?}",
            kind, parsed.public_id, parsed.bytes
        );

        Ok(UploadedMedia {
            url: secure_url,
            kind,
        })
    }

    fn backend_name(&self) -> &'static str {
        "cloudinary"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn client() -> CloudinaryClient {
        CloudinaryClient::new(CloudinaryConfig {
            api_base: "https://api.cloudinary.com/v1_1".to_string(),
            cloud_name: "demo".to_string(),
            upload_preset: "pothole_upload".to_string(),
            timeout: Duration::from_secs(5),
        })
        .unwrap()
    }

    #[test]
    fn test_upload_url_by_kind() {
        let client = client();
        assert_eq!(
            client.upload_url(MediaKind::Image),
            "https://api.cloudinary.com/v1_1/demo/image/upload"
        );
        assert_eq!(
            client.upload_url(MediaKind::Video),
            "https://api.cloudinary.com/v1_1/demo/video/upload"
        );
    }

    #[test]
    fn test_error_body_parses() {
        let raw = r#"{"error":{"message":"Upload preset not found"}}"#;
        let parsed: CloudinaryUploadResponse = serde_json::from_str(raw).unwrap();
        assert!(parsed.secure_url.is_none());
        assert_eq!(parsed.error.unwrap().message, "Upload preset not found");
    }
}
