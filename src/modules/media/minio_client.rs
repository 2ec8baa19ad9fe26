//! MinIO/S3-compatible media backend
//!
//! Stores report media under the public prefix of a bucket and returns a
//! direct URL on the public endpoint. The bucket needs an anonymous read
//! policy on that prefix, e.g. `mc anonymous set download minio/<bucket>/public`.

use async_trait::async_trait;
use s3::creds::Credentials;
use s3::{Bucket, BucketConfiguration, Region};
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::{extension_for, MediaFile, MediaUploader, UploadedMedia};
use crate::core::config::MinIOConfig;
use crate::core::error::AppError;

pub struct MinIOClient {
    bucket: Box<Bucket>,
    region: Region,
    credentials: Credentials,
    endpoint: String,
    public_endpoint: String,
    public_prefix: String,
}

impl MinIOClient {
    /// Create a new MinIO client and make sure its bucket exists
    pub async fn new(config: MinIOConfig) -> Result<Self, AppError> {
        let credentials = Credentials::new(
            Some(&config.access_key),
            Some(&config.secret_key),
            None,
            None,
            None,
        )
        .map_err(|e| AppError::Internal(format!("Failed to create MinIO credentials: {}", e)))?;

        let region = Region::Custom {
            region: config.region.clone(),
            endpoint: config.endpoint.clone(),
        };

        let mut bucket = Bucket::new(&config.bucket, region.clone(), credentials.clone())
            .map_err(|e| AppError::Internal(format!("Failed to create MinIO bucket: {}", e)))?;

        // Use path-style URLs for MinIO (http://endpoint/bucket instead of http://bucket.endpoint)
        bucket.set_path_style();

        let client = Self {
            bucket,
            region,
            credentials,
            endpoint: config.endpoint,
            public_endpoint: config.public_endpoint.trim_end_matches('/').to_string(),
            public_prefix: config.public_prefix.trim_matches('/').to_string(),
        };

        client.ensure_bucket_exists().await;

        info!(
            "MinIO client initialized for endpoint: {}, bucket: {}, public_prefix: {}",
            client.endpoint,
            client.bucket.name(),
            client.public_prefix
        );

        Ok(client)
    }

    /// Create the bucket if it is missing. Failures are logged, not fatal:
    /// the bucket may exist under credentials that cannot create buckets.
    async fn ensure_bucket_exists(&self) {
        let result = Bucket::create_with_path_style(
            &self.bucket.name(),
            self.region.clone(),
            self.credentials.clone(),
            BucketConfiguration::default(),
        )
        .await;

        match result {
            Ok(_) => info!("Bucket '{}' created successfully", self.bucket.name()),
            Err(e) => {
                let error_str = e.to_string();
                if error_str.contains("BucketAlreadyOwnedByYou")
                    || error_str.contains("BucketAlreadyExists")
                    || error_str.contains("already own it")
                {
                    debug!("Bucket '{}' already exists", self.bucket.name());
                } else {
                    warn!(
                        "Could not create bucket '{}': {}. Assuming it exists.",
                        self.bucket.name(),
                        e
                    );
                }
            }
        }
    }

    /// Object key for a new report upload, e.g. `public/reports/<uuid>.jpg`
    pub fn generate_key(&self, file: &MediaFile) -> String {
        format!(
            "{}/reports/{}.{}",
            self.public_prefix,
            Uuid::now_v7(),
            extension_for(&file.content_type, &file.file_name)
        )
    }

    /// Direct URL of an object under the public endpoint
    pub fn public_url(&self, key: &str) -> String {
        format!("{}/{}/{}", self.public_endpoint, self.bucket.name(), key)
    }
}

#[async_trait]
impl MediaUploader for MinIOClient {
    async fn upload(&self, file: MediaFile) -> Result<UploadedMedia, AppError> {
        let kind = file.kind();
        let key = self.generate_key(&file);

        self.bucket
            .put_object_with_content_type(&key, &file.data, &file.content_type)
            .await
            .map_err(|e| {
                AppError::ExternalServiceError(format!("Failed to upload file '{}': {}", key, e))
            })?;

        debug!(
            "Uploaded '{}' ({} bytes) to bucket '{}'",
            key,
            file.size(),
            self.bucket.name()
        );

        Ok(UploadedMedia {
            url: self.public_url(&key),
            kind,
        })
    }

    fn backend_name(&self) -> &'static str {
        "minio"
    }
}
