use axum::{extract::DefaultBodyLimit, routing::post, Router};
use std::sync::Arc;

use crate::features::media::dtos::MULTIPART_OVERHEAD;
use crate::features::media::handlers::upload_media;
use crate::features::media::services::MediaService;

/// Create routes for the media feature
pub fn routes(service: Arc<MediaService>) -> Router {
    let body_limit = service.max_file_size() + MULTIPART_OVERHEAD;

    Router::new()
        .route(
            "/api/media/upload",
            post(upload_media).layer(DefaultBodyLimit::max(body_limit)),
        )
        .with_state(service)
}
