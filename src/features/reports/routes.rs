use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::features::media::dtos::MULTIPART_OVERHEAD;
use crate::features::reports::handlers;
use crate::features::reports::services::ReportService;

/// Create routes for the reports feature
pub fn routes(service: Arc<ReportService>) -> Router {
    let body_limit = service.max_upload_size() + MULTIPART_OVERHEAD;

    Router::new()
        .route(
            "/api/reports",
            get(handlers::list_reports).post(handlers::create_report),
        )
        .route(
            "/api/reports/submit",
            post(handlers::submit_report).layer(DefaultBodyLimit::max(body_limit)),
        )
        .route("/api/reports/stream", get(handlers::stream_reports))
        .route("/api/reports/{id}", get(handlers::get_report))
        .with_state(service)
}
