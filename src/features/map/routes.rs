use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::map::handlers;
use crate::features::map::services::MapService;

/// Create routes for the map feature
pub fn routes(service: Arc<MapService>) -> Router {
    Router::new()
        .route("/api/map/settings", get(handlers::get_settings))
        .route("/api/map/markers", get(handlers::get_markers))
        .with_state(service)
}
