use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::locations::handlers;
use crate::features::locations::services::LocationService;

/// Create routes for the locations feature
pub fn routes(service: Arc<LocationService>) -> Router {
    Router::new()
        .route("/api/locations/provinces", get(handlers::list_provinces))
        .route(
            "/api/locations/provinces/{province}/districts",
            get(handlers::list_districts),
        )
        .route(
            "/api/locations/provinces/{province}/districts/{district}/municipalities",
            get(handlers::list_municipalities),
        )
        .with_state(service)
}
