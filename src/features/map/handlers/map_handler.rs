use std::sync::Arc;

use axum::{extract::State, Json};

use crate::core::error::Result;
use crate::core::extractor::AppQuery;
use crate::features::map::dtos::{MapMarkersDto, MapQueryParams, MapSettingsDto};
use crate::features::map::services::MapService;
use crate::shared::types::ApiResponse;

/// Get map widget settings
#[utoipa::path(
    get,
    path = "/api/map/settings",
    tag = "map",
    responses(
        (status = 200, description = "Tile layer and initial view", body = ApiResponse<MapSettingsDto>)
    )
)]
pub async fn get_settings(
    State(service): State<Arc<MapService>>,
) -> Json<ApiResponse<MapSettingsDto>> {
    Json(ApiResponse::success(Some(service.settings()), None, None))
}

/// Get report markers
#[utoipa::path(
    get,
    path = "/api/map/markers",
    tag = "map",
    params(MapQueryParams),
    responses(
        (status = 200, description = "Markers for reports with coordinates", body = ApiResponse<MapMarkersDto>),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn get_markers(
    State(service): State<Arc<MapService>>,
    AppQuery(params): AppQuery<MapQueryParams>,
) -> Result<Json<ApiResponse<MapMarkersDto>>> {
    let data = service.markers(&params).await?;
    Ok(Json(ApiResponse::success(Some(data), None, None)))
}
