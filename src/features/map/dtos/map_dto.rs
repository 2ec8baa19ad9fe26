use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

/// Default number of markers returned
pub const DEFAULT_MARKER_LIMIT: i64 = 500;

/// Upper bound on markers per request
pub const MAX_MARKER_LIMIT: i64 = 1000;

/// Tile layer and initial view for the map widget
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MapSettingsDto {
    #[schema(example = "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png")]
    pub tile_url: String,
    pub attribution: String,
    /// [lat, lng]
    pub center: [f64; 2],
    pub zoom: u8,
    /// Radius of the circle drawn around the user's position, in metres
    pub user_location_radius: f64,
}

/// One report on the map
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MapMarkerDto {
    pub id: Uuid,
    pub lat: f64,
    pub lng: f64,
    pub district: String,
    pub city_details: String,
    pub description: String,
    pub image_url: String,
    pub created_at: DateTime<Utc>,
}

/// Circle around the viewer's own position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserLocationDto {
    pub lat: f64,
    pub lng: f64,
    /// Metres
    pub radius: f64,
}

/// Map data response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MapMarkersDto {
    pub markers: Vec<MapMarkerDto>,
    pub total_count: i64,
    /// Bounding box [min_lat, min_lng, max_lat, max_lng]
    pub bounds: Option<[f64; 4]>,
    pub user_location: Option<UserLocationDto>,
}

/// Query params for map markers
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct MapQueryParams {
    /// Maximum markers to return (default 500, max 1000)
    #[serde(default = "default_map_limit")]
    pub limit: i64,
    /// Viewer latitude, from the browser's geolocation
    pub user_lat: Option<f64>,
    /// Viewer longitude, from the browser's geolocation
    pub user_lng: Option<f64>,
}

fn default_map_limit() -> i64 {
    DEFAULT_MARKER_LIMIT
}

impl Default for MapQueryParams {
    fn default() -> Self {
        Self {
            limit: DEFAULT_MARKER_LIMIT,
            user_lat: None,
            user_lng: None,
        }
    }
}
