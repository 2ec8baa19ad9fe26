use std::sync::Arc;

use crate::core::config::MapConfig;
use crate::core::error::Result;
use crate::features::map::dtos::{
    MapMarkerDto, MapMarkersDto, MapQueryParams, MapSettingsDto, UserLocationDto,
    MAX_MARKER_LIMIT,
};
use crate::features::reports::ReportService;
use crate::shared::validation::{parse_coordinates, LatLng};

pub struct MapService {
    report_service: Arc<ReportService>,
    config: MapConfig,
}

impl MapService {
    pub fn new(report_service: Arc<ReportService>, config: MapConfig) -> Self {
        Self {
            report_service,
            config,
        }
    }

    pub fn settings(&self) -> MapSettingsDto {
        MapSettingsDto {
            tile_url: self.config.tile_url.clone(),
            attribution: self.config.attribution.clone(),
            center: [self.config.center_lat, self.config.center_lng],
            zoom: self.config.zoom,
            user_location_radius: self.config.user_location_radius_m,
        }
    }

    /// Markers for the newest reports that carry usable coordinates
    pub async fn markers(&self, params: &MapQueryParams) -> Result<MapMarkersDto> {
        let limit = params.limit.clamp(1, MAX_MARKER_LIMIT);
        let reports = self.report_service.latest(limit).await?;

        let markers: Vec<MapMarkerDto> = reports
            .into_iter()
            .filter_map(|r| {
                let point = parse_coordinates(&r.coordinates)?;
                Some(MapMarkerDto {
                    id: r.id,
                    lat: point.lat,
                    lng: point.lng,
                    district: r.district,
                    city_details: r.city_details,
                    description: r.description,
                    image_url: r.image_url,
                    created_at: r.created_at,
                })
            })
            .collect();

        let bounds = bounds_of(&markers);

        Ok(MapMarkersDto {
            total_count: markers.len() as i64,
            markers,
            bounds,
            user_location: self.user_location(params),
        })
    }

    fn user_location(&self, params: &MapQueryParams) -> Option<UserLocationDto> {
        let point = LatLng {
            lat: params.user_lat?,
            lng: params.user_lng?,
        };

        if !point.lat.is_finite() || !point.lng.is_finite() || !point.is_in_range() {
            return None;
        }

        Some(UserLocationDto {
            lat: point.lat,
            lng: point.lng,
            radius: self.config.user_location_radius_m,
        })
    }
}

fn bounds_of(markers: &[MapMarkerDto]) -> Option<[f64; 4]> {
    if markers.is_empty() {
        return None;
    }

    let min_lat = markers.iter().map(|m| m.lat).fold(f64::INFINITY, f64::min);
    let min_lng = markers.iter().map(|m| m.lng).fold(f64::INFINITY, f64::min);
    let max_lat = markers.iter().map(|m| m.lat).fold(f64::NEG_INFINITY, f64::max);
    let max_lng = markers.iter().map(|m| m.lng).fold(f64::NEG_INFINITY, f64::max);

    Some([min_lat, min_lng, max_lat, max_lng])
}
