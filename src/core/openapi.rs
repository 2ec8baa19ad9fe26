use utoipa::{Modify, OpenApi};

use crate::features::locations::{dtos as locations_dtos, handlers as locations_handlers};
use crate::features::map::{dtos as map_dtos, handlers as map_handlers};
use crate::features::media::{dtos as media_dtos, handlers as media_handlers};
use crate::features::reports::{dtos as reports_dtos, handlers as reports_handlers};
use crate::modules::media::MediaKind;
use crate::shared::types::{ApiResponse, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Locations
        locations_handlers::location_handler::list_provinces,
        locations_handlers::location_handler::list_districts,
        locations_handlers::location_handler::list_municipalities,
        // Media
        media_handlers::media_handler::upload_media,
        // Reports
        reports_handlers::report_handler::create_report,
        reports_handlers::report_handler::submit_report,
        reports_handlers::report_handler::list_reports,
        reports_handlers::report_handler::get_report,
        reports_handlers::report_handler::stream_reports,
        // Map
        map_handlers::map_handler::get_settings,
        map_handlers::map_handler::get_markers,
    ),
    components(
        schemas(
            Meta,
            // Locations
            locations_dtos::ProvinceResponseDto,
            locations_dtos::DistrictResponseDto,
            locations_dtos::MunicipalityResponseDto,
            ApiResponse<Vec<locations_dtos::ProvinceResponseDto>>,
            ApiResponse<Vec<locations_dtos::DistrictResponseDto>>,
            ApiResponse<Vec<locations_dtos::MunicipalityResponseDto>>,
            // Media
            MediaKind,
            media_dtos::UploadMediaDto,
            media_dtos::MediaResponseDto,
            ApiResponse<media_dtos::MediaResponseDto>,
            // Reports
            reports_dtos::ResponsiblePartyDto,
            reports_dtos::CreateReportDto,
            reports_dtos::SubmitReportDto,
            reports_dtos::ReportResponseDto,
            reports_dtos::FeedSnapshotDto,
            ApiResponse<reports_dtos::ReportResponseDto>,
            ApiResponse<Vec<reports_dtos::ReportResponseDto>>,
            // Map
            map_dtos::MapSettingsDto,
            map_dtos::MapMarkerDto,
            map_dtos::UserLocationDto,
            map_dtos::MapMarkersDto,
            ApiResponse<map_dtos::MapSettingsDto>,
            ApiResponse<map_dtos::MapMarkersDto>,
        )
    ),
    tags(
        (name = "locations", description = "Nepal provinces, districts and municipalities"),
        (name = "media", description = "Photo and video upload"),
        (name = "reports", description = "Pothole reports and the live feed"),
        (name = "map", description = "Map settings and report markers"),
    ),
    info(
        title = "Pothole Patrol Nepal API",
        version = "0.1.0",
        description = "Citizen pothole reporting for Nepal",
    )
)]
pub struct ApiDoc;

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_every_route() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&str> = doc.paths.paths.keys().map(String::as_str).collect();

        for expected in [
            "/api/locations/provinces",
            "/api/media/upload",
            "/api/reports",
            "/api/reports/submit",
            "/api/reports/stream",
            "/api/reports/{id}",
            "/api/map/settings",
            "/api/map/markers",
        ] {
            assert!(paths.contains(&expected), "missing path {}", expected);
        }
    }
}
