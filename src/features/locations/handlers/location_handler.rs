use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};

use crate::core::error::Result;
use crate::core::extractor::AppQuery;
use crate::features::locations::dtos::{
    DistrictResponseDto, LocationSearchQuery, MunicipalityResponseDto, ProvinceResponseDto,
};
use crate::features::locations::services::LocationService;
use crate::shared::types::ApiResponse;

/// List all provinces
#[utoipa::path(
    get,
    path = "/api/locations/provinces",
    params(LocationSearchQuery),
    responses(
        (status = 200, description = "List of provinces", body = ApiResponse<Vec<ProvinceResponseDto>>)
    ),
    tag = "locations"
)]
pub async fn list_provinces(
    State(service): State<Arc<LocationService>>,
    AppQuery(query): AppQuery<LocationSearchQuery>,
) -> Result<Json<ApiResponse<Vec<ProvinceResponseDto>>>> {
    let dtos: Vec<ProvinceResponseDto> = service
        .list_provinces(query.search.as_deref())
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(Json(ApiResponse::success(Some(dtos), None, None)))
}

/// List districts in a province
#[utoipa::path(
    get,
    path = "/api/locations/provinces/{province}/districts",
    params(
        ("province" = String, Path, description = "Province name, e.g. \"Koshi Province\""),
        LocationSearchQuery
    ),
    responses(
        (status = 200, description = "List of districts in the province", body = ApiResponse<Vec<DistrictResponseDto>>),
        (status = 404, description = "Province not found")
    ),
    tag = "locations"
)]
pub async fn list_districts(
    State(service): State<Arc<LocationService>>,
    Path(province): Path<String>,
    AppQuery(query): AppQuery<LocationSearchQuery>,
) -> Result<Json<ApiResponse<Vec<DistrictResponseDto>>>> {
    let dtos: Vec<DistrictResponseDto> = service
        .list_districts(&province, query.search.as_deref())?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(Json(ApiResponse::success(Some(dtos), None, None)))
}

/// List municipalities in a district
#[utoipa::path(
    get,
    path = "/api/locations/provinces/{province}/districts/{district}/municipalities",
    params(
        ("province" = String, Path, description = "Province name"),
        ("district" = String, Path, description = "District name, e.g. \"Sunsari\""),
        LocationSearchQuery
    ),
    responses(
        (status = 200, description = "List of municipalities in the district", body = ApiResponse<Vec<MunicipalityResponseDto>>),
        (status = 404, description = "Province or district not found")
    ),
    tag = "locations"
)]
pub async fn list_municipalities(
    State(service): State<Arc<LocationService>>,
    Path((province, district)): Path<(String, String)>,
    AppQuery(query): AppQuery<LocationSearchQuery>,
) -> Result<Json<ApiResponse<Vec<MunicipalityResponseDto>>>> {
    let dtos: Vec<MunicipalityResponseDto> = service
        .list_municipalities(&province, &district, query.search.as_deref())?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(Json(ApiResponse::success(Some(dtos), None, None)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum_test::TestServer;

    use crate::features::locations::routes;

    fn server() -> TestServer {
        let service = Arc::new(LocationService::embedded().unwrap());
        TestServer::new(routes::routes(service)).unwrap()
    }

    #[tokio::test]
    async fn test_list_provinces() {
        let response = server().get("/api/locations/provinces").await;
        response.assert_status_ok();
        let body: ApiResponse<Vec<ProvinceResponseDto>> = response.json();
        let provinces = body.data.unwrap();
        assert_eq!(provinces.len(), 7);
        assert_eq!(provinces[0].name, "Koshi Province");
        assert_eq!(provinces[0].district_count, 14);
    }

    #[tokio::test]
    async fn test_list_districts_with_encoded_name() {
        let response = server()
            .get("/api/locations/provinces/Bagmati%20Province/districts")
            .add_query_param("search", "kath")
            .await;
        response.assert_status_ok();
        let body: ApiResponse<Vec<DistrictResponseDto>> = response.json();
        let districts = body.data.unwrap();
        assert_eq!(districts.len(), 1);
        assert_eq!(districts[0].name, "Kathmandu");
    }

    #[tokio::test]
    async fn test_list_municipalities() {
        let response = server()
            .get("/api/locations/provinces/Koshi%20Province/districts/Sunsari/municipalities")
            .await;
        response.assert_status_ok();
        let body: ApiResponse<Vec<MunicipalityResponseDto>> = response.json();
        let names: Vec<String> = body.data.unwrap().into_iter().map(|m| m.name).collect();
        assert!(names.contains(&"Itahari".to_string()));
        assert!(names.contains(&"Dharan".to_string()));
    }

    #[tokio::test]
    async fn test_unknown_province_returns_404() {
        let response = server()
            .get("/api/locations/provinces/Nowhere/districts")
            .expect_failure()
            .await;
        response.assert_status(StatusCode::NOT_FOUND);
        let body: ApiResponse<()> = response.json();
        assert!(!body.success);
    }
}
