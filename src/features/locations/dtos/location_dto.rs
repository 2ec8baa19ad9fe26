use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::features::locations::models::{District, Municipality, Province};

/// Query parameters for filtering a location level
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct LocationSearchQuery {
    /// Filter by name (case-insensitive, partial match)
    #[param(example = "kath")]
    pub search: Option<String>,
}

/// Response DTO for a province
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProvinceResponseDto {
    pub id: u32,
    pub name: String,
    pub district_count: usize,
}

impl From<&Province> for ProvinceResponseDto {
    fn from(province: &Province) -> Self {
        Self {
            id: province.id,
            name: province.name.clone(),
            district_count: province.district_list.len(),
        }
    }
}

/// Response DTO for a district
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DistrictResponseDto {
    pub id: u32,
    pub name: String,
    pub municipality_count: usize,
}

impl From<&District> for DistrictResponseDto {
    fn from(district: &District) -> Self {
        Self {
            id: district.id,
            name: district.name.clone(),
            municipality_count: district.municipality_list.len(),
        }
    }
}

/// Response DTO for a municipality
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MunicipalityResponseDto {
    pub id: u32,
    pub name: String,
}

impl From<&Municipality> for MunicipalityResponseDto {
    fn from(municipality: &Municipality) -> Self {
        Self {
            id: municipality.id,
            name: municipality.name.clone(),
        }
    }
}
