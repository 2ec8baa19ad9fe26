use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::features::reports::models::{Report, ReportFilter, ResponsibleParty};

/// Optional responsible party details
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResponsiblePartyDto {
    #[serde(default)]
    #[validate(length(max = 100, message = "Responsible party name must be at most 100 characters"))]
    #[schema(example = "Ram Bahadur")]
    pub name: String,

    #[serde(default)]
    #[validate(length(max = 100, message = "Responsible party role must be at most 100 characters"))]
    #[schema(example = "Ward Chairperson")]
    pub role: String,

    #[serde(default)]
    #[validate(length(max = 100, message = "Responsible party contact must be at most 100 characters"))]
    #[schema(example = "9800000000")]
    pub contact: String,
}

impl ResponsiblePartyDto {
    fn trimmed(self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            role: self.role.trim().to_string(),
            contact: self.contact.trim().to_string(),
        }
    }

    fn is_blank(&self) -> bool {
        self.name.is_empty() && self.role.is_empty() && self.contact.is_empty()
    }
}

impl From<ResponsibleParty> for ResponsiblePartyDto {
    fn from(party: ResponsibleParty) -> Self {
        Self {
            name: party.name,
            role: party.role,
            contact: party.contact,
        }
    }
}

impl From<ResponsiblePartyDto> for ResponsibleParty {
    fn from(dto: ResponsiblePartyDto) -> Self {
        Self {
            name: dto.name,
            role: dto.role,
            contact: dto.contact,
        }
    }
}

/// Request DTO for submitting a report
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateReportDto {
    #[serde(default)]
    #[validate(length(max = 100, message = "Province must be at most 100 characters"))]
    #[schema(example = "Bagmati Province")]
    pub province: String,

    #[serde(default)]
    #[validate(length(max = 100, message = "District must be at most 100 characters"))]
    #[schema(example = "Kathmandu")]
    pub district: String,

    #[serde(default)]
    #[validate(length(max = 100, message = "Municipality must be at most 100 characters"))]
    #[schema(example = "Kirtipur")]
    pub municipality: String,

    #[serde(default)]
    #[validate(length(max = 255, message = "City details must be at most 255 characters"))]
    #[schema(example = "Ward 3, near Naya Bazaar chowk")]
    pub city_details: String,

    #[serde(default)]
    #[validate(length(max = 2000, message = "Description must be at most 2000 characters"))]
    pub description: String,

    /// "lat, lng", e.g. "27.717200, 85.324000"
    #[serde(default)]
    #[validate(length(max = 64, message = "Coordinates must be at most 64 characters"))]
    #[schema(example = "27.678500, 85.277600")]
    pub coordinates: String,

    #[validate(nested)]
    pub responsible_party: Option<ResponsiblePartyDto>,

    /// URL of an already uploaded photo or video
    #[serde(default, alias = "imageURL")]
    #[validate(
        length(max = 2048, message = "Image URL must be at most 2048 characters"),
        url(message = "Image URL must be a valid URL")
    )]
    pub image_url: Option<String>,
}

impl CreateReportDto {
    /// Trim every text field; blank optional values become `None`
    pub fn normalized(self) -> Self {
        Self {
            province: self.province.trim().to_string(),
            district: self.district.trim().to_string(),
            municipality: self.municipality.trim().to_string(),
            city_details: self.city_details.trim().to_string(),
            description: self.description.trim().to_string(),
            coordinates: self.coordinates.trim().to_string(),
            responsible_party: self
                .responsible_party
                .map(ResponsiblePartyDto::trimmed)
                .filter(|party| !party.is_blank()),
            image_url: self
                .image_url
                .map(|url| url.trim().to_string())
                .filter(|url| !url.is_empty()),
        }
    }

    pub fn missing_required(&self) -> bool {
        [
            &self.province,
            &self.district,
            &self.municipality,
            &self.city_details,
        ]
        .iter()
        .any(|field| field.is_empty())
    }
}

/// Submit report form for OpenAPI documentation
/// Note: The actual handler uses axum's Multipart extractor directly.
#[derive(Debug, ToSchema)]
#[schema(rename_all = "camelCase")]
#[allow(dead_code)]
pub struct SubmitReportDto {
    pub province: String,
    pub district: String,
    pub municipality: String,
    pub city_details: String,
    pub description: Option<String>,
    pub coordinates: Option<String>,
    /// JSON object `{"name","role","contact"}`
    pub responsible_party: Option<String>,
    /// Photo or video of the pothole
    #[schema(format = Binary, content_media_type = "application/octet-stream")]
    pub file: Option<String>,
}

/// Response DTO for a report
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReportResponseDto {
    pub id: Uuid,
    pub province: String,
    pub district: String,
    pub municipality: String,
    pub city_details: String,
    pub description: String,
    pub coordinates: String,
    pub responsible_party: Option<ResponsiblePartyDto>,
    #[serde(rename = "imageURL")]
    pub image_url: String,
    pub created_at: DateTime<Utc>,
}

impl From<Report> for ReportResponseDto {
    fn from(r: Report) -> Self {
        Self {
            id: r.id,
            province: r.province,
            district: r.district,
            municipality: r.municipality,
            city_details: r.city_details,
            description: r.description,
            coordinates: r.coordinates,
            responsible_party: r.responsible_party.map(|party| party.0.into()),
            image_url: r.image_url,
            created_at: r.created_at,
        }
    }
}

/// Query parameters for listing reports
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ReportListQuery {
    /// Exact province name
    pub province: Option<String>,
    /// Exact district name
    pub district: Option<String>,
    /// Exact municipality name
    pub municipality: Option<String>,
}

impl From<ReportListQuery> for ReportFilter {
    fn from(query: ReportListQuery) -> Self {
        fn clean(value: Option<String>) -> Option<String> {
            value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        }

        Self {
            province: clean(query.province),
            district: clean(query.district),
            municipality: clean(query.municipality),
        }
    }
}

/// Payload of the `snapshot` and `resync` feed events
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FeedSnapshotDto {
    /// Newest first
    pub reports: Vec<ReportResponseDto>,
}

impl From<Vec<Report>> for FeedSnapshotDto {
    fn from(reports: Vec<Report>) -> Self {
        Self {
            reports: reports.into_iter().map(Into::into).collect(),
        }
    }
}
