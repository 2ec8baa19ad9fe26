use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

/// Person or office answerable for the road, stored as JSONB
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponsibleParty {
    pub name: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub contact: String,
}

/// Database model for a pothole report. Rows are never updated or deleted.
#[derive(Debug, Clone, FromRow)]
pub struct Report {
    pub id: Uuid,
    pub province: String,
    pub district: String,
    pub municipality: String,
    pub city_details: String,
    pub description: String,
    /// "lat, lng" with six decimals, or empty
    pub coordinates: String,
    pub responsible_party: Option<Json<ResponsibleParty>>,
    pub image_url: String,
    pub created_at: DateTime<Utc>,
}

/// Checked data ready to be inserted
#[derive(Debug, Clone)]
pub struct CreateReport {
    pub province: String,
    pub district: String,
    pub municipality: String,
    pub city_details: String,
    pub description: String,
    pub coordinates: String,
    pub responsible_party: Option<ResponsibleParty>,
    pub image_url: String,
}

/// Exact-match filters on the location columns
#[derive(Debug, Clone, Default)]
pub struct ReportFilter {
    pub province: Option<String>,
    pub district: Option<String>,
    pub municipality: Option<String>,
}

impl ReportFilter {
    pub fn matches(&self, report: &Report) -> bool {
        fn field_matches(expected: &Option<String>, actual: &str) -> bool {
            expected.as_deref().is_none_or(|value| value == actual)
        }

        field_matches(&self.province, &report.province)
            && field_matches(&self.district, &report.district)
            && field_matches(&self.municipality, &report.municipality)
    }
}
