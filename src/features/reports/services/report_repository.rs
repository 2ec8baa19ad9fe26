use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::Result;
use crate::features::reports::models::{CreateReport, Report, ReportFilter};

/// Storage for reports. Reports are append-only: there is no update or delete.
#[async_trait]
pub trait ReportRepository: Send + Sync {
    /// Insert a report, assigning its id and creation time
    async fn insert(&self, report: CreateReport) -> Result<Report>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Report>>;

    /// Newest first, ties broken by id descending
    async fn list(&self, filter: &ReportFilter, limit: i64, offset: i64) -> Result<Vec<Report>>;

    async fn count(&self, filter: &ReportFilter) -> Result<i64>;

    /// Reports created strictly after `after`, oldest first
    async fn list_created_after(&self, after: DateTime<Utc>, limit: i64) -> Result<Vec<Report>>;
}

/// PostgreSQL-backed report storage.
///
/// Inserts fire the `report_created` notification through a database trigger;
/// publishing to live subscribers is left to `FeedListener`.
pub struct PgReportRepository {
    pool: PgPool,
}

impl PgReportRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReportRepository for PgReportRepository {
    async fn insert(&self, report: CreateReport) -> Result<Report> {
        let report = sqlx::query_as::<_, Report>(
            r#"
            INSERT INTO reports (
                id, province, district, municipality, city_details,
                description, coordinates, responsible_party, image_url
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id, province, district, municipality, city_details,
                      description, coordinates, responsible_party, image_url, created_at
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(report.province)
        .bind(report.district)
        .bind(report.municipality)
        .bind(report.city_details)
        .bind(report.description)
        .bind(report.coordinates)
        .bind(report.responsible_party.map(Json))
        .bind(report.image_url)
        .fetch_one(&self.pool)
        .await?;

        Ok(report)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Report>> {
        let report = sqlx::query_as::<_, Report>(
            r#"
            SELECT id, province, district, municipality, city_details,
                   description, coordinates, responsible_party, image_url, created_at
            FROM reports
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(report)
    }

    async fn list(&self, filter: &ReportFilter, limit: i64, offset: i64) -> Result<Vec<Report>> {
        let reports = sqlx::query_as::<_, Report>(
            r#"
            SELECT id, province, district, municipality, city_details,
                   description, coordinates, responsible_party, image_url, created_at
            FROM reports
            WHERE ($1::text IS NULL OR province = $1)
              AND ($2::text IS NULL OR district = $2)
              AND ($3::text IS NULL OR municipality = $3)
            ORDER BY created_at DESC, id DESC
            LIMIT $4 OFFSET $5
            "#,
        )
        .bind(filter.province.as_deref())
        .bind(filter.district.as_deref())
        .bind(filter.municipality.as_deref())
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(reports)
    }

    async fn count(&self, filter: &ReportFilter) -> Result<i64> {
        let total = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM reports
            WHERE ($1::text IS NULL OR province = $1)
              AND ($2::text IS NULL OR district = $2)
              AND ($3::text IS NULL OR municipality = $3)
            "#,
        )
        .bind(filter.province.as_deref())
        .bind(filter.district.as_deref())
        .bind(filter.municipality.as_deref())
        .fetch_one(&self.pool)
        .await?;

        Ok(total)
    }

    async fn list_created_after(&self, after: DateTime<Utc>, limit: i64) -> Result<Vec<Report>> {
        let reports = sqlx::query_as::<_, Report>(
            r#"
            SELECT id, province, district, municipality, city_details,
                   description, coordinates, responsible_party, image_url, created_at
            FROM reports
            WHERE created_at > $1
            ORDER BY created_at ASC, id ASC
            LIMIT $2
            "#,
        )
        .bind(after)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(reports)
    }
}
