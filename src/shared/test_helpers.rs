//! Fixtures shared by service and handler tests

use std::sync::{Arc, Mutex, RwLock};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use fake::faker::lorem::en::Sentence;
use fake::Fake;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::locations::LocationService;
use crate::features::media::MediaService;
use crate::features::reports::dtos::CreateReportDto;
use crate::features::reports::models::{CreateReport, Report, ReportFilter};
use crate::features::reports::services::{ReportFeed, ReportRepository, ReportService};
use crate::modules::media::{MediaFile, MediaUploader, UploadedMedia};

/// Upload limit used by `report_context`
pub const TEST_MAX_FILE_SIZE: usize = 1024 * 1024;

/// Feed channel capacity used by `report_context`
pub const TEST_FEED_CAPACITY: usize = 4;

/// Uploader that records file names instead of calling a media host
#[derive(Default)]
pub struct FakeUploader {
    fail: bool,
    uploaded: Mutex<Vec<String>>,
}

impl FakeUploader {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn uploaded_names(&self) -> Vec<String> {
        self.uploaded.lock().unwrap().clone()
    }
}

#[async_trait]
impl MediaUploader for FakeUploader {
    async fn upload(&self, file: MediaFile) -> std::result::Result<UploadedMedia, AppError> {
        if self.fail {
            return Err(AppError::ExternalServiceError(
                "media host unavailable".to_string(),
            ));
        }

        let kind = file.kind();
        let mut uploaded = self.uploaded.lock().unwrap();
        uploaded.push(file.file_name.clone());

        Ok(UploadedMedia {
            url: format!(
                "https://media.test/{}/{}/{}",
                kind,
                uploaded.len(),
                file.file_name
            ),
            kind,
        })
    }

    fn backend_name(&self) -> &'static str {
        "fake"
    }
}

pub fn media_file(name: &str, content_type: &str, size: usize) -> MediaFile {
    MediaFile {
        data: vec![0u8; size],
        file_name: name.to_string(),
        content_type: content_type.to_string(),
    }
}

/// Append-only store mirroring `PgReportRepository`, including the
/// publish-on-insert the database trigger provides
#[derive(Default)]
pub struct InMemoryReportRepository {
    reports: RwLock<Vec<Report>>,
    feed: Option<Arc<ReportFeed>>,
}

impl InMemoryReportRepository {
    pub fn with_feed(feed: Arc<ReportFeed>) -> Self {
        Self {
            reports: RwLock::default(),
            feed: Some(feed),
        }
    }

    pub fn len(&self) -> usize {
        self.reports.read().unwrap().len()
    }

    /// Store a report as-is without notifying the feed. Creation times are
    /// bumped so that later seeds are always newer.
    pub fn seed(&self, mut report: Report) -> Report {
        let mut reports = self.reports.write().unwrap();
        report.created_at = next_timestamp(&reports, report.created_at);
        reports.push(report.clone());
        report
    }

    fn sorted(&self) -> Vec<Report> {
        let mut reports = self.reports.read().unwrap().clone();
        reports.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        reports
    }
}

fn next_timestamp(reports: &[Report], candidate: DateTime<Utc>) -> DateTime<Utc> {
    match reports.iter().map(|r| r.created_at).max() {
        Some(latest) if latest >= candidate => latest + Duration::microseconds(1),
        _ => candidate,
    }
}

#[async_trait]
impl ReportRepository for InMemoryReportRepository {
    async fn insert(&self, report: CreateReport) -> Result<Report> {
        let stored = self.seed(Report {
            id: Uuid::now_v7(),
            province: report.province,
            district: report.district,
            municipality: report.municipality,
            city_details: report.city_details,
            description: report.description,
            coordinates: report.coordinates,
            responsible_party: report.responsible_party.map(sqlx::types::Json),
            image_url: report.image_url,
            created_at: Utc::now(),
        });

        if let Some(feed) = &self.feed {
            feed.publish(stored.clone());
        }

        Ok(stored)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Report>> {
        Ok(self
            .reports
            .read()
            .unwrap()
            .iter()
            .find(|r| r.id == id)
            .cloned())
    }

    async fn list(&self, filter: &ReportFilter, limit: i64, offset: i64) -> Result<Vec<Report>> {
        Ok(self
            .sorted()
            .into_iter()
            .filter(|r| filter.matches(r))
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .collect())
    }

    async fn count(&self, filter: &ReportFilter) -> Result<i64> {
        Ok(self
            .reports
            .read()
            .unwrap()
            .iter()
            .filter(|r| filter.matches(r))
            .count() as i64)
    }

    async fn list_created_after(&self, after: DateTime<Utc>, limit: i64) -> Result<Vec<Report>> {
        let mut reports: Vec<Report> = self
            .sorted()
            .into_iter()
            .filter(|r| r.created_at > after)
            .collect();
        reports.reverse();
        reports.truncate(limit.max(0) as usize);
        Ok(reports)
    }
}

/// A stored report in Bagmati Province with coordinates in Kathmandu
pub fn sample_report(district: &str) -> Report {
    Report {
        id: Uuid::now_v7(),
        province: "Bagmati Province".to_string(),
        district: district.to_string(),
        municipality: district.to_string(),
        city_details: "Ring Road, near Kalanki".to_string(),
        description: Sentence(3..8).fake(),
        coordinates: "27.717200, 85.324000".to_string(),
        responsible_party: None,
        image_url: String::new(),
        created_at: Utc::now(),
    }
}

/// A submission that passes every check against the embedded location table
pub fn valid_report_dto() -> CreateReportDto {
    CreateReportDto {
        province: "Bagmati Province".to_string(),
        district: "Kathmandu".to_string(),
        municipality: "Kirtipur".to_string(),
        city_details: "Ward 3, below the university gate".to_string(),
        description: Sentence(3..8).fake(),
        coordinates: "27.6785, 85.2776".to_string(),
        responsible_party: None,
        image_url: None,
    }
}

pub struct ReportContext {
    pub service: Arc<ReportService>,
    pub repository: Arc<InMemoryReportRepository>,
    pub uploader: Arc<FakeUploader>,
}

/// Report service wired to the embedded locations, an in-memory store and
/// the given uploader
pub fn report_context(uploader: FakeUploader) -> ReportContext {
    let feed = Arc::new(ReportFeed::new(TEST_FEED_CAPACITY));
    let repository = Arc::new(InMemoryReportRepository::with_feed(feed.clone()));
    let uploader = Arc::new(uploader);
    let locations = Arc::new(LocationService::embedded().unwrap());
    let media = Arc::new(MediaService::new(uploader.clone(), TEST_MAX_FILE_SIZE));

    let service = Arc::new(ReportService::new(
        repository.clone(),
        feed,
        locations,
        media,
        100,
    ));

    ReportContext {
        service,
        repository,
        uploader,
    }
}
