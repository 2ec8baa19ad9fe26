use std::collections::HashSet;
use std::sync::Arc;

use futures::stream::{self, BoxStream, StreamExt};
use tokio::sync::Mutex;
use tokio_stream::wrappers::BroadcastStream;
use tracing::{debug, error, info, warn};
use uuid::Uuid;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::features::locations::LocationService;
use crate::features::media::MediaService;
use crate::features::reports::dtos::CreateReportDto;
use crate::features::reports::models::{CreateReport, Report, ReportFilter};
use crate::features::reports::services::{FeedEvent, ReportFeed, ReportRepository};
use crate::modules::media::MediaFile;
use crate::shared::constants::REQUIRED_FIELDS_MESSAGE;
use crate::shared::types::PaginationQuery;
use crate::shared::validation::normalize_coordinates;

pub struct ReportService {
    repository: Arc<dyn ReportRepository>,
    feed: Arc<ReportFeed>,
    locations: Arc<LocationService>,
    media: Arc<MediaService>,
    snapshot_limit: i64,
}

impl ReportService {
    pub fn new(
        repository: Arc<dyn ReportRepository>,
        feed: Arc<ReportFeed>,
        locations: Arc<LocationService>,
        media: Arc<MediaService>,
        snapshot_limit: i64,
    ) -> Self {
        Self {
            repository,
            feed,
            locations,
            media,
            snapshot_limit: snapshot_limit.max(1),
        }
    }

    /// Largest upload `submit` accepts, in bytes
    pub fn max_upload_size(&self) -> usize {
        self.media.max_file_size()
    }

    /// Validate and store a report whose media (if any) is already hosted
    pub async fn create(&self, dto: CreateReportDto) -> Result<Report> {
        let new_report = self.prepare(dto)?;
        self.store(new_report).await
    }

    /// Form submission: validate, upload the optional file, then store.
    ///
    /// Nothing is written when validation or the upload fails.
    pub async fn submit(&self, dto: CreateReportDto, file: Option<MediaFile>) -> Result<Report> {
        let mut new_report = self.prepare(dto)?;

        if let Some(file) = file {
            let uploaded = self.media.upload(file).await?;
            new_report.image_url = uploaded.url;
        }

        self.store(new_report).await
    }

    /// One page of reports plus the total matching the filter
    pub async fn list(
        &self,
        filter: &ReportFilter,
        pagination: &PaginationQuery,
    ) -> Result<(Vec<Report>, i64)> {
        let reports = self
            .repository
            .list(filter, pagination.limit(), pagination.offset())
            .await?;
        let total = self.repository.count(filter).await?;

        Ok((reports, total))
    }

    pub async fn get(&self, id: Uuid) -> Result<Report> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Report with id {} not found", id)))
    }

    /// Newest `limit` reports across all locations
    pub async fn latest(&self, limit: i64) -> Result<Vec<Report>> {
        self.repository
            .list(&ReportFilter::default(), limit, 0)
            .await
    }

    /// Live feed: a snapshot of the newest reports, then every new report.
    ///
    /// The subscription is taken before the snapshot is read so no insert can
    /// fall between the two. Reports already sent in the latest snapshot or
    /// resync are not repeated as deltas.
    pub async fn subscribe(&self) -> Result<BoxStream<'static, FeedEvent>> {
        let receiver = self.feed.subscribe();
        debug!(
            "Feed subscriber connected, {} active",
            self.feed.subscriber_count()
        );
        let snapshot = self.latest(self.snapshot_limit).await?;
        let seen = Arc::new(Mutex::new(ids_of(&snapshot)));

        let repository = Arc::clone(&self.repository);
        let snapshot_limit = self.snapshot_limit;

        let updates = BroadcastStream::new(receiver).filter_map(move |item| {
            let repository = Arc::clone(&repository);
            let seen = Arc::clone(&seen);
            async move {
                match item {
                    Ok(report) => {
                        if seen.lock().await.contains(&report.id) {
                            None
                        } else {
                            Some(FeedEvent::Created(report))
                        }
                    }
                    Err(e) => {
                        warn!("Feed subscriber fell behind ({}), sending resync", e);
                        match repository
                            .list(&ReportFilter::default(), snapshot_limit, 0)
                            .await
                        {
                            Ok(reports) => {
                                *seen.lock().await = ids_of(&reports);
                                Some(FeedEvent::Resync(reports))
                            }
                            Err(e) => {
                                error!("Failed to load resync snapshot: {}", e);
                                None
                            }
                        }
                    }
                }
            }
        });

        Ok(stream::once(async move { FeedEvent::Snapshot(snapshot) })
            .chain(updates)
            .boxed())
    }

    fn prepare(&self, dto: CreateReportDto) -> Result<CreateReport> {
        let dto = dto.normalized();

        if dto.missing_required() {
            return Err(AppError::Validation(REQUIRED_FIELDS_MESSAGE.to_string()));
        }

        dto.validate().map_err(AppError::from_validation)?;

        if dto
            .responsible_party
            .as_ref()
            .is_some_and(|party| party.name.is_empty())
        {
            return Err(AppError::Validation(
                "Responsible party name is required".to_string(),
            ));
        }

        self.locations
            .validate_selection(&dto.province, &dto.district, &dto.municipality)?;

        let coordinates = normalize_coordinates(&dto.coordinates)
            .map_err(AppError::Validation)?
            .unwrap_or_default();

        Ok(CreateReport {
            province: dto.province,
            district: dto.district,
            municipality: dto.municipality,
            city_details: dto.city_details,
            description: dto.description,
            coordinates,
            responsible_party: dto.responsible_party.map(Into::into),
            image_url: dto.image_url.unwrap_or_default(),
        })
    }

    async fn store(&self, new_report: CreateReport) -> Result<Report> {
        let report = self.repository.insert(new_report).await?;

        info!(
            "Report {} stored for {}, {}, {}",
            report.id, report.municipality, report.district, report.province
        );

        Ok(report)
    }
}

fn ids_of(reports: &[Report]) -> HashSet<Uuid> {
    reports.iter().map(|r| r.id).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::FutureExt;

    use crate::features::reports::dtos::ResponsiblePartyDto;
    use crate::shared::test_helpers::{media_file, report_context, valid_report_dto, FakeUploader};

    #[tokio::test]
    async fn test_create_stores_trimmed_report() {
        let ctx = report_context(FakeUploader::default());
        let mut dto = valid_report_dto();
        dto.city_details = "  Ward 10, Naya Bazaar  ".to_string();
        dto.coordinates = "27.6785,85.2776".to_string();

        let report = ctx.service.create(dto).await.unwrap();

        assert_eq!(report.city_details, "Ward 10, Naya Bazaar");
        assert_eq!(report.coordinates, "27.678500, 85.277600");
        assert_eq!(report.image_url, "");
        assert_eq!(ctx.repository.len(), 1);
    }

    #[tokio::test]
    async fn test_missing_required_field() {
        let ctx = report_context(FakeUploader::default());
        let mut dto = valid_report_dto();
        dto.city_details = "   ".to_string();

        let err = ctx.service.create(dto).await.unwrap_err();

        match err {
            AppError::Validation(msg) => assert_eq!(msg, "Please fill all required fields."),
            other => panic!("unexpected error: {:?}", other),
        }
        assert_eq!(ctx.repository.len(), 0);
    }

    #[tokio::test]
    async fn test_rejects_location_outside_tree() {
        let ctx = report_context(FakeUploader::default());
        let mut dto = valid_report_dto();
        dto.municipality = "Pokhara".to_string();

        let err = ctx.service.create(dto).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(ref msg) if msg.contains("Pokhara")));
    }

    #[tokio::test]
    async fn test_rejects_bad_coordinates() {
        let ctx = report_context(FakeUploader::default());
        let mut dto = valid_report_dto();
        dto.coordinates = "somewhere near the temple".to_string();

        assert!(matches!(
            ctx.service.create(dto).await,
            Err(AppError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_responsible_party_needs_name() {
        let ctx = report_context(FakeUploader::default());
        let mut dto = valid_report_dto();
        dto.responsible_party = Some(ResponsiblePartyDto {
            role: "Ward Chairperson".to_string(),
            ..Default::default()
        });

        let err = ctx.service.create(dto).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(ref msg) if msg == "Responsible party name is required"));
    }

    #[tokio::test]
    async fn test_submit_uploads_file_and_uses_url() {
        let ctx = report_context(FakeUploader::default());
        let file = media_file("clip.mp4", "video/mp4", 64);

        let report = ctx
            .service
            .submit(valid_report_dto(), Some(file))
            .await
            .unwrap();

        assert!(report.image_url.contains("/video/"));
        assert_eq!(ctx.uploader.uploaded_names(), vec!["clip.mp4".to_string()]);
    }

    #[tokio::test]
    async fn test_submit_validates_before_upload() {
        let ctx = report_context(FakeUploader::default());
        let mut dto = valid_report_dto();
        dto.province = String::new();

        let result = ctx
            .service
            .submit(dto, Some(media_file("a.jpg", "image/jpeg", 8)))
            .await;

        assert!(result.is_err());
        assert!(ctx.uploader.uploaded_names().is_empty());
    }

    #[tokio::test]
    async fn test_upload_failure_writes_nothing() {
        let ctx = report_context(FakeUploader::failing());

        let result = ctx
            .service
            .submit(valid_report_dto(), Some(media_file("a.jpg", "image/jpeg", 8)))
            .await;

        assert!(matches!(result, Err(AppError::ExternalServiceError(_))));
        assert_eq!(ctx.repository.len(), 0);
    }

    #[tokio::test]
    async fn test_list_newest_first_with_filter_and_total() {
        let ctx = report_context(FakeUploader::default());
        let first = ctx.service.create(valid_report_dto()).await.unwrap();
        let second = ctx.service.create(valid_report_dto()).await.unwrap();

        let mut other = valid_report_dto();
        other.province = "Koshi Province".to_string();
        other.district = "Sunsari".to_string();
        other.municipality = "Itahari".to_string();
        ctx.service.create(other).await.unwrap();

        let filter = ReportFilter {
            district: Some("Kathmandu".to_string()),
            ..Default::default()
        };
        let pagination = PaginationQuery {
            page: 1,
            page_size: 1,
        };
        let (reports, total) = ctx.service.list(&filter, &pagination).await.unwrap();

        assert_eq!(total, 2);
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].id, second.id);

        let page_two = PaginationQuery {
            page: 2,
            page_size: 1,
        };
        let (reports, _) = ctx.service.list(&filter, &page_two).await.unwrap();
        assert_eq!(reports[0].id, first.id);
    }

    #[tokio::test]
    async fn test_get_unknown_report() {
        let ctx = report_context(FakeUploader::default());
        assert!(matches!(
            ctx.service.get(Uuid::now_v7()).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_subscribe_sends_snapshot_then_created() {
        let ctx = report_context(FakeUploader::default());
        let existing = ctx.service.create(valid_report_dto()).await.unwrap();

        let mut events = ctx.service.subscribe().await.unwrap();

        match events.next().await {
            Some(FeedEvent::Snapshot(reports)) => {
                assert_eq!(reports.len(), 1);
                assert_eq!(reports[0].id, existing.id);
            }
            other => panic!("expected snapshot, got {:?}", other),
        }

        let created = ctx.service.create(valid_report_dto()).await.unwrap();
        match events.next().await {
            Some(FeedEvent::Created(report)) => assert_eq!(report.id, created.id),
            other => panic!("expected created event, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_lagging_subscriber_gets_resync() {
        let ctx = report_context(FakeUploader::default());
        let mut events = ctx.service.subscribe().await.unwrap();
        assert!(matches!(events.next().await, Some(FeedEvent::Snapshot(_))));

        // Channel capacity in the test context is 4
        for _ in 0..6 {
            ctx.service.create(valid_report_dto()).await.unwrap();
        }

        match events.next().await {
            Some(FeedEvent::Resync(reports)) => assert_eq!(reports.len(), 6),
            other => panic!("expected resync, got {:?}", other),
        }

        // Deltas still buffered are covered by the resync and skipped
        assert!(events.next().now_or_never().is_none());
    }
}
