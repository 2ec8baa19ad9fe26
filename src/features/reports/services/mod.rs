mod report_feed;
mod report_repository;
mod report_service;

pub use report_feed::{FeedEvent, ReportFeed};
pub use report_repository::{PgReportRepository, ReportRepository};
pub use report_service::ReportService;
