//! Pothole reports feature.
//!
//! Stores citizen reports and fans new ones out to live subscribers.
//!
//! ## Live feed
//!
//! An `AFTER INSERT` trigger on `reports` sends `pg_notify('report_created', id)`.
//! [`workers::FeedListener`] listens on that channel, loads the row and publishes
//! it to the in-process [`services::ReportFeed`], which every SSE connection
//! subscribes to. Each connection first gets a `snapshot` event, then one
//! `report.created` event per new report, or `resync` if it fell behind.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | POST | `/api/reports` | Submit a report (JSON, media already uploaded) |
//! | POST | `/api/reports/submit` | Submit a report form with an optional photo/video |
//! | GET | `/api/reports` | List reports, newest first, filterable by location |
//! | GET | `/api/reports/{id}` | Get a report |
//! | GET | `/api/reports/stream` | Live feed (server-sent events) |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;
pub mod workers;

pub use services::{PgReportRepository, ReportFeed, ReportService};
pub use workers::FeedListener;
