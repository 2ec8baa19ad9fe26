use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use crate::core::database::create_listener;
use crate::core::error::{AppError, Result};
use crate::features::reports::services::{ReportFeed, ReportRepository};
use crate::shared::constants::REPORT_CREATED_CHANNEL;

/// Most reports replayed after a reconnect
const CATCH_UP_LIMIT: i64 = 500;

/// Bridges `report_created` database notifications into the in-process feed.
///
/// Every instance of the service runs one listener, so a report stored through
/// any instance reaches subscribers on all of them.
pub struct FeedListener {
    pool: PgPool,
    repository: Arc<dyn ReportRepository>,
    feed: Arc<ReportFeed>,
    reconnect_delay: Duration,
}

impl FeedListener {
    pub fn new(
        pool: PgPool,
        repository: Arc<dyn ReportRepository>,
        feed: Arc<ReportFeed>,
        reconnect_delay: Duration,
    ) -> Self {
        Self {
            pool,
            repository,
            feed,
            reconnect_delay,
        }
    }

    /// Listen forever, retrying after a fixed delay when the listener cannot reconnect
    pub async fn run(&self) {
        tracing::info!("Starting feed listener worker");

        let mut last_seen: Option<DateTime<Utc>> = None;

        loop {
            if let Err(e) = self.listen(&mut last_seen).await {
                tracing::error!("Feed listener connection lost: {:?}", e);
            }

            tokio::time::sleep(self.reconnect_delay).await;
        }
    }

    async fn listen(&self, last_seen: &mut Option<DateTime<Utc>>) -> Result<()> {
        let mut listener = create_listener(&self.pool, &[REPORT_CREATED_CHANNEL]).await?;
        tracing::info!("Listening on channel '{}'", REPORT_CREATED_CHANNEL);

        self.recover(last_seen).await?;

        loop {
            // `None` means the connection dropped and sqlx already reconnected;
            // notifications sent in between are gone, so replay from the table.
            let Some(notification) = listener.try_recv().await? else {
                tracing::warn!("Feed listener reconnected, replaying missed reports");
                self.recover(last_seen).await?;
                continue;
            };

            if let Err(e) = self.handle_notification(notification.payload(), last_seen).await {
                tracing::error!(
                    "Failed to publish notification '{}': {:?}",
                    notification.payload(),
                    e
                );
            }
        }
    }

    /// Catch up after a silent reconnect; nothing to replay before the first report
    async fn recover(&self, last_seen: &mut Option<DateTime<Utc>>) -> Result<()> {
        match *last_seen {
            Some(since) => self.catch_up(since, last_seen).await,
            None => Ok(()),
        }
    }

    /// Replay reports stored while the listener was disconnected
    async fn catch_up(
        &self,
        since: DateTime<Utc>,
        last_seen: &mut Option<DateTime<Utc>>,
    ) -> Result<()> {
        let missed = self
            .repository
            .list_created_after(since, CATCH_UP_LIMIT)
            .await?;

        if !missed.is_empty() {
            tracing::info!("Replaying {} reports missed while disconnected", missed.len());
        }

        for report in missed {
            *last_seen = Some(report.created_at);
            self.feed.publish(report);
        }

        Ok(())
    }

    /// Load the report named by a notification payload and publish it
    pub async fn handle_notification(
        &self,
        payload: &str,
        last_seen: &mut Option<DateTime<Utc>>,
    ) -> Result<()> {
        let id = Uuid::parse_str(payload.trim()).map_err(|e| {
            AppError::BadRequest(format!("Invalid report id in notification: {}", e))
        })?;

        let report = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Report with id {} not found", id)))?;

        if last_seen.is_none_or(|seen| report.created_at > seen) {
            *last_seen = Some(report.created_at);
        }
        self.feed.publish(report);

        Ok(())
    }
}
