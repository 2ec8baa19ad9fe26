use tokio::sync::broadcast;
use tracing::debug;

use crate::features::reports::models::Report;

/// Event delivered to a live feed subscriber
#[derive(Debug, Clone)]
pub enum FeedEvent {
    /// Newest reports, sent once when the subscriber connects
    Snapshot(Vec<Report>),
    /// A report that was just stored
    Created(Report),
    /// Replacement snapshot for a subscriber that missed deltas
    Resync(Vec<Report>),
}

impl FeedEvent {
    /// SSE event name
    pub fn event_type(&self) -> &'static str {
        match self {
            FeedEvent::Snapshot(_) => "snapshot",
            FeedEvent::Created(_) => "report.created",
            FeedEvent::Resync(_) => "resync",
        }
    }
}

/// In-process fan-out of newly stored reports
pub struct ReportFeed {
    sender: broadcast::Sender<Report>,
}

impl ReportFeed {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Deliver a report to every current subscriber; returns how many there were
    pub fn publish(&self, report: Report) -> usize {
        let id = report.id;
        match self.sender.send(report) {
            Ok(receivers) => {
                debug!("Published report {} to {} subscribers", id, receivers);
                receivers
            }
            Err(_) => 0,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Report> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::sample_report;

    #[test]
    fn test_publish_without_subscribers() {
        let feed = ReportFeed::new(4);
        assert_eq!(feed.publish(sample_report("Kathmandu")), 0);
    }

    #[tokio::test]
    async fn test_publish_reaches_every_subscriber() {
        let feed = ReportFeed::new(4);
        let mut first = feed.subscribe();
        let mut second = feed.subscribe();
        assert_eq!(feed.subscriber_count(), 2);

        let report = sample_report("Sunsari");
        assert_eq!(feed.publish(report.clone()), 2);

        assert_eq!(first.recv().await.unwrap().id, report.id);
        assert_eq!(second.recv().await.unwrap().id, report.id);
    }

    #[test]
    fn test_event_types() {
        assert_eq!(FeedEvent::Snapshot(vec![]).event_type(), "snapshot");
        assert_eq!(FeedEvent::Resync(vec![]).event_type(), "resync");
        assert_eq!(
            FeedEvent::Created(sample_report("Kaski")).event_type(),
            "report.created"
        );
    }
}
