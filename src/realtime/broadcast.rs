/**
 * Event Broadcasting
 *
 * Events fan out over `tokio::sync::broadcast`: every subscriber gets a
 * copy, and sending with no subscribers is a no-op rather than an error.
 * The emitting side never depends on delivery.
 */

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::broadcast;

/// A named event with a JSON payload, e.g. `newsAdded` carrying the
/// created record.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentEvent {
    pub event: String,
    pub payload: serde_json::Value,
    pub timestamp: DateTime<Utc>,
}

impl ContentEvent {
    pub fn new(event: impl Into<String>, payload: serde_json::Value) -> Self {
        Self {
            event: event.into(),
            payload,
            timestamp: Utc::now(),
        }
    }
}

/// Shared sender half of the notification channel.
pub type ContentEventBroadcast = broadcast::Sender<ContentEvent>;

/// Broadcast an event to all subscribers.
///
/// # Returns
///
/// Number of subscribers that received the event (0 if none are
/// connected, which is fine).
pub fn broadcast_event(broadcast_tx: &ContentEventBroadcast, event: ContentEvent) -> usize {
    match broadcast_tx.send(event) {
        Ok(subscriber_count) => {
            tracing::debug!("[Realtime] Event broadcast to {} subscribers", subscriber_count);
            subscriber_count
        }
        Err(_) => {
            // No subscribers, that's okay.
            tracing::debug!("[Realtime] No subscribers to receive event");
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_broadcast_with_subscriber() {
        let (tx, mut rx) = broadcast::channel::<ContentEvent>(100);

        let event = ContentEvent::new("newsAdded", serde_json::json!({"title": "A"}));
        let count = broadcast_event(&tx, event);
        assert_eq!(count, 1);

        let received = rx.recv().await.unwrap();
        assert_eq!(received.event, "newsAdded");
        assert_eq!(received.payload["title"], "A");
    }

    #[tokio::test]
    async fn test_broadcast_without_subscribers() {
        let (tx, _) = broadcast::channel::<ContentEvent>(100);
        drop(tx.subscribe());

        let event = ContentEvent::new("actionAdded", serde_json::json!({}));
        assert_eq!(broadcast_event(&tx, event), 0);
    }

    #[tokio::test]
    async fn test_broadcast_multiple_subscribers() {
        let (tx, _) = broadcast::channel::<ContentEvent>(100);
        let mut rx1 = tx.subscribe();
        let mut rx2 = tx.subscribe();

        let event = ContentEvent::new("serviceAdded", serde_json::json!({"id": 1}));
        assert_eq!(broadcast_event(&tx, event), 2);

        assert_eq!(rx1.recv().await.unwrap().event, "serviceAdded");
        assert_eq!(rx2.recv().await.unwrap().event, "serviceAdded");
    }
}
