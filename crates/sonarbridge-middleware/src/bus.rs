//! Headless, typed, topic-based publish/subscribe event bus.
//!
//! Uses [`tokio::sync::broadcast`] channels under the hood so that every
//! subscriber receives every message without any single subscriber blocking
//! the others.
//!
//! # Topics
//!
//! Traffic is partitioned into three [`Topic`] lanes so components only
//! receive the messages they care about:
//!
//! | Topic | Typical traffic |
//! |---|---|
//! | [`Topic::SonarReadings`] | Raw scalar distance readings from the sonar |
//! | [`Topic::RangeScans`] | Translated range-scan sweeps for downstream consumers |
//! | [`Topic::SystemAlerts`] | Process-level events (faults, shutdown notices) |

use sonarbridge_types::{BridgeError, Event};
use tokio::sync::broadcast;
use tracing::warn;

/// Default channel capacity (number of buffered events before old ones are
/// dropped for slow subscribers).
const DEFAULT_CAPACITY: usize = 256;

/// Enumeration of all first-class routing topics on the event bus.
///
/// Publishers and subscribers reference a `Topic` variant to ensure
/// messages are delivered only to the correct topic channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topic {
    /// Raw sonar distance readings, published by the sensor source.
    SonarReadings,
    /// Translated range-scan messages, published by the scan adapter.
    RangeScans,
    /// Process-level events: faults, operator shutdown notices.
    SystemAlerts,
}

/// Shared event bus. Clone it cheaply – all clones share the same underlying
/// broadcast channels.
#[derive(Clone, Debug)]
pub struct EventBus {
    sonar_readings: broadcast::Sender<Event>,
    range_scans: broadcast::Sender<Event>,
    system_alerts: broadcast::Sender<Event>,
}

impl EventBus {
    /// Create a new bus with the given channel capacity.
    ///
    /// The `capacity` is applied to every topic channel independently.
    pub fn new(capacity: usize) -> Self {
        let (sonar_readings, _) = broadcast::channel(capacity);
        let (range_scans, _) = broadcast::channel(capacity);
        let (system_alerts, _) = broadcast::channel(capacity);
        Self {
            sonar_readings,
            range_scans,
            system_alerts,
        }
    }

    /// Publish `event` to the given [`Topic`] channel.
    ///
    /// Returns the number of active receivers that were handed the event, or
    /// [`BridgeError::Channel`] when no subscriber is currently listening on
    /// the topic.
    pub fn publish_to(&self, topic: Topic, event: Event) -> Result<usize, BridgeError> {
        let sender = self.topic_sender(topic);
        match sender.send(event) {
            Ok(n) => Ok(n),
            Err(broadcast::error::SendError(_)) => Err(BridgeError::Channel(format!(
                "No subscribers for topic {:?}",
                topic
            ))),
        }
    }

    /// Subscribe to a specific [`Topic`] channel.
    ///
    /// The returned [`TopicReceiver`] yields only events published to that
    /// topic.
    pub fn subscribe_to(&self, topic: Topic) -> TopicReceiver {
        TopicReceiver {
            topic,
            receiver: self.topic_sender(topic).subscribe(),
        }
    }

    fn topic_sender(&self, topic: Topic) -> &broadcast::Sender<Event> {
        match topic {
            Topic::SonarReadings => &self.sonar_readings,
            Topic::RangeScans => &self.range_scans,
            Topic::SystemAlerts => &self.system_alerts,
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

// ---------------------------------------------------------------------------
// Topic-based receiver
// ---------------------------------------------------------------------------

/// An async receiver bound to a single [`Topic`] channel.
///
/// Obtained via [`EventBus::subscribe_to`].
pub struct TopicReceiver {
    topic: Topic,
    receiver: broadcast::Receiver<Event>,
}

impl TopicReceiver {
    /// Wait for the next event on this topic.
    ///
    /// A lagged receiver (the channel buffer wrapped past it) logs a warning
    /// and keeps going; only a closed bus ends the stream. Returns `None`
    /// when the bus is closed and no further events will arrive.
    pub async fn recv(&mut self) -> Option<Event> {
        loop {
            match self.receiver.recv().await {
                Ok(event) => return Some(event),
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    warn!(topic = ?self.topic, lagged_by = n, "TopicReceiver lagged");
                    continue;
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    /// The topic this receiver is bound to.
    pub fn topic(&self) -> Topic {
        self.topic
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sonarbridge_types::{EventPayload, Header, SonarReading};
    use uuid::Uuid;

    fn make_event(source: &str) -> Event {
        Event {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            source: source.to_string(),
            payload: EventPayload::SonarReading(SonarReading {
                header: Header {
                    stamp: Utc::now(),
                    frame_id: "sonar0".to_string(),
                },
                dist: 1.5,
            }),
        }
    }

    #[tokio::test]
    async fn publish_and_receive() -> Result<(), Box<dyn std::error::Error>> {
        let bus = EventBus::default();
        let mut rx = bus.subscribe_to(Topic::SonarReadings);

        let event = make_event("sonarbridge::test");
        bus.publish_to(Topic::SonarReadings, event.clone())?;

        let received = rx.recv().await.ok_or("No event received")?;
        assert_eq!(received.id, event.id);
        assert_eq!(received.source, event.source);
        Ok(())
    }

    #[tokio::test]
    async fn multiple_subscribers_receive_same_event() -> Result<(), Box<dyn std::error::Error>> {
        let bus = EventBus::default();
        let mut rx1 = bus.subscribe_to(Topic::RangeScans);
        let mut rx2 = bus.subscribe_to(Topic::RangeScans);

        let event = make_event("sonarbridge::scan");
        bus.publish_to(Topic::RangeScans, event.clone())?;

        assert_eq!(rx1.recv().await.ok_or("rx1 empty")?.id, event.id);
        assert_eq!(rx2.recv().await.ok_or("rx2 empty")?.id, event.id);
        Ok(())
    }

    #[test]
    fn publish_no_subscribers_returns_error() {
        let bus = EventBus::default();
        // No active receivers – send returns Err.
        let result = bus.publish_to(Topic::SonarReadings, make_event("test"));
        assert!(matches!(result, Err(BridgeError::Channel(_))));
    }

    /// A subscriber on `SystemAlerts` must not receive events published to
    /// `SonarReadings` because they are routed through separate channels.
    #[tokio::test]
    async fn topic_subscriber_does_not_receive_other_topic_events(
    ) -> Result<(), Box<dyn std::error::Error>> {
        let bus = EventBus::default();
        let mut alerts_sub = bus.subscribe_to(Topic::SystemAlerts);

        // A subscriber on SonarReadings so publish_to doesn't fail with
        // a missing-receiver error.
        let _sonar_sub = bus.subscribe_to(Topic::SonarReadings);

        bus.publish_to(Topic::SonarReadings, make_event("sonarbridge::sonar"))?;

        // The SystemAlerts subscriber should time out – nothing was sent to it.
        let result = tokio::time::timeout(
            std::time::Duration::from_millis(50),
            alerts_sub.recv(),
        )
        .await;

        assert!(
            result.is_err(),
            "SystemAlerts subscriber must not receive a SonarReadings event"
        );
        Ok(())
    }

    /// Flooding a low-capacity channel while a subscriber sleeps must log and
    /// skip rather than panicking or blocking: the receiver still yields the
    /// most recent events after the wraparound.
    #[tokio::test]
    async fn slow_subscriber_lags_without_blocking() {
        const CAPACITY: usize = 64;
        let bus = EventBus::new(CAPACITY);
        let mut slow_sub = bus.subscribe_to(Topic::SonarReadings);

        // Flood the channel with far more events than the buffer holds.
        for _ in 0..10_000 {
            let _ = bus.publish_to(Topic::SonarReadings, make_event("flood::sonar"));
        }

        // recv() swallows the Lagged error internally and resumes with the
        // oldest still-buffered event.
        let result = slow_sub.recv().await;
        assert!(result.is_some(), "expected an event after lag recovery");
    }

    #[test]
    fn receiver_reports_its_topic() {
        let bus = EventBus::default();
        let rx = bus.subscribe_to(Topic::RangeScans);
        assert_eq!(rx.topic(), Topic::RangeScans);
    }
}
