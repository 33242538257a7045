//! Sonar-to-scan translation.
//!
//! [`ScanAdapter`] bridges between the raw sonar topic and the range-scan
//! topic on the internal [`EventBus`]:
//!
//! * **Inbound** – a [`SonarReading`] event arriving on
//!   [`Topic::SonarReadings`] carries one scalar distance.
//!
//! * **Outbound** – the reading is expanded into a [`RangeScan`] with the
//!   fixed sonar cone geometry below and published on [`Topic::RangeScans`].
//!
//! The translation itself lives in the free function [`translate`], which is
//! pure and total: it copies the header verbatim, stamps in the constants,
//! and replicates the scalar distance across every angular bin.  Nothing is
//! validated or clamped; a negative or out-of-range distance passes through
//! uninterpreted, to be judged (or not) by whatever consumes the scan.

use std::sync::Arc;

use chrono::Utc;
use sonarbridge_types::{BridgeError, Event, EventPayload, RangeScan, SonarReading};
use tracing::{debug, warn};
use uuid::Uuid;

use sonarbridge_middleware::{EventBus, Topic, TopicReceiver};

/// Bearing of the first range sample (radians): -7.5 degrees.
pub const SCAN_ANGLE_MIN: f32 = -0.130899694;
/// Bearing of the last range sample (radians): +7.5 degrees.
pub const SCAN_ANGLE_MAX: f32 = 0.130899694;
/// Angular step between consecutive samples (radians): 0.5 degrees.
pub const SCAN_ANGLE_INCREMENT: f32 = 0.00872664626;
/// Time between consecutive samples (seconds).  The sonar reports one scalar,
/// so all bins share the same instant.
pub const SCAN_TIME_INCREMENT: f32 = 0.0;
/// Duration of one sweep (seconds), matching the sonar's 20 Hz update rate.
pub const SCAN_TIME: f32 = 0.05;
/// Minimum measurable distance (meters): 6 inches.
pub const SCAN_RANGE_MIN: f32 = 0.152;
/// Maximum measurable distance (meters): 20 feet.
pub const SCAN_RANGE_MAX: f32 = 6.096;
/// Number of angular bins in the output scan.
pub const SCAN_BIN_COUNT: usize = 30;

/// Expand a single sonar reading into a range scan over the fixed cone
/// geometry, one copy of the scalar distance per angular bin.
///
/// Pure and total: never fails for any numeric distance, keeps no state, and
/// copies `header` (frame id and timestamp) verbatim.
pub fn translate(reading: &SonarReading) -> RangeScan {
    RangeScan {
        header: reading.header.clone(),
        angle_min: SCAN_ANGLE_MIN,
        angle_max: SCAN_ANGLE_MAX,
        angle_increment: SCAN_ANGLE_INCREMENT,
        time_increment: SCAN_TIME_INCREMENT,
        scan_time: SCAN_TIME,
        range_min: SCAN_RANGE_MIN,
        range_max: SCAN_RANGE_MAX,
        ranges: vec![reading.dist; SCAN_BIN_COUNT],
    }
}

/// Adapter that subscribes to raw sonar readings and republishes them as
/// range scans.  Holds no mutable state, so it is trivially reentrant.
pub struct ScanAdapter {
    bus: Arc<EventBus>,
}

impl ScanAdapter {
    /// Create a new [`ScanAdapter`] backed by the given [`EventBus`].
    pub fn new(bus: Arc<EventBus>) -> Self {
        Self { bus }
    }

    /// Translate one reading and publish the resulting scan on
    /// [`Topic::RangeScans`].
    ///
    /// Returns the number of receivers the scan was handed to, or
    /// [`BridgeError::Channel`] when nothing is subscribed.  The emit is
    /// fire-and-forget; callers decide whether a missing subscriber matters.
    pub fn handle_reading(&self, reading: SonarReading) -> Result<usize, BridgeError> {
        let scan = translate(&reading);
        let event = Event {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            source: "sonarbridge-node::adapter".to_string(),
            payload: EventPayload::RangeScan(scan),
        };
        self.bus.publish_to(Topic::RangeScans, event)
    }

    /// Drive the adapter until the bus closes: receive each sonar event,
    /// translate it, and publish the scan.
    ///
    /// Non-sonar payloads on the sonar topic are logged and skipped.  A
    /// publish that finds no scan subscriber is logged at debug level and the
    /// loop keeps going; downstream consumers may come and go freely.
    pub async fn run(self) {
        let rx = self.bus.subscribe_to(Topic::SonarReadings);
        self.run_with_receiver(rx).await;
    }

    async fn run_with_receiver(self, mut rx: TopicReceiver) {
        while let Some(event) = rx.recv().await {
            match event.payload {
                EventPayload::SonarReading(reading) => {
                    if let Err(e) = self.handle_reading(reading) {
                        debug!(error = %e, "scan published with no subscriber");
                    }
                }
                other => {
                    warn!(payload = ?other, "non-sonar payload on sonar topic; skipping");
                }
            }
        }
        debug!("sonar topic closed; scan adapter stopping");
    }
}
