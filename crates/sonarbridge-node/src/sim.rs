//! Simulated sonar source for headless runs and CI without physical hardware.
//!
//! [`SimSonar`] publishes synthetic [`SonarReading`] events on
//! [`Topic::SonarReadings`] at a fixed period, sweeping the reported distance
//! back and forth between the sonar's measurable bounds.  This lets the full
//! bridge run end-to-end in tests and demos with no sensor attached.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use sonarbridge_types::{Event, EventPayload, Header, SonarReading};
use tracing::debug;
use uuid::Uuid;

use crate::adapter::{SCAN_RANGE_MAX, SCAN_RANGE_MIN};
use sonarbridge_middleware::{EventBus, Topic};

/// Default publish period, matching the sonar's 20 Hz update rate.
pub const DEFAULT_PERIOD: Duration = Duration::from_millis(50);

/// Distance step per tick (meters).
const SWEEP_STEP: f32 = 0.05;

/// A simulated sonar that emits a triangle-wave distance sweep.
pub struct SimSonar {
    bus: Arc<EventBus>,
    frame_id: String,
    period: Duration,
}

impl SimSonar {
    /// Create a simulated sonar publishing under the given frame id at
    /// [`DEFAULT_PERIOD`].
    pub fn new(bus: Arc<EventBus>, frame_id: impl Into<String>) -> Self {
        Self {
            bus,
            frame_id: frame_id.into(),
            period: DEFAULT_PERIOD,
        }
    }

    /// Override the publish period.
    pub fn with_period(mut self, period: Duration) -> Self {
        self.period = period;
        self
    }

    /// Publish readings forever (or until the task is aborted), sweeping the
    /// distance between [`SCAN_RANGE_MIN`] and [`SCAN_RANGE_MAX`].
    ///
    /// A publish that finds no subscriber is silently dropped; the source
    /// does not care whether anyone is listening.
    pub async fn run(self) {
        let mut ticker = tokio::time::interval(self.period);
        let mut dist = SCAN_RANGE_MIN;
        let mut step = SWEEP_STEP;

        loop {
            ticker.tick().await;

            if dist >= SCAN_RANGE_MAX {
                step = -SWEEP_STEP;
            } else if dist <= SCAN_RANGE_MIN {
                step = SWEEP_STEP;
            }
            dist += step;

            let event = Event {
                id: Uuid::new_v4(),
                timestamp: Utc::now(),
                source: "sonarbridge-node::sim".to_string(),
                payload: EventPayload::SonarReading(SonarReading {
                    header: Header {
                        stamp: Utc::now(),
                        frame_id: self.frame_id.clone(),
                    },
                    dist,
                }),
            };
            if self.bus.publish_to(Topic::SonarReadings, event).is_err() {
                debug!("sim reading dropped; no sonar subscriber yet");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn sim_publishes_readings_within_sensor_bounds(
    ) -> Result<(), Box<dyn std::error::Error>> {
        let bus = Arc::new(EventBus::default());
        let mut rx = bus.subscribe_to(Topic::SonarReadings);

        let sim = SimSonar::new(bus.clone(), "sonar0").with_period(Duration::from_millis(1));
        let handle = tokio::spawn(sim.run());

        for _ in 0..5 {
            let event = tokio::time::timeout(Duration::from_secs(1), rx.recv())
                .await?
                .ok_or("no reading received")?;
            match event.payload {
                EventPayload::SonarReading(reading) => {
                    assert_eq!(reading.header.frame_id, "sonar0");
                    assert!(reading.dist >= SCAN_RANGE_MIN - SWEEP_STEP);
                    assert!(reading.dist <= SCAN_RANGE_MAX + SWEEP_STEP);
                }
                other => panic!("expected a SonarReading payload, got {other:?}"),
            }
        }

        handle.abort();
        Ok(())
    }
}
