use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Message header carried by every sensor-shaped record: the acquisition
/// timestamp and the physical reference frame the measurement is expressed in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Header {
    pub stamp: DateTime<Utc>,
    /// e.g., "sonar0"
    pub frame_id: String,
}

/// A single proprietary sonar reading: one scalar distance in meters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SonarReading {
    pub header: Header,
    /// Measured distance in meters. Never validated or clamped; negative and
    /// out-of-range values pass through uninterpreted.
    pub dist: f32,
}

/// A fan of distance measurements across fixed angular increments, the
/// standard representation for 2D range-sensor sweeps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangeScan {
    pub header: Header,
    /// Bearing of the first range sample (radians).
    pub angle_min: f32,
    /// Bearing of the last range sample (radians).
    pub angle_max: f32,
    /// Angular step between consecutive samples (radians).
    pub angle_increment: f32,
    /// Time between consecutive samples (seconds).
    pub time_increment: f32,
    /// Duration of one full sweep (seconds).
    pub scan_time: f32,
    /// Minimum measurable distance (meters).
    pub range_min: f32,
    /// Maximum measurable distance (meters).
    pub range_max: f32,
    /// One distance sample per angular bin, in meters.
    pub ranges: Vec<f32>,
}

/// Unified event wrapper for the headless event bus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    /// e.g., "sonarbridge-node::adapter"
    pub source: String,
    pub payload: EventPayload,
}

/// Variants of data that can be routed over the internal event bus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EventPayload {
    SonarReading(SonarReading),
    RangeScan(RangeScan),
    /// Diagnostic or shutdown notice (e.g., operator Ctrl-C).
    Fault {
        component: String,
        code: u32,
        message: String,
    },
}

/// Global error type spanning bus delivery failures and transport-edge
/// deserialization rejects.
#[derive(Error, Debug, Serialize, Deserialize)]
pub enum BridgeError {
    #[error("Channel Error: {0}")]
    Channel(String),

    #[error("Malformed Message: {0}")]
    Malformed(String),
}
