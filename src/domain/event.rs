//! Telemetry event record and value ranges
//!
//! The event is the only domain entity. It is built, serialized and
//! dropped within a single synthesis call.

use crate::domain::{
    identifiers::EventId,
    types::{MetricName, SourceId},
};
use crate::error::{Error, Result};
use bytes::Bytes;
use rand::distr::Uniform;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// One synthetic sensor reading
///
/// Serialized field names are part of the wire contract and must not change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetryEvent {
    /// Device that emitted the reading
    pub source_id: SourceId,
    /// Globally unique id, `eid-<uuid>`
    pub event_id: EventId,
    /// Unix seconds, UTC
    pub event_time: i64,
    /// Name of the measured quantity
    pub metric: MetricName,
    /// Reading, inside the range it was drawn from
    pub value: f64,
}

impl TelemetryEvent {
    /// Encode as the transport payload (one UTF-8 JSON object)
    pub fn to_payload(&self) -> Bytes {
        let encoded =
            serde_json::to_vec(self).expect("telemetry event always serializes to JSON");
        Bytes::from(encoded)
    }

    /// Decode a transport payload
    pub fn from_payload(payload: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(payload)?)
    }
}

/// Closed interval `[min, max]` that readings are drawn from
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueRange {
    min: f64,
    max: f64,
}

impl ValueRange {
    /// Temperature readings, degrees Celsius
    pub const TEMPERATURE: Self = Self::new(15.0, 39.9);
    /// Vibration readings, mm/s
    pub const VIBRATION: Self = Self::new(0.001, 19.99);

    /// Build a range without checking it. Callers guarantee `min <= max`.
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Build a range from untrusted input
    pub fn try_new(min: f64, max: f64) -> Result<Self> {
        // Accept exactly the ranges the sampler can draw from: finite
        // bounds, min <= max and a width that does not overflow.
        Uniform::new_inclusive(min, max)
            .map_err(|_| Error::invalid_value("value range", format!("[{min}, {max}]")))?;
        Ok(Self::new(min, max))
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn contains(&self, value: f64) -> bool {
        (self.min..=self.max).contains(&value)
    }

    /// Draw a uniformly distributed value from the range
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        debug_assert!(self.min <= self.max, "value range is inverted");
        // Float rounding in the sampler must never leave the closed interval.
        rng.random_range(self.min..=self.max)
            .clamp(self.min, self.max)
    }
}
