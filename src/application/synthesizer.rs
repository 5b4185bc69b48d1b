//! Event synthesis
//!
//! Builds one [`TelemetryEvent`] per call, serializes it, and reports the
//! payload to the injected sink.

use crate::application::sink::{EventSink, SinkEntry};
use crate::domain::{EventId, MetricName, SourceId, TelemetryEvent, ValueRange};
use bytes::Bytes;
use chrono::Utc;
use std::sync::Arc;

/// Fabricates telemetry events
///
/// Holds no state of its own; the random source is the thread-local
/// generator and time comes from the wall clock.
#[derive(Clone)]
pub struct Synthesizer {
    sink: Arc<dyn EventSink>,
}

impl Synthesizer {
    pub fn new(sink: Arc<dyn EventSink>) -> Self {
        Self { sink }
    }

    /// Build an event without serializing or recording it
    pub fn event(
        &self,
        source_id: &SourceId,
        metric: &MetricName,
        range: ValueRange,
    ) -> TelemetryEvent {
        TelemetryEvent {
            source_id: source_id.clone(),
            event_id: EventId::generate(),
            event_time: Utc::now().timestamp(),
            metric: metric.clone(),
            value: range.sample(&mut rand::rng()),
        }
    }

    /// Build an event and return its transport payload
    pub fn synthesize(
        &self,
        source_id: &SourceId,
        metric: &MetricName,
        range: ValueRange,
    ) -> Bytes {
        let payload = self.event(source_id, metric, range).to_payload();

        self.sink.record(SinkEntry::Synthesized {
            metric: metric.clone(),
            source_id: source_id.clone(),
            payload: String::from_utf8_lossy(&payload).into_owned(),
        });

        payload
    }
}
