//! Injected "record an event" capability
//!
//! The synthesizer and the publish loop never reach for a global logger.
//! They are handed an [`EventSink`] at construction and report what they
//! do through it. [`TracingSink`] forwards to `tracing`; [`MemorySink`]
//! keeps entries in memory so tests can inspect them.

use crate::domain::{ChannelName, MetricName, PublishInterval, SourceId};
use crate::infrastructure::log_messages;
use parking_lot::Mutex;
use tracing::{error, info};

/// Something the generator wants recorded
#[derive(Debug, Clone, PartialEq)]
pub enum SinkEntry {
    /// An event was synthesized and serialized
    Synthesized {
        metric: MetricName,
        source_id: SourceId,
        payload: String,
    },
    /// A channel refused or failed to take an event
    PublishFailed {
        channel: ChannelName,
        metric: MetricName,
        error: String,
    },
    /// The publish loop entered its running state
    LoopStarted {
        streams: usize,
        interval: PublishInterval,
    },
    /// The publish loop observed shutdown and exited
    LoopStopped { ticks: u64 },
}

/// Destination for [`SinkEntry`] records
///
/// Implementations must not block for long and must not fail; recording
/// is best effort.
pub trait EventSink: Send + Sync {
    fn record(&self, entry: SinkEntry);
}

/// Sink that emits each entry as a `tracing` event
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn record(&self, entry: SinkEntry) {
        match entry {
            SinkEntry::Synthesized {
                metric,
                source_id,
                payload,
            } => {
                info!(%metric, %source_id, %payload, "{}", log_messages::synthesis::EVENT_SYNTHESIZED);
            }
            SinkEntry::PublishFailed {
                channel,
                metric,
                error,
            } => {
                error!(%channel, %metric, %error, "{}", log_messages::publishing::PUSH_FAILED);
            }
            SinkEntry::LoopStarted { streams, interval } => {
                info!(streams, %interval, "{}", log_messages::publishing::LOOP_STARTED);
            }
            SinkEntry::LoopStopped { ticks } => {
                info!(ticks, "{}", log_messages::publishing::LOOP_STOPPED);
            }
        }
    }
}

/// Sink that keeps every entry in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    entries: Mutex<Vec<SinkEntry>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything recorded so far
    pub fn entries(&self) -> Vec<SinkEntry> {
        self.entries.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Number of publish failures recorded against `channel`
    pub fn failures_for(&self, channel: &ChannelName) -> usize {
        self.entries
            .lock()
            .iter()
            .filter(|entry| {
                matches!(entry, SinkEntry::PublishFailed { channel: c, .. } if c == channel)
            })
            .count()
    }

    /// Payloads of every synthesized event, in order
    pub fn synthesized_payloads(&self) -> Vec<String> {
        self.entries
            .lock()
            .iter()
            .filter_map(|entry| match entry {
                SinkEntry::Synthesized { payload, .. } => Some(payload.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }
}

impl EventSink for MemorySink {
    fn record(&self, entry: SinkEntry) {
        self.entries.lock().push(entry);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tracing::field::{Field, Visit};
    use tracing::{Event, Level, Subscriber};
    use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

    fn channel(name: &str) -> ChannelName {
        ChannelName::try_new(name.to_string()).unwrap()
    }

    fn failure(name: &str) -> SinkEntry {
        SinkEntry::PublishFailed {
            channel: channel(name),
            metric: MetricName::temperature(),
            error: "boom".to_string(),
        }
    }

    #[test]
    fn memory_sink_counts_failures_per_channel() {
        let sink = MemorySink::new();
        sink.record(failure("eventmakertemp"));
        sink.record(failure("eventmakertemp"));
        sink.record(failure("eventmakervibe"));

        assert_eq!(sink.len(), 3);
        assert_eq!(sink.failures_for(&channel("eventmakertemp")), 2);
        assert_eq!(sink.failures_for(&channel("eventmakervibe")), 1);
        assert_eq!(sink.failures_for(&channel("othertopic")), 0);
    }

    #[test]
    fn memory_sink_collects_payloads_and_clears() {
        let sink = MemorySink::new();
        sink.record(SinkEntry::Synthesized {
            metric: MetricName::vibration(),
            source_id: SourceId::try_new("device1".to_string()).unwrap(),
            payload: "{}".to_string(),
        });
        sink.record(SinkEntry::LoopStopped { ticks: 1 });

        assert_eq!(sink.synthesized_payloads(), vec!["{}".to_string()]);
        sink.clear();
        assert!(sink.is_empty());
    }

    /// Captures the level and message of every event it sees
    struct CaptureLayer(Arc<Mutex<Vec<(Level, String)>>>);

    struct MessageVisitor<'a>(&'a mut String);

    impl Visit for MessageVisitor<'_> {
        fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
            if field.name() == "message" {
                *self.0 = format!("{value:?}");
            }
        }
    }

    impl<S: Subscriber> Layer<S> for CaptureLayer {
        fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
            let mut message = String::new();
            event.record(&mut MessageVisitor(&mut message));
            self.0.lock().push((*event.metadata().level(), message));
        }
    }

    #[test]
    fn tracing_sink_maps_entries_to_levels() {
        let captured = Arc::new(Mutex::new(Vec::new()));
        let subscriber = tracing_subscriber::registry().with(CaptureLayer(captured.clone()));

        tracing::subscriber::with_default(subscriber, || {
            let sink = TracingSink;
            sink.record(failure("eventmakertemp"));
            sink.record(SinkEntry::LoopStarted {
                streams: 2,
                interval: PublishInterval::default(),
            });
            sink.record(SinkEntry::LoopStopped { ticks: 0 });
        });

        assert_eq!(
            *captured.lock(),
            vec![
                (Level::ERROR, log_messages::publishing::PUSH_FAILED.to_string()),
                (Level::INFO, log_messages::publishing::LOOP_STARTED.to_string()),
                (Level::INFO, log_messages::publishing::LOOP_STOPPED.to_string()),
            ]
        );
    }
}
