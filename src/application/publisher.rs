//! Timer-driven publish loop
//!
//! Each tick synthesizes one event per configured stream and pushes it to
//! that stream's channel, in order. A failed push is recorded and the loop
//! moves on; nothing a channel reports can stop the loop. The loop exits
//! only when a shutdown signal arrives.

use crate::application::channel::Channel;
use crate::application::sink::{EventSink, SinkEntry};
use crate::application::synthesizer::Synthesizer;
use crate::domain::{ChannelName, MetricName, PublishInterval, SourceId, ValueRange};
use std::fmt;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, instrument};

/// Sending half used to ask a running [`PublishLoop`] to stop
pub type ShutdownSender = mpsc::Sender<()>;

/// One metric published on every tick
#[derive(Clone)]
pub struct MetricStream {
    metric: MetricName,
    range: ValueRange,
    channel: Arc<dyn Channel>,
}

impl MetricStream {
    pub fn new(metric: MetricName, range: ValueRange, channel: Arc<dyn Channel>) -> Self {
        Self {
            metric,
            range,
            channel,
        }
    }

    /// Temperature readings between 15.0 and 39.9
    pub fn temperature(channel: Arc<dyn Channel>) -> Self {
        Self::new(MetricName::temperature(), ValueRange::TEMPERATURE, channel)
    }

    /// Vibration readings between 0.001 and 19.99
    pub fn vibration(channel: Arc<dyn Channel>) -> Self {
        Self::new(MetricName::vibration(), ValueRange::VIBRATION, channel)
    }

    pub fn metric(&self) -> &MetricName {
        &self.metric
    }

    pub fn range(&self) -> ValueRange {
        self.range
    }

    pub fn channel_name(&self) -> &ChannelName {
        self.channel.name()
    }
}

impl fmt::Debug for MetricStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MetricStream")
            .field("metric", &self.metric)
            .field("range", &self.range)
            .field("channel", self.channel.name())
            .finish()
    }
}

/// Outcome of a single tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickReport {
    pub published: usize,
    pub failed: usize,
}

/// Publishes one event per stream every interval until shut down
pub struct PublishLoop {
    source_id: SourceId,
    streams: Vec<MetricStream>,
    interval: PublishInterval,
    synthesizer: Synthesizer,
    sink: Arc<dyn EventSink>,
    shutdown_rx: mpsc::Receiver<()>,
}

impl PublishLoop {
    /// Create a publish loop and the sender that stops it
    ///
    /// Dropping every sender does not stop the loop; it then runs until
    /// the process exits.
    pub fn new(
        source_id: SourceId,
        streams: Vec<MetricStream>,
        interval: PublishInterval,
        synthesizer: Synthesizer,
        sink: Arc<dyn EventSink>,
    ) -> (Self, ShutdownSender) {
        let (shutdown_tx, shutdown_rx) = mpsc::channel(1);

        let publish_loop = Self {
            source_id,
            streams,
            interval,
            synthesizer,
            sink,
            shutdown_rx,
        };

        (publish_loop, shutdown_tx)
    }

    /// Run until shutdown is requested; returns the number of completed ticks
    #[instrument(skip(self), fields(source_id = %self.source_id))]
    pub async fn run(mut self) -> u64 {
        self.sink.record(SinkEntry::LoopStarted {
            streams: self.streams.len(),
            interval: self.interval,
        });

        let mut ticks = 0u64;
        loop {
            if self.shutdown_requested() {
                break;
            }

            let report = self.tick().await;
            ticks += 1;
            debug!(
                tick = ticks,
                published = report.published,
                failed = report.failed,
                "Tick complete"
            );

            tokio::select! {
                _ = tokio::time::sleep(self.interval.as_duration()) => {}
                Some(()) = self.shutdown_rx.recv() => break,
            }
        }

        self.sink.record(SinkEntry::LoopStopped { ticks });
        ticks
    }

    /// Synthesize and push one event per stream, in stream order
    pub async fn tick(&self) -> TickReport {
        let mut report = TickReport::default();

        for stream in &self.streams {
            let payload = self
                .synthesizer
                .synthesize(&self.source_id, &stream.metric, stream.range);

            match stream.channel.push(payload).await {
                Ok(()) => report.published += 1,
                Err(error) => {
                    report.failed += 1;
                    self.sink.record(SinkEntry::PublishFailed {
                        channel: stream.channel.name().clone(),
                        metric: stream.metric.clone(),
                        error: error.to_string(),
                    });
                }
            }
        }

        report
    }

    fn shutdown_requested(&mut self) -> bool {
        self.shutdown_rx.try_recv().is_ok()
    }
}
