//! Application services
//!
//! The synthesizer and the publish loop, plus the two seams they are
//! built against: output channels and the event sink.

pub mod channel;
pub mod publisher;
pub mod sink;
pub mod synthesizer;

pub use channel::{Channel, ChannelError};
pub use publisher::{MetricStream, PublishLoop, ShutdownSender, TickReport};
pub use sink::{EventSink, MemorySink, SinkEntry, TracingSink};
pub use synthesizer::Synthesizer;
