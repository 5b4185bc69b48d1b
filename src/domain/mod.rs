//! Domain types for Event Maker
//!
//! This module contains the event record and the validated values that
//! describe where and how often it is published.

pub mod event;
pub mod identifiers;
pub mod interval;
pub mod types;

pub use event::{TelemetryEvent, ValueRange};
pub use identifiers::{EventId, EventIdError};
pub use interval::{IntervalError, PublishInterval};
pub use types::{ChannelName, MetricName, ProjectId, SourceId};
