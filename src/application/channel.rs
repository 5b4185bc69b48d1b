//! Output channel seam
//!
//! A channel is a named destination for serialized events. Opening a
//! channel is transport specific; once open, every transport is driven
//! through this trait.

use crate::domain::ChannelName;
use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

/// Failures reported by a channel transport
///
/// The publish loop treats every variant the same way (log and continue).
/// The variants exist so that the log line says what went wrong.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChannelError {
    #[error("Transport failure: {0}")]
    Transport(String),

    #[error("Rejected with status {status}: {message}")]
    Rejected { status: u16, message: String },

    #[error("Channel not found: {0}")]
    NotFound(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Channel closed")]
    Closed,
}

/// Named destination that accepts serialized events
#[async_trait]
pub trait Channel: Send + Sync {
    /// Name the channel was opened with
    fn name(&self) -> &ChannelName;

    /// Submit one serialized event
    async fn push(&self, payload: Bytes) -> Result<(), ChannelError>;
}
