//! In-process channel
//!
//! Keeps every accepted payload together with its arrival time. Can be
//! switched into a failing mode to simulate an unavailable transport.

use crate::application::channel::{Channel, ChannelError};
use crate::domain::ChannelName;
use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

/// A payload accepted by a [`MemoryChannel`]
#[derive(Debug, Clone)]
pub struct Delivery {
    pub payload: Bytes,
    pub at: Instant,
}

#[derive(Debug)]
pub struct MemoryChannel {
    name: ChannelName,
    deliveries: Mutex<Vec<Delivery>>,
    failure: Mutex<Option<ChannelError>>,
    attempts: AtomicUsize,
}

impl MemoryChannel {
    pub fn new(name: ChannelName) -> Self {
        Self {
            name,
            deliveries: Mutex::new(Vec::new()),
            failure: Mutex::new(None),
            attempts: AtomicUsize::new(0),
        }
    }

    /// A channel that rejects every push with `error`
    pub fn failing(name: ChannelName, error: ChannelError) -> Self {
        let channel = Self::new(name);
        channel.fail_with(Some(error));
        channel
    }

    /// Switch failure mode on (`Some`) or off (`None`)
    pub fn fail_with(&self, error: Option<ChannelError>) {
        *self.failure.lock() = error;
    }

    pub fn deliveries(&self) -> Vec<Delivery> {
        self.deliveries.lock().clone()
    }

    pub fn payloads(&self) -> Vec<Bytes> {
        self.deliveries
            .lock()
            .iter()
            .map(|d| d.payload.clone())
            .collect()
    }

    /// Accepted pushes
    pub fn len(&self) -> usize {
        self.deliveries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.deliveries.lock().is_empty()
    }

    /// Every push, accepted or not
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl Channel for MemoryChannel {
    fn name(&self) -> &ChannelName {
        &self.name
    }

    async fn push(&self, payload: Bytes) -> Result<(), ChannelError> {
        self.attempts.fetch_add(1, Ordering::Relaxed);

        if let Some(error) = self.failure.lock().clone() {
            return Err(error);
        }

        self.deliveries.lock().push(Delivery {
            payload,
            at: Instant::now(),
        });
        Ok(())
    }
}
