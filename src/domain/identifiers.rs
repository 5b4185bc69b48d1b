//! Event identifiers
//!
//! Every synthesized event carries a random UUID v4 rendered with an
//! `eid-` prefix so that ids are easy to spot in logs and payloads.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// Unique identifier of a single telemetry event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EventId(Uuid);

impl EventId {
    pub const PREFIX: &'static str = "eid-";

    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EventId {
    fn default() -> Self {
        Self::generate()
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", Self::PREFIX, self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EventIdError {
    #[error("event id {0:?} is missing the \"eid-\" prefix")]
    MissingPrefix(String),

    #[error("event id {0:?} does not carry a valid UUID")]
    InvalidUuid(String),
}

impl FromStr for EventId {
    type Err = EventIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s
            .strip_prefix(Self::PREFIX)
            .ok_or_else(|| EventIdError::MissingPrefix(s.to_string()))?;
        Uuid::parse_str(raw)
            .map(Self)
            .map_err(|_| EventIdError::InvalidUuid(s.to_string()))
    }
}

impl TryFrom<String> for EventId {
    type Error = EventIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<EventId> for String {
    fn from(id: EventId) -> Self {
        id.to_string()
    }
}
