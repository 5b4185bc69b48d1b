//! Validated string newtypes for the values that flow through the generator
//!
//! These are validated once at the configuration boundary, so the
//! synthesizer and publish loop never re-check them.

use nutype::nutype;
#[allow(unused_imports)] // These are used by nutype derive macros
use serde::{Deserialize, Serialize};

/// Identifier of the simulated device emitting readings
///
/// Limited to 256 characters so that log lines and payloads stay readable.
#[nutype(
    sanitize(trim),
    validate(not_empty, len_char_max = 256),
    derive(
        Debug,
        Clone,
        PartialEq,
        Eq,
        Hash,
        Serialize,
        Deserialize,
        AsRef,
        Display
    )
)]
pub struct SourceId(String);

/// Name of a measured quantity ("temperature", "vibration", ...)
#[nutype(
    sanitize(trim),
    validate(not_empty, len_char_max = 128, regex = r"^[a-z][a-z0-9_.-]*$"),
    derive(
        Debug,
        Clone,
        PartialEq,
        Eq,
        Hash,
        Serialize,
        Deserialize,
        AsRef,
        Display
    )
)]
pub struct MetricName(String);

impl MetricName {
    pub const TEMPERATURE: &'static str = "temperature";
    pub const VIBRATION: &'static str = "vibration";

    pub fn temperature() -> Self {
        Self::try_new(Self::TEMPERATURE.to_string()).expect("temperature is a valid metric name")
    }

    pub fn vibration() -> Self {
        Self::try_new(Self::VIBRATION.to_string()).expect("vibration is a valid metric name")
    }
}

/// Name of an output channel (a publish/subscribe topic)
///
/// Follows Pub/Sub resource naming: starts with a letter, 3 to 255
/// characters drawn from letters, digits and `-_.~+%`.
#[nutype(
    sanitize(trim),
    validate(regex = r"^[A-Za-z][A-Za-z0-9\-_.~+%]{2,254}$"),
    derive(
        Debug,
        Clone,
        PartialEq,
        Eq,
        Hash,
        Serialize,
        Deserialize,
        AsRef,
        Display
    )
)]
pub struct ChannelName(String);

/// Project or namespace that owns the output channels
///
/// An empty value is the placeholder used when no project could be
/// resolved.
#[nutype(
    sanitize(trim),
    derive(
        Debug,
        Clone,
        PartialEq,
        Eq,
        Hash,
        Serialize,
        Deserialize,
        AsRef,
        Display
    )
)]
pub struct ProjectId(String);

impl ProjectId {
    pub fn placeholder() -> Self {
        Self::new(String::new())
    }

    pub fn is_placeholder(&self) -> bool {
        self.as_ref().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_id_rejects_blank_values() {
        assert!(SourceId::try_new("device1".to_string()).is_ok());
        assert!(SourceId::try_new("   ".to_string()).is_err());
        assert!(SourceId::try_new(String::new()).is_err());
    }

    #[test]
    fn source_id_is_trimmed() {
        let id = SourceId::try_new("  device1 ".to_string()).unwrap();
        assert_eq!(id.as_ref(), "device1");
    }

    #[test]
    fn well_known_metric_names() {
        assert_eq!(MetricName::temperature().as_ref(), "temperature");
        assert_eq!(MetricName::vibration().as_ref(), "vibration");
        assert!(MetricName::try_new("Temperature".to_string()).is_err());
        assert!(MetricName::try_new("cpu.load_1m".to_string()).is_ok());
    }

    #[test]
    fn channel_name_follows_topic_rules() {
        assert!(ChannelName::try_new("eventmakertemp".to_string()).is_ok());
        assert!(ChannelName::try_new("events-v1.temp_~+%".to_string()).is_ok());
        assert!(ChannelName::try_new("ab".to_string()).is_err());
        assert!(ChannelName::try_new("1topic".to_string()).is_err());
        assert!(ChannelName::try_new("has space".to_string()).is_err());
    }

    #[test]
    fn project_placeholder_is_empty() {
        assert!(ProjectId::placeholder().is_placeholder());
        assert!(ProjectId::new("  ".to_string()).is_placeholder());
        assert!(!ProjectId::new("my-project".to_string()).is_placeholder());
    }
}
