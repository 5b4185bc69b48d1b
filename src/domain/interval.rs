//! Publish interval and its duration-string parser
//!
//! Intervals are written the way Go's `time.ParseDuration` accepts them:
//! a sequence of decimal numbers, each with an optional fraction and a
//! unit suffix, such as `5s`, `200ms`, `1m30s` or `1.5h`.

use nutype::nutype;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// Fixed time the publish loop sleeps between ticks
#[nutype(
    validate(predicate = |d| !d.is_zero()),
    derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, AsRef)
)]
pub struct PublishInterval(Duration);

impl PublishInterval {
    /// Parse a duration string such as `"5s"`
    pub fn parse(input: &str) -> Result<Self, IntervalError> {
        let duration = parse_duration(input)?;
        Self::try_new(duration).map_err(|_| IntervalError::Zero(input.to_string()))
    }

    pub fn as_duration(&self) -> Duration {
        self.into_inner()
    }
}

impl Default for PublishInterval {
    fn default() -> Self {
        Self::try_new(Duration::from_secs(5)).expect("five seconds is a valid interval")
    }
}

impl FromStr for PublishInterval {
    type Err = IntervalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for PublishInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.as_ref())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IntervalError {
    #[error("empty duration")]
    Empty,

    #[error("negative duration {0:?}")]
    Negative(String),

    #[error("zero duration {0:?}")]
    Zero(String),

    #[error("malformed duration {0:?}")]
    Malformed(String),

    #[error("missing unit in duration {0:?}")]
    MissingUnit(String),

    #[error("unknown unit {unit:?} in duration {input:?}")]
    UnknownUnit { unit: String, input: String },

    #[error("duration {0:?} is too large")]
    Overflow(String),
}

const NANOS_PER_MICRO: u128 = 1_000;
const NANOS_PER_MILLI: u128 = 1_000_000;
const NANOS_PER_SECOND: u128 = 1_000_000_000;
const NANOS_PER_MINUTE: u128 = 60 * NANOS_PER_SECOND;
const NANOS_PER_HOUR: u128 = 60 * NANOS_PER_MINUTE;

/// Parse a Go-style duration string into a [`Duration`]
pub fn parse_duration(input: &str) -> Result<Duration, IntervalError> {
    let s = input.trim();
    if s.is_empty() {
        return Err(IntervalError::Empty);
    }
    if s.starts_with('-') {
        return Err(IntervalError::Negative(input.to_string()));
    }
    let mut rest = s.strip_prefix('+').unwrap_or(s);
    if rest == "0" {
        return Ok(Duration::ZERO);
    }
    if rest.is_empty() {
        return Err(IntervalError::Malformed(input.to_string()));
    }

    let mut total: u128 = 0;
    while !rest.is_empty() {
        let number_end = rest
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(rest.len());
        let (number, tail) = rest.split_at(number_end);

        let unit_end = tail
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(tail.len());
        let (unit, tail) = tail.split_at(unit_end);

        let scale = match unit {
            "ns" => 1,
            "us" | "µs" | "μs" => NANOS_PER_MICRO,
            "ms" => NANOS_PER_MILLI,
            "s" => NANOS_PER_SECOND,
            "m" => NANOS_PER_MINUTE,
            "h" => NANOS_PER_HOUR,
            "" => return Err(IntervalError::MissingUnit(input.to_string())),
            other => {
                return Err(IntervalError::UnknownUnit {
                    unit: other.to_string(),
                    input: input.to_string(),
                })
            }
        };

        let nanos = component_nanos(number, scale, input)?;
        total = total
            .checked_add(nanos)
            .ok_or_else(|| IntervalError::Overflow(input.to_string()))?;
        rest = tail;
    }

    let nanos = u64::try_from(total).map_err(|_| IntervalError::Overflow(input.to_string()))?;
    Ok(Duration::from_nanos(nanos))
}

/// Nanoseconds represented by one `<number><unit>` component
fn component_nanos(number: &str, scale: u128, input: &str) -> Result<u128, IntervalError> {
    let malformed = || IntervalError::Malformed(input.to_string());
    let overflow = || IntervalError::Overflow(input.to_string());

    let (whole, fraction) = number.split_once('.').unwrap_or((number, ""));
    if fraction.contains('.') || (whole.is_empty() && fraction.is_empty()) {
        return Err(malformed());
    }

    let whole: u128 = if whole.is_empty() {
        0
    } else {
        whole.parse().map_err(|_| overflow())?
    };
    let mut nanos = whole.checked_mul(scale).ok_or_else(overflow)?;

    // Digits beyond nanosecond precision are dropped.
    let mut place = scale;
    for digit in fraction.bytes() {
        place /= 10;
        if place == 0 {
            break;
        }
        nanos += u128::from(digit - b'0') * place;
    }

    Ok(nanos)
}
