//! Event Maker - a synthetic device telemetry generator
//!
//! Fabricates temperature and vibration readings for a simulated device and
//! publishes them as JSON to one output channel per metric on a fixed
//! interval, logging every payload it produces.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;

pub use application::{PublishLoop, Synthesizer};
pub use error::{Error, Result};

