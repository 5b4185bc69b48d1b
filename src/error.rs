use crate::application::channel::ChannelError;
use crate::domain::IntervalError;
use thiserror::Error;

/// Event Maker error types
#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Invalid publish interval: {0}")]
    InvalidInterval(#[from] IntervalError),

    #[error("Invalid {field}: {value:?}")]
    InvalidValue { field: &'static str, value: String },

    #[error("Channel error: {0}")]
    Channel(#[from] ChannelError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    pub fn invalid_value(field: &'static str, value: impl Into<String>) -> Self {
        Self::InvalidValue {
            field,
            value: value.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
