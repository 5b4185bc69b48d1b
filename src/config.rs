use crate::cli::Cli;
use crate::domain::{ChannelName, ProjectId, PublishInterval, SourceId};
use crate::error::{Error, Result};
use crate::infrastructure::constants::{endpoints, env as env_vars};
use crate::infrastructure::PubSubOptions;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_CONFIG_DIR: &str = "config";

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub channels: ChannelSettings,
    pub pubsub: PubSubSettings,
    pub metadata: MetadataSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApplicationSettings {
    pub device_id: String,
    pub project_id: Option<String>,
    pub frequency: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ChannelSettings {
    pub transport: Transport,
    pub temperature: String,
    pub vibration: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PubSubSettings {
    pub endpoint: String,
    pub token: Option<String>,
    pub timeout_ms: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct MetadataSettings {
    pub endpoint: String,
    pub timeout_ms: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingSettings {
    pub level: String,
    pub format: LogFormat,
}

/// Where events are published
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Transport {
    /// Google Pub/Sub REST API
    Pubsub,
    /// One JSON line per event on standard output
    Stdout,
}

impl Transport {
    pub fn as_str(&self) -> &'static str {
        match self {
            Transport::Pubsub => "pubsub",
            Transport::Stdout => "stdout",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    Pretty,
}

impl Settings {
    /// Load settings with defaults only, ignoring the command line
    pub fn new() -> std::result::Result<Self, ConfigError> {
        Self::load(&Cli::default())
    }

    /// Load settings, letting command-line values override every other source
    pub fn load(cli: &Cli) -> std::result::Result<Self, ConfigError> {
        let dir = cli
            .config_dir
            .as_deref()
            .unwrap_or_else(|| Path::new(DEFAULT_CONFIG_DIR));
        Self::load_from(dir, cli)
    }

    pub fn load_from(dir: &Path, cli: &Cli) -> std::result::Result<Self, ConfigError> {
        let environment = env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string());
        let pubsub_endpoint = env::var(env_vars::PUBSUB_EMULATOR_HOST)
            .map(|host| format!("http://{host}"))
            .unwrap_or_else(|_| endpoints::PUBSUB_EMULATOR.to_string());
        let metadata_endpoint = env::var(env_vars::GCE_METADATA_HOST)
            .map(|host| format!("http://{host}"))
            .unwrap_or_else(|_| endpoints::METADATA_SERVER.to_string());

        let config = Config::builder()
            // Start with default values
            .set_default("application.device_id", "device1")?
            .set_default("application.frequency", "5s")?
            .set_default("channels.transport", Transport::Pubsub.as_str())?
            .set_default("channels.temperature", "eventmakertemp")?
            .set_default("channels.vibration", "eventmakervibe")?
            .set_default("pubsub.endpoint", pubsub_endpoint)?
            .set_default("pubsub.timeout_ms", 10_000)?
            .set_default("metadata.endpoint", metadata_endpoint)?
            .set_default("metadata.timeout_ms", 2_000)?
            .set_default("logging.level", "info")?
            .set_default("logging.format", "pretty")?
            // Add configuration files if they exist
            .add_source(File::from(dir.join("default")).required(false))
            .add_source(File::from(dir.join(&environment)).required(false))
            .add_source(File::from(dir.join("local")).required(false))
            // Add environment variables with prefix
            .add_source(Environment::with_prefix("EVENT_MAKER").separator("__"))
            // Command-line flags win over everything else
            .set_override_option("application.project_id", cli.project.clone())?
            .set_override_option("application.device_id", cli.device.clone())?
            .set_override_option("application.frequency", cli.freq.clone())?
            .set_override_option("channels.temperature", cli.temp_topic.clone())?
            .set_override_option("channels.vibration", cli.vibe_topic.clone())?
            .set_override_option("channels.transport", cli.transport.map(|t| t.as_str()))?
            .set_override_option("logging.level", cli.log_level.clone())?
            .build()?;

        config.try_deserialize()
    }

    pub fn source_id(&self) -> Result<SourceId> {
        SourceId::try_new(self.application.device_id.clone())
            .map_err(|_| Error::invalid_value("device id", &self.application.device_id))
    }

    pub fn interval(&self) -> Result<PublishInterval> {
        Ok(PublishInterval::parse(&self.application.frequency)?)
    }

    /// Explicitly configured project, if any
    pub fn project_id(&self) -> Option<ProjectId> {
        self.application
            .project_id
            .clone()
            .map(ProjectId::new)
            .filter(|project| !project.is_placeholder())
    }

    pub fn temperature_channel(&self) -> Result<ChannelName> {
        channel_name(&self.channels.temperature)
    }

    pub fn vibration_channel(&self) -> Result<ChannelName> {
        channel_name(&self.channels.vibration)
    }

    pub fn pubsub_options(&self) -> PubSubOptions {
        PubSubOptions {
            endpoint: self.pubsub.endpoint.clone(),
            token: self.pubsub.token.clone().filter(|t| !t.is_empty()),
            timeout: Duration::from_millis(self.pubsub.timeout_ms),
        }
    }

    pub fn metadata_timeout(&self) -> Duration {
        Duration::from_millis(self.metadata.timeout_ms)
    }
}

fn channel_name(raw: &str) -> Result<ChannelName> {
    ChannelName::try_new(raw.to_string()).map_err(|_| Error::invalid_value("channel name", raw))
}
