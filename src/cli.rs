//! Command-line flags
//!
//! Every flag is optional; an absent flag leaves the value from the
//! configuration files, the environment, or the built-in default.

use crate::config::Transport;
use crate::infrastructure::constants::env;
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Default, Parser)]
#[command(name = "event_maker")]
#[command(about = "Synthetic device telemetry generator")]
#[command(version)]
pub struct Cli {
    /// Project that owns the output topics
    #[arg(long, env = env::GCP_PROJECT)]
    pub project: Option<String>,

    /// ID of this device [device1]
    #[arg(long)]
    pub device: Option<String>,

    /// Temperature topic name [eventmakertemp]
    #[arg(long = "temp-topic")]
    pub temp_topic: Option<String>,

    /// Vibration topic name [eventmakervibe]
    #[arg(long = "vibe-topic")]
    pub vibe_topic: Option<String>,

    /// Event frequency, e.g. 5s, 500ms or 1m30s [5s]
    #[arg(long)]
    pub freq: Option<String>,

    /// Where events are published [pubsub]
    #[arg(long, value_enum)]
    pub transport: Option<Transport>,

    /// Log level filter, overridden by RUST_LOG [info]
    #[arg(long)]
    pub log_level: Option<String>,

    /// Directory holding the default, per-environment and local config files
    #[arg(long)]
    pub config_dir: Option<PathBuf>,
}
