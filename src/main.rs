use anyhow::{Context, Result};
use clap::Parser;
use event_maker::application::{
    Channel, MetricStream, PublishLoop, Synthesizer, TracingSink,
};
use event_maker::cli::Cli;
use event_maker::config::{LogFormat, Settings, Transport};
use event_maker::domain::{ChannelName, ProjectId};
use event_maker::infrastructure::http_client::{self, HttpClient};
use event_maker::infrastructure::{
    log_messages, resolve_project_id, MetadataClient, PubSubChannel, StdoutChannel,
};
use std::sync::Arc;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let settings = Settings::load(&cli).context("Failed to load configuration")?;

    init_tracing(&settings);
    info!(
        device = %settings.application.device_id,
        transport = settings.channels.transport.as_str(),
        "{}",
        log_messages::application::STARTING
    );
    info!(
        frequency = %settings.application.frequency,
        temperature = %settings.channels.temperature,
        vibration = %settings.channels.vibration,
        "{}",
        log_messages::application::SETTINGS_LOADED
    );

    let source_id = settings.source_id()?;
    let interval = settings.interval()?;
    let temperature = settings.temperature_channel()?;
    let vibration = settings.vibration_channel()?;

    let client = http_client::build_client();
    let project = match settings.channels.transport {
        Transport::Pubsub => {
            let metadata = MetadataClient::new(client.clone(), &settings.metadata.endpoint)
                .with_timeout(settings.metadata_timeout());
            resolve_project_id(settings.project_id(), &metadata).await
        }
        Transport::Stdout => settings.project_id().unwrap_or_else(ProjectId::placeholder),
    };

    let temperature = open_channel(&settings, &client, &project, temperature)
        .await
        .context("Failed to open temperature channel")?;
    let vibration = open_channel(&settings, &client, &project, vibration)
        .await
        .context("Failed to open vibration channel")?;
    info!(%project, "{}", log_messages::application::CHANNELS_READY);

    let sink = Arc::new(TracingSink);
    let (publish_loop, shutdown) = PublishLoop::new(
        source_id,
        vec![
            MetricStream::temperature(temperature),
            MetricStream::vibration(vibration),
        ],
        interval,
        Synthesizer::new(sink.clone()),
        sink,
    );

    tokio::spawn(async move {
        if let Err(error) = tokio::signal::ctrl_c().await {
            warn!(%error, "Failed to listen for shutdown signal");
            return;
        }
        info!("{}", log_messages::application::SHUTDOWN_REQUESTED);
        if shutdown.send(()).await.is_err() {
            debug!("{}", log_messages::application::LOOP_ALREADY_EXITED);
        }
    });

    let ticks = publish_loop.run().await;
    info!(ticks, "{}", log_messages::application::STOPPED);

    Ok(())
}

fn init_tracing(settings: &Settings) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.logging.level));

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match settings.logging.format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.init(),
    }
}

async fn open_channel(
    settings: &Settings,
    client: &HttpClient,
    project: &ProjectId,
    name: ChannelName,
) -> Result<Arc<dyn Channel>> {
    let channel: Arc<dyn Channel> = match settings.channels.transport {
        Transport::Pubsub => Arc::new(
            PubSubChannel::open(client.clone(), &settings.pubsub_options(), project, name)
                .await?,
        ),
        Transport::Stdout => Arc::new(StdoutChannel::stdout(name)),
    };
    Ok(channel)
}
