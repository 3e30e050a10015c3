use anyhow::Result;
use clap::Parser;
use std::path::Path;
use std::sync::Arc;
use tracing::{error, info};

use job_hunter::cli::{handle_hunt_command, handle_memory_command, Cli, Command};
use job_hunter::core::{ConfigManager, Database, FsOps};
use job_hunter::environment::EnvironmentConfig;
use job_hunter::hunting::SeenStore;
use job_hunter::{build_pipeline, start_web_server};

use tracing::Subscriber;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, reload, EnvFilter, Layer, Registry};

type FileLayer = Option<Box<dyn Layer<Registry> + Send + Sync>>;
type LogFileHandle = reload::Handle<FileLayer, Registry>;

fn default_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new("job_hunter=info,headhunter=info,rocket::server=off")
    })
}

/// Console logging is live immediately; the JSON file layer is attached once config is known
fn logging_stack<W>(
    filter: EnvFilter,
    console: W,
) -> (impl Subscriber + Send + Sync + 'static, LogFileHandle)
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let (file_layer, handle) = reload::Layer::new(FileLayer::None);

    let subscriber = tracing_subscriber::registry()
        .with(file_layer)
        .with(filter)
        .with(fmt::layer().with_writer(console));

    (subscriber, handle)
}

fn attach_log_file(handle: &LogFileHandle, log_file: &Path) -> Result<()> {
    let layer = fmt::layer()
        .json()
        .with_writer(FsOps::create_log_file(log_file)?)
        .with_current_span(false)
        .with_span_list(false)
        .boxed();

    handle
        .reload(Some(layer))
        .map_err(|e| anyhow::anyhow!("Failed to attach log file {}: {}", log_file.display(), e))?;

    info!("Logging to {}", log_file.display());
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let (subscriber, log_file_handle) = logging_stack(default_filter(), std::io::stderr);
    subscriber.init();

    let config = ConfigManager::load(&cli.config)?;
    if let Some(log_file) = config.environment.log_file.as_deref() {
        attach_log_file(&log_file_handle, log_file)?;
    }

    info!("Environment: {}", EnvironmentConfig::get_environment());

    let database = if cli.ephemeral {
        info!("Using in-memory job memory");
        Database::in_memory().await?
    } else {
        config.ensure_directories().await?;
        info!("Database: {}", config.environment.database_path.display());
        Database::new(&config.environment.database_path).await?
    };
    database.health_check().await?;

    let store: Arc<dyn SeenStore> = Arc::new(database.seen_jobs());

    let outcome = match cli.command() {
        Command::Serve { port } => match build_pipeline(&config, store) {
            Ok(pipeline) => {
                let port = port.unwrap_or(config.service.port);
                start_web_server(Arc::new(pipeline), port).await
            }
            Err(e) => Err(e),
        },
        Command::Hunt(args) => match build_pipeline(&config, store) {
            Ok(pipeline) => handle_hunt_command(&pipeline, &args).await,
            Err(e) => Err(e),
        },
        Command::Memory { action } => handle_memory_command(store, &action).await,
    };

    if let Err(e) = &outcome {
        error!("{:#}", e);
    }

    database.close().await;
    outcome
}
