use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use glif_mcp::{
    api::{GlifApi, GlifClient},
    bootstrap,
    cli::{Cli, Command, run_tools_command},
    config::{Config, env_provider},
    media::{MediaEncoder, SecureFetcher},
    server::McpServer,
    tools::{GlifRunner, SavedToolStore, ToolRegistry},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load .env if present
    bootstrap::load_dotenv();
    init_tracing(matches!(cli.command, Some(Command::Tools(_))));

    let mut config = Config::from_env()?;
    if let Some(path) = cli.tools_path {
        config.storage.tools_path = path;
    }

    let store = Arc::new(SavedToolStore::new(config.storage.tools_path.clone()));
    let api: Arc<dyn GlifApi> = Arc::new(GlifClient::new(&config.api)?);

    match cli.command {
        Some(Command::Tools(cmd)) => run_tools_command(cmd, &store, api.as_ref()).await,
        None | Some(Command::Serve) => serve(config, store, api).await,
    }
}

async fn serve(
    config: Config,
    store: Arc<SavedToolStore>,
    api: Arc<dyn GlifApi>,
) -> anyhow::Result<()> {
    if config.api.token.is_none() {
        tracing::warn!("GLIF_API_TOKEN is not set; running glifs will fail");
    }

    let fetcher = Arc::new(SecureFetcher::new(&config.media)?);
    let encoder = Arc::new(MediaEncoder::new(fetcher));
    let runner = Arc::new(GlifRunner::new(api, encoder));
    let registry = Arc::new(ToolRegistry::new(runner, store.clone(), env_provider()));

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        tools_path = %store.path().display(),
        groups = ?registry.group_names(),
        glif_ids = config.tools.glif_ids.len(),
        "Starting glif-mcp"
    );

    McpServer::new(registry).run_stdio().await?;
    Ok(())
}

/// Logs go to stderr; stdout carries protocol frames.
fn init_tracing(quiet: bool) {
    let default = if quiet { "warn" } else { "glif_mcp=info" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    if std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json")) {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(false),
            )
            .init();
    }
}
