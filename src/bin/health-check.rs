//! Standalone process that only answers `/health`.

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use api_gateway::config;
use api_gateway::http::health::serve_health;
use api_gateway::observability::init_logging;
use api_gateway::Shutdown;

#[derive(Parser)]
#[command(name = "health-check")]
#[command(about = "Static health-check responder", long_about = None)]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long, env = "GATEWAY_CONFIG")]
    config: Option<PathBuf>,

    /// Bind address, overrides `health.bind_address`.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = config::load_config(cli.config.as_deref())?;
    if let Some(bind) = cli.bind {
        config.health.bind_address = bind;
    }
    let config = config::finalize(config)?;

    init_logging(&config.observability)?;

    let listener = TcpListener::bind(&config.health.bind_address).await?;

    let shutdown = Shutdown::new();
    shutdown.trigger_on_signal();

    serve_health(listener, shutdown.subscribe()).await?;
    Ok(())
}
