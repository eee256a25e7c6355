/*
newsocial - service main.rs
This binary loads configuration and starts the Rocket HTTP server that turns
model-generated headlines into social media content.
*/

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use common::Config;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

use newsocial::server::launch_rocket;

#[derive(Parser, Debug)]
#[command(name = "newsocial", about = "Headlines-to-social-posts orchestration service")]
struct Args {
    /// Path to config.toml
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Override the listening port (takes precedence over NEWS_API_PORT and config)
    #[arg(long)]
    port: Option<u16>,

    /// Override log level (info, debug, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    // .env is optional; it typically carries OPENAI_API_KEY
    let _ = dotenv::dotenv();

    let args = Args::parse();

    // Initialize logging
    let filter = EnvFilter::try_new(&args.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).init();

    let config = Config::load_layered(Path::new("."), args.config.as_deref())
        .await
        .context("failed to load configuration")?;
    info!(explicit = ?args.config, "configuration loaded");

    if let Err(e) = launch_rocket(Arc::new(config), args.port).await {
        error!(%e, "Rocket server failed");
        return Err(e);
    }

    info!("Shutdown complete");
    Ok(())
}
