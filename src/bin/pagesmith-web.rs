//! Pagesmith Web Server Binary
//!
//! This binary starts the Pagesmith web server that provides the REST API
//! for the page builder frontend.
//!
//! # Usage
//!
//! ```bash
//! # Start with settings from config.toml (port 3001 by default)
//! pagesmith-web
//!
//! # Specify port and data directory
//! pagesmith-web --port 8080 --data-dir ~/pagesmith-data
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pagesmith::config::Config;
use pagesmith::web;

/// Pagesmith Web Server - REST API for the page builder
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Port to listen on (defaults to server.port from config)
    #[arg(short, long)]
    port: Option<u16>,

    /// Host to bind to (defaults to server.host from config)
    #[arg(long)]
    host: Option<String>,

    /// Data directory holding saved layouts.
    /// Defaults to paths.data_dir from config, or the platform data directory:
    /// - Linux: ~/.config/Pagesmith/data/
    /// - macOS: ~/Library/Application Support/Pagesmith/data/
    /// - Windows: %APPDATA%\Pagesmith\data\
    #[arg(short, long)]
    data_dir: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize tracing
    let filter = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load().context("Failed to load configuration")?;

    let data_dir = match args.data_dir {
        Some(path) => path,
        None => config.data_dir()?,
    };
    info!("Data directory: {}", data_dir.display());

    let host = args.host.unwrap_or_else(|| config.server.host.clone());
    let port = args.port.unwrap_or(config.server.port);
    let addr: SocketAddr = format!("{host}:{port}")
        .parse()
        .with_context(|| format!("Invalid listen address {host}:{port}"))?;

    web::run_server(config, data_dir, addr).await
}
