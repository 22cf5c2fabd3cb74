//! Resolutions Gateway Binary
//!
//! Standalone HTTP server for the resolutions API.
//!
//! # Usage
//! ```bash
//! resolutions-gateway [--port 8080] [--host 127.0.0.1] [--config gateway.json] [--verbose]
//! ```

use clap::Parser;
use resolutions_gateway::{Gateway, GatewayConfig};
use tracing_subscriber::EnvFilter;

/// Resolutions Gateway - in-memory resolutions REST API
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// JSON configuration file; flags below override its values
    #[arg(short, long)]
    config: Option<String>,

    /// Port to listen on
    #[arg(short, long)]
    port: Option<u16>,

    /// Host to bind to
    #[arg(long)]
    host: Option<String>,

    /// Disable permissive CORS
    #[arg(long)]
    no_cors: bool,

    /// Enable verbose debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // RUST_LOG wins over --verbose when set
    let default_level = if args.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    if args.verbose {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .with_thread_ids(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .init();
    }

    let mut config = match &args.config {
        Some(path) => GatewayConfig::from_file(path)?,
        None => GatewayConfig::default(),
    };
    if let Some(host) = args.host {
        config = config.with_host(host);
    }
    if let Some(port) = args.port {
        config = config.with_port(port);
    }
    if args.no_cors {
        config = config.with_cors(false);
    }

    tracing::info!(
        host = %config.host,
        port = config.port,
        cors = config.cors,
        "Starting resolutions gateway v{}",
        resolutions_gateway::VERSION
    );

    let gateway = Gateway::new(config);
    gateway.start().await?;

    Ok(())
}
