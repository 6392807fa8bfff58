//! drama-edge binary.
//!
//! Serves the client bundle and forwards `/api` to the upstream origin.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use drama_edge::config::{load_config, ConfigOverrides, LogFormat};
use drama_edge::lifecycle::{signals, Shutdown};
use drama_edge::observability::{logging, metrics};
use drama_edge::HttpServer;

#[derive(Parser, Debug)]
#[command(name = "drama-edge", version, about = "Static client host and API forwarder")]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long, env = "EDGE_CONFIG")]
    config: Option<PathBuf>,

    /// Listen address, e.g. 0.0.0.0:8080.
    #[arg(long, env = "EDGE_BIND")]
    bind: Option<String>,

    /// Upstream API origin, e.g. https://api.example.com.
    #[arg(long, env = "UPSTREAM_API")]
    upstream: Option<String>,

    /// Directory of the compiled client bundle.
    #[arg(long, env = "EDGE_ASSETS_DIR")]
    assets_dir: Option<String>,

    /// Log output format.
    #[arg(long, value_parser = parse_log_format)]
    log_format: Option<LogFormat>,
}

fn parse_log_format(raw: &str) -> Result<LogFormat, String> {
    match raw {
        "pretty" => Ok(LogFormat::Pretty),
        "json" => Ok(LogFormat::Json),
        other => Err(format!("unknown log format `{other}` (expected pretty or json)")),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let overrides = ConfigOverrides {
        bind_address: cli.bind,
        upstream_origin: cli.upstream,
        assets_dir: cli.assets_dir,
        log_format: cli.log_format,
    };
    let config = load_config(cli.config.as_deref(), overrides)?;

    logging::init_logging(&config.observability);

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "drama-edge starting");
    tracing::info!(
        bind_address = %config.listener.bind_address,
        upstream = %config.upstream.origin,
        api_prefix = %config.upstream.api_prefix,
        assets = %config.assets.root_dir,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        let addr: SocketAddr = config.observability.metrics_address.parse()?;
        metrics::init_metrics(addr)?;
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config)?;
    let server_shutdown = shutdown.subscribe();
    signals::spawn_signal_listener(shutdown);

    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
