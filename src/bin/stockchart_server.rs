//! HTTP server for the stock dataset and its static dashboard

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use stockchart::{api, ServerConfig};

#[derive(Debug, Parser)]
#[command(name = "stockchart-server", version, about = "Serve a stock price CSV as JSON")]
struct Args {
    /// Configuration file (TOML); missing files are ignored
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// Interface to bind
    #[arg(long)]
    bind: Option<String>,

    /// TCP port
    #[arg(long, short = 'p', env = "PORT")]
    port: Option<u16>,

    /// CSV dataset to serve
    #[arg(long)]
    data_path: Option<PathBuf>,

    /// Directory of static assets served at `/`
    #[arg(long)]
    static_dir: Option<PathBuf>,

    /// Emit logs as JSON lines
    #[arg(long)]
    log_json: bool,
}

impl Args {
    fn apply(self, mut cfg: ServerConfig) -> ServerConfig {
        if let Some(bind) = self.bind {
            cfg.bind = bind;
        }
        if let Some(port) = self.port {
            cfg.port = port;
        }
        if let Some(data_path) = self.data_path {
            cfg.data_path = data_path;
        }
        if let Some(static_dir) = self.static_dir {
            cfg.static_dir = static_dir;
        }
        cfg
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    stockchart::init_tracing(args.log_json);

    let cfg = ServerConfig::load(args.config.as_deref()).context("loading configuration")?;
    let cfg = args.apply(cfg);

    if !cfg.data_path.exists() {
        tracing::warn!(path = %cfg.data_path.display(), "dataset not found; requests will fail until it exists");
    }

    let addr: SocketAddr = cfg
        .address()
        .parse()
        .with_context(|| format!("invalid bind address {}", cfg.address()))?;
    let app = api::router(&cfg);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    tracing::info!(
        data = %cfg.data_path.display(),
        "{} {} listening on http://{addr}",
        stockchart::NAME,
        stockchart::VERSION
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to install Ctrl+C handler: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received, gracefully stopping…");
}
