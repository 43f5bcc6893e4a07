//! Posture server binary

use anyhow::{Context, Result};
use clap::Parser;
use posture::config::{load_config, port_from_env, ServerOverrides};
use posture_server::{router, AppState};
use std::path::PathBuf;

/// HTTP server for the SOC 2 readiness questionnaire
#[derive(Parser, Debug)]
#[command(name = "posture-server")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Address to bind (default: 0.0.0.0)
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on (default: $PORT, then config, then 3000)
    #[arg(long, short)]
    port: Option<u16>,

    /// Directory of static files served for other GET paths, relative to the
    /// current directory (default: config staticDir, then public)
    #[arg(long)]
    static_dir: Option<PathBuf>,

    /// Path to config file (default: search .posturerc.json in current dir and parents)
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let cwd = std::env::current_dir().context("Failed to get current directory")?;
    let config = load_config(&cwd, args.config.as_deref())?;
    let settings = config.server_settings(
        ServerOverrides {
            host: args.host,
            port: args.port,
            static_dir: args.static_dir,
        },
        port_from_env()?,
    );

    if !settings.static_dir.is_dir() {
        log::warn!(
            "static directory {} does not exist; only /submit and /health will respond",
            settings.static_dir.display()
        );
    }

    let app = router(AppState::new(), &settings);
    let address = settings.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;

    log::info!(
        "posture-server {} listening on http://{}",
        env!("CARGO_PKG_VERSION"),
        listener.local_addr().map(|a| a.to_string()).unwrap_or(address)
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    log::info!("shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("failed to listen for shutdown signal: {}", e);
    }
}
