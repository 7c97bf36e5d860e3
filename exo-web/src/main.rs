//! ExO web server (exo-web) - Main entry point
//!
//! Pairwise image comparison: shows two images, records the one the
//! evaluator prefers, and archives the selection log when every pair has
//! been judged.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use exo_common::config::{Overrides, TomlConfig};
use exo_web::images::ImageStore;
use exo_web::selections::SelectionLog;
use exo_web::session::Session;
use exo_web::{build_router, AppState};
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Command-line arguments for exo-web
#[derive(Parser, Debug)]
#[command(name = "exo-web")]
#[command(about = "ExO pairwise image comparison server")]
#[command(version)]
struct Args {
    /// TOML config file (default: search user config dir, then ./exo.toml)
    #[arg(short, long, env = "EXO_CONFIG")]
    config: Option<PathBuf>,

    /// Host to bind
    #[arg(long, env = "EXO_HOST")]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "EXO_PORT")]
    port: Option<u16>,

    /// Directory containing the source images
    #[arg(short, long, env = "EXO_IMAGES_DIR")]
    images_dir: Option<PathBuf>,

    /// Directory for the selection log and its archives
    #[arg(short, long, env = "EXO_OUTPUT_DIR")]
    output_dir: Option<PathBuf>,

    /// Restore already-judged pairs from the current selection log
    #[arg(long)]
    resume: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let (file_config, source) =
        TomlConfig::load(args.config.as_deref()).context("Failed to load configuration")?;
    let config = file_config
        .apply(Overrides {
            host: args.host,
            port: args.port,
            images_dir: args.images_dir,
            output_dir: args.output_dir,
            resume_from_log: args.resume,
        })
        .context("Invalid configuration")?;

    // RUST_LOG wins over the configured level
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!(
                    "exo_web={level},exo_common={level},tower_http={level}",
                    level = config.logging.level
                )
                .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting ExO web server (exo-web) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );
    match &source {
        Some(path) => info!("Config file: {}", path.display()),
        None => warn!("No config file found, using compiled defaults"),
    }

    let store = ImageStore::new(&config.images_dir);
    match store.list_assets() {
        Ok(assets) => info!(
            "Image directory {} holds {} images",
            store.dir().display(),
            assets.len()
        ),
        Err(e) => warn!("{}", e),
    }

    let log = SelectionLog::open(&config.output_dir, config.log_file.as_str())
        .context("Failed to open selection log")?;
    info!("Selection log: {}", log.path().display());

    let mut session = Session::new(log);
    if config.session.resume_from_log {
        session
            .resume_from_log()
            .context("Failed to restore seen pairs from selection log")?;
    }

    let app = build_router(AppState::new(store, session));

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("exo-web listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
