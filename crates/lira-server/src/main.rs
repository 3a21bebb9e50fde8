//! lira-server: HTTP gateway in front of a hosted chat-completions model.
//!
//! Answers questions, optionally threading them through an in-memory
//! conversation session, and exposes read-only views over those sessions.
//! Sessions live only as long as the process.

mod error;
mod protocol;
mod routes;
mod state;

use std::path::PathBuf;

use clap::Parser;
use lira_common::ConfigError;
use lira_config::validation::validate;
use lira_config::{config_to_json, GatewayConfig, LogLevel};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use crate::state::AppState;

#[derive(Parser)]
#[command(name = "lira-server", about = "HTTP gateway for the Lira assistant")]
struct Args {
    /// Path to a TOML config file.
    #[arg(short, long, env = "LIRA_CONFIG")]
    config: Option<PathBuf>,

    /// Interface to bind (overrides config).
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on (overrides config).
    #[arg(short, long)]
    port: Option<u16>,

    /// Log level: trace, debug, info, warn, error (overrides config).
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() {
    // A missing .env file is normal.
    let dotenv = dotenvy::dotenv();

    let args = Args::parse();

    let config = match resolve_config(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("lira-server: {e}");
            std::process::exit(1);
        }
    };

    init_logging(config.logging.level);

    match dotenv {
        Ok(path) => tracing::debug!("loaded environment from {}", path.display()),
        Err(e) => tracing::debug!("no .env loaded: {e}"),
    }
    tracing::debug!("effective config:\n{}", config_to_json(&config));

    let state = AppState::from_model_config(&config.model);
    let app = routes::router(state, &config.server.allowed_origins);

    let addr = config.server.bind_addr();
    let listener = match TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(%addr, error = %e, "failed to bind TCP listener");
            std::process::exit(1);
        }
    };

    tracing::info!(
        model = %config.model.name,
        origins = ?config.server.allowed_origins,
        "lira-server listening on {}",
        addr
    );

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        tracing::error!(error = %e, "server error");
        std::process::exit(1);
    }

    tracing::info!("shutting down");
}

fn resolve_config(args: &Args) -> Result<GatewayConfig, ConfigError> {
    let mut config = lira_config::load_config(args.config.as_deref())?;
    apply_cli_overrides(&mut config, args)?;
    Ok(config)
}

/// Apply command-line flags on top of the file and environment layers, then
/// validate the result again.
fn apply_cli_overrides(config: &mut GatewayConfig, args: &Args) -> Result<(), ConfigError> {
    if let Some(host) = &args.host {
        config.server.host = host.clone();
    }
    if let Some(port) = args.port {
        config.server.port = u32::from(port);
    }
    if let Some(raw) = &args.log_level {
        config.logging.level = LogLevel::parse(raw)
            .ok_or_else(|| ConfigError::ParseError(format!("--log-level: unknown level '{raw}'")))?;
    }
    validate(config)
}

/// `RUST_LOG` wins; otherwise the configured level applies to the gateway's
/// own crates and the HTTP trace layer.
fn init_logging(level: LogLevel) {
    let level = level.as_str();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("lira={level},tower_http={level}").into()),
        )
        .init();
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
