//! Dockhand Daemon
//!
//! Web control panel over a local container engine.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_appender::non_blocking::WorkerGuard;

use daemon::config::Config;
use daemon::engine::EngineClient;
use daemon::server::{build_router, AppState};

/// Dockhand - web control panel over a local container engine.
#[derive(Parser, Debug)]
#[command(name = "dockhand")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for the daemon.
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Start the control panel server
    Start {
        /// Override the bind address
        #[arg(long)]
        bind: Option<String>,

        /// Override the listen port
        #[arg(long)]
        port: Option<u16>,
    },

    /// Check that a container engine is reachable and print its version
    Check,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let mut config = if let Some(config_path) = &cli.config {
        Config::load(config_path)?
    } else {
        Config::load_or_default()?
    };

    let _log_guard = init_tracing(&config, cli.verbose);

    // Apply environment variable overrides
    config.apply_env_overrides();

    // Validate configuration
    config.validate()?;

    match cli.command {
        Commands::Start { bind, port } => {
            if let Some(bind) = bind {
                config.server.bind_addr = bind;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            config.validate()?;
            run_server(config).await
        }
        Commands::Check => {
            let engine = EngineClient::from_config(&config.engine)?;
            let version = engine.version().await?;
            println!("{}: {}", engine.binary(), version.trim());
            Ok(())
        }
    }
}

/// Initializes tracing, optionally teeing into a daily-rolling log file.
///
/// The returned guard must stay alive for the file writer to flush.
fn init_tracing(config: &Config, verbose: bool) -> Option<WorkerGuard> {
    let filter = if verbose {
        "debug".to_string()
    } else {
        config.daemon.log_level.clone()
    };

    if config.daemon.log_to_file {
        let appender =
            tracing_appender::rolling::daily(config.daemon.data_dir.join("logs"), "dockhand.log");
        let (writer, guard) = tracing_appender::non_blocking(appender);
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(writer)
            .with_ansi(false)
            .init();
        Some(guard)
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
        None
    }
}

/// Runs the HTTP/WebSocket server until a shutdown signal arrives.
async fn run_server(config: Config) -> anyhow::Result<()> {
    tracing::info!("Dockhand daemon starting...");

    let engine = EngineClient::from_config(&config.engine)?;
    tracing::info!(engine = engine.binary(), "Using container engine");

    let addr = format!("{}:{}", config.server.bind_addr, config.server.port);
    let state = AppState::new(config, engine);
    let router = build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server started successfully on {}", listener.local_addr()?);
    tracing::info!("Access the control panel at http://{}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Completes when the process receives an interrupt.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        return;
    }
    tracing::info!("Shutdown signal received");
}
