// MetaDB Checker - LimsRest delivery aggregation
// Copyright (c) 2025 MetaDB Checker Contributors
// Licensed under the MIT License

use clap::Parser;
use metadb_checker::cli::commands::fetch::{EXIT_CONFIG, EXIT_FATAL};
use metadb_checker::cli::Cli;
use metadb_checker::config::LoggingConfig;
use metadb_checker::logging::init_logging;
use std::process;
use tokio::sync::watch;

#[tokio::main]
async fn main() {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let config = match cli.resolve_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            process::exit(EXIT_CONFIG);
        }
    };

    let logging_guard = match init_logging(&config.application.log_level, &config.logging) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            // Fall back to stderr-only logging so the failure is still visible
            let _ = init_logging("info", &LoggingConfig::default());
            process::exit(EXIT_CONFIG);
        }
    };

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        "MetaDB Checker - LimsRest delivery aggregation"
    );

    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    tokio::spawn(async move {
        #[cfg(unix)]
        {
            use tokio::signal::unix::{signal, SignalKind};
            let mut sigterm = match signal(SignalKind::terminate()) {
                Ok(sigterm) => sigterm,
                Err(e) => {
                    tracing::error!(error = %e, "Failed to install SIGTERM handler");
                    return;
                }
            };

            tokio::select! {
                _ = tokio::signal::ctrl_c() => {
                    tracing::warn!("Received SIGINT (Ctrl+C), cancelling outstanding fetches");
                }
                _ = sigterm.recv() => {
                    tracing::warn!("Received SIGTERM, cancelling outstanding fetches");
                }
            }
            let _ = shutdown_tx.send(true);
        }

        #[cfg(not(unix))]
        {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            } else {
                tracing::warn!("Received SIGINT (Ctrl+C), cancelling outstanding fetches");
                let _ = shutdown_tx.send(true);
            }
        }
    });

    let exit_code = match cli.fetch.execute(config, shutdown_rx).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %e, "Command execution failed");
            eprintln!("Error: {e}");
            EXIT_FATAL
        }
    };

    // Flush file logs before exiting
    drop(logging_guard);
    process::exit(exit_code);
}
