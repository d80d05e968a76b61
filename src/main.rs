//! Command-line entry point for pg-datagen.

use anyhow::Context;
use clap::Parser;
use pg_datagen::{bootstrap, producer, Config};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = run().await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}

async fn run() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pg_datagen=info".into()),
        )
        .init();

    let config = Config::parse();
    config.validate().context("Invalid configuration")?;

    info!(
        "Starting pg-datagen against '{}' (categories: {:?})",
        config.database, config.categories
    );

    bootstrap::run(&config)
        .await
        .context("Database bootstrap failed")?;

    let shutdown = setup_shutdown_handler();
    producer::run(&config, shutdown)
        .await
        .context("Generator loop failed")?;

    info!("pg-datagen stopped");
    Ok(())
}

/// Sets up a shutdown signal handler. SIGINT and (on Unix) SIGTERM both
/// request a graceful stop at the next iteration boundary.
fn setup_shutdown_handler() -> tokio::sync::broadcast::Receiver<()> {
    let (shutdown_tx, shutdown_rx) = tokio::sync::broadcast::channel(1);

    tokio::spawn(async move {
        wait_for_signal().await;
        info!("Received termination signal, finishing current iteration");
        let _ = shutdown_tx.send(());
    });

    shutdown_rx
}

#[cfg(unix)]
async fn wait_for_signal() {
    let mut sigterm = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
        .expect("Failed to install SIGTERM handler");

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {}
        _ = sigterm.recv() => {}
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install CTRL+C signal handler");
}
