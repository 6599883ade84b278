//! Runs the EasyTask reminder scanner against `PostgreSQL`.
//!
//! Usage:
//!
//! ```text
//! easytask-worker [--database-url <url>] [--poll-interval-secs <n>]
//! ```
//!
//! Settings are read from flags, the environment, and a `.env` file in the
//! working directory, in that order of precedence. Reminders are delivered
//! through the log notifier. The worker stops on Ctrl-C after finishing the
//! reminder it is processing.

use clap::Parser;
use diesel::pg::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool, PoolError};
use easytask::config::{ConfigError, WorkerConfig};
use easytask::reminder::adapters::LogNotifier;
use easytask::reminder::services::{ReminderScanner, ReminderWorker, ReminderWorkerError};
use easytask::task::adapters::postgres::{PostgresTaskRepository, TaskPgPool};
use easytask::telemetry;
use mockable::DefaultClock;
use std::sync::Arc;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Errors that stop the worker binary.
#[derive(Debug, Error)]
enum WorkerBinError {
    #[error("failed to install tracing subscriber: {0}")]
    Tracing(#[from] tracing_subscriber::util::TryInitError),
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("failed to build database pool: {0}")]
    Pool(#[from] PoolError),
    #[error("database pool setup panicked: {0}")]
    PoolTask(#[from] tokio::task::JoinError),
    #[error("failed to listen for shutdown signal: {0}")]
    Signal(#[source] std::io::Error),
    #[error(transparent)]
    Worker(#[from] ReminderWorkerError),
}

#[tokio::main]
async fn main() -> Result<(), WorkerBinError> {
    let dotenv = dotenvy::dotenv();
    let config = WorkerConfig::parse();
    telemetry::init_tracing()?;
    if let Err(err) = dotenv {
        debug!(error = %err, "no .env file loaded");
    }

    let scanner_config = config.scanner_config()?;
    let pool = build_pool(config.database_url()?, config.pool_size()?).await?;
    let scanner = ReminderScanner::new(
        Arc::new(PostgresTaskRepository::new(pool)),
        Arc::new(LogNotifier::new()),
        Arc::new(DefaultClock),
        scanner_config,
    );

    let shutdown = CancellationToken::new();
    let handle = ReminderWorker::spawn(scanner, shutdown.child_token());

    tokio::signal::ctrl_c()
        .await
        .map_err(WorkerBinError::Signal)?;
    info!("shutdown requested");
    shutdown.cancel();
    handle.shutdown().await?;
    Ok(())
}

async fn build_pool(database_url: String, max_size: u32) -> Result<TaskPgPool, WorkerBinError> {
    let pool = tokio::task::spawn_blocking(move || {
        Pool::builder()
            .max_size(max_size)
            .build(ConnectionManager::<PgConnection>::new(database_url))
    })
    .await??;
    Ok(pool)
}
