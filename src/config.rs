//! Command-line and environment configuration for the reminder worker.
//!
//! Every flag has an environment fallback so the worker can be driven from a
//! `.env` file. The database URL is either given whole through
//! `DATABASE_URL` or assembled from the `POSTGRES_*` variables.

use crate::reminder::{
    domain::{DisarmPolicy, ParseDisarmPolicyError},
    services::{ScannerConfig, ScannerConfigError},
};
use clap::{Args, Parser};
use std::time::Duration;
use thiserror::Error;

/// Errors raised while turning raw settings into runtime configuration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// Neither `DATABASE_URL` nor the named `POSTGRES_*` setting was given.
    #[error("missing database setting {0}; set DATABASE_URL or {0}")]
    MissingDatabaseSetting(&'static str),

    /// The connection pool size is zero.
    #[error("database pool size must be greater than zero")]
    ZeroPoolSize,

    /// The scanner timing is invalid.
    #[error(transparent)]
    Scanner(#[from] ScannerConfigError),
}

/// Settings for the `easytask-worker` binary.
#[derive(Debug, Clone, Parser)]
#[command(name = "easytask-worker")]
#[command(about = "Fires EasyTask reminders whose time has come")]
pub struct WorkerConfig {
    /// Full `PostgreSQL` connection URL; overrides the `POSTGRES_*` parts.
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    pub database_url: Option<String>,

    /// Connection parts used when no URL is given.
    #[command(flatten)]
    pub postgres: PostgresSettings,

    /// Seconds between reminder scans.
    #[arg(long, env = "EASYTASK_REMINDER_POLL_SECS", default_value_t = 60)]
    pub poll_interval_secs: u64,

    /// Seconds a single notification may take before it counts as failed.
    #[arg(
        long,
        env = "EASYTASK_REMINDER_NOTIFY_TIMEOUT_SECS",
        default_value_t = 10
    )]
    pub notify_timeout_secs: u64,

    /// Whether failed notifications still disarm the reminder
    /// (`always` or `on_success`).
    #[arg(
        long,
        env = "EASYTASK_REMINDER_DISARM_POLICY",
        default_value = "always",
        value_parser = parse_disarm_policy
    )]
    pub disarm_policy: DisarmPolicy,

    /// Maximum number of pooled database connections.
    #[arg(long, env = "EASYTASK_DB_POOL_SIZE", default_value_t = 4)]
    pub pool_size: u32,
}

/// `PostgreSQL` connection parts, as read from the environment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Args)]
pub struct PostgresSettings {
    /// Database user.
    #[arg(long = "postgres-user", env = "POSTGRES_USER")]
    pub user: Option<String>,

    /// Database password.
    #[arg(long = "postgres-password", env = "POSTGRES_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Database host.
    #[arg(long = "postgres-host", env = "POSTGRES_HOST", default_value = "localhost")]
    pub host: String,

    /// Database port.
    #[arg(long = "postgres-port", env = "POSTGRES_PORT", default_value_t = 5432)]
    pub port: u16,

    /// Database name.
    #[arg(long = "postgres-db", env = "POSTGRES_DB")]
    pub database: Option<String>,
}

impl PostgresSettings {
    /// Builds a connection URL from the parts.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingDatabaseSetting`] when the user or
    /// database name is absent.
    pub fn database_url(&self) -> Result<String, ConfigError> {
        let user = self
            .user
            .as_deref()
            .ok_or(ConfigError::MissingDatabaseSetting("POSTGRES_USER"))?;
        let database = self
            .database
            .as_deref()
            .ok_or(ConfigError::MissingDatabaseSetting("POSTGRES_DB"))?;
        let credentials = self.password.as_deref().map_or_else(
            || user.to_owned(),
            |password| format!("{user}:{password}"),
        );
        Ok(format!(
            "postgres://{credentials}@{}:{}/{database}",
            self.host, self.port
        ))
    }
}

impl WorkerConfig {
    /// Returns the connection URL, preferring `DATABASE_URL`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingDatabaseSetting`] when no URL is given
    /// and the `POSTGRES_*` parts are incomplete.
    pub fn database_url(&self) -> Result<String, ConfigError> {
        self.database_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
            .map_or_else(|| self.postgres.database_url(), |url| Ok(url.to_owned()))
    }

    /// Returns the validated connection pool size.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ZeroPoolSize`] for a zero pool.
    pub const fn pool_size(&self) -> Result<u32, ConfigError> {
        if self.pool_size == 0 {
            return Err(ConfigError::ZeroPoolSize);
        }
        Ok(self.pool_size)
    }

    /// Returns the scanner settings.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Scanner`] when either duration is zero.
    pub fn scanner_config(&self) -> Result<ScannerConfig, ConfigError> {
        Ok(ScannerConfig::new(
            Duration::from_secs(self.poll_interval_secs),
            Duration::from_secs(self.notify_timeout_secs),
            self.disarm_policy,
        )?)
    }
}

fn parse_disarm_policy(value: &str) -> Result<DisarmPolicy, ParseDisarmPolicyError> {
    DisarmPolicy::try_from(value)
}
