//! Shared helpers for `PostgreSQL` integration tests.

use chrono::{DateTime, Utc};
use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use easytask::task::{
    adapters::postgres::{PostgresTaskRepository, TaskPgPool},
    services::TaskService,
};
use pg_embedded_setup_unpriv::TestCluster;
use std::sync::Arc;
use tokio::runtime::Runtime;
use uuid::Uuid;

pub use crate::test_helpers::{FixedClock, utc};

/// Task service backed by the test database.
pub type PgTaskService = TaskService<PostgresTaskRepository, FixedClock>;

/// Repository, clock and service over one test database.
pub struct PgStore {
    /// Task store, also the reminder store.
    pub repository: Arc<PostgresTaskRepository>,
    /// Controllable clock.
    pub clock: Arc<FixedClock>,
    /// Owner-facing task service.
    pub tasks: PgTaskService,
}

/// Boxed error used by the database helpers.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// SQL that creates the `tasks` table.
pub const CREATE_TASKS_SQL: &str =
    include_str!("../../migrations/2024-01-01-000000_create_tasks/up.sql");

/// Template database name for the pre-migrated schema.
pub const TEMPLATE_DB: &str = "easytask_test_template";

/// Creates a tokio runtime for driving the async repository in sync tests.
pub fn test_runtime() -> Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("failed to create test runtime")
}

/// Ensures the template database exists with the schema applied.
///
/// # Errors
///
/// Returns an error if template creation or migration fails.
pub fn ensure_template(cluster: &TestCluster) -> Result<(), BoxError> {
    cluster
        .ensure_template_exists(TEMPLATE_DB, |db_name| {
            let url = cluster.connection().database_url(db_name);
            let mut conn = PgConnection::establish(&url).map_err(|e| eyre::eyre!("{e}"))?;
            conn.batch_execute(CREATE_TASKS_SQL)
                .map_err(|e| eyre::eyre!("{e}"))?;
            Ok(())
        })
        .map_err(|e| Box::new(e) as BoxError)?;
    Ok(())
}

/// Per-test database cloned from the template and dropped afterwards.
pub struct TestDatabase {
    cluster: &'static TestCluster,
    name: String,
    url: String,
}

impl TestDatabase {
    /// Creates a fresh migrated database.
    ///
    /// # Errors
    ///
    /// Returns an error if the template or the database cannot be created.
    pub fn create(cluster: &'static TestCluster) -> Result<Self, BoxError> {
        ensure_template(cluster)?;
        let name = format!("easytask_{}", Uuid::new_v4().simple());
        cluster
            .create_database_from_template(name.as_str(), TEMPLATE_DB)
            .map_err(|e| Box::new(e) as BoxError)?;
        let url = cluster.connection().database_url(&name);
        Ok(Self { cluster, name, url })
    }

    /// Builds a repository over a single pooled connection.
    ///
    /// # Errors
    ///
    /// Returns an error if the pool cannot be built.
    pub fn repository(&self) -> Result<PostgresTaskRepository, BoxError> {
        let manager = ConnectionManager::<PgConnection>::new(self.url.clone());
        let pool: TaskPgPool = Pool::builder()
            .max_size(1)
            .build(manager)
            .map_err(|e| Box::new(e) as BoxError)?;
        Ok(PostgresTaskRepository::new(pool))
    }

    /// Builds a repository and a task service sharing it, with the clock at
    /// `now`.
    ///
    /// # Errors
    ///
    /// Returns an error if the pool cannot be built.
    pub fn store(&self, now: DateTime<Utc>) -> Result<PgStore, BoxError> {
        let repository = Arc::new(self.repository()?);
        let clock = Arc::new(FixedClock::at(now));
        let tasks = TaskService::new(Arc::clone(&repository), Arc::clone(&clock));
        Ok(PgStore {
            repository,
            clock,
            tasks,
        })
    }

    /// Opens a direct connection for raw SQL.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection fails.
    pub fn connect(&self) -> Result<PgConnection, BoxError> {
        PgConnection::establish(&self.url).map_err(|e| Box::new(e) as BoxError)
    }
}

impl Drop for TestDatabase {
    fn drop(&mut self) {
        if let Err(e) = self.cluster.drop_database(self.name.as_str()) {
            eprintln!("Warning: failed to drop test database {}: {e}", self.name);
        }
    }
}

/// Returns 2024-01-01 at `hour:minute` UTC.
pub fn on_jan_1(hour: u32, minute: u32) -> DateTime<Utc> {
    utc(2024, 1, 1, hour, minute).expect("valid timestamp")
}
