//! Store port used by the reminder scanner.

use crate::reminder::domain::DueReminder;
use crate::task::domain::TaskId;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;

/// Result type for reminder store operations.
pub type ReminderStoreResult<T> = Result<T, ReminderStoreError>;

/// Narrow view of the task store needed to fire reminders.
#[async_trait]
pub trait ReminderStore: Send + Sync {
    /// Returns every task whose reminder is set, not after `now`, and not
    /// done, ordered by task identifier.
    async fn find_due_reminders(&self, now: DateTime<Utc>)
    -> ReminderStoreResult<Vec<DueReminder>>;

    /// Clears the task's reminder if it still equals `expected_reminder_at`.
    ///
    /// Returns `false` when the task is gone or its reminder was changed by
    /// another writer; that is not an error.
    async fn clear_reminder(
        &self,
        task_id: TaskId,
        expected_reminder_at: DateTime<Utc>,
    ) -> ReminderStoreResult<bool>;
}

/// Errors returned by reminder store implementations.
#[derive(Debug, Clone, Error)]
pub enum ReminderStoreError {
    /// The store could not be read or written, typically a transient
    /// connectivity failure.
    #[error("reminder store unavailable: {0}")]
    Unavailable(Arc<dyn std::error::Error + Send + Sync>),
}

impl ReminderStoreError {
    /// Wraps an underlying store failure.
    pub fn unavailable(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Unavailable(Arc::new(err))
    }
}
