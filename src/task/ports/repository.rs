//! Repository port for task persistence and lookup.

use crate::task::domain::{OwnerId, Task, TaskId, TaskLabel, TaskPriority};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for task repository operations.
pub type TaskRepositoryResult<T> = Result<T, TaskRepositoryError>;

/// Optional narrowing applied when listing an owner's tasks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFilter {
    /// Only return tasks with this priority.
    pub priority: Option<TaskPriority>,
    /// Only return tasks with this label.
    pub label: Option<TaskLabel>,
}

impl TaskFilter {
    /// Creates a filter that matches every task.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts results to the given priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: TaskPriority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Restricts results to the given label.
    #[must_use]
    pub fn with_label(mut self, label: TaskLabel) -> Self {
        self.label = Some(label);
        self
    }

    /// Returns whether `task` passes the filter. Ownership is not checked.
    #[must_use]
    pub fn matches(&self, task: &Task) -> bool {
        let priority_matches = self
            .priority
            .is_none_or(|priority| task.priority() == priority);
        let label_matches = self
            .label
            .as_ref()
            .is_none_or(|label| task.label() == Some(label));
        priority_matches && label_matches
    }
}

/// Whether [`TaskRepository::update`] writes the stored reminder.
///
/// The reminder worker clears reminders concurrently with owner edits, so an
/// edit that did not touch the reminder must leave the stored value alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReminderWrite {
    /// Keep whatever reminder is currently stored.
    Preserve,
    /// Store the task's reminder, including a cleared one.
    Overwrite,
}

/// Task persistence contract.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Stores a new task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::DuplicateTask`] when the task ID already
    /// exists.
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()>;

    /// Persists changes to an existing task and returns the stored record.
    ///
    /// With [`ReminderWrite::Preserve`] the stored reminder is kept and
    /// reported back in the returned task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not exist.
    async fn update(&self, task: &Task, reminder: ReminderWrite) -> TaskRepositoryResult<Task>;

    /// Finds a task by identifier.
    ///
    /// Returns `None` when the task does not exist.
    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>>;

    /// Returns the owner's tasks that pass `filter`, oldest first.
    async fn list_for_owner(
        &self,
        owner_id: OwnerId,
        filter: &TaskFilter,
    ) -> TaskRepositoryResult<Vec<Task>>;

    /// Deletes a task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not exist.
    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<()>;
}

/// Errors returned by task repository implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskRepositoryError {
    /// A task with the same identifier already exists.
    #[error("duplicate task identifier: {0}")]
    DuplicateTask(TaskId),

    /// The task was not found.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// Persisted data could not be reconstructed into domain types.
    #[error("invalid persisted task data: {0}")]
    InvalidPersistedData(Arc<dyn std::error::Error + Send + Sync>),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskRepositoryError {
    /// Wraps persisted-data decoding or validation failures.
    pub fn invalid_persisted_data(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::InvalidPersistedData(Arc::new(err))
    }

    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
