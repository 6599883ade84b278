//! In-memory task repository for tests and local runs.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::reminder::{
    domain::DueReminder,
    ports::{ReminderStore, ReminderStoreError, ReminderStoreResult},
};
use crate::task::{
    domain::{OwnerId, Task, TaskId},
    ports::{
        ReminderWrite, TaskFilter, TaskRepository, TaskRepositoryError, TaskRepositoryResult,
    },
};

/// Thread-safe in-memory task repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskRepository {
    state: Arc<RwLock<InMemoryTaskState>>,
}

#[derive(Debug, Default)]
struct InMemoryTaskState {
    tasks: HashMap<TaskId, Task>,
}

impl InMemoryTaskRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, InMemoryTaskState>, std::io::Error> {
        self.state
            .read()
            .map_err(|err| std::io::Error::other(err.to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, InMemoryTaskState>, std::io::Error> {
        self.state
            .write()
            .map_err(|err| std::io::Error::other(err.to_string()))
    }
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()> {
        let mut state = self.write().map_err(TaskRepositoryError::persistence)?;
        if state.tasks.contains_key(&task.id()) {
            return Err(TaskRepositoryError::DuplicateTask(task.id()));
        }
        state.tasks.insert(task.id(), task.clone());
        Ok(())
    }

    async fn update(&self, task: &Task, reminder: ReminderWrite) -> TaskRepositoryResult<Task> {
        let mut state = self.write().map_err(TaskRepositoryError::persistence)?;
        let existing = state
            .tasks
            .get_mut(&task.id())
            .ok_or(TaskRepositoryError::NotFound(task.id()))?;
        let stored_reminder = existing.reminder_at();
        *existing = task.clone();
        if reminder == ReminderWrite::Preserve {
            existing.restore_reminder(stored_reminder);
        }
        Ok(existing.clone())
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        let state = self.read().map_err(TaskRepositoryError::persistence)?;
        Ok(state.tasks.get(&id).cloned())
    }

    async fn list_for_owner(
        &self,
        owner_id: OwnerId,
        filter: &TaskFilter,
    ) -> TaskRepositoryResult<Vec<Task>> {
        let state = self.read().map_err(TaskRepositoryError::persistence)?;
        let mut tasks: Vec<Task> = state
            .tasks
            .values()
            .filter(|task| task.owner_id() == owner_id && filter.matches(task))
            .cloned()
            .collect();
        tasks.sort_by_key(|task| (task.created_at(), task.id()));
        Ok(tasks)
    }

    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<()> {
        let mut state = self.write().map_err(TaskRepositoryError::persistence)?;
        state
            .tasks
            .remove(&id)
            .map(|_| ())
            .ok_or(TaskRepositoryError::NotFound(id))
    }
}

#[async_trait]
impl ReminderStore for InMemoryTaskRepository {
    async fn find_due_reminders(
        &self,
        now: DateTime<Utc>,
    ) -> ReminderStoreResult<Vec<DueReminder>> {
        let state = self.read().map_err(ReminderStoreError::unavailable)?;
        let mut due: Vec<DueReminder> = state
            .tasks
            .values()
            .filter(|task| task.is_reminder_due(now))
            .filter_map(DueReminder::from_task)
            .collect();
        due.sort_by_key(DueReminder::task_id);
        Ok(due)
    }

    async fn clear_reminder(
        &self,
        task_id: TaskId,
        expected_reminder_at: DateTime<Utc>,
    ) -> ReminderStoreResult<bool> {
        let mut state = self.write().map_err(ReminderStoreError::unavailable)?;
        Ok(state
            .tasks
            .get_mut(&task_id)
            .is_some_and(|task| task.disarm_reminder(expected_reminder_at)))
    }
}
