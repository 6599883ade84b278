//! `PostgreSQL` repository implementation for task storage.

use super::{
    models::{DueReminderRow, NewTaskRow, TaskChangeset, TaskRow},
    schema::tasks,
};
use crate::reminder::{
    domain::DueReminder,
    ports::{ReminderStore, ReminderStoreError, ReminderStoreResult},
};
use crate::task::{
    domain::{OwnerId, PersistedTaskData, Task, TaskId, TaskLabel, TaskPriority, TaskTitle},
    ports::{
        ReminderWrite, TaskFilter, TaskRepository, TaskRepositoryError, TaskRepositoryResult,
    },
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::warn;

/// `PostgreSQL` connection pool type used by task adapters.
pub type TaskPgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed task repository.
#[derive(Debug, Clone)]
pub struct PostgresTaskRepository {
    pool: TaskPgPool,
}

impl PostgresTaskRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: TaskPgPool) -> Self {
        Self { pool }
    }

    /// Runs `f` on the blocking pool with a connection checked out for the
    /// duration of the call only.
    async fn run_blocking<F, T>(&self, f: F) -> TaskRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> TaskRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(TaskRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(TaskRepositoryError::persistence)?
    }
}

#[async_trait]
impl TaskRepository for PostgresTaskRepository {
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()> {
        let task_id = task.id();
        let new_row = to_new_row(task);

        self.run_blocking(move |connection| {
            diesel::insert_into(tasks::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        TaskRepositoryError::DuplicateTask(task_id)
                    }
                    _ => TaskRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn update(&self, task: &Task, reminder: ReminderWrite) -> TaskRepositoryResult<Task> {
        let task_id = task.id();
        let changeset = to_changeset(task, reminder);

        self.run_blocking(move |connection| {
            let row = diesel::update(tasks::table.find(task_id.into_inner()))
                .set(&changeset)
                .returning(TaskRow::as_returning())
                .get_result::<TaskRow>(connection)
                .optional()
                .map_err(TaskRepositoryError::persistence)?
                .ok_or(TaskRepositoryError::NotFound(task_id))?;
            row_to_task(row)
        })
        .await
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        self.run_blocking(move |connection| {
            let row = tasks::table
                .find(id.into_inner())
                .select(TaskRow::as_select())
                .first::<TaskRow>(connection)
                .optional()
                .map_err(TaskRepositoryError::persistence)?;
            row.map(row_to_task).transpose()
        })
        .await
    }

    async fn list_for_owner(
        &self,
        owner_id: OwnerId,
        filter: &TaskFilter,
    ) -> TaskRepositoryResult<Vec<Task>> {
        let priority = filter.priority.map(TaskPriority::as_str);
        let label = filter.label.as_ref().map(|value| value.as_str().to_owned());

        self.run_blocking(move |connection| {
            let mut query = tasks::table
                .filter(tasks::owner_id.eq(owner_id.into_inner()))
                .select(TaskRow::as_select())
                .into_boxed();
            if let Some(priority_value) = priority {
                query = query.filter(tasks::priority.eq(priority_value));
            }
            if let Some(label_value) = label {
                query = query.filter(tasks::label.eq(label_value));
            }

            let rows = query
                .order((tasks::created_at.asc(), tasks::id.asc()))
                .load::<TaskRow>(connection)
                .map_err(TaskRepositoryError::persistence)?;
            rows.into_iter().map(row_to_task).collect()
        })
        .await
    }

    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<()> {
        self.run_blocking(move |connection| {
            let deleted = diesel::delete(tasks::table.find(id.into_inner()))
                .execute(connection)
                .map_err(TaskRepositoryError::persistence)?;
            if deleted == 0 {
                return Err(TaskRepositoryError::NotFound(id));
            }
            Ok(())
        })
        .await
    }
}

#[async_trait]
impl ReminderStore for PostgresTaskRepository {
    async fn find_due_reminders(
        &self,
        now: DateTime<Utc>,
    ) -> ReminderStoreResult<Vec<DueReminder>> {
        self.run_blocking(move |connection| {
            let rows = tasks::table
                .filter(tasks::reminder_at.is_not_null())
                .filter(tasks::reminder_at.le(now))
                .filter(tasks::is_done.eq(false))
                .order(tasks::id.asc())
                .select(DueReminderRow::as_select())
                .load::<DueReminderRow>(connection)
                .map_err(TaskRepositoryError::persistence)?;
            Ok(due_reminders_from_rows(rows))
        })
        .await
        .map_err(ReminderStoreError::unavailable)
    }

    async fn clear_reminder(
        &self,
        task_id: TaskId,
        expected_reminder_at: DateTime<Utc>,
    ) -> ReminderStoreResult<bool> {
        self.run_blocking(move |connection| {
            let cleared = diesel::update(
                tasks::table
                    .filter(tasks::id.eq(task_id.into_inner()))
                    .filter(tasks::reminder_at.eq(expected_reminder_at)),
            )
            .set(tasks::reminder_at.eq(None::<DateTime<Utc>>))
            .execute(connection)
            .map_err(TaskRepositoryError::persistence)?;
            Ok(cleared == 1)
        })
        .await
        .map_err(ReminderStoreError::unavailable)
    }
}

fn to_new_row(task: &Task) -> NewTaskRow {
    NewTaskRow {
        id: task.id().into_inner(),
        owner_id: task.owner_id().into_inner(),
        title: task.title().as_str().to_owned(),
        description: task.description().map(ToOwned::to_owned),
        due_date: task.due_date(),
        priority: task.priority().as_str().to_owned(),
        label: task.label().map(|label| label.as_str().to_owned()),
        is_done: task.is_done(),
        reminder_at: task.reminder_at(),
        created_at: task.created_at(),
        updated_at: task.updated_at(),
    }
}

fn to_changeset(task: &Task, reminder: ReminderWrite) -> TaskChangeset {
    TaskChangeset {
        title: task.title().as_str().to_owned(),
        description: Some(task.description().map(ToOwned::to_owned)),
        due_date: Some(task.due_date()),
        priority: task.priority().as_str().to_owned(),
        label: Some(task.label().map(|label| label.as_str().to_owned())),
        is_done: task.is_done(),
        reminder_at: match reminder {
            ReminderWrite::Preserve => None,
            ReminderWrite::Overwrite => Some(task.reminder_at()),
        },
        updated_at: task.updated_at(),
    }
}

fn row_to_task(row: TaskRow) -> TaskRepositoryResult<Task> {
    let TaskRow {
        id,
        owner_id,
        title: persisted_title,
        description,
        due_date,
        priority: persisted_priority,
        label: persisted_label,
        is_done,
        reminder_at,
        created_at,
        updated_at,
    } = row;

    let title =
        TaskTitle::new(persisted_title).map_err(TaskRepositoryError::invalid_persisted_data)?;
    let priority = TaskPriority::try_from(persisted_priority.as_str())
        .map_err(TaskRepositoryError::invalid_persisted_data)?;
    let label = persisted_label
        .map(TaskLabel::new)
        .transpose()
        .map_err(TaskRepositoryError::invalid_persisted_data)?;

    Ok(Task::from_persisted(PersistedTaskData {
        id: TaskId::from_uuid(id),
        owner_id: OwnerId::from_uuid(owner_id),
        title,
        description,
        due_date,
        priority,
        label,
        is_done,
        reminder_at,
        created_at,
        updated_at,
    }))
}

/// Maps scanner rows in order. Rows that fail to map are logged and skipped
/// so the remaining reminders still fire.
fn due_reminders_from_rows(rows: Vec<DueReminderRow>) -> Vec<DueReminder> {
    rows.into_iter()
        .filter_map(|row| {
            let task_id = row.id;
            row_to_due_reminder(row).unwrap_or_else(|err| {
                warn!(%task_id, error = %err, "skipping unreadable reminder row");
                None
            })
        })
        .collect()
}

/// Converts a scanner row; rows whose reminder vanished yield `None`.
fn row_to_due_reminder(row: DueReminderRow) -> TaskRepositoryResult<Option<DueReminder>> {
    let Some(reminder_at) = row.reminder_at else {
        return Ok(None);
    };
    let title = TaskTitle::new(row.title).map_err(TaskRepositoryError::invalid_persisted_data)?;
    Ok(Some(DueReminder::new(
        TaskId::from_uuid(row.id),
        OwnerId::from_uuid(row.owner_id),
        title,
        reminder_at,
    )))
}
