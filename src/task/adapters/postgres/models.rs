//! Diesel row models for task persistence.

use super::schema::tasks;
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Query result row for task records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TaskRow {
    /// Task identifier.
    pub id: uuid::Uuid,
    /// Owning user identifier.
    pub owner_id: uuid::Uuid,
    /// Display title.
    pub title: String,
    /// Optional description.
    pub description: Option<String>,
    /// Optional due date.
    pub due_date: Option<DateTime<Utc>>,
    /// Task priority.
    pub priority: String,
    /// Optional label.
    pub label: Option<String>,
    /// Completion flag.
    pub is_done: bool,
    /// Armed reminder time.
    pub reminder_at: Option<DateTime<Utc>>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Insert model for task records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = tasks)]
pub struct NewTaskRow {
    /// Task identifier.
    pub id: uuid::Uuid,
    /// Owning user identifier.
    pub owner_id: uuid::Uuid,
    /// Display title.
    pub title: String,
    /// Optional description.
    pub description: Option<String>,
    /// Optional due date.
    pub due_date: Option<DateTime<Utc>>,
    /// Task priority.
    pub priority: String,
    /// Optional label.
    pub label: Option<String>,
    /// Completion flag.
    pub is_done: bool,
    /// Armed reminder time.
    pub reminder_at: Option<DateTime<Utc>>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Changeset for owner edits.
///
/// Nullable columns are `Option<Option<_>>`: an outer `None` leaves the column
/// untouched and `Some(None)` writes `NULL`.
#[derive(Debug, Clone, PartialEq, Eq, AsChangeset)]
#[diesel(table_name = tasks)]
pub struct TaskChangeset {
    /// Display title.
    pub title: String,
    /// Optional description.
    pub description: Option<Option<String>>,
    /// Optional due date.
    pub due_date: Option<Option<DateTime<Utc>>>,
    /// Task priority.
    pub priority: String,
    /// Optional label.
    pub label: Option<Option<String>>,
    /// Completion flag.
    pub is_done: bool,
    /// Armed reminder time; `None` keeps the stored reminder.
    pub reminder_at: Option<Option<DateTime<Utc>>>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Reminder columns read by the scanner.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct DueReminderRow {
    /// Task identifier.
    pub id: uuid::Uuid,
    /// Owning user identifier.
    pub owner_id: uuid::Uuid,
    /// Display title.
    pub title: String,
    /// Armed reminder time.
    pub reminder_at: Option<DateTime<Utc>>,
}
