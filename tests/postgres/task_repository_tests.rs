//! Owner edits through the `PostgreSQL` repository, including edits that race
//! a reminder disarm.

use crate::postgres::helpers::{TestDatabase, on_jan_1, test_runtime};
use easytask::reminder::ports::ReminderStore;
use easytask::task::{
    domain::{OwnerId, TaskId, TaskPriority, TaskTitle},
    ports::{ReminderWrite, TaskFilter, TaskRepository, TaskRepositoryError},
    services::{CreateTaskRequest, FieldUpdate, UpdateTaskRequest},
};
use pg_embedded_setup_unpriv::TestCluster;
use pg_embedded_setup_unpriv::test_support::shared_test_cluster;
use rstest::rstest;

#[rstest]
fn stale_edit_without_reminder_change_keeps_the_disarm(
    shared_test_cluster: &'static TestCluster,
) {
    let db = TestDatabase::create(shared_test_cluster).expect("database setup");
    let store = db.store(on_jan_1(7, 0)).expect("store setup");
    let armed_at = on_jan_1(8, 0);
    let rt = test_runtime();
    let task = rt
        .block_on(store.tasks.create_task(
            CreateTaskRequest::new(OwnerId::new(), "Dentist").with_reminder_at(armed_at),
        ))
        .expect("task creation should succeed");
    let mut edited = rt
        .block_on(store.repository.find_by_id(task.id()))
        .expect("lookup should succeed")
        .expect("task should exist");

    let cleared = rt
        .block_on(store.repository.clear_reminder(task.id(), armed_at))
        .expect("clear should run");
    store.clock.set(on_jan_1(9, 0));
    edited.rename(
        TaskTitle::new("Dentist at 10").expect("valid title"),
        &*store.clock,
    );
    let stored = rt
        .block_on(store.repository.update(&edited, ReminderWrite::Preserve))
        .expect("update should succeed");
    let due = rt
        .block_on(store.repository.find_due_reminders(on_jan_1(9, 0)))
        .expect("due query should succeed");

    assert!(cleared);
    assert_eq!(stored.title().as_str(), "Dentist at 10");
    assert_eq!(stored.reminder_at(), None);
    assert_eq!(stored.updated_at(), on_jan_1(9, 0));
    assert!(due.is_empty());
}

#[rstest]
fn explicit_reschedule_overwrites_the_stored_reminder(
    shared_test_cluster: &'static TestCluster,
) {
    let db = TestDatabase::create(shared_test_cluster).expect("database setup");
    let store = db.store(on_jan_1(7, 0)).expect("store setup");
    let owner = OwnerId::new();
    let rt = test_runtime();
    let task = rt
        .block_on(store.tasks.create_task(
            CreateTaskRequest::new(owner, "Stand-up").with_reminder_at(on_jan_1(8, 0)),
        ))
        .expect("task creation should succeed");

    let rescheduled = rt
        .block_on(store.tasks.update_task(
            UpdateTaskRequest::new(owner, task.id())
                .reminder_at(FieldUpdate::Set(on_jan_1(11, 0)))
                .priority("high"),
        ))
        .expect("update should succeed");
    let cleared = rt
        .block_on(store.tasks.update_task(
            UpdateTaskRequest::new(owner, task.id()).reminder_at(FieldUpdate::Clear),
        ))
        .expect("update should succeed");

    assert_eq!(rescheduled.reminder_at(), Some(on_jan_1(11, 0)));
    assert_eq!(rescheduled.priority(), TaskPriority::High);
    assert_eq!(cleared.reminder_at(), None);
    assert_eq!(cleared.priority(), TaskPriority::High);
}

#[rstest]
fn owner_listing_applies_filters(shared_test_cluster: &'static TestCluster) {
    let db = TestDatabase::create(shared_test_cluster).expect("database setup");
    let store = db.store(on_jan_1(7, 0)).expect("store setup");
    let owner = OwnerId::new();
    let rt = test_runtime();
    for (title, priority) in [("Low one", "low"), ("High one", "high"), ("High two", "high")] {
        rt.block_on(
            store
                .tasks
                .create_task(CreateTaskRequest::new(owner, title).with_priority(priority)),
        )
        .expect("task creation should succeed");
    }
    rt.block_on(
        store
            .tasks
            .create_task(CreateTaskRequest::new(OwnerId::new(), "Someone else's")),
    )
    .expect("task creation should succeed");

    let all = rt
        .block_on(store.repository.list_for_owner(owner, &TaskFilter::new()))
        .expect("listing should succeed");
    let high = rt
        .block_on(store.repository.list_for_owner(
            owner,
            &TaskFilter::new().with_priority(TaskPriority::High),
        ))
        .expect("listing should succeed");

    assert_eq!(all.len(), 3);
    assert_eq!(high.len(), 2);
    assert!(high.iter().all(|task| task.priority() == TaskPriority::High));
}

#[rstest]
fn missing_rows_are_reported(shared_test_cluster: &'static TestCluster) {
    let db = TestDatabase::create(shared_test_cluster).expect("database setup");
    let store = db.store(on_jan_1(7, 0)).expect("store setup");
    let rt = test_runtime();
    let task = rt
        .block_on(store.tasks.create_task(CreateTaskRequest::new(OwnerId::new(), "Gone soon")))
        .expect("task creation should succeed");
    rt.block_on(store.repository.delete(task.id()))
        .expect("delete should succeed");

    let update = rt.block_on(store.repository.update(&task, ReminderWrite::Overwrite));
    let delete = rt.block_on(store.repository.delete(task.id()));
    let missing = TaskId::new();
    let cleared = rt
        .block_on(store.repository.clear_reminder(missing, on_jan_1(8, 0)))
        .expect("clear should run");

    assert!(matches!(update, Err(TaskRepositoryError::NotFound(id)) if id == task.id()));
    assert!(matches!(delete, Err(TaskRepositoryError::NotFound(id)) if id == task.id()));
    assert!(!cleared);
}
