//! Then steps for reminder scanning BDD scenarios.

use super::world::{ReminderWorld, parse_utc, run_async};
use rstest_bdd_macros::then;

#[then("the owner receives {count:usize} notification naming the task")]
fn owner_receives_named_notification(
    world: &ReminderWorld,
    count: usize,
) -> Result<(), eyre::Report> {
    let title = world.task()?.title().to_string();
    let delivered = world.notifier.delivered();
    eyre::ensure!(
        delivered.len() == count,
        "expected {count} notifications, found {}",
        delivered.len()
    );
    for note in &delivered {
        eyre::ensure!(note.owner_id == world.owner, "notification sent to wrong owner");
        let text = note.message.as_str();
        eyre::ensure!(text.contains(&title), "message {text:?} lacks title");
        eyre::ensure!(
            text.contains(&world.owner.to_string()),
            "message {text:?} lacks owner id"
        );
    }
    Ok(())
}

#[then("the owner receives {count:usize} notifications")]
fn owner_receives_notifications(world: &ReminderWorld, count: usize) -> Result<(), eyre::Report> {
    let attempts = world.notifier.attempts();
    eyre::ensure!(
        attempts == count,
        "expected {count} notify attempts, found {attempts}"
    );
    Ok(())
}

#[then("the task has no reminder")]
fn task_has_no_reminder(world: &ReminderWorld) -> Result<(), eyre::Report> {
    let task_id = world.task()?.id();
    let stored = run_async(world.service.get_task(world.owner, task_id))?;
    eyre::ensure!(
        stored.reminder_at().is_none(),
        "expected no reminder, found {:?}",
        stored.reminder_at()
    );
    Ok(())
}

#[then(r#"the task reminder is still "{at}""#)]
fn task_reminder_is_still(world: &ReminderWorld, at: String) -> Result<(), eyre::Report> {
    let expected = parse_utc(&at)?;
    let task_id = world.task()?.id();
    let stored = run_async(world.service.get_task(world.owner, task_id))?;
    eyre::ensure!(
        stored.reminder_at() == Some(expected),
        "expected reminder {expected}, found {:?}",
        stored.reminder_at()
    );
    Ok(())
}

#[then("the last scan found nothing due")]
fn last_scan_found_nothing(world: &ReminderWorld) -> Result<(), eyre::Report> {
    let report = world
        .reports
        .last()
        .ok_or_else(|| eyre::eyre!("no scan has run"))?;
    eyre::ensure!(report.due == 0, "expected nothing due, got {report:?}");
    Ok(())
}

#[then("the clear is reported as stale")]
fn clear_reported_as_stale(world: &ReminderWorld) -> Result<(), eyre::Report> {
    eyre::ensure!(
        world.last_clear == Some(false),
        "expected a stale clear, got {:?}",
        world.last_clear
    );
    Ok(())
}
