//! In-memory integration tests for reminder scanning end to end.

use std::time::Duration;

use easytask::reminder::{
    domain::DisarmPolicy,
    services::{ReminderWorker, ScannerConfig},
};
use easytask::task::{
    domain::OwnerId,
    services::{CreateTaskRequest, FieldUpdate, UpdateTaskRequest},
};
use rstest::rstest;
use tokio_util::sync::CancellationToken;

use super::helpers::{ReminderEnv, env, utc};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn reminder_fires_once_then_can_be_rearmed(env: ReminderEnv) -> Result<(), eyre::Report> {
    let owner = OwnerId::new();
    let task = env
        .tasks
        .create_task(
            CreateTaskRequest::new(owner, "Stand-up notes")
                .with_reminder_at(utc(2024, 1, 1, 9, 0)?),
        )
        .await?;
    let scanner = env.scanner(ScannerConfig::default());

    env.clock.set(utc(2024, 1, 1, 9, 5)?);
    let first = scanner.scan_once().await?;
    env.clock.set(utc(2024, 1, 1, 9, 6)?);
    let second = scanner.scan_once().await?;

    eyre::ensure!(first.notified == 1 && first.disarmed == 1, "first scan: {first:?}");
    eyre::ensure!(second.due == 0, "second scan should find nothing: {second:?}");
    let stored = env.tasks.get_task(owner, task.id()).await?;
    eyre::ensure!(stored.reminder_at().is_none(), "reminder should be cleared");

    env.tasks
        .update_task(
            UpdateTaskRequest::new(owner, task.id())
                .reminder_at(FieldUpdate::Set(utc(2024, 1, 1, 10, 0)?)),
        )
        .await?;
    env.clock.set(utc(2024, 1, 1, 10, 0)?);
    let third = scanner.scan_once().await?;

    eyre::ensure!(third.notified == 1, "re-armed reminder should fire: {third:?}");
    eyre::ensure!(env.notifier.delivered().len() == 2, "expected two deliveries");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn completing_a_task_silences_its_reminder(env: ReminderEnv) -> Result<(), eyre::Report> {
    let owner = OwnerId::new();
    let reminder_at = utc(2024, 1, 1, 9, 0)?;
    let task = env
        .tasks
        .create_task(CreateTaskRequest::new(owner, "Take out bins").with_reminder_at(reminder_at))
        .await?;
    env.tasks
        .update_task(UpdateTaskRequest::new(owner, task.id()).is_done(true))
        .await?;

    env.clock.set(utc(2024, 1, 1, 9, 30)?);
    let report = env.scanner(ScannerConfig::default()).scan_once().await?;

    eyre::ensure!(report.due == 0, "done task must not be due: {report:?}");
    eyre::ensure!(env.notifier.attempts() == 0, "no notification expected");
    let stored = env.tasks.get_task(owner, task.id()).await?;
    eyre::ensure!(
        stored.reminder_at() == Some(reminder_at),
        "done task keeps its reminder value"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn on_success_policy_retries_unreachable_owner(env: ReminderEnv) -> Result<(), eyre::Report> {
    let owner = OwnerId::new();
    env.tasks
        .create_task(
            CreateTaskRequest::new(owner, "Renew insurance")
                .with_reminder_at(utc(2024, 1, 1, 7, 30)?),
        )
        .await?;
    let scanner =
        env.scanner(ScannerConfig::default().with_disarm_policy(DisarmPolicy::OnSuccess));
    env.notifier.set_unreachable(owner)?;

    let failed = scanner.scan_once().await?;
    env.notifier.set_reachable(owner)?;
    let retried = scanner.scan_once().await?;

    eyre::ensure!(failed.kept_armed == 1, "first scan should keep it armed: {failed:?}");
    eyre::ensure!(retried.notified == 1, "second scan should deliver: {retried:?}");
    eyre::ensure!(env.notifier.attempts() == 2, "expected two attempts");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn worker_delivers_and_shuts_down(env: ReminderEnv) -> Result<(), eyre::Report> {
    let owner = OwnerId::new();
    env.tasks
        .create_task(
            CreateTaskRequest::new(owner, "Ship release")
                .with_reminder_at(utc(2024, 1, 1, 7, 0)?),
        )
        .await?;
    let config = ScannerConfig::new(
        Duration::from_secs(3600),
        Duration::from_secs(1),
        DisarmPolicy::Always,
    )?;
    let scanner = env.scanner(config);

    let handle = ReminderWorker::spawn(scanner, CancellationToken::new());
    let status = handle.wait_for_cycles(1).await?;
    handle.shutdown().await?;

    eyre::ensure!(
        status.last_report.is_some_and(|report| report.notified == 1),
        "first cycle should deliver the reminder: {status:?}"
    );
    let delivered = env.notifier.delivered();
    eyre::ensure!(
        delivered.first().is_some_and(|note| note.owner_id == owner),
        "delivery should target the owner"
    );
    Ok(())
}
