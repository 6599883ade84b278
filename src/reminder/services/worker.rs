//! Managed background worker that drives the reminder scanner.
//!
//! The worker runs one scan immediately, then one per poll interval, until
//! its [`CancellationToken`] is cancelled. Store failures are logged and the
//! loop waits for the next tick; nothing short of cancellation ends it.
//!
//! ```rust,ignore
//! let handle = ReminderWorker::spawn(scanner, shutdown.child_token());
//! handle.wait_for_cycles(1).await?;
//! handle.shutdown().await?;
//! ```

use super::scanner::ReminderScanner;
use crate::reminder::{
    domain::{ScannerState, ScannerStatus},
    ports::{Notifier, ReminderStore},
};
use mockable::Clock;
use thiserror::Error;
use tokio::sync::watch;
use tokio::task::{JoinError, JoinHandle};
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Errors returned by [`ReminderWorkerHandle`].
#[derive(Debug, Error)]
pub enum ReminderWorkerError {
    /// The worker stopped before the awaited condition was reached.
    #[error("reminder worker stopped")]
    Stopped,
    /// The worker task panicked or was aborted.
    #[error("reminder worker task failed: {0}")]
    Join(#[from] JoinError),
}

/// Entry point for starting the reminder loop.
#[derive(Debug, Clone, Copy)]
pub struct ReminderWorker;

impl ReminderWorker {
    /// Spawns the scan loop on the current tokio runtime.
    #[must_use]
    pub fn spawn<S, N, C>(
        scanner: ReminderScanner<S, N, C>,
        cancel: CancellationToken,
    ) -> ReminderWorkerHandle
    where
        S: ReminderStore + 'static,
        N: Notifier + 'static,
        C: Clock + Send + Sync + 'static,
    {
        let (status_tx, status_rx) = watch::channel(ScannerStatus::default());
        let task = tokio::spawn(run_loop(scanner, cancel.clone(), status_tx));
        ReminderWorkerHandle {
            cancel,
            status: status_rx,
            task,
        }
    }
}

/// Handle to a running reminder worker.
#[derive(Debug)]
pub struct ReminderWorkerHandle {
    cancel: CancellationToken,
    status: watch::Receiver<ScannerStatus>,
    task: JoinHandle<()>,
}

impl ReminderWorkerHandle {
    /// Returns the latest published status.
    #[must_use]
    pub fn status(&self) -> ScannerStatus {
        *self.status.borrow()
    }

    /// Returns a receiver that observes every status change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<ScannerStatus> {
        self.status.clone()
    }

    /// Returns the token that stops the worker.
    #[must_use]
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Waits until at least `cycles` scans have completed.
    ///
    /// # Errors
    ///
    /// Returns [`ReminderWorkerError::Stopped`] if the worker exits first.
    pub async fn wait_for_cycles(
        &self,
        cycles: u64,
    ) -> Result<ScannerStatus, ReminderWorkerError> {
        let mut receiver = self.status.clone();
        receiver
            .wait_for(|status| status.completed_cycles >= cycles)
            .await
            .map(|status| *status)
            .map_err(|_closed| ReminderWorkerError::Stopped)
    }

    /// Stops scheduling cycles and waits for the loop to exit.
    ///
    /// A cycle in flight finishes the reminder it is processing before the
    /// loop returns.
    ///
    /// # Errors
    ///
    /// Returns [`ReminderWorkerError::Join`] if the worker task panicked.
    pub async fn shutdown(self) -> Result<(), ReminderWorkerError> {
        self.cancel.cancel();
        self.task.await?;
        Ok(())
    }
}

async fn run_loop<S, N, C>(
    scanner: ReminderScanner<S, N, C>,
    cancel: CancellationToken,
    status: watch::Sender<ScannerStatus>,
) where
    S: ReminderStore,
    N: Notifier,
    C: Clock + Send + Sync,
{
    let poll_interval = scanner.config().poll_interval();
    let mut ticker = tokio::time::interval(poll_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    info!(
        ?poll_interval,
        disarm_policy = %scanner.config().disarm_policy(),
        "reminder worker started"
    );

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = ticker.tick() => {}
        }

        status.send_modify(|current| current.state = ScannerState::Scanning);
        let report = match scanner.scan_until(&cancel).await {
            Ok(report) => {
                if report.due > 0 {
                    info!(
                        due = report.due,
                        notified = report.notified,
                        notify_failed = report.notify_failed,
                        disarmed = report.disarmed,
                        stale = report.stale,
                        kept_armed = report.kept_armed,
                        "reminder scan finished"
                    );
                }
                Some(report)
            }
            Err(err) => {
                warn!(error = %err, "reminder scan failed; retrying next interval");
                None
            }
        };
        status.send_modify(|current| {
            current.state = ScannerState::Idle;
            current.completed_cycles += 1;
            if report.is_some() {
                current.last_report = report;
            }
        });
    }

    info!("reminder worker stopped");
}
