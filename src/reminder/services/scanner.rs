//! Reminder scanner: one cycle of find, notify, and compare-and-clear.

use crate::reminder::{
    domain::{DisarmPolicy, DueReminder, ScanReport},
    ports::{Notifier, NotifierError, NotifierResult, ReminderStore, ReminderStoreError},
};
use mockable::Clock;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Timing and policy settings for the scanner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScannerConfig {
    poll_interval: Duration,
    notify_timeout: Duration,
    disarm_policy: DisarmPolicy,
}

impl ScannerConfig {
    /// Default time between cycles.
    pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(60);
    /// Default bound on a single notify call.
    pub const DEFAULT_NOTIFY_TIMEOUT: Duration = Duration::from_secs(10);

    /// Creates a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ScannerConfigError`] when either duration is zero.
    pub fn new(
        poll_interval: Duration,
        notify_timeout: Duration,
        disarm_policy: DisarmPolicy,
    ) -> Result<Self, ScannerConfigError> {
        if poll_interval.is_zero() {
            return Err(ScannerConfigError::ZeroPollInterval);
        }
        if notify_timeout.is_zero() {
            return Err(ScannerConfigError::ZeroNotifyTimeout);
        }
        Ok(Self {
            poll_interval,
            notify_timeout,
            disarm_policy,
        })
    }

    /// Returns the time between cycles.
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Returns the bound on a single notify call.
    #[must_use]
    pub const fn notify_timeout(&self) -> Duration {
        self.notify_timeout
    }

    /// Returns the disarm policy.
    #[must_use]
    pub const fn disarm_policy(&self) -> DisarmPolicy {
        self.disarm_policy
    }

    /// Returns a copy with a different disarm policy.
    #[must_use]
    pub const fn with_disarm_policy(mut self, disarm_policy: DisarmPolicy) -> Self {
        self.disarm_policy = disarm_policy;
        self
    }
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            poll_interval: Self::DEFAULT_POLL_INTERVAL,
            notify_timeout: Self::DEFAULT_NOTIFY_TIMEOUT,
            disarm_policy: DisarmPolicy::default(),
        }
    }
}

/// Invalid scanner settings.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum ScannerConfigError {
    /// The poll interval is zero.
    #[error("reminder poll interval must be greater than zero")]
    ZeroPollInterval,
    /// The notify timeout is zero.
    #[error("reminder notify timeout must be greater than zero")]
    ZeroNotifyTimeout,
}

/// Failure that aborts a scan cycle.
///
/// Notify failures never abort a cycle; they are counted in the
/// [`ScanReport`].
#[derive(Debug, Clone, Error)]
pub enum ScanError {
    /// The store could not be read or written.
    #[error(transparent)]
    StoreUnavailable(#[from] ReminderStoreError),
}

/// Finds due reminders, notifies their owners, and disarms them.
#[derive(Clone)]
pub struct ReminderScanner<S, N, C>
where
    S: ReminderStore,
    N: Notifier,
    C: Clock + Send + Sync,
{
    store: Arc<S>,
    notifier: Arc<N>,
    clock: Arc<C>,
    config: ScannerConfig,
}

impl<S, N, C> ReminderScanner<S, N, C>
where
    S: ReminderStore,
    N: Notifier,
    C: Clock + Send + Sync,
{
    /// Creates a scanner.
    #[must_use]
    pub const fn new(
        store: Arc<S>,
        notifier: Arc<N>,
        clock: Arc<C>,
        config: ScannerConfig,
    ) -> Self {
        Self {
            store,
            notifier,
            clock,
            config,
        }
    }

    /// Returns the scanner settings.
    #[must_use]
    pub const fn config(&self) -> &ScannerConfig {
        &self.config
    }

    /// Runs one full cycle.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::StoreUnavailable`] when the store cannot be read,
    /// or cannot be written while disarming. Reminders processed before the
    /// failure keep their outcome.
    pub async fn scan_once(&self) -> Result<ScanReport, ScanError> {
        self.scan_until(&CancellationToken::new()).await
    }

    /// Runs one cycle, stopping before the next reminder once `cancel` fires.
    ///
    /// The due query is abandoned if cancellation arrives while it runs. The
    /// reminder in progress when cancellation arrives is finished, so a
    /// delivered notification is always followed by its disarm.
    ///
    /// # Errors
    ///
    /// See [`Self::scan_once`].
    pub async fn scan_until(&self, cancel: &CancellationToken) -> Result<ScanReport, ScanError> {
        let now = self.clock.utc();
        let due = tokio::select! {
            biased;
            () = cancel.cancelled() => {
                info!("reminder scan cancelled before due reminders were loaded");
                return Ok(ScanReport {
                    interrupted: true,
                    ..ScanReport::default()
                });
            }
            found = self.store.find_due_reminders(now) => found?,
        };
        let mut report = ScanReport {
            due: due.len(),
            ..ScanReport::default()
        };
        debug!(%now, due = report.due, "reminder scan found due tasks");

        for (position, reminder) in due.iter().enumerate() {
            if cancel.is_cancelled() {
                report.interrupted = true;
                report.skipped = due.len().saturating_sub(position);
                info!(skipped = report.skipped, "reminder scan interrupted by shutdown");
                break;
            }
            self.fire(reminder, &mut report).await?;
        }

        Ok(report)
    }

    async fn fire(&self, reminder: &DueReminder, report: &mut ScanReport) -> Result<(), ScanError> {
        let task_id = reminder.task_id();
        let owner_id = reminder.owner_id();

        let notified = match self.deliver(reminder).await {
            Ok(()) => {
                report.notified += 1;
                true
            }
            Err(err) => {
                report.notify_failed += 1;
                warn!(%task_id, %owner_id, error = %err, "reminder notification failed");
                false
            }
        };

        if !self.config.disarm_policy.should_disarm(notified) {
            report.kept_armed += 1;
            debug!(%task_id, "reminder left armed for retry");
            return Ok(());
        }

        let cleared = self
            .store
            .clear_reminder(task_id, reminder.reminder_at())
            .await?;
        if cleared {
            report.disarmed += 1;
        } else {
            report.stale += 1;
            debug!(
                %task_id,
                reminder_at = %reminder.reminder_at(),
                "reminder changed since scan; left as is"
            );
        }
        Ok(())
    }

    async fn deliver(&self, reminder: &DueReminder) -> NotifierResult<()> {
        let timeout = self.config.notify_timeout;
        let message = reminder.message();
        tokio::time::timeout(timeout, self.notifier.notify(reminder.owner_id(), &message))
            .await
            .map_err(|_elapsed| NotifierError::TimedOut(timeout))?
    }
}
