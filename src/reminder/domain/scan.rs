//! Scan policy, per-cycle report, and scanner state types.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Decides whether a reminder is disarmed when its notification fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisarmPolicy {
    /// Disarm after every notify attempt, successful or not.
    #[default]
    Always,
    /// Disarm only after a successful notification; failed reminders stay
    /// armed and are retried on the next cycle.
    OnSuccess,
}

impl DisarmPolicy {
    /// Returns the canonical configuration representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Always => "always",
            Self::OnSuccess => "on_success",
        }
    }

    /// Returns whether a reminder should be disarmed given the notify outcome.
    #[must_use]
    pub const fn should_disarm(self, notified: bool) -> bool {
        match self {
            Self::Always => true,
            Self::OnSuccess => notified,
        }
    }
}

impl TryFrom<&str> for DisarmPolicy {
    type Error = ParseDisarmPolicyError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase().replace('-', "_");
        match normalized.as_str() {
            "always" => Ok(Self::Always),
            "on_success" => Ok(Self::OnSuccess),
            _ => Err(ParseDisarmPolicyError(value.to_owned())),
        }
    }
}

impl fmt::Display for DisarmPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned while parsing a disarm policy.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown disarm policy '{0}', expected 'always' or 'on_success'")]
pub struct ParseDisarmPolicyError(pub String);

/// Outcome counts for one scan cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanReport {
    /// Reminders returned by the store as due.
    pub due: usize,
    /// Notifications delivered.
    pub notified: usize,
    /// Notifications that failed or timed out.
    pub notify_failed: usize,
    /// Reminders cleared by this cycle.
    pub disarmed: usize,
    /// Reminders another writer changed before the clear.
    pub stale: usize,
    /// Reminders left armed under [`DisarmPolicy::OnSuccess`].
    pub kept_armed: usize,
    /// Due reminders not processed because the cycle was cancelled.
    pub skipped: usize,
    /// Whether cancellation stopped the cycle early.
    pub interrupted: bool,
}

/// Phase of the scanner loop.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScannerState {
    /// Waiting for the next tick.
    #[default]
    Idle,
    /// Querying the store and firing reminders.
    Scanning,
}

/// Observable scanner status published after every transition.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScannerStatus {
    /// Current phase.
    pub state: ScannerState,
    /// Cycles finished since the worker started, failed cycles included.
    pub completed_cycles: u64,
    /// Report of the last cycle that reached the store, if any.
    pub last_report: Option<ScanReport>,
}
