//! Tracing subscriber setup for EasyTask binaries.

use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Environment variable read before `RUST_LOG`.
pub const LOG_ENV: &str = "EASYTASK_LOG";

const DEFAULT_FILTER: &str = "info,easytask=debug";

/// Installs the global fmt subscriber.
///
/// The filter comes from [`LOG_ENV`], then `RUST_LOG`, then
/// `info,easytask=debug`. Invalid filter strings fall through to the next
/// source.
///
/// # Errors
///
/// Returns [`TryInitError`] when a global subscriber is already installed.
pub fn init_tracing() -> Result<(), TryInitError> {
    tracing_subscriber::registry()
        .with(resolve_filter(std::env::var(LOG_ENV).ok().as_deref()))
        .with(fmt::layer().with_target(true).compact())
        .try_init()
}

fn resolve_filter(explicit: Option<&str>) -> EnvFilter {
    explicit
        .and_then(|value| EnvFilter::try_new(value).ok())
        .or_else(|| EnvFilter::try_from_default_env().ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_FILTER))
}
