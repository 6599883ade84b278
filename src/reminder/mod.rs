//! Reminder scanning for tasks.
//!
//! A background worker periodically looks for tasks whose reminder time has
//! passed and that are not done, notifies the owner, and disarms the
//! reminder with a compare-and-clear so it fires at most once. The module
//! follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - The scanner and worker in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
