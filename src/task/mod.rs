//! Owner-scoped task management.
//!
//! Tasks carry a title, optional description and due date, a priority and
//! label used for filtering, a completion flag, and an optional reminder
//! time consumed by [`crate::reminder`]. The module follows hexagonal
//! architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;
