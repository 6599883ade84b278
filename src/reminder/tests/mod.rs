//! Unit tests for reminder scanning.

mod support;
