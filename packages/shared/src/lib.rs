//! Shared utilities for Kotoba.
//!
//! Logger initialization and wall-clock helpers used by the client binary
//! and its renderers.

pub mod logger;
pub mod time;
