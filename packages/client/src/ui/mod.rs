//! UI layer: the session event loop and the terminal front-end pieces.

pub mod input;
pub mod render;
pub mod runner;

pub use runner::{SessionCommand, SessionHandle, SessionStopped, run_session, spawn_session};
