//! Realtime chat room client.
//!
//! Keeps one WebSocket connection per (peer, token, room) credential set,
//! folds inbound frames into an ordered message log and a "peer is typing"
//! flag, and sends debounced typing notices while the user types.
//!
//! Layers:
//! - [`domain`]: credentials, message log, chat state
//! - [`infrastructure`]: wire DTOs and the WebSocket transport
//! - [`usecase`]: frame classification, connection lifecycle, typing debounce
//! - [`ui`]: session event loop, rendering, input parsing

pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

// Re-export entry points
pub use config::{ClientConfig, ServerEndpoint};
pub use infrastructure::transport::WebSocketConnector;
pub use ui::{SessionHandle, spawn_session};
