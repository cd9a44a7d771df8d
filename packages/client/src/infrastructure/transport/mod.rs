//! Transport seam between the connection manager and the network.
//!
//! A [`Connector`] opens one connection per call and reports its lifecycle
//! as [`TransportEvent`]s tagged with the [`ConnectionId`] it was given. The
//! returned [`Link`] is the write half. Dropping a link closes the
//! connection, whether or not it ever opened.

pub mod websocket;

use std::fmt;

use thiserror::Error;
use tokio::sync::mpsc;

pub use websocket::WebSocketConnector;

/// Identifies one connection instance. Never reused within a session.
pub type ConnectionId = u64;

/// Channel on which connections report their lifecycle
pub type TransportEventSender = mpsc::UnboundedSender<(ConnectionId, TransportEvent)>;

/// Receiving half of [`TransportEventSender`]
pub type TransportEventReceiver = mpsc::UnboundedReceiver<(ConnectionId, TransportEvent)>;

/// Lifecycle events reported by a connection, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    /// Handshake finished; the connection accepts writes.
    Opened,
    /// One inbound text frame.
    Frame(String),
    /// The connection is gone. Always the last event.
    Closed(CloseReason),
}

/// Why a connection closed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CloseReason {
    /// The client closed it (credential change, teardown).
    ClientRequested,
    /// The server sent a close frame.
    Remote { code: Option<u16>, reason: String },
    /// Connect failure or I/O error.
    Error(String),
}

impl fmt::Display for CloseReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ClientRequested => write!(f, "closed by client"),
            Self::Remote {
                code: Some(code),
                reason,
            } => write!(f, "closed by server ({code}): {reason}"),
            Self::Remote { code: None, reason } => write!(f, "closed by server: {reason}"),
            Self::Error(e) => write!(f, "transport error: {e}"),
        }
    }
}

/// Errors writing to a link
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The connection task has already finished
    #[error("connection task is no longer running")]
    ChannelClosed,
}

/// Opens connections.
#[cfg_attr(test, mockall::automock)]
pub trait Connector: Send + Sync {
    /// Start opening a connection to `url`.
    ///
    /// Returns immediately; progress is reported on `events` tagged with `id`.
    fn open(&self, id: ConnectionId, url: &str, events: TransportEventSender) -> Box<dyn Link>;
}

/// Write half of one connection.
#[cfg_attr(test, mockall::automock)]
pub trait Link: Send {
    /// Queue one text frame for writing.
    fn send_text(&self, text: String) -> Result<(), TransportError>;

    /// Request a graceful close. Idempotent.
    fn close(&mut self);
}
