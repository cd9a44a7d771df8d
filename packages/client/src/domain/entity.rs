//! Core domain models for the chat session.

use super::value_object::{AuthToken, PeerId, RoomId};

/// The (peer, token, room) triple a session connects with.
///
/// Any change to it invalidates the current connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Peer the session talks to
    pub peer_id: PeerId,
    /// Connection credential, sent in the connection URL
    pub token: AuthToken,
    /// Room carried on every chat message
    pub room_id: RoomId,
}

impl Credentials {
    /// Create new credentials
    pub fn new(peer_id: PeerId, token: AuthToken, room_id: RoomId) -> Self {
        Self {
            peer_id,
            token,
            room_id,
        }
    }

    /// Whether these credentials allow opening a connection
    pub fn has_token(&self) -> bool {
        !self.token.is_empty()
    }
}

/// Append-only, ordered log of rendered chat lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageLog {
    lines: Vec<String>,
}

impl MessageLog {
    /// Create an empty log
    pub fn new() -> Self {
        Self::default()
    }

    /// Render and append a message as `User_<peer>: <text>`
    pub fn push_message(&mut self, peer_id: PeerId, text: &str) {
        self.lines.push(format!("User_{peer_id}: {text}"));
    }

    /// Rendered lines in receipt order
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Number of lines
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether the log has no lines
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// State folded from inbound frames: the message log and the typing flag.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChatState {
    /// Rendered message history
    pub log: MessageLog,
    /// Whether the remote side is typing
    pub typing: bool,
}
