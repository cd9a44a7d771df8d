//! Value Objects for domain models.
//!
//! Value Objects are immutable objects that represent values in the domain.
//! They are compared by their value, not by identity.

use std::{fmt, str::FromStr};

use super::error::ValueObjectError;

/// Peer identifier value object.
///
/// The peer a session talks to. It doubles as the `recipient_id` of every
/// outbound frame and as the `User_<id>` prefix of rendered log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PeerId(i64);

impl PeerId {
    /// Create a new PeerId.
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    /// Get the inner i64 value.
    pub fn value(&self) -> i64 {
        self.0
    }
}

impl FromStr for PeerId {
    type Err = ValueObjectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<i64>()
            .map(Self)
            .map_err(|_| ValueObjectError::PeerIdInvalid(s.to_string()))
    }
}

impl fmt::Display for PeerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Room identifier value object.
///
/// Carried per message, never per connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RoomId(i64);

impl RoomId {
    /// Create a new RoomId.
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    /// Get the inner i64 value.
    pub fn value(&self) -> i64 {
        self.0
    }
}

impl FromStr for RoomId {
    type Err = ValueObjectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<i64>()
            .map(Self)
            .map_err(|_| ValueObjectError::RoomIdInvalid(s.to_string()))
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Auth token value object.
///
/// Opaque to the client. An empty token means "no connection".
/// `Debug` never prints the secret.
#[derive(Clone, PartialEq, Eq, Default)]
pub struct AuthToken(String);

impl AuthToken {
    /// Create a new AuthToken.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// An empty token.
    pub fn empty() -> Self {
        Self(String::new())
    }

    /// Whether the token is absent.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            f.write_str("AuthToken(<empty>)")
        } else {
            f.write_str("AuthToken(<redacted>)")
        }
    }
}

impl From<&str> for AuthToken {
    fn from(token: &str) -> Self {
        Self::new(token)
    }
}
