//! Domain layer error definitions.

use thiserror::Error;

/// Errors related to Value Objects validation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueObjectError {
    /// PeerId is not an integer
    #[error("PeerId must be an integer (got: {0:?})")]
    PeerIdInvalid(String),

    /// RoomId is not an integer
    #[error("RoomId must be an integer (got: {0:?})")]
    RoomIdInvalid(String),
}
