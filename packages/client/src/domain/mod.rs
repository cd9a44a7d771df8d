//! Domain layer for the chat client.
//!
//! This module contains the session's data model, independent of
//! wire DTOs and transport concerns.

pub mod entity;
pub mod error;
pub mod value_object;

pub use entity::{ChatState, Credentials, MessageLog};
pub use error::ValueObjectError;
pub use value_object::{AuthToken, PeerId, RoomId};
