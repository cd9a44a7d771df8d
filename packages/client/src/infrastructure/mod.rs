//! Infrastructure layer: wire DTOs and the network transport.

pub mod dto;
pub mod transport;
