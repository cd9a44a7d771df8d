//! Parsing of terminal input lines.

use thiserror::Error;

use crate::domain::{AuthToken, Credentials, PeerId, RoomId, ValueObjectError};

/// Help text for the interactive client
pub const HELP: &str = "\
commands:
  /connect <user_id> <token> <room_id>  connect (or reconnect) with new credentials
  /disconnect                           close the connection
  /help                                 show this help
  /quit                                 leave
anything else is sent as a chat message";

/// One parsed input line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputCommand {
    /// Text to type and send
    Message(String),
    /// New credentials
    Connect(Credentials),
    /// Drop the token, closing the connection
    Disconnect,
    /// Print help
    Help,
    /// Leave the client
    Quit,
    /// Nothing to do
    Empty,
}

/// Errors parsing an input line
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InputError {
    #[error("usage: /connect <user_id> <token> <room_id>")]
    ConnectUsage,

    #[error(transparent)]
    InvalidValue(#[from] ValueObjectError),

    #[error("unknown command: {0} (try /help)")]
    UnknownCommand(String),
}

/// Parse one line typed by the user
pub fn parse_input_line(line: &str) -> Result<InputCommand, InputError> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Ok(InputCommand::Empty);
    }

    let Some(command) = trimmed.strip_prefix('/') else {
        return Ok(InputCommand::Message(line.to_string()));
    };

    let mut parts = command.split_whitespace();
    match parts.next() {
        Some("connect") => {
            let (Some(peer), Some(token), Some(room), None) =
                (parts.next(), parts.next(), parts.next(), parts.next())
            else {
                return Err(InputError::ConnectUsage);
            };
            Ok(InputCommand::Connect(Credentials::new(
                peer.parse::<PeerId>()?,
                AuthToken::new(token),
                room.parse::<RoomId>()?,
            )))
        }
        Some("disconnect") => Ok(InputCommand::Disconnect),
        Some("help") => Ok(InputCommand::Help),
        Some("quit") | Some("exit") => Ok(InputCommand::Quit),
        Some(other) => Err(InputError::UnknownCommand(other.to_string())),
        None => Err(InputError::UnknownCommand(String::new())),
    }
}
