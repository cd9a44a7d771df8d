//! Client configuration.

use std::time::Duration;

use crate::domain::AuthToken;

/// Default chat server host
pub const DEFAULT_HOST: &str = "127.0.0.1:8000";

/// Quiet period after the last keystroke before "stopped typing" is sent
pub const DEFAULT_TYPING_IDLE: Duration = Duration::from_millis(1000);

/// Path of the chat WebSocket endpoint
pub const CHAT_PATH: &str = "/ws/chat/";

/// Chat server location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerEndpoint {
    /// `host[:port]`
    pub host: String,
    /// `wss` when true, `ws` otherwise
    pub secure: bool,
}

impl ServerEndpoint {
    /// Create a new endpoint
    pub fn new(host: impl Into<String>, secure: bool) -> Self {
        Self {
            host: host.into(),
            secure,
        }
    }

    fn scheme(&self) -> &'static str {
        if self.secure { "wss" } else { "ws" }
    }

    /// Endpoint URL without credentials, safe to log
    pub fn base_url(&self) -> String {
        format!("{}://{}{}", self.scheme(), self.host, CHAT_PATH)
    }

    /// Connection URL carrying `token` as its only credential
    pub fn chat_url(&self, token: &AuthToken) -> String {
        format!(
            "{}?token={}",
            self.base_url(),
            urlencoding::encode(token.as_str())
        )
    }
}

impl Default for ServerEndpoint {
    fn default() -> Self {
        Self::new(DEFAULT_HOST, true)
    }
}

/// Session-wide settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Where to connect
    pub endpoint: ServerEndpoint,
    /// Debounce window for typing notices
    pub typing_idle: Duration,
    /// Drop the message log when credentials change (default: true)
    pub clear_log_on_reconnect: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: ServerEndpoint::default(),
            typing_idle: DEFAULT_TYPING_IDLE,
            clear_log_on_reconnect: true,
        }
    }
}
