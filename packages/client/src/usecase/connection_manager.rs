//! UseCase: 接続ライフサイクル管理
//!
//! 資格情報 1 組につき高々 1 本の接続を保持する。
//!
//! ```text
//! Connecting --(Opened)--> Open --(close requested | remote close | error)--> Closed
//! ```
//!
//! Closed は終端状態で、自動再接続はしない。再接続には新しい接続を作る。
//! 接続は [`ActiveConnection`] が所有し、破棄時に必ず close される
//! (Open に到達していなくても)。

use crate::{
    config::ServerEndpoint,
    domain::Credentials,
    infrastructure::{
        dto::websocket::OutboundFrame,
        transport::{
            CloseReason, ConnectionId, Connector, Link, TransportEvent, TransportEventSender,
        },
    },
};

use super::error::SendError;

/// State of one connection instance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// Handshake in progress
    Connecting,
    /// Accepts writes
    Open,
    /// Terminal
    Closed,
}

/// Lifecycle hooks surfaced to the session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionHook {
    /// The current connection just opened
    Open,
    /// The current connection received a text frame
    Frame(String),
    /// The current connection closed
    Close(CloseReason),
}

/// 現在の接続
struct ActiveConnection {
    id: ConnectionId,
    state: ConnectionState,
    link: Box<dyn Link>,
}

impl Drop for ActiveConnection {
    fn drop(&mut self) {
        if self.state != ConnectionState::Closed {
            self.link.close();
        }
    }
}

/// 接続マネージャー
pub struct ConnectionManager<C: Connector> {
    connector: C,
    endpoint: ServerEndpoint,
    events: TransportEventSender,
    last_id: ConnectionId,
    current: Option<ActiveConnection>,
}

impl<C: Connector> ConnectionManager<C> {
    /// 新しい ConnectionManager を作成
    ///
    /// # Arguments
    ///
    /// * `connector` - 接続を開くトランスポート
    /// * `endpoint` - 接続先
    /// * `events` - 接続イベントの送信先（セッションのイベントループ）
    pub fn new(connector: C, endpoint: ServerEndpoint, events: TransportEventSender) -> Self {
        Self {
            connector,
            endpoint,
            events,
            last_id: 0,
            current: None,
        }
    }

    /// 資格情報に対応する接続を開く
    ///
    /// 既存の接続は先に閉じる。トークンが空なら接続しない。
    ///
    /// # Returns
    ///
    /// * `Some(ConnectionId)` - 新しい接続の ID（Connecting 状態）
    /// * `None` - トークンが空で接続しなかった
    pub fn connect(&mut self, credentials: &Credentials) -> Option<ConnectionId> {
        self.teardown();

        if !credentials.has_token() {
            tracing::debug!("No token set; staying disconnected");
            return None;
        }

        self.last_id += 1;
        let id = self.last_id;
        let url = self.endpoint.chat_url(&credentials.token);
        tracing::info!(
            "Opening connection {} to {} (peer {}, room {})",
            id,
            self.endpoint.base_url(),
            credentials.peer_id,
            credentials.room_id
        );

        let link = self.connector.open(id, &url, self.events.clone());
        self.current = Some(ActiveConnection {
            id,
            state: ConnectionState::Connecting,
            link,
        });
        Some(id)
    }

    /// 現在の接続を閉じて破棄する
    pub fn teardown(&mut self) {
        if let Some(connection) = self.current.take() {
            tracing::info!("Closing connection {}", connection.id);
        }
    }

    /// フレームを送信する
    ///
    /// 接続が Open でなければ `SendError::NotOpen`。再送はしない。
    pub fn send(&self, frame: &OutboundFrame) -> Result<(), SendError> {
        let connection = self
            .current
            .as_ref()
            .filter(|connection| connection.state == ConnectionState::Open)
            .ok_or(SendError::NotOpen)?;

        let text = frame.to_json()?;
        connection.link.send_text(text)?;
        Ok(())
    }

    /// トランスポートイベントを状態機械に反映する
    ///
    /// 古い接続のイベントや、状態に合わないイベントは `None`。
    pub fn handle_event(
        &mut self,
        id: ConnectionId,
        event: TransportEvent,
    ) -> Option<ConnectionHook> {
        let Some(connection) = self
            .current
            .as_mut()
            .filter(|connection| connection.id == id)
        else {
            tracing::debug!("Ignoring event from stale connection {}: {:?}", id, event);
            return None;
        };

        match (connection.state, event) {
            (ConnectionState::Connecting, TransportEvent::Opened) => {
                connection.state = ConnectionState::Open;
                Some(ConnectionHook::Open)
            }
            (ConnectionState::Open, TransportEvent::Frame(text)) => Some(ConnectionHook::Frame(text)),
            (ConnectionState::Closed, TransportEvent::Closed(_)) => None,
            (_, TransportEvent::Closed(reason)) => {
                connection.state = ConnectionState::Closed;
                Some(ConnectionHook::Close(reason))
            }
            (state, event) => {
                tracing::warn!(
                    "Unexpected event on connection {} in state {:?}: {:?}",
                    id,
                    state,
                    event
                );
                None
            }
        }
    }

    /// 現在の接続状態（接続がなければ `None`）
    pub fn state(&self) -> Option<ConnectionState> {
        self.current.as_ref().map(|connection| connection.state)
    }

    /// 現在の接続が Open か
    pub fn is_open(&self) -> bool {
        self.state() == Some(ConnectionState::Open)
    }

    /// 現在の接続 ID
    pub fn connection_id(&self) -> Option<ConnectionId> {
        self.current.as_ref().map(|connection| connection.id)
    }
}
