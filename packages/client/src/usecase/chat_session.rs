//! UseCase: チャットセッション
//!
//! 1 ルームビューにつき 1 つ。接続・メッセージログ・入力中フラグ・下書き・
//! 入力中通知のデバウンスタイマーをすべて所有する。
//!
//! - ログと入力中フラグは受信フレームの分類（[`reduce`]）でのみ変化する。
//!   送信操作はフレームを作るだけで、ローカルにエコーしない。
//! - 資格情報の変更・破棄ではデバウンスタイマーを同期的に解除してから
//!   接続を閉じるので、古い接続に「入力停止」通知が送られることはない。

use std::mem;

use tokio::time::Instant;

use crate::{
    config::ClientConfig,
    domain::{ChatState, Credentials, RoomId},
    infrastructure::{
        dto::websocket::{ChatMessageFrame, OutboundFrame, TypingNoticeFrame},
        transport::{CloseReason, ConnectionId, Connector, TransportEvent, TransportEventSender},
    },
};

use super::{
    classify::{classify, reduce},
    connection_manager::{ConnectionHook, ConnectionManager, ConnectionState},
    typing_debounce::TypingDebounce,
};

/// Read-only snapshot of a session for renderers
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChatView {
    /// Room of the current credentials
    pub room_id: Option<RoomId>,
    /// Rendered log lines
    pub messages: Vec<String>,
    /// Whether the peer is typing
    pub typing: bool,
    /// State of the current connection, `None` when there is none
    pub connection: Option<ConnectionState>,
    /// Current draft text
    pub draft: String,
    /// Bumped every time the log is cleared
    pub log_generation: u64,
}

/// チャットセッション
pub struct ChatSession<C: Connector> {
    connection: ConnectionManager<C>,
    credentials: Option<Credentials>,
    chat: ChatState,
    draft: String,
    typing_debounce: TypingDebounce,
    clear_log_on_reconnect: bool,
    log_generation: u64,
}

impl<C: Connector> ChatSession<C> {
    /// 新しい ChatSession を作成
    ///
    /// 資格情報が渡されるまで接続しない。
    pub fn new(connector: C, config: &ClientConfig, events: TransportEventSender) -> Self {
        Self {
            connection: ConnectionManager::new(connector, config.endpoint.clone(), events),
            credentials: None,
            chat: ChatState::default(),
            draft: String::new(),
            typing_debounce: TypingDebounce::new(config.typing_idle),
            clear_log_on_reconnect: config.clear_log_on_reconnect,
            log_generation: 0,
        }
    }

    /// 資格情報を設定する
    ///
    /// 変更があれば現在の接続を閉じ、トークンがあれば新しい接続を開く。
    /// 同じ資格情報なら何もしない。
    pub fn set_credentials(&mut self, credentials: Credentials) {
        if self.credentials.as_ref() == Some(&credentials) {
            return;
        }

        self.teardown();
        if self.clear_log_on_reconnect {
            self.chat.log = Default::default();
            self.log_generation += 1;
        }
        self.chat.typing = false;

        self.connection.connect(&credentials);
        self.credentials = Some(credentials);
    }

    /// 接続を閉じ、保留中の入力停止通知を取り消す
    pub fn teardown(&mut self) {
        if self.typing_debounce.cancel() {
            tracing::debug!("Cancelled pending typing notice");
        }
        self.connection.teardown();
    }

    /// トランスポートイベントを処理する（onOpen / onFrame / onClose）
    pub fn handle_transport_event(&mut self, id: ConnectionId, event: TransportEvent) {
        match self.connection.handle_event(id, event) {
            Some(ConnectionHook::Open) => self.on_open(id),
            Some(ConnectionHook::Frame(text)) => self.on_frame(&text),
            Some(ConnectionHook::Close(reason)) => self.on_close(id, &reason),
            None => {}
        }
    }

    fn on_open(&mut self, id: ConnectionId) {
        tracing::info!("WebSocket opened (connection {})", id);
    }

    fn on_frame(&mut self, text: &str) {
        let Some(peer_id) = self.credentials.as_ref().map(|c| c.peer_id) else {
            return;
        };

        match classify(text) {
            Ok(Some(frame)) => {
                self.chat = reduce(mem::take(&mut self.chat), &frame, peer_id);
            }
            Ok(None) => {
                tracing::debug!("Discarding unrecognized frame: {}", text);
            }
            Err(e) => {
                tracing::debug!("Discarding malformed frame: {}", e);
            }
        }
    }

    fn on_close(&mut self, id: ConnectionId, reason: &CloseReason) {
        self.typing_debounce.cancel();
        match reason {
            CloseReason::Error(_) => {
                tracing::warn!("WebSocket closed (connection {}): {}", id, reason)
            }
            _ => tracing::info!("WebSocket closed (connection {}): {}", id, reason),
        }
    }

    /// 下書きを送信する
    ///
    /// 接続が Open でない、または下書きが空白のみなら何もしない。
    /// 送信に成功したときだけ下書きを消す。ログには追加しない。
    pub fn send_message(&mut self) {
        if !self.connection.is_open() {
            tracing::error!("Socket is not open");
            return;
        }
        let Some(credentials) = &self.credentials else {
            return;
        };

        let text = self.draft.trim();
        if text.is_empty() {
            return;
        }

        let frame = OutboundFrame::ChatMessage(ChatMessageFrame {
            message: text.to_string(),
            recipient_id: credentials.peer_id.value(),
            room_id: credentials.room_id.value(),
        });

        match self.connection.send(&frame) {
            Ok(()) => self.draft.clear(),
            Err(e) => tracing::error!("Failed to send message: {}", e),
        }
    }

    /// 下書きを更新し、接続中なら入力中通知を送る
    ///
    /// キー入力のたびに入力停止タイマーを張り直す。最後の入力から
    /// `typing_idle` 経過後に一度だけ入力停止通知が送られる。
    pub fn on_draft_change(&mut self, text: impl Into<String>) {
        self.draft = text.into();

        if !self.connection.is_open() {
            return;
        }

        self.typing_debounce.cancel();
        self.send_typing_notice(true);
        self.typing_debounce.arm();
    }

    /// 入力停止タイマーの期限が来ていれば入力停止通知を送る
    pub fn on_typing_idle(&mut self) {
        if self.typing_debounce.fire(Instant::now()) {
            self.send_typing_notice(false);
        }
    }

    fn send_typing_notice(&self, typing: bool) {
        let Some(credentials) = &self.credentials else {
            return;
        };

        let frame = OutboundFrame::TypingNotice(TypingNoticeFrame {
            typing,
            user_id: credentials.peer_id.value(),
            recipient_id: credentials.peer_id.value(),
        });

        if let Err(e) = self.connection.send(&frame) {
            tracing::warn!("Failed to send typing notice (typing: {}): {}", typing, e);
        }
    }

    /// 入力停止タイマーの期限
    pub fn typing_deadline(&self) -> Option<Instant> {
        self.typing_debounce.deadline()
    }

    /// 現在の資格情報
    pub fn credentials(&self) -> Option<&Credentials> {
        self.credentials.as_ref()
    }

    /// メッセージログ
    pub fn messages(&self) -> &[String] {
        self.chat.log.lines()
    }

    /// 相手が入力中か
    pub fn is_typing(&self) -> bool {
        self.chat.typing
    }

    /// 下書き
    pub fn draft(&self) -> &str {
        &self.draft
    }

    /// 現在の接続状態
    pub fn connection_state(&self) -> Option<ConnectionState> {
        self.connection.state()
    }

    /// 描画用のスナップショット
    pub fn view(&self) -> ChatView {
        ChatView {
            room_id: self.credentials.as_ref().map(|c| c.room_id),
            messages: self.messages().to_vec(),
            typing: self.chat.typing,
            connection: self.connection.state(),
            draft: self.draft.clone(),
            log_generation: self.log_generation,
        }
    }
}

impl<C: Connector> Drop for ChatSession<C> {
    fn drop(&mut self) {
        self.teardown();
    }
}
