//! Terminal rendering of view changes.

use crate::usecase::{ChatView, ConnectionState};

/// Indicator shown when the peer starts typing
pub const TYPING_INDICATOR: &str = "User is typing...";

/// Lines to print when the view moves from `previous` to `current`.
///
/// New log lines are stamped with `clock`. A log from a newer generation
/// (it was cleared on reconnect) is printed from the start, even when the
/// intermediate empty snapshot was never observed.
pub fn render_changes(previous: &ChatView, current: &ChatView, clock: &str) -> Vec<String> {
    let mut lines = Vec::new();

    if current.room_id != previous.room_id
        && let Some(room_id) = current.room_id
    {
        lines.push(format!("Chat Room: {room_id}"));
    }

    if current.connection != previous.connection {
        match current.connection {
            Some(ConnectionState::Connecting) => lines.push("[connecting...]".to_string()),
            Some(ConnectionState::Open) => lines.push("[connected]".to_string()),
            Some(ConnectionState::Closed) => lines.push("[connection closed]".to_string()),
            None => lines.push("[disconnected]".to_string()),
        }
    }

    let shown = if current.log_generation == previous.log_generation
        && current.messages.starts_with(&previous.messages)
    {
        previous.messages.len()
    } else {
        0
    };
    for message in &current.messages[shown..] {
        lines.push(format!("[{clock}] {message}"));
    }

    if current.typing && !previous.typing {
        lines.push(TYPING_INDICATOR.to_string());
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RoomId;

    fn view(messages: &[&str], typing: bool) -> ChatView {
        ChatView {
            room_id: Some(RoomId::new(2)),
            messages: messages.iter().map(|m| m.to_string()).collect(),
            typing,
            connection: Some(ConnectionState::Open),
            draft: String::new(),
            log_generation: 0,
        }
    }

    #[test]
    fn test_render_header_and_connection() {
        // テスト項目: ルームが決まるとヘッダーと接続状態が表示される
        // given (前提条件):
        let previous = ChatView::default();
        let current = ChatView {
            connection: Some(ConnectionState::Connecting),
            ..view(&[], false)
        };

        // when (操作):
        let lines = render_changes(&previous, &current, "12:00:00");

        // then (期待する結果):
        assert_eq!(lines, ["Chat Room: 2", "[connecting...]"]);
    }

    #[test]
    fn test_render_only_new_messages() {
        // テスト項目: 新しく追加されたメッセージだけが時刻付きで表示される
        // given (前提条件):
        let previous = view(&["User_5: hi"], false);
        let current = view(&["User_5: hi", "User_5: there"], false);

        // when (操作):
        let lines = render_changes(&previous, &current, "12:00:01");

        // then (期待する結果):
        assert_eq!(lines, ["[12:00:01] User_5: there"]);
    }

    #[test]
    fn test_render_cleared_log_from_start() {
        // テスト項目: ログが消去された後のメッセージは最初から表示される
        // given (前提条件):
        let previous = view(&["User_5: old"], false);
        let current = view(&["User_5: new"], false);

        // when (操作):
        let lines = render_changes(&previous, &current, "12:00:02");

        // then (期待する結果):
        assert_eq!(lines, ["[12:00:02] User_5: new"]);
    }

    #[test]
    fn test_render_new_generation_with_same_lines() {
        // テスト項目: 再接続後のログが以前と同じ内容でも最初から表示される
        // given (前提条件): 消去直後の空のスナップショットは観測されていない
        let previous = view(&["User_5: hi"], false);
        let current = ChatView {
            log_generation: 1,
            ..view(&["User_5: hi"], false)
        };

        // when (操作):
        let lines = render_changes(&previous, &current, "12:00:03");

        // then (期待する結果):
        assert_eq!(lines, ["[12:00:03] User_5: hi"]);
    }

    #[test]
    fn test_render_typing_indicator_once() {
        // テスト項目: 入力中表示はフラグが立ったときに一度だけ出る
        // given (前提条件):
        let idle = view(&[], false);
        let typing = view(&[], true);

        // then (期待する結果):
        assert_eq!(render_changes(&idle, &typing, "-"), [TYPING_INDICATOR]);
        assert!(render_changes(&typing, &typing, "-").is_empty());
    }
}
