//! WebSocket frame DTOs for the chat protocol.
//!
//! Frames are JSON text. Inbound frames are loosely shaped (the server adds
//! fields the client ignores); outbound frames have two fixed shapes.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Tag value marking an inbound typing signal
pub const TYPING_TAG: &str = "typing";

/// Errors raised while decoding an inbound frame
#[derive(Debug, Error)]
pub enum FrameError {
    /// Payload is not JSON
    #[error("frame is not valid JSON: {0}")]
    Malformed(#[from] serde_json::Error),

    /// Payload is JSON but not an object
    #[error("frame is not a JSON object")]
    NotAnObject,
}

/// Inbound frame as received from the server.
///
/// Only the fields used for classification are kept; both are optional and
/// untyped because the server does not guarantee their shape.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct InboundFrameDto {
    #[serde(default)]
    pub r#type: Option<Value>,
    #[serde(default)]
    pub message: Option<Value>,
}

impl InboundFrameDto {
    /// Decode a text frame. Anything other than a JSON object is rejected.
    pub fn parse(text: &str) -> Result<Self, FrameError> {
        let value: Value = serde_json::from_str(text)?;
        if !value.is_object() {
            return Err(FrameError::NotAnObject);
        }
        Ok(Self::deserialize(value)?)
    }

    /// Whether the `type` field carries the typing tag
    pub fn is_typing_signal(&self) -> bool {
        self.r#type.as_ref().and_then(Value::as_str) == Some(TYPING_TAG)
    }

    /// Text of the `message` field, if the field is truthy.
    ///
    /// `null`, `false`, `0` and `""` count as absent. Any other value is
    /// rendered as text: numbers and booleans as written, arrays joined with
    /// `,`, objects as `[object Object]`.
    pub fn message_text(&self) -> Option<String> {
        self.message
            .as_ref()
            .filter(|value| is_truthy(value))
            .map(value_text)
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn value_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(flag) => flag.to_string(),
        Value::Number(number) => number_text(number),
        Value::String(text) => text.clone(),
        Value::Array(items) => items
            .iter()
            .map(value_text)
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}

fn number_text(number: &serde_json::Number) -> String {
    if number.is_i64() || number.is_u64() {
        return number.to_string();
    }
    match number.as_f64() {
        // 1.0 is written as 1
        Some(n) if n.fract() == 0.0 && n.abs() < 1e21 => format!("{n:.0}"),
        Some(n) => n.to_string(),
        None => number.to_string(),
    }
}

/// Chat message sent to the peer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessageFrame {
    pub message: String,
    pub recipient_id: i64,
    pub room_id: i64,
}

/// Typing notice sent to the peer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypingNoticeFrame {
    pub typing: bool,
    #[serde(rename = "userID")]
    pub user_id: i64,
    pub recipient_id: i64,
}

/// Any frame the client writes
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum OutboundFrame {
    ChatMessage(ChatMessageFrame),
    TypingNotice(TypingNoticeFrame),
}

impl OutboundFrame {
    /// Encode as a JSON text frame
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_typing_signal() {
        // テスト項目: {"type":"typing"} は入力中シグナルとして解釈される
        // when (操作):
        let frame = InboundFrameDto::parse(r#"{"type":"typing"}"#).unwrap();

        // then (期待する結果):
        assert!(frame.is_typing_signal());
        assert_eq!(frame.message_text(), None);
    }

    #[test]
    fn test_parse_message_with_extra_fields() {
        // テスト項目: 未知のフィールドを含むメッセージも解釈できる
        // when (操作):
        let frame =
            InboundFrameDto::parse(r#"{"message":"hi","sender":7,"room_id":2}"#).unwrap();

        // then (期待する結果):
        assert!(!frame.is_typing_signal());
        assert_eq!(frame.message_text().as_deref(), Some("hi"));
    }

    #[test]
    fn test_parse_non_string_message_is_rendered_as_text() {
        // テスト項目: 文字列以外の message も真値ならテキストとして扱われる
        // given (前提条件):
        let cases = [
            (r#"{"type":1,"message":42}"#, "42"),
            (r#"{"message":true}"#, "true"),
            (r#"{"message":-1.5}"#, "-1.5"),
            (r#"{"message":2.0}"#, "2"),
            (r#"{"message":["a",1,null]}"#, "a,1,"),
            (r#"{"message":{"text":"hi"}}"#, "[object Object]"),
        ];

        for (text, expected) in cases {
            // when (操作):
            let frame = InboundFrameDto::parse(text).unwrap();

            // then (期待する結果):
            assert!(!frame.is_typing_signal());
            assert_eq!(frame.message_text().as_deref(), Some(expected), "{text}");
        }
    }

    #[test]
    fn test_parse_falsy_message_is_absent() {
        // テスト項目: null / false / 0 / 空文字の message は無視される
        for text in [
            r#"{"message":null}"#,
            r#"{"message":false}"#,
            r#"{"message":0}"#,
            r#"{"message":0.0}"#,
            r#"{"message":""}"#,
            "{}",
        ] {
            // when (操作):
            let frame = InboundFrameDto::parse(text).unwrap();

            // then (期待する結果):
            assert_eq!(frame.message_text(), None, "{text}");
        }
    }

    #[test]
    fn test_parse_rejects_invalid_json() {
        // テスト項目: JSON でないフレームはエラーになる
        // when (操作):
        let result = InboundFrameDto::parse("hello");

        // then (期待する結果):
        assert!(matches!(result, Err(FrameError::Malformed(_))));
    }

    #[test]
    fn test_parse_rejects_non_object() {
        // テスト項目: オブジェクトでない JSON はエラーになる
        // when (操作):
        let result = InboundFrameDto::parse(r#"["typing","hi"]"#);

        // then (期待する結果):
        assert!(matches!(result, Err(FrameError::NotAnObject)));
    }

    #[test]
    fn test_outbound_chat_message_shape() {
        // テスト項目: チャット送信フレームは message / recipient_id / room_id を持つ
        // given (前提条件):
        let frame = OutboundFrame::ChatMessage(ChatMessageFrame {
            message: "hello".to_string(),
            recipient_id: 5,
            room_id: 2,
        });

        // when (操作):
        let json = frame.to_json().unwrap();

        // then (期待する結果):
        assert_eq!(json, r#"{"message":"hello","recipient_id":5,"room_id":2}"#);
    }

    #[test]
    fn test_outbound_typing_notice_shape() {
        // テスト項目: 入力中通知フレームは typing / userID / recipient_id を持つ
        // given (前提条件):
        let frame = OutboundFrame::TypingNotice(TypingNoticeFrame {
            typing: false,
            user_id: 5,
            recipient_id: 5,
        });

        // when (操作):
        let json = frame.to_json().unwrap();

        // then (期待する結果):
        assert_eq!(json, r#"{"typing":false,"userID":5,"recipient_id":5}"#);
    }
}
