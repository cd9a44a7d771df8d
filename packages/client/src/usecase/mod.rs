//! UseCase 層
//!
//! セッションのロジックを実装するレイヤー。
//! UI 層（イベントループ）から呼び出され、Domain 層と Infrastructure 層を操作します。

pub mod chat_session;
pub mod classify;
pub mod connection_manager;
pub mod error;
pub mod typing_debounce;

#[cfg(test)]
pub(crate) mod test_support;

pub use chat_session::{ChatSession, ChatView};
pub use classify::{InboundFrame, classify, reduce};
pub use connection_manager::{ConnectionHook, ConnectionManager, ConnectionState};
pub use error::SendError;
pub use typing_debounce::{TypingDebounce, sleep_until_deadline};
