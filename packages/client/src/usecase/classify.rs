//! Inbound frame classification.
//!
//! Both functions here are pure: [`classify`] turns a text frame into an
//! [`InboundFrame`], and [`reduce`] folds one into a [`ChatState`]. The
//! session never mutates its log or typing flag any other way.

use crate::{
    domain::{ChatState, PeerId},
    infrastructure::dto::websocket::{FrameError, InboundFrameDto},
};

/// A classified inbound frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundFrame {
    /// The peer is typing. Carries no content.
    TypingSignal,
    /// A chat message to append to the log.
    ChatMessage { text: String },
}

/// Classify a text frame, first match wins:
///
/// 1. `type == "typing"` is a [`InboundFrame::TypingSignal`]
/// 2. a truthy `message` (anything but `null`, `false`, `0` or `""`) is a
///    [`InboundFrame::ChatMessage`]
/// 3. anything else is `Ok(None)`
///
/// There is no inbound "stopped typing" frame; the flag is cleared by the
/// next chat message only.
pub fn classify(text: &str) -> Result<Option<InboundFrame>, FrameError> {
    let dto = InboundFrameDto::parse(text)?;

    if dto.is_typing_signal() {
        return Ok(Some(InboundFrame::TypingSignal));
    }

    Ok(dto
        .message_text()
        .map(|text| InboundFrame::ChatMessage { text }))
}

/// Fold one classified frame into the state
pub fn reduce(mut state: ChatState, frame: &InboundFrame, peer_id: PeerId) -> ChatState {
    match frame {
        InboundFrame::TypingSignal => {
            state.typing = true;
        }
        InboundFrame::ChatMessage { text } => {
            state.typing = false;
            state.log.push_message(peer_id, text);
        }
    }
    state
}
