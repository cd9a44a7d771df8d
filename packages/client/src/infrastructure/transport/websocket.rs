//! WebSocket transport over `tokio-tungstenite`.
//!
//! Each connection is driven by one spawned task that owns the socket. The
//! task forwards inbound text frames to the session and writes whatever the
//! [`WebSocketLink`] queues. Closing the link (or dropping it) ends the task,
//! sending a close frame first if the socket is open.

use futures_util::{sink::SinkExt, stream::StreamExt};
use tokio::sync::mpsc;
use tokio_tungstenite::{connect_async, tungstenite::Message};

use super::{
    CloseReason, ConnectionId, Connector, Link, TransportError, TransportEvent,
    TransportEventSender,
};

/// Commands from a link to its connection task
#[derive(Debug)]
enum Outgoing {
    Text(String),
    Close,
}

/// [`Connector`] that opens real WebSocket connections.
#[derive(Debug, Clone, Copy, Default)]
pub struct WebSocketConnector;

impl Connector for WebSocketConnector {
    fn open(&self, id: ConnectionId, url: &str, events: TransportEventSender) -> Box<dyn Link> {
        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(run_connection(id, url.to_string(), events, rx));
        Box::new(WebSocketLink {
            outgoing: tx,
            closed: false,
        })
    }
}

/// Write half handed to the connection manager
pub struct WebSocketLink {
    outgoing: mpsc::UnboundedSender<Outgoing>,
    closed: bool,
}

impl Link for WebSocketLink {
    fn send_text(&self, text: String) -> Result<(), TransportError> {
        self.outgoing
            .send(Outgoing::Text(text))
            .map_err(|_| TransportError::ChannelClosed)
    }

    fn close(&mut self) {
        if !self.closed {
            self.closed = true;
            let _ = self.outgoing.send(Outgoing::Close);
        }
    }
}

impl Drop for WebSocketLink {
    fn drop(&mut self) {
        self.close();
    }
}

/// Drive one connection until either side closes it.
async fn run_connection(
    id: ConnectionId,
    url: String,
    events: TransportEventSender,
    mut rx: mpsc::UnboundedReceiver<Outgoing>,
) {
    let stream = tokio::select! {
        result = connect_async(url.as_str()) => match result {
            Ok((stream, _response)) => stream,
            Err(e) => {
                tracing::warn!("Connection {} failed to open: {}", id, e);
                let _ = events.send((id, TransportEvent::Closed(CloseReason::Error(e.to_string()))));
                return;
            }
        },
        _ = wait_for_close(&mut rx) => {
            tracing::debug!("Connection {} closed before the handshake finished", id);
            let _ = events.send((id, TransportEvent::Closed(CloseReason::ClientRequested)));
            return;
        }
    };

    if events.send((id, TransportEvent::Opened)).is_err() {
        return;
    }

    let (mut sender, mut receiver) = stream.split();

    let reason = loop {
        tokio::select! {
            outgoing = rx.recv() => match outgoing {
                Some(Outgoing::Text(text)) => {
                    if let Err(e) = sender.send(Message::Text(text.into())).await {
                        break CloseReason::Error(e.to_string());
                    }
                }
                Some(Outgoing::Close) | None => {
                    if let Err(e) = sender.send(Message::Close(None)).await {
                        tracing::debug!("Connection {} close frame not sent: {}", id, e);
                    }
                    break CloseReason::ClientRequested;
                }
            },
            incoming = receiver.next() => match incoming {
                Some(Ok(Message::Text(text))) => {
                    if events.send((id, TransportEvent::Frame(text.as_str().to_owned()))).is_err() {
                        break CloseReason::ClientRequested;
                    }
                }
                Some(Ok(Message::Close(frame))) => {
                    break match frame {
                        Some(frame) => CloseReason::Remote {
                            code: Some(u16::from(frame.code)),
                            reason: frame.reason.as_str().to_owned(),
                        },
                        None => CloseReason::Remote { code: None, reason: String::new() },
                    };
                }
                Some(Ok(_)) => {
                    // Binary frames are not part of the protocol; ping/pong is
                    // answered by tungstenite.
                }
                Some(Err(e)) => break CloseReason::Error(e.to_string()),
                None => break CloseReason::Remote { code: None, reason: "stream ended".to_string() },
            }
        }
    };

    tracing::debug!("Connection {} finished: {}", id, reason);
    let _ = events.send((id, TransportEvent::Closed(reason)));
}

/// Resolves once the link asks to close or is dropped. Text queued before
/// the handshake is discarded.
async fn wait_for_close(rx: &mut mpsc::UnboundedReceiver<Outgoing>) {
    while let Some(outgoing) = rx.recv().await {
        if matches!(outgoing, Outgoing::Close) {
            return;
        }
    }
}
