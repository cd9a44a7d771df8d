//! In-process chat server for integration tests.
//!
//! Speaks the client's wire protocol on `/ws/chat/?token=<token>`:
//! - `{"message": ...}` is echoed back to the sender as `{"message": ..., "sender": <token>}`
//! - `{"typing": true, ...}` is answered with `{"type": "typing"}`
//! - the message `"bye"` makes the server close the connection
//!
//! Every text frame received is recorded with the token of its connection.

use std::{net::SocketAddr, sync::Arc, time::Duration};

use axum::{
    Router,
    extract::{
        Query, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
    routing::get,
};
use kotoba_client::ServerEndpoint;
use serde::Deserialize;
use tokio::{net::TcpListener, sync::Mutex, task::JoinHandle};

/// One frame received by the server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Received {
    pub token: String,
    pub frame: String,
}

#[derive(Debug, Deserialize)]
struct ConnectQuery {
    token: String,
}

#[derive(Default)]
struct ServerState {
    received: Mutex<Vec<Received>>,
    connections: Mutex<Vec<String>>,
}

pub struct TestServer {
    addr: SocketAddr,
    state: Arc<ServerState>,
    handle: JoinHandle<()>,
}

impl TestServer {
    pub async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test server");
        let addr = listener.local_addr().expect("Failed to read local address");
        let state = Arc::new(ServerState::default());

        let app = Router::new()
            .route("/ws/chat/", get(websocket_handler))
            .with_state(state.clone());

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Test server failed");
        });

        Self {
            addr,
            state,
            handle,
        }
    }

    pub fn endpoint(&self) -> ServerEndpoint {
        ServerEndpoint::new(self.addr.to_string(), false)
    }

    pub async fn received(&self) -> Vec<Received> {
        self.state.received.lock().await.clone()
    }

    /// Tokens of every connection accepted so far, in order
    pub async fn connections(&self) -> Vec<String> {
        self.state.connections.lock().await.clone()
    }

    /// Poll until `predicate` holds for the received frames, or panic after 5s
    pub async fn wait_for_received<F>(&self, predicate: F) -> Vec<Received>
    where
        F: Fn(&[Received]) -> bool,
    {
        let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
        loop {
            let received = self.received().await;
            if predicate(&received) {
                return received;
            }
            if tokio::time::Instant::now() >= deadline {
                panic!("Timed out waiting for frames; received so far: {received:?}");
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<ServerState>>,
    Query(query): Query<ConnectQuery>,
) -> impl IntoResponse {
    // Recorded before the handshake response, so the client never sees Open first
    state.connections.lock().await.push(query.token.clone());
    ws.on_upgrade(move |socket| handle_socket(socket, state, query.token))
}

async fn handle_socket(mut socket: WebSocket, state: Arc<ServerState>, token: String) {

    while let Some(Ok(message)) = socket.recv().await {
        let Message::Text(text) = message else {
            continue;
        };

        state.received.lock().await.push(Received {
            token: token.clone(),
            frame: text.as_str().to_string(),
        });

        let Ok(value) = serde_json::from_str::<serde_json::Value>(text.as_str()) else {
            continue;
        };

        if let Some(body) = value.get("message").and_then(|m| m.as_str()) {
            if body == "bye" {
                let _ = socket.send(Message::Close(None)).await;
                break;
            }
            let reply = serde_json::json!({ "message": body, "sender": token });
            if socket.send(Message::Text(reply.to_string().into())).await.is_err() {
                break;
            }
        } else if value.get("typing").and_then(|t| t.as_bool()) == Some(true) {
            let reply = serde_json::json!({ "type": "typing" });
            if socket.send(Message::Text(reply.to_string().into())).await.is_err() {
                break;
            }
        }
    }
}
