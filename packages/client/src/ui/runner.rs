//! Session event loop.
//!
//! One task owns the [`ChatSession`] and is the only place its state changes.
//! It multiplexes user commands, transport events and the typing-debounce
//! deadline, and publishes a [`ChatView`] after every step.

use thiserror::Error;
use tokio::{
    sync::{mpsc, watch},
    task::JoinHandle,
};

use crate::{
    config::ClientConfig,
    domain::Credentials,
    infrastructure::transport::{Connector, TransportEventReceiver},
    usecase::{ChatSession, ChatView, sleep_until_deadline},
};

/// Inputs from the front-end
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    /// Credentials changed (or were supplied for the first time)
    SetCredentials(Credentials),
    /// The draft text changed
    DraftChanged(String),
    /// Send the current draft
    SendMessage,
    /// Tear down and stop the loop
    Shutdown,
}

/// The session task is no longer running
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("chat session has stopped")]
pub struct SessionStopped;

/// Handle to a spawned session task
pub struct SessionHandle {
    commands: mpsc::UnboundedSender<SessionCommand>,
    view: watch::Receiver<ChatView>,
    task: JoinHandle<()>,
}

impl SessionHandle {
    fn command(&self, command: SessionCommand) -> Result<(), SessionStopped> {
        self.commands.send(command).map_err(|_| SessionStopped)
    }

    /// Replace the session credentials
    pub fn set_credentials(&self, credentials: Credentials) -> Result<(), SessionStopped> {
        self.command(SessionCommand::SetCredentials(credentials))
    }

    /// Report a draft change (one keystroke)
    pub fn draft_changed(&self, text: impl Into<String>) -> Result<(), SessionStopped> {
        self.command(SessionCommand::DraftChanged(text.into()))
    }

    /// Send the current draft
    pub fn send_message(&self) -> Result<(), SessionStopped> {
        self.command(SessionCommand::SendMessage)
    }

    /// Subscribe to view snapshots
    pub fn subscribe(&self) -> watch::Receiver<ChatView> {
        self.view.clone()
    }

    /// Tear the session down and wait for the task to finish
    pub async fn shutdown(self) {
        let _ = self.commands.send(SessionCommand::Shutdown);
        if let Err(e) = self.task.await {
            tracing::warn!("Chat session task failed: {}", e);
        }
    }
}

/// Spawn a session task using `connector` for its connections
pub fn spawn_session<C>(connector: C, config: &ClientConfig) -> SessionHandle
where
    C: Connector + 'static,
{
    let (event_tx, event_rx) = mpsc::unbounded_channel();
    let (command_tx, command_rx) = mpsc::unbounded_channel();
    let session = ChatSession::new(connector, config, event_tx);
    let (view_tx, view_rx) = watch::channel(session.view());

    let task = tokio::spawn(run_session(session, command_rx, event_rx, view_tx));

    SessionHandle {
        commands: command_tx,
        view: view_rx,
        task,
    }
}

/// Drive `session` until [`SessionCommand::Shutdown`] or every command sender is gone
pub async fn run_session<C: Connector>(
    mut session: ChatSession<C>,
    mut commands: mpsc::UnboundedReceiver<SessionCommand>,
    mut events: TransportEventReceiver,
    view: watch::Sender<ChatView>,
) {
    loop {
        let deadline = session.typing_deadline();

        tokio::select! {
            command = commands.recv() => match command {
                Some(SessionCommand::SetCredentials(credentials)) => session.set_credentials(credentials),
                Some(SessionCommand::DraftChanged(text)) => session.on_draft_change(text),
                Some(SessionCommand::SendMessage) => session.send_message(),
                Some(SessionCommand::Shutdown) | None => break,
            },
            Some((id, event)) = events.recv() => session.handle_transport_event(id, event),
            _ = sleep_until_deadline(deadline) => session.on_typing_idle(),
        }

        publish(&view, session.view());
    }

    session.teardown();
    publish(&view, session.view());
    tracing::info!("Chat session stopped");
}

fn publish(view: &watch::Sender<ChatView>, next: ChatView) {
    view.send_if_modified(|current| {
        if *current == next {
            false
        } else {
            *current = next;
            true
        }
    });
}
