//! Terminal chat room client.
//!
//! Connects to the chat server with the given credentials, prints the room's
//! message log as it arrives and sends typing notices while you type.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin kotoba-client -- --host chat.example.com --user-id 5 --token abc --room-id 2
//! ```

use std::{error::Error, time::Duration};

use clap::Parser;
use kotoba_client::{
    ClientConfig, ServerEndpoint, WebSocketConnector,
    config::DEFAULT_HOST,
    domain::{AuthToken, Credentials, PeerId, RoomId},
    spawn_session,
    ui::{
        input::{HELP, InputCommand, parse_input_line},
        render::render_changes,
    },
    usecase::ChatView,
};
use kotoba_shared::{
    logger::setup_logger,
    time::{format_clock, now_millis},
};
use rustyline::{DefaultEditor, error::ReadlineError};
use tokio::sync::mpsc;

#[derive(Debug, Parser)]
#[command(name = "kotoba-client", version, about = "Realtime chat room client")]
struct Args {
    /// Chat server host (and port)
    #[arg(long, default_value = DEFAULT_HOST)]
    host: String,

    /// Use ws:// instead of wss://
    #[arg(long)]
    insecure: bool,

    /// Peer (recipient) user ID
    #[arg(long)]
    user_id: Option<PeerId>,

    /// Auth token; empty means stay disconnected
    #[arg(long, default_value = "")]
    token: String,

    /// Room ID
    #[arg(long)]
    room_id: Option<RoomId>,

    /// Milliseconds of input inactivity before "stopped typing" is sent
    #[arg(long, default_value_t = 1000)]
    typing_idle_ms: u64,

    /// Keep the message log when credentials change
    #[arg(long)]
    keep_log_on_reconnect: bool,

    /// Default log level when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    log_level: String,
}

impl Args {
    fn config(&self) -> ClientConfig {
        ClientConfig {
            endpoint: ServerEndpoint::new(self.host.clone(), !self.insecure),
            typing_idle: Duration::from_millis(self.typing_idle_ms),
            clear_log_on_reconnect: !self.keep_log_on_reconnect,
        }
    }

    fn credentials(&self) -> Option<Credentials> {
        Some(Credentials::new(
            self.user_id?,
            AuthToken::new(self.token.clone()),
            self.room_id?,
        ))
    }
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    setup_logger(env!("CARGO_BIN_NAME"), &args.log_level);

    if rustls::crypto::ring::default_provider()
        .install_default()
        .is_err()
    {
        tracing::debug!("TLS crypto provider already installed");
    }

    if let Err(e) = run(args).await {
        tracing::error!("Client error: {}", e);
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<(), Box<dyn Error>> {
    let session = spawn_session(WebSocketConnector, &args.config());

    let mut view = session.subscribe();
    let renderer = tokio::spawn(async move {
        let mut previous = ChatView::default();
        while view.changed().await.is_ok() {
            let current = view.borrow_and_update().clone();
            for line in render_changes(&previous, &current, &format_clock(now_millis())) {
                println!("{line}");
            }
            previous = current;
        }
    });

    let mut credentials = args.credentials();
    match &credentials {
        Some(credentials) => session.set_credentials(credentials.clone())?,
        None => println!("{HELP}"),
    }

    let (line_tx, mut line_rx) = mpsc::unbounded_channel();
    std::thread::spawn(move || read_lines(line_tx));

    while let Some(line) = line_rx.recv().await {
        match parse_input_line(&line) {
            Ok(InputCommand::Message(text)) => {
                session.draft_changed(text)?;
                session.send_message()?;
            }
            Ok(InputCommand::Connect(next)) => {
                session.set_credentials(next.clone())?;
                credentials = Some(next);
            }
            Ok(InputCommand::Disconnect) => {
                if let Some(current) = credentials.as_mut() {
                    current.token = AuthToken::empty();
                    session.set_credentials(current.clone())?;
                }
            }
            Ok(InputCommand::Help) => println!("{HELP}"),
            Ok(InputCommand::Quit) => break,
            Ok(InputCommand::Empty) => {}
            Err(e) => println!("{e}"),
        }
    }

    session.shutdown().await;
    renderer.abort();
    Ok(())
}

/// Blocking line reader; ends on EOF, Ctrl-C or when the receiver is gone.
fn read_lines(lines: mpsc::UnboundedSender<String>) {
    let mut editor = match DefaultEditor::new() {
        Ok(editor) => editor,
        Err(e) => {
            tracing::error!("Failed to initialize line editor: {}", e);
            return;
        }
    };

    loop {
        match editor.readline("> ") {
            Ok(line) => {
                if !line.trim().is_empty() {
                    let _ = editor.add_history_entry(line.as_str());
                }
                if lines.send(line).is_err() {
                    break;
                }
            }
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
            Err(e) => {
                tracing::warn!("Failed to read input: {}", e);
                break;
            }
        }
    }
}
