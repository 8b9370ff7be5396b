//! TCP connection to a session server.

use anyhow::{Context, Result, bail};
use tictactoe::{
    DisplayName, GameEvent, SessionView,
    messages::{ClientMessage, ServerMessage, SessionCommand},
    net::protocol_version::ProtocolVersion,
    utils::{read_prefixed_async, write_prefixed_async},
};
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    net::{
        TcpStream,
        tcp::{OwnedReadHalf, OwnedWriteHalf},
    },
};

use crate::{
    commands::{ClientCommand, HELP_TEXT, parse_command},
    display::{describe_event, render},
};

/// Interactive session client
pub struct SessionClient {
    server: String,
    name: DisplayName,
}

impl SessionClient {
    /// Create a new session client
    pub fn new(server: String, name: DisplayName) -> Self {
        Self { server, name }
    }

    /// Connect, join a session and play until the user quits or the server
    /// goes away
    pub async fn connect_and_play(self) -> Result<()> {
        println!("Connecting to {} as {}...", self.server, self.name);

        let stream = TcpStream::connect(&self.server)
            .await
            .with_context(|| format!("Failed to connect to {}", self.server))?;
        stream.set_nodelay(true)?;
        let (mut read, mut write) = stream.into_split();

        self.send(&mut write, SessionCommand::Connect).await?;
        let view = join(&mut read).await?;

        println!(
            "Joined session {} as {}.\n",
            view.session_id(),
            view.local_role()
        );
        println!("{}\n", render(&view));

        // Spawn task to handle incoming events
        let read_handle = tokio::spawn(follow_events(read, view));

        // Handle user input
        let mut stdin = BufReader::new(tokio::io::stdin());
        let mut line = String::new();

        loop {
            line.clear();
            match stdin.read_line(&mut line).await {
                Ok(0) => break, // EOF
                Ok(_) => {
                    let input = line.trim();
                    if input.is_empty() {
                        continue;
                    }

                    let command = match parse_command(input) {
                        Ok(command) => command,
                        Err(e) => {
                            eprintln!("{e}");
                            continue;
                        }
                    };

                    if command == ClientCommand::Help {
                        println!("\n{HELP_TEXT}\n");
                        continue;
                    }

                    if let Some(session_command) = command.to_session_command()
                        && let Err(e) = self.send(&mut write, session_command).await
                    {
                        eprintln!("Error: {e}");
                        break;
                    }

                    if command == ClientCommand::Quit {
                        println!("Disconnecting...");
                        break;
                    }
                }
                Err(e) => {
                    eprintln!("Error reading input: {e}");
                    break;
                }
            }
        }

        // Clean up
        read_handle.abort();

        Ok(())
    }

    async fn send(&self, write: &mut OwnedWriteHalf, command: SessionCommand) -> Result<()> {
        let msg = ClientMessage {
            name: self.name.clone(),
            command,
        };
        write_prefixed_async(write, &msg)
            .await
            .context("Failed to send command")
    }
}

/// Read `Welcome` and `Snapshot` and build the local view from them
async fn join(read: &mut OwnedReadHalf) -> Result<SessionView> {
    let role = match read_prefixed_async::<ServerMessage, _>(read).await? {
        ServerMessage::Welcome { role, protocol, .. } => {
            if !protocol.is_compatible_with(&ProtocolVersion::current()) {
                bail!("Server speaks protocol {protocol}");
            }
            role
        }
        ServerMessage::ClientError(error) => bail!("Server refused connection: {error}"),
        other => bail!("Unexpected server message: {other}"),
    };

    match read_prefixed_async::<ServerMessage, _>(read).await? {
        ServerMessage::Snapshot(snapshot) => Ok(SessionView::from_welcome(role, &snapshot)),
        other => bail!("Unexpected server message: {other}"),
    }
}

/// Apply every event to the view and redraw
async fn follow_events(mut read: OwnedReadHalf, mut view: SessionView) {
    loop {
        match read_prefixed_async::<ServerMessage, _>(&mut read).await {
            Ok(ServerMessage::Event(event)) => {
                view.apply(&event);
                if let Some(line) = describe_event(&view, &event) {
                    println!("{line}");
                }
                // Redraw once per move, after the round outcome if any
                if matches!(
                    event,
                    GameEvent::TurnChanged(Some(_)) | GameEvent::GameWon { .. } | GameEvent::GameTied
                ) {
                    println!("\n{}\n", render(&view));
                }
            }
            Ok(other) => eprintln!("{other}"),
            Err(_) => {
                println!("Server closed connection");
                break;
            }
        }
    }
}
