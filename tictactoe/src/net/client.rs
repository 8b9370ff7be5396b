//! A low-level TCP session client.
//!
//! This client is blocking and so is primarily used as a testing utility
//! rather than an interactive client.

use anyhow::{Error, bail};
use std::{
    net::{SocketAddr, TcpStream},
    thread,
    time::Duration,
};

use super::{
    super::{
        game::{GameEvent, entities::{DisplayName, Role}},
        session::{SessionId, SessionSnapshot},
    },
    messages::{ClientMessage, ServerMessage, SessionCommand},
    protocol_version::ProtocolVersion,
    utils,
};

/// Default timeout for reading from the server.
pub const READ_TIMEOUT: Duration = Duration::from_secs(10);

/// Default timeout for writing to the server.
pub const WRITE_TIMEOUT: Duration = Duration::from_secs(1);

/// A blocking TCP client attached to one session.
pub struct Client {
    /// Display name sent with every command.
    pub name: DisplayName,
    /// Role assigned by the server.
    pub role: Role,
    /// Session the connection was placed in.
    pub session: SessionId,
    /// The underlying TCP stream.
    pub stream: TcpStream,
}

impl Client {
    /// Connect to a server and receive the role and the session snapshot.
    ///
    /// This method attempts to connect with backoff, trying three times
    /// with decreasing timeouts (1s, 500ms, 100ms).
    ///
    /// # Errors
    ///
    /// Returns an error if unable to connect or if the server refuses the
    /// connection.
    pub fn connect(name: DisplayName, addr: &SocketAddr) -> Result<(Self, SessionSnapshot), Error> {
        let mut connect_timeouts = vec![
            Duration::from_secs(1),
            Duration::from_millis(500),
            Duration::from_millis(100),
        ];
        while let Some(connect_timeout) = connect_timeouts.pop() {
            match TcpStream::connect_timeout(addr, connect_timeout) {
                Ok(mut stream) => {
                    stream.set_read_timeout(Some(READ_TIMEOUT))?;
                    stream.set_write_timeout(Some(WRITE_TIMEOUT))?;
                    let msg = ClientMessage {
                        name: name.clone(),
                        command: SessionCommand::Connect,
                    };
                    utils::write_prefixed(&mut stream, &msg)?;
                    let (role, session) = Self::recv_welcome(&mut stream)?;
                    let snapshot = Self::recv_snapshot(&mut stream)?;
                    let client = Self {
                        name,
                        role,
                        session,
                        stream,
                    };
                    return Ok((client, snapshot));
                }
                _ => thread::sleep(connect_timeout),
            }
        }
        bail!("couldn't connect to {addr} as {name}")
    }

    fn recv_welcome(stream: &mut TcpStream) -> Result<(Role, SessionId), Error> {
        match utils::read_prefixed::<ServerMessage, TcpStream>(stream) {
            Ok(ServerMessage::Welcome {
                role,
                session,
                protocol,
            }) => {
                if !protocol.is_compatible_with(&ProtocolVersion::current()) {
                    bail!("unsupported protocol {protocol}");
                }
                Ok((role, session))
            }
            Ok(ServerMessage::ClientError(error)) => bail!(error),
            Ok(response) => bail!("invalid server response: {response}"),
            Err(error) => bail!(error),
        }
    }

    fn recv_snapshot(stream: &mut TcpStream) -> Result<SessionSnapshot, Error> {
        match utils::read_prefixed::<ServerMessage, TcpStream>(stream) {
            Ok(ServerMessage::Snapshot(snapshot)) => Ok(snapshot),
            Ok(ServerMessage::ClientError(error)) => bail!(error),
            Ok(response) => bail!("invalid server response: {response}"),
            Err(error) => bail!(error),
        }
    }

    pub fn recv(&mut self) -> Result<ServerMessage, Error> {
        match utils::read_prefixed::<ServerMessage, TcpStream>(&mut self.stream) {
            Ok(ServerMessage::ClientError(error)) => bail!(error),
            Ok(msg) => Ok(msg),
            Err(error) => bail!(error),
        }
    }

    pub fn recv_event(&mut self) -> Result<GameEvent, Error> {
        match self.recv()? {
            ServerMessage::Event(event) => Ok(event),
            response => bail!("invalid server response: {response}"),
        }
    }

    pub fn submit_move(&mut self, row: usize, col: usize) -> Result<(), Error> {
        self.send(SessionCommand::Move { row, col })
    }

    pub fn rematch(&mut self) -> Result<(), Error> {
        self.send(SessionCommand::Rematch)
    }

    pub fn disconnect(&mut self) -> Result<(), Error> {
        self.send(SessionCommand::Disconnect)
    }

    fn send(&mut self, command: SessionCommand) -> Result<(), Error> {
        let msg = ClientMessage {
            name: self.name.clone(),
            command,
        };
        utils::write_prefixed(&mut self.stream, &msg)?;
        Ok(())
    }
}
