use serde::{Deserialize, Serialize};
use std::fmt;

use super::{
    super::{
        game::{GameEvent, entities::{DisplayName, Role}},
        session::{SessionError, SessionId, SessionSnapshot},
    },
    protocol_version::ProtocolVersion,
};

/// Errors due to the client's interaction with the server rather than
/// anything the participant did in the game.
#[derive(Clone, Debug, Deserialize, Eq, thiserror::Error, PartialEq, Serialize)]
pub enum ClientError {
    #[error("first message must be a connect")]
    ExpectedConnect,
    #[error("session is full")]
    SessionFull,
    #[error("server is at capacity")]
    ServerBusy,
    #[error("session unavailable")]
    Unavailable,
}

impl From<SessionError> for ClientError {
    fn from(error: SessionError) -> Self {
        match error {
            SessionError::SessionFull => Self::SessionFull,
            SessionError::CapacityReached(_) => Self::ServerBusy,
            SessionError::Closed | SessionError::InvalidConfig(_) => Self::Unavailable,
        }
    }
}

/// A participant command.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum SessionCommand {
    /// A new participant wants to join a session.
    Connect,
    /// Place a piece at the given cell. Illegal moves are ignored without
    /// any reply.
    Move { row: usize, col: usize },
    /// Start a new round once the current one is over.
    Rematch,
    /// Participant is leaving. Closing the connection has the same effect.
    Disconnect,
}

impl fmt::Display for SessionCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self {
            Self::Connect => write!(f, "connected"),
            Self::Move { row, col } => write!(f, "moved at ({row}, {col})"),
            Self::Rematch => write!(f, "requested a rematch"),
            Self::Disconnect => write!(f, "disconnected"),
        }
    }
}

/// A message from a participant to the server. The name is only used for
/// display; the role is bound to the connection when it connects.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct ClientMessage {
    pub name: DisplayName,
    pub command: SessionCommand,
}

impl fmt::Display for ClientMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.command)
    }
}

/// A message from the server to a participant.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum ServerMessage {
    /// Acknowledges a connect with the assigned role.
    Welcome {
        role: Role,
        session: SessionId,
        protocol: ProtocolVersion,
    },
    /// Session state at the moment the participant joined.
    Snapshot(SessionSnapshot),
    /// A broadcast game event.
    Event(GameEvent),
    /// The connection was refused or misused.
    ClientError(ClientError),
}

impl fmt::Display for ServerMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self {
            Self::Welcome {
                role,
                session,
                protocol,
            } => write!(f, "joined session {session} as {role} ({protocol})"),
            Self::Snapshot(snapshot) => write!(
                f,
                "session {} is {} with {} participant(s)",
                snapshot.session_id,
                snapshot.game.phase,
                snapshot.participant_count()
            ),
            Self::Event(event) => write!(f, "{event}"),
            Self::ClientError(error) => write!(f, "{error}"),
        }
    }
}
