//! Session actor message types.

use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, oneshot};

use super::errors::SessionError;
use crate::game::{
    GameEvent, GameSnapshot,
    entities::{DisplayName, Role},
};

/// Session identifier, unique within one server process.
pub type SessionId = u64;

/// Identifier of a passive (non-playing) event subscriber.
pub type ObserverId = u64;

/// Messages that can be sent to a SessionActor
#[derive(Debug)]
pub enum SessionMessage {
    /// A participant connected. It is assigned the next free role and its
    /// `events` channel starts receiving every broadcast event.
    Connect {
        name: DisplayName,
        events: mpsc::Sender<GameEvent>,
        response: oneshot::Sender<Result<Joined, SessionError>>,
    },

    /// Place a piece. Fire-and-forget: the outcome is only visible through
    /// the broadcast events.
    SubmitMove { role: Role, row: usize, col: usize },

    /// Start a new round. Accepted from either participant.
    Rematch { role: Role },

    /// A participant's connection ended.
    Disconnect { role: Role },

    /// Get current session state
    GetState {
        response: oneshot::Sender<SessionSnapshot>,
    },

    /// Subscribe a passive observer to the event stream
    Subscribe {
        observer_id: ObserverId,
        sender: mpsc::Sender<GameEvent>,
    },

    /// Unsubscribe a passive observer
    Unsubscribe { observer_id: ObserverId },

    /// Stop the session
    Close,
}

/// A connected participant as shown to the other participants.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Participant {
    pub role: Role,
    pub name: DisplayName,
}

/// Session state response
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct SessionSnapshot {
    /// Session ID
    pub session_id: SessionId,

    /// Session name
    pub name: String,

    /// Board, turn, scores and phase
    pub game: GameSnapshot,

    /// Participants currently attached, in role order
    pub participants: Vec<Participant>,
}

impl SessionSnapshot {
    #[must_use]
    pub fn participant_count(&self) -> usize {
        self.participants.len()
    }

    #[must_use]
    pub fn name_of(&self, role: Role) -> Option<&DisplayName> {
        self.participants
            .iter()
            .find(|p| p.role == role)
            .map(|p| &p.name)
    }
}

/// Reply to a successful [`SessionMessage::Connect`].
///
/// The snapshot is taken before any event caused by this connection is
/// broadcast, so replaying the participant's event channel on top of it
/// yields the authority's state.
#[derive(Clone, Debug)]
pub struct Joined {
    pub role: Role,
    pub snapshot: SessionSnapshot,
}
