//! Session actor implementation with async message handling.

use super::{
    config::SessionConfig,
    errors::SessionError,
    messages::{Joined, ObserverId, Participant, SessionId, SessionMessage, SessionSnapshot},
    roles::RoleAssigner,
};
use crate::game::{
    GameEvent, GameStateMachine,
    constants::MAX_PARTICIPANTS,
    entities::{DisplayName, Role},
};
use log::{debug, info, warn};
use std::collections::{BTreeMap, HashMap};
use tokio::sync::{
    mpsc::{self, error::TrySendError},
    oneshot,
};

/// Session actor handle for sending messages
#[derive(Clone, Debug)]
pub struct SessionHandle {
    sender: mpsc::Sender<SessionMessage>,
    session_id: SessionId,
}

impl SessionHandle {
    /// Create a new session handle
    pub fn new(sender: mpsc::Sender<SessionMessage>, session_id: SessionId) -> Self {
        Self { sender, session_id }
    }

    /// Get session ID
    pub fn session_id(&self) -> SessionId {
        self.session_id
    }

    /// Whether the actor behind this handle has stopped
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }

    /// Send a message to the session
    pub async fn send(&self, message: SessionMessage) -> Result<(), SessionError> {
        self.sender
            .send(message)
            .await
            .map_err(|_| SessionError::Closed)
    }

    /// Attach a participant and return its role plus the state it joins into.
    pub async fn connect(
        &self,
        name: DisplayName,
        events: mpsc::Sender<GameEvent>,
    ) -> Result<Joined, SessionError> {
        let (response, rx) = oneshot::channel();
        self.send(SessionMessage::Connect {
            name,
            events,
            response,
        })
        .await?;
        rx.await.map_err(|_| SessionError::Closed)?
    }

    pub async fn submit_move(&self, role: Role, row: usize, col: usize) -> Result<(), SessionError> {
        self.send(SessionMessage::SubmitMove { role, row, col })
            .await
    }

    pub async fn rematch(&self, role: Role) -> Result<(), SessionError> {
        self.send(SessionMessage::Rematch { role }).await
    }

    pub async fn disconnect(&self, role: Role) -> Result<(), SessionError> {
        self.send(SessionMessage::Disconnect { role }).await
    }

    pub async fn state(&self) -> Result<SessionSnapshot, SessionError> {
        let (response, rx) = oneshot::channel();
        self.send(SessionMessage::GetState { response }).await?;
        rx.await.map_err(|_| SessionError::Closed)
    }

    pub async fn subscribe(
        &self,
        observer_id: ObserverId,
        sender: mpsc::Sender<GameEvent>,
    ) -> Result<(), SessionError> {
        self.send(SessionMessage::Subscribe {
            observer_id,
            sender,
        })
        .await
    }

    pub async fn unsubscribe(&self, observer_id: ObserverId) -> Result<(), SessionError> {
        self.send(SessionMessage::Unsubscribe { observer_id }).await
    }

    pub async fn close(&self) -> Result<(), SessionError> {
        self.send(SessionMessage::Close).await
    }
}

/// A participant attached to the session.
#[derive(Debug)]
struct Attached {
    name: DisplayName,
    events: mpsc::Sender<GameEvent>,
}

/// Session actor owning the authoritative game for one pair of participants
pub struct SessionActor {
    /// Session ID
    id: SessionId,

    /// Session configuration
    config: SessionConfig,

    /// Authoritative game state
    game: GameStateMachine,

    /// Message inbox
    inbox: mpsc::Receiver<SessionMessage>,

    /// Connection-order role assignment
    roles: RoleAssigner,

    /// Attached participants and their event channels
    participants: BTreeMap<Role, Attached>,

    /// Passive subscribers (local observers, logging)
    observers: HashMap<ObserverId, mpsc::Sender<GameEvent>>,

    /// Is session closed
    is_closed: bool,
}

impl SessionActor {
    /// Create a new session actor
    ///
    /// # Returns
    ///
    /// * `(SessionActor, SessionHandle)` - Actor and handle for sending messages
    pub fn new(id: SessionId, config: SessionConfig) -> (Self, SessionHandle) {
        let (sender, inbox) = mpsc::channel(config.inbox_capacity.max(1));

        let actor = Self {
            id,
            config,
            game: GameStateMachine::new(),
            inbox,
            roles: RoleAssigner::new(),
            participants: BTreeMap::new(),
            observers: HashMap::new(),
            is_closed: false,
        };

        let handle = SessionHandle::new(sender, id);

        (actor, handle)
    }

    /// Run the session actor event loop
    ///
    /// Messages are applied strictly one at a time, which is what serializes
    /// the two participants' commands.
    pub async fn run(mut self) {
        info!("Session {} '{}' starting", self.id, self.config.name);

        while let Some(message) = self.inbox.recv().await {
            self.handle_message(message);

            if self.is_closed {
                break;
            }
        }

        info!(
            "Session {} '{}' closed (score {})",
            self.id,
            self.config.name,
            self.game.scores()
        );
    }

    /// Handle a session message
    fn handle_message(&mut self, message: SessionMessage) {
        match message {
            SessionMessage::Connect {
                name,
                events,
                response,
            } => {
                let result = self.handle_connect(name, events);
                let _ = response.send(result);
            }

            SessionMessage::SubmitMove { role, row, col } => {
                self.handle_move(role, row, col);
            }

            SessionMessage::Rematch { role } => {
                self.handle_rematch(role);
            }

            SessionMessage::Disconnect { role } => {
                if self.participants.contains_key(&role) {
                    info!("Session {}: {} disconnected", self.id, role);
                    self.detach(role);
                }
            }

            SessionMessage::GetState { response } => {
                let _ = response.send(self.snapshot());
            }

            SessionMessage::Subscribe {
                observer_id,
                sender,
            } => {
                self.observers.insert(observer_id, sender);
                debug!(
                    "Observer {} subscribed to session {} events",
                    observer_id, self.id
                );
            }

            SessionMessage::Unsubscribe { observer_id } => {
                self.observers.remove(&observer_id);
                debug!(
                    "Observer {} unsubscribed from session {} events",
                    observer_id, self.id
                );
            }

            SessionMessage::Close => {
                self.is_closed = true;
            }
        }

        self.flush_events();
    }

    /// Handle connect request
    fn handle_connect(
        &mut self,
        name: DisplayName,
        events: mpsc::Sender<GameEvent>,
    ) -> Result<Joined, SessionError> {
        if self.roles.is_exhausted() {
            return Err(SessionError::SessionFull);
        }

        // A waiting participant whose connection already went away would
        // start a game it can never play.
        let gone: Vec<Role> = self
            .participants
            .iter()
            .filter(|(_, attached)| attached.events.is_closed())
            .map(|(role, _)| *role)
            .collect();
        for role in gone {
            info!("Session {}: {} went away before the game started", self.id, role);
            self.detach(role);
        }
        if self.is_closed {
            return Err(SessionError::Closed);
        }

        let role = self.roles.assign_next()?;
        self.participants.insert(
            role,
            Attached {
                name: name.clone(),
                events,
            },
        );
        info!("{} joined session {} as {}", name, self.id, role);

        // Taken before the start events are queued; the new participant
        // receives those through its channel.
        let snapshot = self.snapshot();

        if self.participants.len() == MAX_PARTICIPANTS && self.game.start() {
            info!("Session {} '{}' started", self.id, self.config.name);
        }

        Ok(Joined { role, snapshot })
    }

    /// Handle move command
    fn handle_move(&mut self, role: Role, row: usize, col: usize) {
        if !self.participants.contains_key(&role) {
            debug!("Session {}: ignoring move from detached {}", self.id, role);
            return;
        }

        match self.game.submit_move(role, row, col) {
            Ok(()) => debug!("Session {}: {} played ({}, {})", self.id, role, row, col),
            Err(rejection) => debug!(
                "Session {}: ignored move ({}, {}) from {}: {}",
                self.id, row, col, role, rejection
            ),
        }
    }

    /// Handle rematch command
    fn handle_rematch(&mut self, role: Role) {
        if !self.participants.contains_key(&role) {
            debug!("Session {}: ignoring rematch from detached {}", self.id, role);
            return;
        }

        if self.game.rematch() {
            info!(
                "Session {}: rematch requested by {} (score {})",
                self.id,
                role,
                self.game.scores()
            );
        }
    }

    /// Remove a participant. The session ends once nobody is left.
    fn detach(&mut self, role: Role) {
        self.participants.remove(&role);

        if self.participants.is_empty() {
            info!("Session {}: all participants left", self.id);
            self.is_closed = true;
        }
    }

    /// Broadcast every queued game event, in order
    fn flush_events(&mut self) {
        for event in self.game.drain_events() {
            self.broadcast(&event);
        }
    }

    /// Deliver an event to every participant and observer
    ///
    /// A participant whose channel is closed or full is detached: it would
    /// otherwise silently diverge from the authoritative state.
    fn broadcast(&mut self, event: &GameEvent) {
        debug!("Session {}: broadcasting {}", self.id, event);

        let mut lagging = Vec::new();
        for (role, participant) in &self.participants {
            match participant.events.try_send(event.clone()) {
                Ok(()) => {}
                Err(TrySendError::Full(_)) => {
                    warn!(
                        "Session {}: {} ({}) fell behind, detaching",
                        self.id, participant.name, role
                    );
                    lagging.push(*role);
                }
                Err(TrySendError::Closed(_)) => {
                    debug!("Session {}: {} channel closed, detaching", self.id, role);
                    lagging.push(*role);
                }
            }
        }
        for role in lagging {
            self.detach(role);
        }

        let id = self.id;
        self.observers.retain(|observer_id, sender| {
            match sender.try_send(event.clone()) {
                Ok(()) => true,
                Err(TrySendError::Full(_)) => {
                    warn!(
                        "Session {}: observer {} channel full, dropping event",
                        id, observer_id
                    );
                    true
                }
                Err(TrySendError::Closed(_)) => {
                    debug!("Session {}: observer {} gone, removing", id, observer_id);
                    false
                }
            }
        });
    }

    fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            session_id: self.id,
            name: self.config.name.clone(),
            game: self.game.snapshot(),
            participants: self
                .participants
                .iter()
                .map(|(role, attached)| Participant {
                    role: *role,
                    name: attached.name.clone(),
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::GamePhase;

    fn spawn_session() -> SessionHandle {
        let (actor, handle) = SessionActor::new(1, SessionConfig::default());
        tokio::spawn(actor.run());
        handle
    }

    #[tokio::test]
    async fn test_first_connection_is_player_a() {
        let handle = spawn_session();
        let (tx, _rx) = mpsc::channel(8);
        let joined = handle.connect("alice".into(), tx).await.unwrap();
        assert_eq!(joined.role, Role::PlayerA);
        assert_eq!(joined.snapshot.game.phase, GamePhase::WaitingForPlayers);
        assert_eq!(joined.snapshot.participant_count(), 1);
    }

    #[tokio::test]
    async fn test_second_connection_starts_game() {
        let handle = spawn_session();
        let (tx_a, mut rx_a) = mpsc::channel(8);
        let (tx_b, mut rx_b) = mpsc::channel(8);
        handle.connect("alice".into(), tx_a).await.unwrap();
        let joined = handle.connect("bob".into(), tx_b).await.unwrap();

        assert_eq!(joined.role, Role::PlayerB);
        assert_eq!(joined.snapshot.game.phase, GamePhase::WaitingForPlayers);
        assert_eq!(
            joined.snapshot.name_of(Role::PlayerA).map(DisplayName::as_str),
            Some("alice")
        );

        for rx in [&mut rx_a, &mut rx_b] {
            assert_eq!(rx.recv().await, Some(GameEvent::GameStarted));
            assert_eq!(
                rx.recv().await,
                Some(GameEvent::TurnChanged(Some(Role::PlayerA)))
            );
        }
    }

    #[tokio::test]
    async fn test_third_connection_is_refused() {
        let handle = spawn_session();
        let mut receivers = Vec::new();
        for name in ["alice", "bob"] {
            let (tx, rx) = mpsc::channel(8);
            receivers.push(rx);
            handle.connect(name.into(), tx).await.unwrap();
        }
        let (tx, _rx) = mpsc::channel(8);
        let result = handle.connect("carol".into(), tx).await;
        assert!(matches!(result, Err(SessionError::SessionFull)));
    }

    #[tokio::test]
    async fn test_session_closes_when_everyone_leaves() {
        let handle = spawn_session();
        let (tx_a, _rx_a) = mpsc::channel(8);
        let (tx_b, _rx_b) = mpsc::channel(8);
        handle.connect("alice".into(), tx_a).await.unwrap();
        handle.connect("bob".into(), tx_b).await.unwrap();

        handle.disconnect(Role::PlayerA).await.unwrap();
        assert_eq!(handle.state().await.unwrap().participant_count(), 1);

        handle.disconnect(Role::PlayerB).await.unwrap();
        assert!(matches!(handle.state().await, Err(SessionError::Closed)));
    }

    #[tokio::test]
    async fn test_observer_receives_events() {
        let handle = spawn_session();
        let (obs_tx, mut obs_rx) = mpsc::channel(8);
        handle.subscribe(7, obs_tx).await.unwrap();

        let (tx_a, _rx_a) = mpsc::channel(8);
        let (tx_b, _rx_b) = mpsc::channel(8);
        handle.connect("alice".into(), tx_a).await.unwrap();
        handle.connect("bob".into(), tx_b).await.unwrap();

        assert_eq!(obs_rx.recv().await, Some(GameEvent::GameStarted));
    }

    #[tokio::test]
    async fn test_gone_waiting_participant_is_not_paired() {
        let handle = spawn_session();
        let (tx_a, rx_a) = mpsc::channel(8);
        handle.connect("alice".into(), tx_a).await.unwrap();
        drop(rx_a);

        let (tx_b, _rx_b) = mpsc::channel(8);
        let result = handle.connect("bob".into(), tx_b).await;
        assert!(matches!(result, Err(SessionError::Closed)));

        // Nobody is left, so the actor stops
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        assert!(handle.is_closed());
    }
}
