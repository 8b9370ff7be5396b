//! Session manager for pairing connections and managing session actors.

use super::{
    actor::{SessionActor, SessionHandle},
    config::SessionConfig,
    errors::SessionError,
    messages::{Joined, SessionId, SessionSnapshot},
};
use crate::game::{
    GameEvent,
    entities::{DisplayName, Role},
};
use std::{collections::HashMap, sync::Arc};
use tokio::sync::{Mutex, RwLock, mpsc};

/// Session manager for managing multiple session instances
pub struct SessionManager {
    /// Template configuration for spawned sessions
    config: SessionConfig,

    /// Maximum number of concurrently running sessions
    max_sessions: usize,

    /// Active session handles
    sessions: Arc<RwLock<HashMap<SessionId, SessionHandle>>>,

    /// Next session ID
    next_session_id: Arc<RwLock<SessionId>>,

    /// Session still waiting for its second participant
    open: Mutex<Option<SessionHandle>>,
}

impl SessionManager {
    /// Create a new session manager
    ///
    /// # Arguments
    ///
    /// * `config` - Configuration every spawned session starts from
    /// * `max_sessions` - Upper bound on concurrently running sessions
    pub fn new(config: SessionConfig, max_sessions: usize) -> Self {
        Self {
            config,
            max_sessions,
            sessions: Arc::new(RwLock::new(HashMap::new())),
            next_session_id: Arc::new(RwLock::new(1)),
            open: Mutex::new(None),
        }
    }

    /// Create and spawn a new session
    ///
    /// The session removes itself from the manager once its actor stops.
    ///
    /// # Errors
    ///
    /// * `SessionError::InvalidConfig` - Template configuration is invalid
    /// * `SessionError::CapacityReached` - `max_sessions` sessions are running
    pub async fn create_session(&self) -> Result<SessionHandle, SessionError> {
        self.config.validate().map_err(SessionError::InvalidConfig)?;

        let mut sessions = self.sessions.write().await;
        if sessions.len() >= self.max_sessions {
            log::warn!(
                "Refusing new session: limit of {} reached",
                self.max_sessions
            );
            return Err(SessionError::CapacityReached(self.max_sessions));
        }

        let mut next_id = self.next_session_id.write().await;
        let session_id = *next_id;
        *next_id += 1;
        drop(next_id);

        let config = self
            .config
            .named(format!("{} {}", self.config.name, session_id));
        let (actor, handle) = SessionActor::new(session_id, config);
        sessions.insert(session_id, handle.clone());
        drop(sessions);

        let registry = Arc::clone(&self.sessions);
        tokio::spawn(async move {
            actor.run().await;
            registry.write().await.remove(&session_id);
        });

        log::info!("Created and spawned session {}", session_id);

        Ok(handle)
    }

    /// Attach a new connection to a session
    ///
    /// Connections are paired in arrival order: the first one opens a
    /// session as player A, the next one joins it as player B.
    pub async fn join(
        &self,
        name: DisplayName,
        events: mpsc::Sender<GameEvent>,
    ) -> Result<(SessionHandle, Joined), SessionError> {
        let mut open = self.open.lock().await;

        if let Some(handle) = open.take() {
            match handle.connect(name.clone(), events.clone()).await {
                Ok(joined) => {
                    if joined.role == Role::PlayerA {
                        *open = Some(handle.clone());
                    }
                    return Ok((handle, joined));
                }
                // The waiting participant left and the session ended
                Err(SessionError::Closed | SessionError::SessionFull) => {}
                Err(e) => return Err(e),
            }
        }

        let handle = self.create_session().await?;
        let joined = handle.connect(name, events).await?;
        if joined.role == Role::PlayerA {
            *open = Some(handle.clone());
        }

        Ok((handle, joined))
    }

    /// Configuration every spawned session starts from
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Close a session
    pub async fn close_session(&self, session_id: SessionId) -> Result<(), SessionError> {
        let handle = self
            .sessions
            .write()
            .await
            .remove(&session_id)
            .ok_or(SessionError::Closed)?;

        // Already stopping on its own is fine
        let _ = handle.close().await;

        log::info!("Closed session {}", session_id);

        Ok(())
    }

    /// Close every running session
    pub async fn close_all(&self) {
        let handles: Vec<SessionHandle> = {
            let mut sessions = self.sessions.write().await;
            sessions.drain().map(|(_, handle)| handle).collect()
        };
        *self.open.lock().await = None;

        for handle in handles {
            let _ = handle.close().await;
        }
    }

    /// Snapshots of all running sessions, ordered by ID
    pub async fn list_sessions(&self) -> Vec<SessionSnapshot> {
        let handles: Vec<SessionHandle> = self.sessions.read().await.values().cloned().collect();

        let mut snapshots = Vec::with_capacity(handles.len());
        for handle in handles {
            if let Ok(snapshot) = handle.state().await {
                snapshots.push(snapshot);
            }
        }
        snapshots.sort_by_key(|s| s.session_id);

        snapshots
    }

    /// Get active session count
    pub async fn active_session_count(&self) -> usize {
        let sessions = self.sessions.read().await;
        sessions.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn events() -> (mpsc::Sender<GameEvent>, mpsc::Receiver<GameEvent>) {
        mpsc::channel(16)
    }

    #[tokio::test]
    async fn test_connections_are_paired() {
        let manager = SessionManager::new(SessionConfig::default(), 4);
        let (tx_a, _rx_a) = events();
        let (tx_b, _rx_b) = events();
        let (tx_c, _rx_c) = events();

        let (first, joined_a) = manager.join("alice".into(), tx_a).await.unwrap();
        let (second, joined_b) = manager.join("bob".into(), tx_b).await.unwrap();
        let (third, joined_c) = manager.join("carol".into(), tx_c).await.unwrap();

        assert_eq!(joined_a.role, Role::PlayerA);
        assert_eq!(joined_b.role, Role::PlayerB);
        assert_eq!(first.session_id(), second.session_id());

        assert_eq!(joined_c.role, Role::PlayerA);
        assert_ne!(third.session_id(), first.session_id());
        assert_eq!(manager.active_session_count().await, 2);
    }

    #[tokio::test]
    async fn test_session_limit() {
        let manager = SessionManager::new(SessionConfig::default(), 1);
        let mut receivers = Vec::new();
        for name in ["alice", "bob"] {
            let (tx, rx) = events();
            receivers.push(rx);
            manager.join(name.into(), tx).await.unwrap();
        }

        let (tx, _rx) = events();
        let result = manager.join("carol".into(), tx).await;
        assert!(matches!(result, Err(SessionError::CapacityReached(1))));
    }

    #[tokio::test]
    async fn test_abandoned_open_session_is_replaced() {
        let manager = SessionManager::new(SessionConfig::default(), 4);
        let (tx_a, _rx_a) = events();
        let (first, _) = manager.join("alice".into(), tx_a).await.unwrap();
        first.disconnect(Role::PlayerA).await.unwrap();

        let (tx_b, _rx_b) = events();
        let (second, joined) = manager.join("bob".into(), tx_b).await.unwrap();
        assert_eq!(joined.role, Role::PlayerA);
        assert_ne!(second.session_id(), first.session_id());
    }

    #[tokio::test]
    async fn test_vanished_waiting_participant_is_skipped() {
        let manager = SessionManager::new(SessionConfig::default(), 4);
        let (tx_a, rx_a) = events();
        let (first, _) = manager.join("alice".into(), tx_a).await.unwrap();
        // Connection died without sending Disconnect
        drop(rx_a);

        let (tx_b, mut rx_b) = events();
        let (second, joined) = manager.join("bob".into(), tx_b).await.unwrap();
        assert_eq!(joined.role, Role::PlayerA);
        assert_ne!(second.session_id(), first.session_id());
        assert_eq!(joined.snapshot.participant_count(), 1);
        assert!(rx_b.try_recv().is_err());

        // The next connection pairs with bob and the game starts
        let (tx_c, _rx_c) = events();
        let (third, joined) = manager.join("carol".into(), tx_c).await.unwrap();
        assert_eq!(joined.role, Role::PlayerB);
        assert_eq!(third.session_id(), second.session_id());
        assert_eq!(rx_b.recv().await, Some(GameEvent::GameStarted));
    }

    #[tokio::test]
    async fn test_stopped_sessions_are_forgotten() {
        let manager = SessionManager::new(SessionConfig::default(), 4);
        let (tx_a, _rx_a) = events();
        let (handle, _) = manager.join("alice".into(), tx_a).await.unwrap();
        assert_eq!(manager.list_sessions().await.len(), 1);

        manager.close_session(handle.session_id()).await.unwrap();
        assert_eq!(manager.active_session_count().await, 0);

        // Actor winds down asynchronously
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(handle.is_closed());
    }

    #[tokio::test]
    async fn test_invalid_config_rejected() {
        let config = SessionConfig {
            event_buffer: 0,
            ..SessionConfig::default()
        };
        let manager = SessionManager::new(config, 4);
        assert!(matches!(
            manager.create_session().await,
            Err(SessionError::InvalidConfig(_))
        ));
    }
}
