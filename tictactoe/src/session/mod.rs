//! Session module providing the authoritative game service with an async
//! actor model.
//!
//! This module implements:
//! - SessionActor: Async actor owning the game for one pair of participants
//! - SessionManager: Pairs incoming connections and manages session actors
//! - SessionView: Participant-side projection kept current by events
//! - Message-based communication with tokio channels
//!
//! ## Architecture
//!
//! Each session runs in a separate Tokio task with an mpsc message inbox.
//! Commands from both participants are applied one at a time, and every
//! resulting event is pushed to each participant's bounded event channel in
//! the order the state machine produced it.
//!
//! ## Example
//!
//! ```ignore
//! use tictactoe::session::{SessionActor, SessionConfig};
//! use tokio::sync::mpsc;
//!
//! #[tokio::main]
//! async fn main() {
//!     let (actor, handle) = SessionActor::new(1, SessionConfig::default());
//!     tokio::spawn(actor.run());
//!
//!     let (events, mut rx) = mpsc::channel(64);
//!     let joined = handle.connect("alice".into(), events).await.unwrap();
//!     println!("joined as {}", joined.role);
//! }
//! ```

pub mod actor;
pub mod config;
pub mod errors;
pub mod manager;
pub mod messages;
pub mod roles;
pub mod view;

pub use actor::{SessionActor, SessionHandle};
pub use config::SessionConfig;
pub use errors::SessionError;
pub use manager::SessionManager;
pub use messages::{Joined, ObserverId, Participant, SessionId, SessionMessage, SessionSnapshot};
pub use roles::RoleAssigner;
pub use view::SessionView;
