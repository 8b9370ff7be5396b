//! Networking layer for participant-server communication.
//!
//! This module provides TCP networking with a length-prefixed binary
//! protocol using bincode serialization. The server runs on tokio with one
//! task per connection; the bundled client is blocking.

/// Blocking TCP client attached to one session.
pub mod client;

/// Network error types.
pub mod errors;

/// Message types for the participant-server protocol.
pub mod messages;

/// Protocol versioning.
pub mod protocol_version;

/// Async TCP server routing connections into sessions.
pub mod server;

/// Utilities for binary message serialization and framing.
pub mod utils;
