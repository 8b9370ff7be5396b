//! Internal modules for the tic-tac-toe client.
//!
//! This library provides command parsing, rendering and the TCP session
//! connection used by the ttt_client binary.

pub mod commands;
pub mod connection;
pub mod display;
