//! Structured logging configuration.
//!
//! The library logs through the `log` facade; tracing-subscriber picks
//! those records up alongside the server's own `tracing` events.

use tictactoe::session::SessionSnapshot;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize logging
///
/// Log levels are configurable via the `RUST_LOG` env var and default to
/// `info`. Set `RUST_LOG=tictactoe=debug` to see ignored moves.
pub fn init() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_thread_ids(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();

    tracing::info!("Structured logging initialized");
}

/// Log the state a session was in with structured fields
pub fn log_session(snapshot: &SessionSnapshot) {
    let (score_a, score_b) = snapshot.game.scores.as_pair();
    tracing::info!(
        session_id = snapshot.session_id,
        phase = %snapshot.game.phase,
        participants = snapshot.participant_count(),
        score_a = score_a,
        score_b = score_b,
        "{}",
        snapshot.name
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_session() {
        // No subscriber installed; must not panic
        log_session(&SessionSnapshot::default());
    }
}
