//! Tic-tac-toe authority server.
//!
//! Accepts participant connections over TCP, pairs them into sessions and
//! runs one session actor per game.

mod config;
mod logging;

use std::{net::SocketAddr, sync::Arc};

use anyhow::{Context, Error};
use ctrlc::set_handler;
use pico_args::Arguments;
use tictactoe::{SessionManager, server};
use tokio::{net::TcpListener, sync::mpsc};
use tracing::info;

use config::ServerConfig;

const HELP: &str = "\
Run a tic-tac-toe session server

USAGE:
  ttt_server [OPTIONS]

OPTIONS:
  --bind          IP:PORT  Server socket bind address  [default: env SERVER_BIND or 127.0.0.1:6969]
  --max-sessions  N        Maximum concurrent sessions [default: env MAX_SESSIONS or 256]

FLAGS:
  -h, --help               Print help information

ENVIRONMENT:
  SERVER_BIND              Server bind address (e.g., 0.0.0.0:6969)
  MAX_SESSIONS             Maximum concurrent sessions
  SESSION_NAME             Name prefix for sessions
  SESSION_INBOX_CAPACITY   Command queue length per session
  SESSION_EVENT_BUFFER     Events buffered per participant before it is dropped
  RUST_LOG                 Log filter (e.g., info,tictactoe=debug)
";

struct Args {
    bind: Option<SocketAddr>,
    max_sessions: Option<usize>,
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    // Load .env file if it exists
    let _ = dotenvy::dotenv();

    let mut pargs = Arguments::from_env();

    // Help has a higher priority and should be handled separately.
    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    let args = Args {
        bind: pargs.opt_value_from_str("--bind")?,
        max_sessions: pargs.opt_value_from_str("--max-sessions")?,
    };

    logging::init();

    let config = ServerConfig::from_env(args.bind, args.max_sessions)?;
    config.validate()?;

    // Catching signals for exit.
    let (shutdown_tx, mut shutdown_rx) = mpsc::unbounded_channel();
    set_handler(move || {
        let _ = shutdown_tx.send(());
    })?;

    let manager = Arc::new(SessionManager::new(
        config.session.clone(),
        config.max_sessions,
    ));

    let listener = TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("Failed to bind to {}", config.bind))?;

    info!(
        "Server is running at {} (up to {} sessions). Press Ctrl+C to stop.",
        config.bind, config.max_sessions
    );

    tokio::select! {
        result = server::serve(listener, Arc::clone(&manager)) => {
            result.context("Server error")?;
        }
        _ = shutdown_rx.recv() => {
            info!("Shutting down server...");
        }
    }

    for snapshot in manager.list_sessions().await {
        logging::log_session(&snapshot);
    }
    manager.close_all().await;

    Ok(())
}
