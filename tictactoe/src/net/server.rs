//! Async TCP authority server.
//!
//! Each accepted connection gets its own task. The first frame must be a
//! `Connect`; the connection is then placed into a session by the
//! [`SessionManager`] and receives, in order:
//!
//! 1. `Welcome` with its role
//! 2. `Snapshot` of the session at the time it joined
//! 3. every event the session broadcasts
//!
//! Later frames are forwarded to the session with the role bound at connect
//! time, so a connection can only ever act as its own role.

use log::{debug, info, warn};
use std::{io, net::SocketAddr, sync::Arc};
use tokio::{
    io::AsyncWriteExt,
    net::{TcpListener, TcpStream},
    sync::mpsc,
};

use super::{
    messages::{ClientError, ClientMessage, ServerMessage, SessionCommand},
    protocol_version::ProtocolVersion,
    utils::{read_prefixed_async, write_prefixed_async},
};
use crate::session::{SessionConfig, SessionError, SessionManager};

/// Run a server on its own tokio runtime, blocking the calling thread.
///
/// # Errors
///
/// Returns an error if the runtime can't be built, the address can't be
/// bound, or the accept loop fails.
pub fn run(addr: SocketAddr, config: SessionConfig, max_sessions: usize) -> io::Result<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(async move {
        let listener = TcpListener::bind(addr).await?;
        let manager = Arc::new(SessionManager::new(config, max_sessions));
        serve(listener, manager).await
    })
}

/// Accept connections until the listener fails.
///
/// # Errors
///
/// Returns the error that stopped the accept loop.
pub async fn serve(listener: TcpListener, manager: Arc<SessionManager>) -> io::Result<()> {
    info!("Accepting connections on {}", listener.local_addr()?);

    loop {
        let (stream, peer) = listener.accept().await?;
        debug!("Accepted connection from {peer}");

        let manager = Arc::clone(&manager);
        tokio::spawn(async move {
            if let Err(error) = handle_connection(stream, manager).await {
                debug!("Connection from {peer} ended with error: {error}");
            }
        });
    }
}

/// Drive one participant connection from `Connect` to disconnect.
pub async fn handle_connection(stream: TcpStream, manager: Arc<SessionManager>) -> io::Result<()> {
    stream.set_nodelay(true)?;
    let peer = stream.peer_addr()?;
    let (mut reader, mut writer) = stream.into_split();

    let first: ClientMessage = read_prefixed_async(&mut reader).await?;
    if first.command != SessionCommand::Connect {
        warn!("{peer} sent \"{}\" before connecting", first.command);
        let msg = ServerMessage::ClientError(ClientError::ExpectedConnect);
        return write_prefixed_async(&mut writer, &msg).await;
    }

    let (events_tx, mut events_rx) = mpsc::channel(manager.config().event_buffer.max(1));
    let (handle, joined) = match manager.join(first.name.clone(), events_tx).await {
        Ok(joined) => joined,
        Err(error) => {
            warn!("Refusing {} ({peer}): {error}", first.name);
            let msg = ServerMessage::ClientError(error.into());
            return write_prefixed_async(&mut writer, &msg).await;
        }
    };
    let role = joined.role;
    let session_id = handle.session_id();
    info!("{} ({peer}) joined session {session_id} as {role}", first.name);

    let welcome = ServerMessage::Welcome {
        role,
        session: session_id,
        protocol: ProtocolVersion::current(),
    };
    let handshake = async {
        write_prefixed_async(&mut writer, &welcome).await?;
        write_prefixed_async(&mut writer, &ServerMessage::Snapshot(joined.snapshot)).await
    };
    if let Err(error) = handshake.await {
        // Already attached; the session must not keep waiting on this peer
        let _ = handle.disconnect(role).await;
        return Err(error);
    }

    // Ends when the session drops this participant or the peer goes away.
    let mut send_task = tokio::spawn(async move {
        while let Some(event) = events_rx.recv().await {
            if write_prefixed_async(&mut writer, &ServerMessage::Event(event))
                .await
                .is_err()
            {
                break;
            }
        }
        let _ = writer.shutdown().await;
    });

    let result = loop {
        tokio::select! {
            read = read_prefixed_async::<ClientMessage, _>(&mut reader) => {
                let msg = match read {
                    Ok(msg) => msg,
                    Err(error) if error.kind() == io::ErrorKind::UnexpectedEof => break Ok(()),
                    Err(error) => break Err(error),
                };

                let sent = match msg.command {
                    SessionCommand::Move { row, col } => handle.submit_move(role, row, col).await,
                    SessionCommand::Rematch => handle.rematch(role).await,
                    SessionCommand::Disconnect => break Ok(()),
                    SessionCommand::Connect => {
                        debug!("Ignoring repeated connect from {role} in session {session_id}");
                        Ok(())
                    }
                };
                if let Err(SessionError::Closed) = sent {
                    break Ok(());
                }
            }
            _ = &mut send_task => break Ok(()),
        }
    };

    let _ = handle.disconnect(role).await;
    send_task.abort();
    info!("{} left session {session_id}", first.name);

    result
}
