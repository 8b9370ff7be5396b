//! Length-prefixed bincode framing.
//!
//! Every frame is a little-endian `u32` body length followed by the bincode
//! (standard config) encoding of one message.

use bincode::{
    config,
    serde::{decode_from_slice, encode_to_vec},
};
use serde::{Serialize, de::DeserializeOwned};
use std::io::{self, Read, Write};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use super::errors::{Result, SerializationError};

/// Maximum allowed frame body size (1MB) to prevent unbounded allocation
pub const MAX_MESSAGE_SIZE: usize = 1024 * 1024;

/// Encode a value with the wire configuration.
pub fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>> {
    let bytes = encode_to_vec(value, config::standard())?;
    check_size(bytes.len())?;
    Ok(bytes)
}

/// Decode a value that must span the whole of `bytes`.
pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    let (value, read) = decode_from_slice(bytes, config::standard())?;
    if read != bytes.len() {
        return Err(SerializationError::InvalidFormat(format!(
            "{} trailing bytes after message",
            bytes.len() - read
        )));
    }
    Ok(value)
}

fn check_size(len: usize) -> Result<usize> {
    if len > MAX_MESSAGE_SIZE {
        return Err(SerializationError::MessageTooLarge {
            actual: len,
            max: MAX_MESSAGE_SIZE,
        });
    }
    Ok(len)
}

/// Prefix and body in one buffer, so a frame is written in a single chunk
/// and readers never observe a length without its body.
fn frame<T: Serialize>(value: &T) -> Result<Vec<u8>> {
    let body = encode(value)?;
    let size = body.len() as u32;
    let mut buf = Vec::with_capacity(body.len() + 4);
    buf.extend_from_slice(&size.to_le_bytes());
    buf.extend(body);
    Ok(buf)
}

pub fn read_prefixed<T: DeserializeOwned, R: Read>(reader: &mut R) -> io::Result<T> {
    let mut len_bytes = [0; 4];
    reader.read_exact(&mut len_bytes)?;
    let len = check_size(u32::from_le_bytes(len_bytes) as usize)?;

    // A would block error here means the peer sent a length and then
    // stalled, which is treated as a framing violation.
    let mut buf = vec![0; len];
    if let Err(error) = reader.read_exact(&mut buf) {
        let kind = match error.kind() {
            io::ErrorKind::WouldBlock => io::ErrorKind::InvalidData,
            kind => kind,
        };
        return Err(kind.into());
    }

    Ok(decode(&buf)?)
}

pub fn write_prefixed<T: Serialize, W: Write>(writer: &mut W, value: &T) -> io::Result<()> {
    let buf = frame(value)?;
    writer.write_all(&buf)?;
    Ok(())
}

pub async fn read_prefixed_async<T, R>(reader: &mut R) -> io::Result<T>
where
    T: DeserializeOwned,
    R: AsyncRead + Unpin,
{
    let mut len_bytes = [0; 4];
    reader.read_exact(&mut len_bytes).await?;
    let len = check_size(u32::from_le_bytes(len_bytes) as usize)?;

    let mut buf = vec![0; len];
    reader.read_exact(&mut buf).await?;

    Ok(decode(&buf)?)
}

pub async fn write_prefixed_async<T, W>(writer: &mut W, value: &T) -> io::Result<()>
where
    T: Serialize,
    W: AsyncWrite + Unpin,
{
    let buf = frame(value)?;
    writer.write_all(&buf).await?;
    writer.flush().await
}

#[cfg(test)]
mod tests {
    use std::io::{self, Write};

    use mio::net::{TcpListener, TcpStream};

    use super::*;
    use crate::{
        game::{GameEvent, Role},
        net::messages::{ClientMessage, SessionCommand},
    };

    fn setup() -> (TcpStream, TcpStream) {
        let random_port_addr = "127.0.0.1:0".parse().unwrap();
        let server = TcpListener::bind(random_port_addr).unwrap();
        let addr = server.local_addr().unwrap();
        let client = TcpStream::connect(addr).unwrap();
        let (stream, _) = server.accept().unwrap();
        (client, stream)
    }

    #[test]
    fn write_and_read_command() {
        let (mut client, mut stream) = setup();
        let msg = ClientMessage {
            name: "alice".into(),
            command: SessionCommand::Move { row: 2, col: 1 },
        };
        assert!(write_prefixed(&mut stream, &msg).is_ok());
        let received: ClientMessage = read_prefixed(&mut client).unwrap();
        assert_eq!(received, msg);
    }

    #[test]
    fn length_without_body_is_invalid_data() {
        let (mut client, mut stream) = setup();
        assert!(stream.write_all(&1u32.to_le_bytes()).is_ok());
        assert_eq!(
            read_prefixed::<String, TcpStream>(&mut client).map_err(|e| e.kind()),
            Err(io::ErrorKind::InvalidData)
        );
    }

    #[test]
    fn reject_oversized_frame() {
        let (mut client, mut stream) = setup();
        let oversized = (MAX_MESSAGE_SIZE as u32) + 1;
        assert!(stream.write_all(&oversized.to_le_bytes()).is_ok());
        assert_eq!(
            read_prefixed::<String, TcpStream>(&mut client).map_err(|e| e.kind()),
            Err(io::ErrorKind::InvalidData)
        );
    }

    #[test]
    fn frames_arrive_in_order() {
        let (mut client, mut stream) = setup();
        let events = [
            GameEvent::GameStarted,
            GameEvent::TurnChanged(Some(Role::PlayerA)),
            GameEvent::ObjectPlaced {
                row: 1,
                col: 1,
                role: Role::PlayerA,
            },
            GameEvent::TurnChanged(Some(Role::PlayerB)),
        ];
        for event in &events {
            write_prefixed(&mut stream, event).unwrap();
        }
        for event in &events {
            let received: GameEvent = read_prefixed(&mut client).unwrap();
            assert_eq!(&received, event);
        }
    }

    #[test]
    fn encode_rejects_oversized_message() {
        let huge = "x".repeat(MAX_MESSAGE_SIZE + 1);
        assert!(matches!(
            encode(&huge),
            Err(SerializationError::MessageTooLarge { .. })
        ));
    }

    #[test]
    fn decode_rejects_trailing_bytes() {
        let mut bytes = encode(&7u32).unwrap();
        bytes.push(0);
        assert!(matches!(
            decode::<u32>(&bytes),
            Err(SerializationError::InvalidFormat(_))
        ));
    }

    #[tokio::test]
    async fn async_write_and_read() {
        let (mut near, mut far) = tokio::io::duplex(64);
        let writer = tokio::spawn(async move {
            for i in 0..3u32 {
                write_prefixed_async(&mut near, &GameEvent::ObjectPlaced {
                    row: i as usize,
                    col: 0,
                    role: Role::PlayerB,
                })
                .await
                .unwrap();
            }
        });

        for i in 0..3usize {
            let event: GameEvent = read_prefixed_async(&mut far).await.unwrap();
            assert_eq!(
                event,
                GameEvent::ObjectPlaced {
                    row: i,
                    col: 0,
                    role: Role::PlayerB
                }
            );
        }
        writer.await.unwrap();
    }

    #[tokio::test]
    async fn async_eof_mid_prefix() {
        let (mut near, mut far) = tokio::io::duplex(64);
        tokio::io::AsyncWriteExt::write_all(&mut near, &[0, 0]).await.unwrap();
        drop(near);
        let result = read_prefixed_async::<String, _>(&mut far).await;
        assert_eq!(result.map_err(|e| e.kind()), Err(io::ErrorKind::UnexpectedEof));
    }
}
