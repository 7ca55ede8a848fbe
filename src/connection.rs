use std::net::SocketAddr;
use std::sync::Arc;

use bytes::{Bytes, BytesMut};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::sync::watch;

use crate::buffer::FrameBuffer;
use crate::hub::ClientHub;
use crate::wire::{StreamDecoder, WireMessage};

/// Socket receive window per read.
const READ_CHUNK: usize = 64 * 1024;

/// Services one accepted client until it disconnects, errors out, or the
/// server shuts down.
///
/// The reader half feeds the streaming decoder and pushes each decoded
/// frame into the shared buffer; the writer half drains queued
/// broadcasts into the socket. Either half failing tears the connection
/// down silently, with no application-level error sent to the peer.
pub(crate) async fn serve_connection(
    stream: TcpStream,
    peer: SocketAddr,
    hub: Arc<ClientHub>,
    buffer: Arc<FrameBuffer>,
    mut shutdown: watch::Receiver<bool>,
) {
    let (id, mut outbound) = hub.register(peer);
    let (mut reader, mut writer) = stream.into_split();

    let writer_hub = hub.clone();
    tokio::spawn(async move {
        while let Some(bytes) = outbound.recv().await {
            if let Err(err) = writer.write_all(&bytes).await {
                log::warn!("write to client {id} failed: {err}");
                writer_hub.unregister(id);
                break;
            }
        }
    });

    let mut decoder = StreamDecoder::new();
    let mut chunk = BytesMut::with_capacity(READ_CHUNK);
    loop {
        tokio::select! {
            _ = shutdown.changed() => break,
            read = reader.read_buf(&mut chunk) => match read {
                Ok(0) => {
                    log::info!("client {id} closed the connection");
                    break;
                }
                Ok(_) => {
                    decoder.feed(&chunk);
                    chunk.clear();
                    if !drain_messages(id, &mut decoder, &buffer) {
                        break;
                    }
                }
                Err(err) => {
                    log::warn!("read from client {id} failed: {err}");
                    break;
                }
            },
        }
    }

    hub.unregister(id);
}

/// Decodes everything currently buffered for one connection. Returns
/// `false` when the stream is corrupt and the connection must be
/// dropped.
fn drain_messages(id: u64, decoder: &mut StreamDecoder, buffer: &FrameBuffer) -> bool {
    loop {
        match decoder.next_message() {
            Ok(Some(WireMessage::Frame(frame))) => {
                log::debug!("received {} byte frame from client {id}", frame.data.len());
                buffer.push(Bytes::from(frame.data));
            }
            Ok(Some(other)) => {
                log::warn!(
                    "ignoring unexpected message (tag {}) from client {id}",
                    other.tag()
                );
            }
            Ok(None) => return true,
            Err(err) => {
                log::warn!("corrupt stream from client {id}: {err}");
                return false;
            }
        }
    }
}
