use std::net::SocketAddr;
use std::time::Duration;

use bytes::Bytes;
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tokio_tungstenite::WebSocketStream;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, trace, warn};

/// Bound on a single frame write, so one stalled viewer cannot stall the
/// pipeline's delivery path.
const SEND_TIMEOUT: Duration = Duration::from_secs(5);

type WsWriter = SplitSink<WebSocketStream<TcpStream>, Message>;
type WsReader = SplitStream<WebSocketStream<TcpStream>>;

/// One upgraded websocket session.
///
/// Owned exclusively by the [`ConnectionSlot`] from installation until it
/// is replaced, evicted, or the server stops.
pub struct LiveConnection {
    writer: WsWriter,
    peer: SocketAddr,
    reader_task: JoinHandle<()>,
}

impl LiveConnection {
    /// Takes ownership of an upgraded stream. The read half is drained in a
    /// background task so pings and the client close handshake keep being
    /// serviced; the drain task never touches the slot.
    pub fn new(ws: WebSocketStream<TcpStream>, peer: SocketAddr) -> Self {
        let (writer, reader) = ws.split();
        let reader_task = tokio::spawn(drain(reader, peer));
        Self {
            writer,
            peer,
            reader_task,
        }
    }

    /// Graceful close: a Close frame with no status code, then teardown.
    /// Failures while closing are not propagated.
    async fn close(mut self) {
        let _ = timeout(SEND_TIMEOUT, self.writer.send(Message::Close(None))).await;
        self.reader_task.abort();
        debug!(peer = %self.peer, "websocket connection closed");
    }

    /// Teardown without the close handshake, for connections whose write
    /// side already failed.
    fn discard(self) {
        self.reader_task.abort();
        debug!(peer = %self.peer, "websocket connection discarded");
    }
}

async fn drain(mut reader: WsReader, peer: SocketAddr) {
    while let Some(msg) = reader.next().await {
        match msg {
            Ok(m) if m.is_close() => break,
            // The stream is one-way; anything the client sends is ignored.
            Ok(_) => {}
            Err(_) => break,
        }
    }
    trace!(peer = %peer, "websocket read side finished");
}

/// Outcome of [`ConnectionSlot::try_send`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// The frame was handed to the connected viewer.
    Sent,
    /// No viewer, or the viewer's connection died; nothing was delivered.
    Skipped,
}

/// Holder for the single active viewer connection.
///
/// Every operation takes the same lock, making `replace`, `clear` and
/// `try_send` mutually exclusive critical sections: a frame is never
/// written to a connection that has already been superseded. Occupancy of
/// the slot is the sole "connected" indicator.
#[derive(Default)]
pub struct ConnectionSlot {
    current: Mutex<Option<LiveConnection>>,
}

impl ConnectionSlot {
    pub fn new() -> Self {
        Self {
            current: Mutex::new(None),
        }
    }

    /// Installs a new connection, closing any previous occupant first. When
    /// several handshakes race, the last one to reach this lock owns the
    /// slot.
    pub async fn replace(&self, conn: LiveConnection) {
        let mut current = self.current.lock().await;
        if let Some(old) = current.take() {
            debug!(peer = %old.peer, "disconnecting replaced viewer");
            old.close().await;
        }
        debug!(peer = %conn.peer, "viewer connected");
        *current = Some(conn);
    }

    /// Closes and discards the current connection, if any. Used at
    /// shutdown.
    pub async fn clear(&self) {
        let mut current = self.current.lock().await;
        if let Some(conn) = current.take() {
            conn.close().await;
        }
    }

    /// Sends one binary frame to the current viewer, if there is one.
    ///
    /// Best-effort: a send failure or timeout evicts the dead connection
    /// and reports `Skipped`; no retry, no buffering, no delivery
    /// confirmation.
    pub async fn try_send(&self, payload: Bytes) -> SendOutcome {
        let mut current = self.current.lock().await;
        let Some(conn) = current.as_mut() else {
            return SendOutcome::Skipped;
        };

        let len = payload.len();
        match timeout(SEND_TIMEOUT, conn.writer.send(Message::Binary(payload))).await {
            Ok(Ok(())) => {
                trace!(bytes = len, "frame forwarded");
                SendOutcome::Sent
            }
            Ok(Err(e)) => {
                warn!(peer = %conn.peer, error = %e, "frame send failed, dropping viewer");
                if let Some(dead) = current.take() {
                    dead.discard();
                }
                SendOutcome::Skipped
            }
            Err(_) => {
                warn!(peer = %conn.peer, "frame send timed out, dropping viewer");
                if let Some(dead) = current.take() {
                    dead.discard();
                }
                SendOutcome::Skipped
            }
        }
    }

    /// Whether a viewer is currently connected.
    pub async fn is_connected(&self) -> bool {
        self.current.lock().await.is_some()
    }
}
