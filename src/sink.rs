use std::net::SocketAddr;
use std::sync::Arc;

use bytes::Bytes;
use tracing::{info, warn};

use crate::config::Config;
use crate::error::StartError;
use crate::server::Server;
use crate::ws::slot::ConnectionSlot;

/// Pipeline-facing sink: owns the server lifecycle and the viewer slot.
///
/// The upstream stage configures it once, starts it, then delivers buffers
/// sequentially through [`render`](Self::render). Each buffer reaches the
/// connected viewer as one binary websocket frame, or is dropped silently
/// while nobody is watching.
pub struct WebsocketServerSink {
    config: Config,
    slot: Arc<ConnectionSlot>,
    server: Option<Server>,
}

impl WebsocketServerSink {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            slot: Arc::new(ConnectionSlot::new()),
            server: None,
        }
    }

    /// Binds and starts serving. Resolution and bind failures are fatal and
    /// leave the sink stopped; a successful start owns the listening socket
    /// until [`stop`](Self::stop).
    pub async fn start(&mut self) -> Result<(), StartError> {
        if self.server.is_some() {
            warn!("start called while already running");
            return Ok(());
        }
        info!("starting server on {}:{}", self.config.host, self.config.port);
        let server = Server::start(&self.config, Arc::clone(&self.slot)).await?;
        self.server = Some(server);
        Ok(())
    }

    /// Stops the sink: closes the viewer connection first, then the
    /// listening socket. Idempotent, and a no-op when never started.
    pub async fn stop(&mut self) {
        self.slot.clear().await;
        if let Some(server) = self.server.take() {
            server.stop().await;
            // A handshake may have completed while the listener was coming
            // down; it must not survive the stop.
            self.slot.clear().await;
            info!("server stopped");
        }
    }

    /// Delivers one buffer from the pipeline.
    ///
    /// Always succeeds from the caller's perspective: frames with no viewer
    /// connected are dropped, and delivery failures are absorbed by the
    /// slot. No retry, no buffering, no backpressure.
    pub async fn render(&self, buffer: Bytes) {
        self.slot.try_send(buffer).await;
    }

    /// Whether a viewer is currently connected.
    pub async fn is_connected(&self) -> bool {
        self.slot.is_connected().await
    }

    /// The address actually bound, while started.
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.server.as_ref().map(Server::local_addr)
    }
}
