use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::{TcpListener, TcpStream, lookup_host};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_tungstenite::WebSocketStream;
use tokio_tungstenite::tungstenite::protocol::Role;
use tracing::{debug, error, info};

use crate::config::Config;
use crate::error::StartError;
use crate::files::StaticFiles;
use crate::http::connection::{Connection, Served};
use crate::ws::handshake::STREAM_PATH;
use crate::ws::slot::{ConnectionSlot, LiveConnection};

/// A started HTTP/websocket server: the bound address plus the accept loop
/// task that owns the listening socket.
pub struct Server {
    local_addr: SocketAddr,
    shutdown: watch::Sender<bool>,
    accept_task: JoinHandle<()>,
}

impl Server {
    /// Resolves and binds `host:port` and starts accepting. Completed
    /// upgrades land in `slot`; every other request is served from the
    /// configured html root.
    pub async fn start(cfg: &Config, slot: Arc<ConnectionSlot>) -> Result<Server, StartError> {
        let addr = resolve(&cfg.host, cfg.port).await?;

        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| StartError::Bind { addr, source: e })?;
        let local_addr = listener
            .local_addr()
            .map_err(|e| StartError::Bind { addr, source: e })?;
        info!("Listening on {}", local_addr);
        info!("websocket service on {}{}", local_addr, STREAM_PATH);

        let (shutdown, shutdown_rx) = watch::channel(false);
        let files = StaticFiles::new(cfg.html_root.clone());
        let accept_task = tokio::spawn(accept_loop(listener, files, slot, shutdown_rx));

        Ok(Server {
            local_addr,
            shutdown,
            accept_task,
        })
    }

    /// The address actually bound; differs from the configured one when
    /// port 0 requested an ephemeral port.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Stops accepting and closes the listening socket. Pending accepts are
    /// rejected once the loop drops the listener.
    pub async fn stop(self) {
        let _ = self.shutdown.send(true);
        if self.accept_task.await.is_err() {
            error!("accept loop task failed during shutdown");
        }
        debug!("server stopped");
    }
}

async fn resolve(host: &str, port: u16) -> Result<SocketAddr, StartError> {
    let failed = |source| StartError::AddressResolution {
        host: host.to_string(),
        port,
        source,
    };

    let mut addrs = lookup_host((host, port)).await.map_err(failed)?;
    addrs.next().ok_or_else(|| {
        failed(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "no addresses found",
        ))
    })
}

async fn accept_loop(
    listener: TcpListener,
    files: StaticFiles,
    slot: Arc<ConnectionSlot>,
    mut shutdown: watch::Receiver<bool>,
) {
    loop {
        let (socket, peer) = tokio::select! {
            res = listener.accept() => match res {
                Ok(pair) => pair,
                Err(e) => {
                    error!("Accept error: {}", e);
                    return;
                }
            },
            _ = shutdown.changed() => {
                debug!("accept loop shutting down");
                return;
            }
        };
        debug!("Accepted connection from {}", peer);

        let files = files.clone();
        let slot = Arc::clone(&slot);
        tokio::spawn(async move {
            if let Err(e) = serve(socket, peer, files, slot).await {
                tracing::error!("Connection error from {}: {}", peer, e);
            }
        });
    }
}

/// Runs one connection to completion. A finished handshake wraps the raw
/// stream into a websocket session and installs it as the active viewer.
async fn serve(
    socket: TcpStream,
    peer: SocketAddr,
    files: StaticFiles,
    slot: Arc<ConnectionSlot>,
) -> anyhow::Result<()> {
    let conn = Connection::new(socket, files);
    match conn.run().await? {
        Served::Closed => {}
        Served::Upgraded(stream) => {
            debug!("websocket connected from {}", peer);
            let ws = WebSocketStream::from_raw_socket(stream, Role::Server, None).await;
            slot.replace(LiveConnection::new(ws, peer)).await;
        }
    }
    Ok(())
}
