use std::net::SocketAddr;
use thiserror::Error;

/// Fatal failures while bringing the server up.
///
/// Both variants abort `start`; there is no retry. Everything that can go
/// wrong after the listener is up (file access, bad upgrade requests, a
/// vanished client) is handled per request and never surfaces here.
#[derive(Debug, Error)]
pub enum StartError {
    /// `host:port` did not resolve to any usable socket address.
    #[error("failed to resolve host '{host}:{port}'")]
    AddressResolution {
        host: String,
        port: u16,
        #[source]
        source: std::io::Error,
    },

    /// Binding or listening on the resolved address failed.
    #[error("failed to bind on {addr}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },
}
