use tokio::io::AsyncReadExt;
use tokio::net::TcpStream;
use tracing::debug;

use crate::files::StaticFiles;
use crate::http::parser::{ParseError, parse_http_request};
use crate::http::request::Request;
use crate::http::response::Response;
use crate::http::writer::ResponseWriter;
use crate::ws::handshake;

/// Requests larger than this are treated as a protocol error.
const MAX_REQUEST_BYTES: usize = 64 * 1024;

/// What became of a connection once the state machine finished.
pub enum Served {
    /// Plain HTTP traffic, connection done.
    Closed,
    /// A completed websocket handshake; the caller takes over the stream.
    Upgraded(TcpStream),
}

pub struct Connection {
    stream: TcpStream,
    buffer: Vec<u8>,
    state: ConnectionState,
    files: StaticFiles,
}

enum ConnectionState {
    Reading,
    Processing(Request),
    Writing(ResponseWriter, bool), // bool = keep_alive?
    Upgrading(ResponseWriter),
    Closed,
}

impl Connection {
    pub fn new(stream: TcpStream, files: StaticFiles) -> Self {
        Self {
            stream,
            buffer: Vec::with_capacity(4096),
            state: ConnectionState::Reading,
            files,
        }
    }

    pub async fn run(mut self) -> anyhow::Result<Served> {
        loop {
            match std::mem::replace(&mut self.state, ConnectionState::Closed) {
                ConnectionState::Reading => {
                    self.state = match self.read_request().await? {
                        Some(req) => ConnectionState::Processing(req),
                        None => ConnectionState::Closed,
                    };
                }

                ConnectionState::Processing(req) => {
                    self.state = self.route(&req).await;
                }

                ConnectionState::Writing(mut writer, keep_alive) => {
                    writer.write_to_stream(&mut self.stream).await?;

                    self.state = if keep_alive {
                        ConnectionState::Reading // go back for next request
                    } else {
                        ConnectionState::Closed
                    };
                }

                ConnectionState::Upgrading(mut writer) => {
                    writer.write_to_stream(&mut self.stream).await?;
                    return Ok(Served::Upgraded(self.stream));
                }

                ConnectionState::Closed => {
                    return Ok(Served::Closed);
                }
            }
        }
    }

    pub async fn read_request(&mut self) -> anyhow::Result<Option<Request>> {
        loop {
            // Try parsing whatever we already have
            match parse_http_request(&self.buffer) {
                Ok((request, consumed)) => {
                    self.buffer.drain(..consumed);
                    return Ok(Some(request));
                }

                Err(ParseError::Incomplete) => {
                    // Need more data → fall through to read
                }

                Err(e) => {
                    return Err(anyhow::anyhow!("HTTP parse error: {:?}", e));
                }
            }

            if self.buffer.len() > MAX_REQUEST_BYTES {
                return Err(anyhow::anyhow!("request too large"));
            }

            let mut temp = [0u8; 1024];
            let n = self.stream.read(&mut temp).await?;

            if n == 0 {
                // Client closed connection
                return Ok(None);
            }

            self.buffer.extend_from_slice(&temp[..n]);
        }
    }

    /// Dispatches one request: the fixed stream path goes through the
    /// websocket handshake, everything else is a file lookup.
    async fn route(&self, req: &Request) -> ConnectionState {
        let path = req.path.split('?').next().unwrap_or(&req.path);
        debug!(method = ?req.method, path, "received http request");

        if path == handshake::STREAM_PATH {
            return match handshake::upgrade_response(req) {
                Ok(resp) => ConnectionState::Upgrading(ResponseWriter::new(&resp)),
                Err(e) => {
                    debug!(error = %e, "rejecting websocket handshake");
                    ConnectionState::Writing(ResponseWriter::new(&Response::bad_request()), false)
                }
            };
        }

        let response = self.files.respond(&req.method, path).await;
        ConnectionState::Writing(ResponseWriter::new(&response), req.keep_alive())
    }
}
