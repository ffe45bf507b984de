use thiserror::Error;
use tokio_tungstenite::tungstenite::handshake::derive_accept_key;

use crate::http::request::{Method, Request};
use crate::http::response::{Response, ResponseBuilder, StatusCode};

/// Fixed request path for the frame stream endpoint.
pub const STREAM_PATH: &str = "/mjpeg";

/// Why an upgrade request was rejected. Per-request only: the connection
/// gets a 400 and the server keeps running.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum UpgradeError {
    #[error("handshake must be a GET request")]
    NotGet,
    #[error("missing or invalid Upgrade/Connection headers")]
    NotAnUpgrade,
    #[error("unsupported websocket version")]
    UnsupportedVersion,
    #[error("missing Sec-WebSocket-Key")]
    MissingKey,
}

/// Validates a websocket handshake request and builds the 101 reply.
///
/// The permessage-deflate extension is never negotiated: incoming
/// `Sec-WebSocket-Extensions` offers are not echoed back, so every session
/// runs uncompressed. Payloads are already-encoded media frames.
pub fn upgrade_response(req: &Request) -> Result<Response, UpgradeError> {
    if req.method != Method::GET {
        return Err(UpgradeError::NotGet);
    }

    let upgrade = req.header("Upgrade").ok_or(UpgradeError::NotAnUpgrade)?;
    if !upgrade.eq_ignore_ascii_case("websocket") || !req.connection_has_token("upgrade") {
        return Err(UpgradeError::NotAnUpgrade);
    }

    if req.header("Sec-WebSocket-Version") != Some("13") {
        return Err(UpgradeError::UnsupportedVersion);
    }

    let key = req.header("Sec-WebSocket-Key").ok_or(UpgradeError::MissingKey)?;

    Ok(ResponseBuilder::new(StatusCode::SwitchingProtocols)
        .header("Upgrade", "websocket")
        .header("Connection", "Upgrade")
        .header("Sec-WebSocket-Accept", derive_accept_key(key.as_bytes()))
        .build())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::request::RequestBuilder;

    fn handshake_request() -> RequestBuilder {
        RequestBuilder::new()
            .method(Method::GET)
            .path(STREAM_PATH)
            .header("Host", "localhost")
            .header("Upgrade", "websocket")
            .header("Connection", "Upgrade")
            .header("Sec-WebSocket-Key", "dGhlIHNhbXBsZSBub25jZQ==")
            .header("Sec-WebSocket-Version", "13")
    }

    #[test]
    fn accepts_valid_handshake() {
        let req = handshake_request().build().unwrap();
        let resp = upgrade_response(&req).unwrap();

        assert_eq!(resp.status, StatusCode::SwitchingProtocols);
        // Known accept value for the RFC 6455 sample key
        assert_eq!(
            resp.headers.get("Sec-WebSocket-Accept").unwrap(),
            "s3pPLMBiTxaQ9kYGzzhZRbK+xOo="
        );
        assert!(!resp.headers.contains_key("Content-Length"));
        assert!(!resp.headers.contains_key("Sec-WebSocket-Extensions"));
    }

    #[test]
    fn extensions_offer_is_not_negotiated() {
        let req = handshake_request()
            .header("Sec-WebSocket-Extensions", "permessage-deflate")
            .build()
            .unwrap();
        let resp = upgrade_response(&req).unwrap();

        assert!(!resp.headers.contains_key("Sec-WebSocket-Extensions"));
    }

    #[test]
    fn rejects_non_get() {
        let req = handshake_request().method(Method::POST).build().unwrap();
        assert_eq!(upgrade_response(&req), Err(UpgradeError::NotGet));
    }

    #[test]
    fn rejects_missing_upgrade_header() {
        let req = RequestBuilder::new()
            .method(Method::GET)
            .path(STREAM_PATH)
            .header("Connection", "Upgrade")
            .build()
            .unwrap();
        assert_eq!(upgrade_response(&req), Err(UpgradeError::NotAnUpgrade));
    }

    #[test]
    fn rejects_wrong_version() {
        let req = handshake_request()
            .header("Sec-WebSocket-Version", "8")
            .build()
            .unwrap();
        assert_eq!(upgrade_response(&req), Err(UpgradeError::UnsupportedVersion));
    }

    #[test]
    fn rejects_missing_key() {
        let req = RequestBuilder::new()
            .method(Method::GET)
            .path(STREAM_PATH)
            .header("Upgrade", "websocket")
            .header("Connection", "Upgrade")
            .header("Sec-WebSocket-Version", "13")
            .build()
            .unwrap();
        assert_eq!(upgrade_response(&req), Err(UpgradeError::MissingKey));
    }
}
