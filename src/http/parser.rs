use crate::http::request::{Method, Request};
use std::collections::HashMap;

#[derive(Debug)]
pub enum ParseError {
    InvalidRequest,
    InvalidMethod,
    InvalidHeader,
    InvalidContentLength,
    Incomplete,
}

/// Parses one HTTP/1.1 request from the front of `buf`.
///
/// Returns the request plus the number of bytes consumed, so the caller can
/// drain its read buffer and go on to the next pipelined request. A buffer
/// that does not yet hold the full head and body yields `Incomplete`.
pub fn parse_http_request(buf: &[u8]) -> Result<(Request, usize), ParseError> {
    let head_end = find_head_end(buf).ok_or(ParseError::Incomplete)?;
    let head = std::str::from_utf8(&buf[..head_end]).map_err(|_| ParseError::InvalidRequest)?;
    let body_bytes = &buf[head_end + 4..];

    let mut lines = head.split("\r\n");

    let request_line = lines.next().ok_or(ParseError::InvalidRequest)?;
    let (method, path, version) = parse_request_line(request_line)?;

    let mut headers = HashMap::new();
    for line in lines {
        if line.is_empty() {
            continue;
        }
        let (key, value) = line.split_once(':').ok_or(ParseError::InvalidHeader)?;
        headers.insert(key.trim().to_string(), value.trim().to_string());
    }

    let content_length = match headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case("content-length"))
    {
        Some((_, v)) => v
            .parse::<usize>()
            .map_err(|_| ParseError::InvalidContentLength)?,
        None => 0,
    };

    if body_bytes.len() < content_length {
        return Err(ParseError::Incomplete);
    }

    let request = Request {
        method,
        path: path.to_string(),
        version: version.to_string(),
        headers,
        body: body_bytes[..content_length].to_vec(),
    };

    Ok((request, head_end + 4 + content_length))
}

fn parse_request_line(line: &str) -> Result<(Method, &str, &str), ParseError> {
    let mut parts = line.split_whitespace();

    let method_str = parts.next().ok_or(ParseError::InvalidRequest)?;
    let path = parts.next().ok_or(ParseError::InvalidRequest)?;
    let version = parts.next().ok_or(ParseError::InvalidRequest)?;

    let method = Method::from_str(method_str).ok_or(ParseError::InvalidMethod)?;
    Ok((method, path, version))
}

fn find_head_end(buf: &[u8]) -> Option<usize> {
    buf.windows(4).position(|w| w == b"\r\n\r\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_simple_get() {
        let req = b"GET / HTTP/1.1\r\nHost: example.com\r\n\r\n";

        let (parsed, consumed) = parse_http_request(req).unwrap();

        assert_eq!(parsed.path, "/");
        assert_eq!(parsed.headers.get("Host").unwrap(), "example.com");
        assert_eq!(consumed, req.len());
    }

    #[test]
    fn parse_upgrade_request() {
        let req = b"GET /mjpeg HTTP/1.1\r\nHost: localhost\r\nUpgrade: websocket\r\nConnection: Upgrade\r\nSec-WebSocket-Key: dGhlIHNhbXBsZSBub25jZQ==\r\nSec-WebSocket-Version: 13\r\n\r\n";

        let (parsed, consumed) = parse_http_request(req).unwrap();

        assert_eq!(parsed.path, "/mjpeg");
        assert_eq!(parsed.header("upgrade"), Some("websocket"));
        assert!(parsed.connection_has_token("upgrade"));
        assert_eq!(consumed, req.len());
    }
}
