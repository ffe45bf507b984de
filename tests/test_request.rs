use framecast::http::request::{Method, Request};
use std::collections::HashMap;

fn request_with_headers(headers: HashMap<String, String>) -> Request {
    Request {
        method: Method::GET,
        path: "/".to_string(),
        version: "HTTP/1.1".to_string(),
        headers,
        body: vec![],
    }
}

#[test]
fn test_request_header_retrieval() {
    let mut headers = HashMap::new();
    headers.insert("Host".to_string(), "example.com".to_string());
    headers.insert("Content-Type".to_string(), "application/json".to_string());

    let req = request_with_headers(headers);

    assert_eq!(req.header("Host"), Some("example.com"));
    assert_eq!(req.header("Content-Type"), Some("application/json"));
    assert_eq!(req.header("Missing"), None);
}

#[test]
fn test_request_header_lookup_case_insensitive() {
    let mut headers = HashMap::new();
    headers.insert("Sec-WebSocket-Key".to_string(), "abc".to_string());

    let req = request_with_headers(headers);

    assert_eq!(req.header("sec-websocket-key"), Some("abc"));
    assert_eq!(req.header("SEC-WEBSOCKET-KEY"), Some("abc"));
}

#[test]
fn test_request_content_length_parsing() {
    let mut headers = HashMap::new();
    headers.insert("Content-Length".to_string(), "42".to_string());

    let req = request_with_headers(headers);

    assert_eq!(req.content_length(), 42);
}

#[test]
fn test_request_content_length_missing() {
    let req = request_with_headers(HashMap::new());

    assert_eq!(req.content_length(), 0);
}

#[test]
fn test_request_content_length_invalid() {
    let mut headers = HashMap::new();
    headers.insert("Content-Length".to_string(), "not-a-number".to_string());

    let req = request_with_headers(headers);

    assert_eq!(req.content_length(), 0);
}

#[test]
fn test_request_keep_alive_http11_default() {
    // HTTP/1.1 defaults to keep-alive
    let req = request_with_headers(HashMap::new());

    assert!(req.keep_alive());
}

#[test]
fn test_request_keep_alive_explicit_header() {
    let mut headers = HashMap::new();
    headers.insert("Connection".to_string(), "keep-alive".to_string());

    let req = request_with_headers(headers);

    assert!(req.keep_alive());
}

#[test]
fn test_request_keep_alive_close() {
    let mut headers = HashMap::new();
    headers.insert("Connection".to_string(), "close".to_string());

    let req = request_with_headers(headers);

    assert!(!req.keep_alive());
}

#[test]
fn test_request_keep_alive_case_insensitive() {
    let mut headers = HashMap::new();
    headers.insert("Connection".to_string(), "Keep-Alive".to_string());

    let req = request_with_headers(headers);

    assert!(req.keep_alive());
}

#[test]
fn test_request_connection_token_single() {
    let mut headers = HashMap::new();
    headers.insert("Connection".to_string(), "Upgrade".to_string());

    let req = request_with_headers(headers);

    assert!(req.connection_has_token("upgrade"));
    assert!(!req.connection_has_token("keep-alive"));
}

#[test]
fn test_request_connection_token_list() {
    // Browsers commonly send both tokens during a handshake
    let mut headers = HashMap::new();
    headers.insert("Connection".to_string(), "keep-alive, Upgrade".to_string());

    let req = request_with_headers(headers);

    assert!(req.connection_has_token("upgrade"));
    assert!(req.connection_has_token("keep-alive"));
    assert!(req.keep_alive());
}

#[test]
fn test_request_connection_token_missing_header() {
    let req = request_with_headers(HashMap::new());

    assert!(!req.connection_has_token("upgrade"));
}

#[test]
fn test_request_method_equality() {
    assert_eq!(Method::GET, Method::GET);
    assert_ne!(Method::GET, Method::HEAD);
}

#[test]
fn test_request_method_from_string() {
    assert_eq!(Method::from_str("GET"), Some(Method::GET));
    assert_eq!(Method::from_str("HEAD"), Some(Method::HEAD));
    assert_eq!(Method::from_str("INVALID"), None);
    assert_eq!(Method::from_str("get"), None); // Case-sensitive
}
