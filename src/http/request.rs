use std::collections::HashMap;

/// HTTP request methods.
///
/// All common verbs are parsed so unsupported ones can be answered with
/// 405 Method Not Allowed; the server itself only serves GET and HEAD.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Method {
    /// GET - Retrieve a resource (also carries websocket handshakes)
    GET,
    /// HEAD - Like GET but without the response body
    HEAD,
    /// POST - Create or submit data
    POST,
    /// PUT - Replace a resource
    PUT,
    /// DELETE - Delete a resource
    DELETE,
    /// OPTIONS - Describe communication options
    OPTIONS,
    /// PATCH - Partial modification of a resource
    PATCH,
}

impl Method {
    /// Parses an HTTP method from a string.
    ///
    /// # Example
    ///
    /// ```
    /// # use framecast::http::request::Method;
    /// assert_eq!(Method::from_str("GET"), Some(Method::GET));
    /// assert_eq!(Method::from_str("get"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "GET" => Some(Method::GET),
            "HEAD" => Some(Method::HEAD),
            "POST" => Some(Method::POST),
            "PUT" => Some(Method::PUT),
            "DELETE" => Some(Method::DELETE),
            "OPTIONS" => Some(Method::OPTIONS),
            "PATCH" => Some(Method::PATCH),
            _ => None,
        }
    }
}

/// Represents a parsed HTTP request from a client.
#[derive(Debug, Clone)]
pub struct Request {
    /// The HTTP method (GET, HEAD, etc.)
    pub method: Method,
    /// The request target as sent (e.g., "/index.html" or "/mjpeg")
    pub path: String,
    /// HTTP version (typically "HTTP/1.1")
    pub version: String,
    /// Request headers as key-value pairs, original casing preserved
    pub headers: HashMap<String, String>,
    /// Request body, if a Content-Length was given
    pub body: Vec<u8>,
}

impl Request {
    /// Retrieves a header value by name, matching case-insensitively as
    /// HTTP requires.
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    /// Retrieves the Content-Length header value and parses it as a usize.
    ///
    /// Returns 0 if the header is missing or not a valid number.
    pub fn content_length(&self) -> usize {
        self.header("Content-Length")
            .and_then(|v| v.parse().ok())
            .unwrap_or(0)
    }

    /// Whether the Connection header carries the given token. The header is
    /// a comma-separated list ("keep-alive, Upgrade"), so a plain equality
    /// check is not enough.
    pub fn connection_has_token(&self, token: &str) -> bool {
        self.header("Connection")
            .map(|v| v.split(',').any(|t| t.trim().eq_ignore_ascii_case(token)))
            .unwrap_or(false)
    }

    /// Determines whether the connection should remain open after the
    /// response. HTTP/1.1 defaults to keep-alive unless the client asks to
    /// close.
    pub fn keep_alive(&self) -> bool {
        match self.header("Connection") {
            Some(v) => v
                .split(',')
                .any(|t| t.trim().eq_ignore_ascii_case("keep-alive")),
            None => true,
        }
    }
}

/// Builder for constructing Request objects, mostly useful in tests.
pub struct RequestBuilder {
    method: Option<Method>,
    path: Option<String>,
    version: Option<String>,
    headers: HashMap<String, String>,
    body: Vec<u8>,
}

impl RequestBuilder {
    pub fn new() -> Self {
        Self {
            method: None,
            path: None,
            version: None,
            headers: HashMap::new(),
            body: Vec::new(),
        }
    }

    pub fn method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }

    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    pub fn body(mut self, body: Vec<u8>) -> Self {
        self.body = body;
        self
    }

    pub fn build(self) -> Result<Request, &'static str> {
        Ok(Request {
            method: self.method.ok_or("method missing")?,
            path: self.path.ok_or("path missing")?,
            version: self.version.unwrap_or_else(|| "HTTP/1.1".to_string()),
            headers: self.headers,
            body: self.body,
        })
    }
}

impl Default for RequestBuilder {
    fn default() -> Self {
        Self::new()
    }
}
