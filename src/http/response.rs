use std::collections::HashMap;

/// Value of the `Server` header stamped on every response.
pub const SERVER_NAME: &str = "framecast";

/// HTTP status codes produced by this server.
///
/// - `SwitchingProtocols` (101): successful websocket handshake
/// - `Ok` (200): file served
/// - `BadRequest` (400): malformed websocket handshake
/// - `Forbidden` (403): not a regular file, or access denied
/// - `NotFound` (404): no such file
/// - `MethodNotAllowed` (405): anything but GET/HEAD on the file routes
/// - `InternalServerError` (500): unexpected filesystem failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    /// 101 Switching Protocols
    SwitchingProtocols,
    /// 200 OK
    Ok,
    /// 400 Bad Request
    BadRequest,
    /// 403 Forbidden
    Forbidden,
    /// 404 Not Found
    NotFound,
    /// 405 Method Not Allowed
    MethodNotAllowed,
    /// 500 Internal Server Error
    InternalServerError,
}

impl StatusCode {
    /// Returns the numeric HTTP status code.
    ///
    /// # Example
    ///
    /// ```
    /// # use framecast::http::response::StatusCode;
    /// assert_eq!(StatusCode::Ok.as_u16(), 200);
    /// assert_eq!(StatusCode::NotFound.as_u16(), 404);
    /// ```
    pub fn as_u16(&self) -> u16 {
        match self {
            StatusCode::SwitchingProtocols => 101,
            StatusCode::Ok => 200,
            StatusCode::BadRequest => 400,
            StatusCode::Forbidden => 403,
            StatusCode::NotFound => 404,
            StatusCode::MethodNotAllowed => 405,
            StatusCode::InternalServerError => 500,
        }
    }

    /// Returns the standard HTTP reason phrase for this status code.
    pub fn reason_phrase(&self) -> &'static str {
        match self {
            StatusCode::SwitchingProtocols => "Switching Protocols",
            StatusCode::Ok => "OK",
            StatusCode::BadRequest => "Bad Request",
            StatusCode::Forbidden => "Forbidden",
            StatusCode::NotFound => "Not Found",
            StatusCode::MethodNotAllowed => "Method Not Allowed",
            StatusCode::InternalServerError => "Internal Server Error",
        }
    }
}

/// Represents a complete HTTP response ready to be sent to a client.
#[derive(Debug, PartialEq)]
pub struct Response {
    /// The HTTP status code
    pub status: StatusCode,
    /// HTTP headers as key-value pairs
    pub headers: HashMap<String, String>,
    /// Response body as bytes
    pub body: Vec<u8>,
}

/// Builder for constructing HTTP responses in a fluent style.
///
/// # Example
///
/// ```ignore
/// let response = ResponseBuilder::new(StatusCode::Ok)
///     .header("Content-Length", "1024")
///     .body(contents)
///     .build();
/// ```
pub struct ResponseBuilder {
    status: StatusCode,
    headers: HashMap<String, String>,
    body: Vec<u8>,
}

impl ResponseBuilder {
    /// Creates a new response builder with the specified status code.
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: HashMap::new(),
            body: Vec::new(),
        }
    }

    /// Adds or replaces a header.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Sets the response body.
    pub fn body(mut self, body: Vec<u8>) -> Self {
        self.body = body;
        self
    }

    /// Builds the final Response.
    ///
    /// A Content-Length header is derived from the body unless one was set
    /// explicitly. 101 Switching Protocols must not carry a Content-Length,
    /// so it is the one status left untouched. Every response is stamped
    /// with the Server header.
    pub fn build(mut self) -> Response {
        if self.status != StatusCode::SwitchingProtocols {
            self.headers
                .entry("Content-Length".to_string())
                .or_insert_with(|| self.body.len().to_string());
        }
        self.headers
            .entry("Server".to_string())
            .or_insert_with(|| SERVER_NAME.to_string());

        Response {
            status: self.status,
            headers: self.headers,
            body: self.body,
        }
    }
}

impl Response {
    /// Creates a simple 200 OK response with the given body.
    pub fn ok(body: impl Into<Vec<u8>>) -> Self {
        ResponseBuilder::new(StatusCode::Ok).body(body.into()).build()
    }

    /// Creates a 400 Bad Request response.
    pub fn bad_request() -> Self {
        ResponseBuilder::new(StatusCode::BadRequest)
            .body(b"400 Bad Request".to_vec())
            .build()
    }

    /// Creates a 403 Forbidden response.
    pub fn forbidden() -> Self {
        ResponseBuilder::new(StatusCode::Forbidden)
            .body(b"403 Forbidden".to_vec())
            .build()
    }

    /// Creates a 404 Not Found response.
    pub fn not_found() -> Self {
        ResponseBuilder::new(StatusCode::NotFound)
            .body(b"404 Not Found".to_vec())
            .build()
    }

    /// Creates a 405 Method Not Allowed response.
    pub fn method_not_allowed() -> Self {
        ResponseBuilder::new(StatusCode::MethodNotAllowed)
            .body(b"405 Method Not Allowed".to_vec())
            .build()
    }

    /// Creates a 500 Internal Server Error response.
    pub fn internal_error() -> Self {
        ResponseBuilder::new(StatusCode::InternalServerError)
            .body(b"500 Internal Server Error".to_vec())
            .build()
    }
}
