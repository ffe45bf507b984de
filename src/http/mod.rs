//! HTTP protocol implementation.
//!
//! This module implements the HTTP/1.1 front end of the sink: enough of the
//! protocol to serve the viewer page with keep-alive support and to accept
//! websocket handshakes.
//!
//! # Architecture
//!
//! - **`connection`**: The main connection handler implementing the request-response state machine
//! - **`parser`**: Parses incoming HTTP requests from byte buffers
//! - **`request`**: HTTP request representation and parsing utilities
//! - **`response`**: HTTP response representation with builder pattern
//! - **`writer`**: Serializes and writes HTTP responses to the client
//!
//! # Connection State Machine
//!
//! Each client connection goes through a state machine:
//!
//! ```text
//!        ┌─────────────┐
//!        │   Reading   │ ← Wait for incoming request data
//!        └──────┬──────┘
//!               │ Request received
//!               ▼
//!        ┌──────────────────┐
//!        │   Processing     │ ← Route: static file or websocket handshake
//!        └──────┬───────────┘
//!               │
//!               ├─ File response → Writing
//!               │                    ├─ Keep-Alive → Reading
//!               │                    └─ Close → Closed
//!               │
//!               └─ Handshake accepted → Upgrading
//!                                         └─ 101 sent → stream handed to
//!                                            the websocket layer
//! ```

pub mod connection;
pub mod parser;
pub mod request;
pub mod response;
pub mod writer;
