//! Websocket endpoint: handshake validation and the single-viewer
//! connection slot.

pub mod handshake;
pub mod slot;

pub use handshake::{STREAM_PATH, UpgradeError};
pub use slot::{ConnectionSlot, LiveConnection, SendOutcome};
