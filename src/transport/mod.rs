//! # Transport
//!
//! The seam between the session controller and the network. A transport owns
//! one connection and reports what happens to it as [`TransportEvent`]s on a
//! single-consumer queue, in arrival order. The controller never sees
//! callbacks, only events.
//!
//! ```text
//!   WsTransport task ──TransportEvent──▶ queue ──▶ SessionController
//!          ▲                                            │
//!          └──────────── send_text / close ◀────────────┘
//! ```

pub mod websocket;

use std::fmt;

pub use websocket::WsTransport;

/// Close code used when the connection dropped without a close handshake.
pub const ABNORMAL_CLOSURE: u16 = 1006;
/// Close code used when the peer sent a close frame without a status.
pub const NO_STATUS_RECEIVED: u16 = 1005;

/// Details of a connection close, for logging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloseInfo {
    pub code: u16,
    pub reason: String,
    pub was_clean: bool,
}

impl CloseInfo {
    pub fn abnormal() -> Self {
        Self {
            code: ABNORMAL_CLOSURE,
            reason: String::new(),
            was_clean: false,
        }
    }
}

/// Everything a transport can report about its connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    /// The handshake completed; frames may now be sent.
    Opened,
    /// One text frame from the remote end, verbatim.
    Frame(String),
    /// Something went wrong. A `Closed` event usually follows.
    Error(String),
    /// The connection is gone, from either side.
    Closed(CloseInfo),
}

/// Errors from handing a frame to a transport.
#[derive(Debug)]
pub enum TransportError {
    /// The connection task has already finished.
    ChannelClosed,
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportError::ChannelClosed => write!(f, "transport channel closed"),
        }
    }
}

impl std::error::Error for TransportError {}

/// A bidirectional plain-text connection.
///
/// Both methods are fire-and-forget: they never wait for the network.
pub trait Transport: Send {
    /// Queues one text frame for transmission.
    fn send_text(&mut self, text: &str) -> Result<(), TransportError>;

    /// Closes the connection. Must be safe whether the connection is still
    /// being opened, is open, or has already closed.
    fn close(&mut self);
}
