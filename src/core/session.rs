//! # Live-Message Session
//!
//! `SessionController` owns the one transport handle of a chat session, its
//! connection state and the message log. Every transition is a method on
//! the controller; transport activity arrives as [`TransportEvent`]s.
//!
//! ```text
//!                 Opened                    Closed(..)
//!  Disconnected ──────────▶ Connected ──────────────▶ Disconnected
//!       │                       │
//!       └──── teardown() ───────┴────▶ Closed (terminal)
//! ```
//!
//! Sends are gated on `Connected` only; there is no separate "connecting"
//! state. Nothing reconnects automatically.

use log::{debug, info, warn};

use crate::core::message::{Message, MessageLog, Sender};
use crate::transport::{CloseInfo, Transport, TransportEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// No open connection (not yet opened, or closed by the peer/network).
    Disconnected,
    /// Handshake complete; sends are accepted.
    Connected,
    /// Torn down. No further transitions.
    Closed,
}

pub struct SessionController {
    transport: Option<Box<dyn Transport>>,
    state: ConnectionState,
    log: MessageLog,
}

impl Default for SessionController {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionController {
    pub fn new() -> Self {
        Self {
            transport: None,
            state: ConnectionState::Disconnected,
            log: MessageLog::new(),
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn is_connected(&self) -> bool {
        self.state == ConnectionState::Connected
    }

    pub fn messages(&self) -> &[Message] {
        self.log.messages()
    }

    /// Adopts the transport for this session. The transport is expected to be
    /// opening its connection already; the controller becomes `Connected`
    /// when it reports [`TransportEvent::Opened`].
    ///
    /// Only the first call per session is honoured. Later handles (or any
    /// handle offered after teardown) are closed straight away.
    pub fn connect(&mut self, mut transport: Box<dyn Transport>) -> bool {
        if self.state == ConnectionState::Closed || self.transport.is_some() {
            warn!("Session already has a transport, closing the extra one");
            transport.close();
            return false;
        }
        info!("Session transport attached");
        self.transport = Some(transport);
        true
    }

    /// Applies one transport event. Returns `true` if visible state changed.
    pub fn handle_event(&mut self, event: TransportEvent) -> bool {
        if self.state == ConnectionState::Closed {
            debug!("Ignoring transport event after teardown: {:?}", event);
            return false;
        }
        match event {
            TransportEvent::Opened => self.on_open(),
            TransportEvent::Frame(payload) => self.on_remote_data(payload),
            TransportEvent::Error(error) => self.on_transport_error(&error),
            TransportEvent::Closed(close) => self.on_transport_close(&close),
        }
    }

    fn on_open(&mut self) -> bool {
        if self.state != ConnectionState::Disconnected {
            return false;
        }
        info!("Session connected");
        self.state = ConnectionState::Connected;
        true
    }

    fn on_remote_data(&mut self, payload: String) -> bool {
        let message = self.log.append(Sender::Assistant, payload);
        debug!("Appended assistant message {}", message.id);
        true
    }

    /// Errors are reported only. The close event that follows does the
    /// state change.
    fn on_transport_error(&mut self, error: &str) -> bool {
        warn!("Transport error: {}", error);
        false
    }

    fn on_transport_close(&mut self, close: &CloseInfo) -> bool {
        info!(
            "Session disconnected: code={} reason={:?} was_clean={}",
            close.code, close.reason, close.was_clean
        );
        let changed = self.state == ConnectionState::Connected;
        self.state = ConnectionState::Disconnected;
        changed
    }

    /// Sends one user message.
    ///
    /// Silently does nothing (returns `false`) when `text` is blank or the
    /// session is not connected. On success the message is logged first and
    /// then transmitted verbatim as a single frame.
    pub fn send(&mut self, text: &str) -> bool {
        if text.trim().is_empty() || self.state != ConnectionState::Connected {
            return false;
        }
        let Some(transport) = self.transport.as_mut() else {
            return false;
        };

        let message = self.log.append(Sender::User, text.to_string());
        debug!("Appended user message {}", message.id);

        if let Err(e) = transport.send_text(text) {
            warn!("Failed to hand frame to transport: {}", e);
        }
        true
    }

    /// Closes the connection and ends the session. Safe to call in any
    /// state, any number of times.
    pub fn teardown(&mut self) {
        if let Some(mut transport) = self.transport.take() {
            info!("Tearing down session ({} messages)", self.log.len());
            transport.close();
        }
        self.state = ConnectionState::Closed;
    }
}
