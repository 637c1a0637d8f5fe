//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::sync::{Arc, Mutex};

use crate::core::config::{CliOverrides, EchodeckConfig, resolve};
use crate::core::session::SessionController;
use crate::core::state::App;
use crate::transport::{Transport, TransportError, TransportEvent};

#[derive(Default)]
struct Recorded {
    sent: Vec<String>,
    closes: usize,
}

/// A transport that records frames and close calls instead of touching the network.
pub struct RecordingTransport {
    recorded: Arc<Mutex<Recorded>>,
}

/// Read side of a [`RecordingTransport`], kept by the test after the
/// transport itself is boxed into a session.
#[derive(Clone)]
pub struct TransportProbe {
    recorded: Arc<Mutex<Recorded>>,
}

impl RecordingTransport {
    pub fn new() -> (Self, TransportProbe) {
        let recorded = Arc::new(Mutex::new(Recorded::default()));
        (
            Self {
                recorded: Arc::clone(&recorded),
            },
            TransportProbe { recorded },
        )
    }
}

impl Transport for RecordingTransport {
    fn send_text(&mut self, text: &str) -> Result<(), TransportError> {
        self.recorded.lock().unwrap().sent.push(text.to_string());
        Ok(())
    }

    fn close(&mut self) {
        self.recorded.lock().unwrap().closes += 1;
    }
}

impl TransportProbe {
    pub fn sent(&self) -> Vec<String> {
        self.recorded.lock().unwrap().sent.clone()
    }

    pub fn close_count(&self) -> usize {
        self.recorded.lock().unwrap().closes
    }
}

/// A session with a recording transport that has already reported `Opened`.
pub fn connected_session() -> (SessionController, TransportProbe) {
    let (transport, probe) = RecordingTransport::new();
    let mut session = SessionController::new();
    session.connect(Box::new(transport));
    session.handle_event(TransportEvent::Opened);
    (session, probe)
}

/// Creates a test App from the built-in defaults, with a connected session.
pub fn test_app() -> (App, TransportProbe) {
    let config = resolve(&EchodeckConfig::default(), &CliOverrides::default());
    let mut app = App::new(&config);
    let (session, probe) = connected_session();
    app.session = session;
    (app, probe)
}
