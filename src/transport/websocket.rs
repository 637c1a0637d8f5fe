//! WebSocket transport backed by `tokio-tungstenite`.
//!
//! Each [`WsTransport`] spawns one task that connects, then multiplexes
//! inbound frames and outbound commands until either side closes. The task
//! always finishes by emitting exactly one [`TransportEvent::Closed`].

use std::time::Duration;

use futures::{SinkExt, StreamExt};
use log::{debug, info, warn};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::time::Instant;
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tokio_tungstenite::tungstenite::protocol::CloseFrame;

use super::{CloseInfo, NO_STATUS_RECEIVED, Transport, TransportError, TransportEvent};

/// How long to wait for the peer to answer our close frame.
const CLOSE_GRACE: Duration = Duration::from_secs(3);

enum Command {
    Text(String),
    Close,
}

/// Handle to one WebSocket connection.
///
/// Dropping the handle closes the connection, same as [`Transport::close`].
pub struct WsTransport {
    commands: UnboundedSender<Command>,
}

impl WsTransport {
    /// Starts connecting to `endpoint` in the background and returns
    /// immediately. Must be called from within a tokio runtime.
    pub fn open(endpoint: &str, events: UnboundedSender<TransportEvent>) -> Self {
        let (commands, command_rx) = mpsc::unbounded_channel();
        tokio::spawn(drive(endpoint.to_string(), events, command_rx));
        Self { commands }
    }
}

impl Transport for WsTransport {
    fn send_text(&mut self, text: &str) -> Result<(), TransportError> {
        self.commands
            .send(Command::Text(text.to_string()))
            .map_err(|_| TransportError::ChannelClosed)
    }

    fn close(&mut self) {
        if self.commands.send(Command::Close).is_err() {
            debug!("Close requested after the connection task finished");
        }
    }
}

fn emit(events: &UnboundedSender<TransportEvent>, event: TransportEvent) {
    if events.send(event).is_err() {
        debug!("Transport event dropped: receiver gone");
    }
}

fn close_info(frame: Option<CloseFrame>) -> CloseInfo {
    match frame {
        Some(frame) => CloseInfo {
            code: u16::from(frame.code),
            reason: frame.reason.to_string(),
            was_clean: true,
        },
        None => CloseInfo {
            code: NO_STATUS_RECEIVED,
            reason: String::new(),
            was_clean: true,
        },
    }
}

/// Resolves once a close is requested (or the handle is dropped).
async fn wait_for_close(commands: &mut UnboundedReceiver<Command>) {
    loop {
        match commands.recv().await {
            Some(Command::Text(_)) => warn!("Dropping frame queued before the connection opened"),
            Some(Command::Close) | None => return,
        }
    }
}

async fn drive(
    endpoint: String,
    events: UnboundedSender<TransportEvent>,
    mut commands: UnboundedReceiver<Command>,
) {
    info!("Connecting to {}", endpoint);

    let stream = tokio::select! {
        result = tokio_tungstenite::connect_async(endpoint.as_str()) => match result {
            Ok((stream, response)) => {
                info!("WebSocket connected to {} (HTTP {})", endpoint, response.status());
                stream
            }
            Err(e) => {
                warn!("WebSocket connect to {} failed: {}", endpoint, e);
                emit(&events, TransportEvent::Error(e.to_string()));
                emit(&events, TransportEvent::Closed(CloseInfo::abnormal()));
                return;
            }
        },
        () = wait_for_close(&mut commands) => {
            info!("Connection attempt to {} cancelled", endpoint);
            emit(&events, TransportEvent::Closed(CloseInfo::abnormal()));
            return;
        }
    };

    emit(&events, TransportEvent::Opened);

    let (mut sink, mut source) = stream.split();
    let mut received_close: Option<CloseInfo> = None;
    let mut closing = false;
    let mut close_deadline = Instant::now();

    let outcome = loop {
        tokio::select! {
            incoming = source.next() => match incoming {
                Some(Ok(WsMessage::Text(text))) => {
                    debug!("Frame received (len={})", text.len());
                    emit(&events, TransportEvent::Frame(text.as_str().to_owned()));
                }
                Some(Ok(WsMessage::Binary(bytes))) => {
                    debug!("Binary frame received (len={}), decoding lossily", bytes.len());
                    emit(
                        &events,
                        TransportEvent::Frame(String::from_utf8_lossy(&bytes).into_owned()),
                    );
                }
                Some(Ok(WsMessage::Close(frame))) => {
                    debug!("Close frame received: {:?}", frame);
                    received_close = Some(close_info(frame));
                }
                // Ping/pong are answered by tungstenite itself
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    warn!("WebSocket error: {}", e);
                    emit(&events, TransportEvent::Error(e.to_string()));
                    break received_close.take().unwrap_or_else(CloseInfo::abnormal);
                }
                None => break received_close.take().unwrap_or_else(CloseInfo::abnormal),
            },
            command = commands.recv(), if !closing => match command {
                Some(Command::Text(text)) => {
                    debug!("Sending frame (len={})", text.len());
                    if let Err(e) = sink.send(WsMessage::text(text)).await {
                        warn!("Failed to send frame: {}", e);
                        emit(&events, TransportEvent::Error(e.to_string()));
                    }
                }
                Some(Command::Close) | None => {
                    info!("Closing WebSocket connection to {}", endpoint);
                    closing = true;
                    close_deadline = Instant::now() + CLOSE_GRACE;
                    if let Err(e) = sink.send(WsMessage::Close(None)).await {
                        debug!("Close frame not sent: {}", e);
                    }
                }
            },
            () = tokio::time::sleep_until(close_deadline), if closing => {
                warn!("Peer did not finish the close handshake within {:?}", CLOSE_GRACE);
                break CloseInfo::abnormal();
            }
        }
    };

    info!(
        "WebSocket disconnected: code={} reason={:?} was_clean={}",
        outcome.code, outcome.reason, outcome.was_clean
    );
    emit(&events, TransportEvent::Closed(outcome));
}
