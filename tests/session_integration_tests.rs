use std::time::Duration;

use echodeck::core::message::Sender;
use echodeck::core::session::{ConnectionState, SessionController};
use echodeck::transport::{ABNORMAL_CLOSURE, Transport, TransportEvent, WsTransport};
use futures::{SinkExt, StreamExt};
use tokio::net::TcpListener;
use tokio::sync::mpsc::{UnboundedReceiver, unbounded_channel};
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;

// ============================================================================
// Helper Functions
// ============================================================================

/// Text frame that makes the echo server close the connection.
const CLOSE_REQUEST: &str = "please close";

/// Starts a local WebSocket server that echoes every data frame back, and
/// closes with 1001 when it receives [`CLOSE_REQUEST`].
async fn spawn_echo_server() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        while let Ok((stream, _)) = listener.accept().await {
            tokio::spawn(async move {
                let Ok(mut ws) = tokio_tungstenite::accept_async(stream).await else {
                    return;
                };
                while let Some(Ok(message)) = ws.next().await {
                    if message.to_text().is_ok_and(|text| text == CLOSE_REQUEST) {
                        let frame = CloseFrame {
                            code: CloseCode::Away,
                            reason: "going away".into(),
                        };
                        if ws.close(Some(frame)).await.is_err() {
                            return;
                        }
                        // Drain until the client answers the close
                        while let Some(Ok(_)) = ws.next().await {}
                        return;
                    }
                    if (message.is_text() || message.is_binary()) && ws.send(message).await.is_err()
                    {
                        return;
                    }
                }
            });
        }
    });

    format!("ws://{addr}")
}

/// An address nothing listens on.
async fn closed_port() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("ws://{addr}")
}

async fn next_event(events: &mut UnboundedReceiver<TransportEvent>) -> TransportEvent {
    tokio::time::timeout(Duration::from_secs(5), events.recv())
        .await
        .expect("timed out waiting for a transport event")
        .expect("transport event channel closed")
}

/// Feeds events into the session until it reaches `state`.
async fn pump_until(
    session: &mut SessionController,
    events: &mut UnboundedReceiver<TransportEvent>,
    state: ConnectionState,
) {
    while session.state() != state {
        let event = next_event(events).await;
        session.handle_event(event);
    }
}

// ============================================================================
// Session over a real WebSocket
// ============================================================================

#[tokio::test]
async fn test_echo_round_trip_through_session() {
    let url = spawn_echo_server().await;
    let (tx, mut events) = unbounded_channel();

    let mut session = SessionController::new();
    assert!(session.connect(Box::new(WsTransport::open(&url, tx))));
    assert_eq!(session.state(), ConnectionState::Disconnected);

    pump_until(&mut session, &mut events, ConnectionState::Connected).await;

    assert!(session.send("hello"));
    assert!(session.send("  spaced  "));
    assert_eq!(next_event(&mut events).await, TransportEvent::Frame("hello".into()));
    assert_eq!(
        next_event(&mut events).await,
        TransportEvent::Frame("  spaced  ".into())
    );
    session.handle_event(TransportEvent::Frame("hello".into()));
    session.handle_event(TransportEvent::Frame("  spaced  ".into()));

    let log: Vec<(Sender, &str)> = session
        .messages()
        .iter()
        .map(|m| (m.sender, m.text.as_str()))
        .collect();
    assert_eq!(
        log,
        vec![
            (Sender::User, "hello"),
            (Sender::User, "  spaced  "),
            (Sender::Assistant, "hello"),
            (Sender::Assistant, "  spaced  "),
        ]
    );

    session.teardown();
    assert_eq!(session.state(), ConnectionState::Closed);
}

#[tokio::test]
async fn test_unreachable_endpoint_reports_error_then_close() {
    let url = closed_port().await;
    let (tx, mut events) = unbounded_channel();

    let mut session = SessionController::new();
    session.connect(Box::new(WsTransport::open(&url, tx)));

    assert!(matches!(next_event(&mut events).await, TransportEvent::Error(_)));
    match next_event(&mut events).await {
        TransportEvent::Closed(close) => {
            assert_eq!(close.code, ABNORMAL_CLOSURE);
            assert!(!close.was_clean);
        }
        other => panic!("expected Closed, got {other:?}"),
    }

    assert!(!session.send("anyone?"));
    assert!(session.messages().is_empty());
    assert_eq!(session.state(), ConnectionState::Disconnected);
}

#[tokio::test]
async fn test_close_completes_handshake() {
    let url = spawn_echo_server().await;
    let (tx, mut events) = unbounded_channel();

    let mut transport = WsTransport::open(&url, tx);
    assert_eq!(next_event(&mut events).await, TransportEvent::Opened);

    transport.close();
    match next_event(&mut events).await {
        TransportEvent::Closed(close) => assert!(close.was_clean),
        other => panic!("expected Closed, got {other:?}"),
    }
}

#[tokio::test]
async fn test_server_close_keeps_log() {
    let url = spawn_echo_server().await;
    let (tx, mut events) = unbounded_channel();
    let mut session = SessionController::new();
    session.connect(Box::new(WsTransport::open(&url, tx)));
    pump_until(&mut session, &mut events, ConnectionState::Connected).await;

    assert!(session.send("kept"));
    // The server echoes, then closes with 1001 on this frame
    assert!(session.send(CLOSE_REQUEST));

    let mut close = None;
    while session.state() != ConnectionState::Disconnected {
        let event = next_event(&mut events).await;
        if let TransportEvent::Closed(info) = &event {
            close = Some(info.clone());
        }
        session.handle_event(event);
    }

    let close = close.expect("session disconnected without a Closed event");
    assert_eq!(close.code, 1001);
    assert_eq!(close.reason, "going away");
    assert!(close.was_clean);

    let log: Vec<(Sender, &str)> = session
        .messages()
        .iter()
        .map(|m| (m.sender, m.text.as_str()))
        .collect();
    assert_eq!(
        log,
        vec![
            (Sender::User, "kept"),
            (Sender::User, CLOSE_REQUEST),
            (Sender::Assistant, "kept"),
        ]
    );
    assert!(!session.send("lost"));
    assert_eq!(session.messages().len(), 3);
}
