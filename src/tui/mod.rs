//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the UI,
//! translates keyboard events into core::Action values and runs the
//! background tasks that effects ask for.
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Event Flow
//!
//! ```text
//! crossterm ──► TuiEvent ──► dispatch() ──► update() ──► Effect
//!                                                          │
//! transport task ─┐                                        ▼
//! fetch task ─────┼──► mpsc<Action> ──► update()     spawn / quit
//! analysis task ──┘
//! ```
//!
//! ## Redraw Strategy
//!
//! Draws only when something happened. While documents are loading or an
//! analysis runs the loop wakes every ~80ms, otherwise it sleeps up to 200ms
//! between polls.

mod component;
mod components;
mod event;
mod ui;

use log::{debug, error, info, warn};
use std::io::stdout;
use std::sync::{Arc, mpsc};
use std::time::Duration;

use crossterm::cursor::{Hide, SetCursorStyle, Show};
use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
};
use crossterm::execute;

use crate::core::action::{Action, Effect, update};
use crate::core::config::ResolvedConfig;
use crate::core::state::{App, DocumentsPhase};
use crate::documents::{
    AnalysisService, Document, DocumentSource, JsonPlaceholderSource, MockAnalysis,
};
use crate::transport::{TransportEvent, WsTransport};
use crate::tui::component::EventHandler;
use crate::tui::components::{
    DocumentsTableState, InputBox, InputEvent, MessageListState, TableEvent,
};
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};

const ANIMATING_POLL: Duration = Duration::from_millis(80);
const IDLE_POLL: Duration = Duration::from_millis(200);

/// Top-level screens, listed in the sidebar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Chat,
    Documents,
}

impl View {
    pub const ALL: [View; 2] = [View::Chat, View::Documents];

    pub fn title(self) -> &'static str {
        match self {
            View::Chat => "Chat",
            View::Documents => "Documents",
        }
    }

    pub fn next(self) -> Self {
        match self {
            View::Chat => View::Documents,
            View::Documents => View::Chat,
        }
    }
}

/// TUI-specific presentation state (not part of core business logic)
pub struct TuiState {
    pub view: View,
    // Persistent component states
    pub message_list: MessageListState,
    pub input_box: InputBox,
    pub documents_table: DocumentsTableState,
    /// Row whose details dialog is open
    pub dialog: Option<usize>,
}

impl Default for TuiState {
    fn default() -> Self {
        Self::new()
    }
}

impl TuiState {
    pub fn new() -> Self {
        Self {
            view: View::Chat,
            message_list: MessageListState::new(),
            input_box: InputBox::new(),
            documents_table: DocumentsTableState::default(),
            dialog: None,
        }
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        execute!(
            stdout(),
            EnableMouseCapture,
            EnableBracketedPaste,
            Show,
            SetCursorStyle::SteadyBlock
        )?;
        info!("Terminal modes enabled (mouse, bracketed paste, steady block cursor)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(
            stdout(),
            DisableMouseCapture,
            DisableBracketedPaste,
            Hide
        );
    }
}

/// Background services the event loop hands work to.
struct Services {
    tx: mpsc::Sender<Action>,
    analysis: Arc<dyn AnalysisService>,
}

pub fn run(config: ResolvedConfig) -> std::io::Result<()> {
    let mut app = App::new(&config);
    let mut tui = TuiState::new();

    // Channel for actions from background tasks
    let (tx, rx) = mpsc::channel();

    let (event_tx, event_rx) = tokio::sync::mpsc::unbounded_channel();
    spawn_transport_forwarder(event_rx, tx.clone());
    info!("Connecting to {}", config.endpoint);
    app.session
        .connect(Box::new(WsTransport::open(&config.endpoint, event_tx)));

    let source: Arc<dyn DocumentSource> = Arc::new(JsonPlaceholderSource::new(
        config.docs_base_url.clone(),
        config.docs_limit,
    ));
    spawn_documents_fetch(source, tx.clone());

    let services = Services {
        tx,
        analysis: Arc::new(MockAnalysis::new(config.analysis_delay)),
    };

    let mut terminal = ratatui::init();
    let result = TerminalModeGuard::new()
        .and_then(|_guard| event_loop(&mut terminal, &mut app, &mut tui, &rx, &services));

    app.session.teardown();
    ratatui::restore();
    result
}

fn event_loop(
    terminal: &mut ratatui::DefaultTerminal,
    app: &mut App,
    tui: &mut TuiState,
    rx: &mpsc::Receiver<Action>,
    services: &Services,
) -> std::io::Result<()> {
    let mut needs_redraw = true; // Force first frame

    loop {
        let animating =
            app.documents.phase == DocumentsPhase::Loading || app.documents.is_analyzing();

        if needs_redraw {
            terminal.draw(|f| ui::draw_ui(f, app, tui))?;
            needs_redraw = false;
        }

        let first_event = poll_event_timeout(if animating { ANIMATING_POLL } else { IDLE_POLL });
        if first_event.is_some() {
            needs_redraw = true;
        }

        // Process first event + drain pending events before next draw
        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            if apply_effect(dispatch(app, tui, event), services) {
                return Ok(());
            }
        }

        // Handle background task actions
        while let Ok(action) = rx.try_recv() {
            needs_redraw = true;
            debug!("Event loop received: {:?}", action);
            let effect = update(app, action);
            if apply_effect(effect, services) {
                return Ok(());
            }
        }
    }
}

/// Routes one terminal event to the active view. Effects that only touch
/// presentation state are applied here; the rest are returned.
fn dispatch(app: &mut App, tui: &mut TuiState, event: TuiEvent) -> Effect {
    match event {
        TuiEvent::Quit => return update(app, Action::Quit),
        TuiEvent::Resize => return Effect::None,
        TuiEvent::SwitchView if tui.dialog.is_none() => {
            tui.view = tui.view.next();
            return Effect::None;
        }
        _ => {}
    }

    match tui.view {
        View::Chat => dispatch_chat(app, tui, event),
        View::Documents => dispatch_documents(app, tui, event),
    }
}

fn dispatch_chat(app: &mut App, tui: &mut TuiState, event: TuiEvent) -> Effect {
    match event {
        TuiEvent::Escape => update(app, Action::Quit),
        TuiEvent::ScrollUp
        | TuiEvent::ScrollDown
        | TuiEvent::ScrollPageUp
        | TuiEvent::ScrollPageDown => {
            tui.message_list.handle_event(&event);
            Effect::None
        }
        _ => match tui.input_box.handle_event(&event) {
            Some(InputEvent::Submit(text)) => match update(app, Action::Submit(text)) {
                Effect::ClearInput => {
                    tui.input_box.clear();
                    Effect::None
                }
                effect => effect,
            },
            Some(InputEvent::ContentChanged) | None => Effect::None,
        },
    }
}

fn dispatch_documents(app: &mut App, tui: &mut TuiState, event: TuiEvent) -> Effect {
    if let Some(index) = tui.dialog {
        return match event {
            TuiEvent::Escape => {
                tui.dialog = None;
                Effect::None
            }
            TuiEvent::InputChar('a') => update(app, Action::Analyze(index)),
            _ => Effect::None,
        };
    }

    if matches!(event, TuiEvent::Escape) {
        return update(app, Action::Quit);
    }
    if let Some(TableEvent::OpenDetails(index)) = tui.documents_table.handle_event(&event) {
        debug!("Opening details for row {}", index);
        tui.dialog = Some(index);
    }
    Effect::None
}

/// Runs the side effect. Returns `true` when the loop should stop.
fn apply_effect(effect: Effect, services: &Services) -> bool {
    match effect {
        Effect::Quit => true,
        Effect::SpawnAnalysis { index, document } => {
            spawn_analysis(
                index,
                document,
                Arc::clone(&services.analysis),
                services.tx.clone(),
            );
            false
        }
        Effect::None | Effect::ClearInput => false,
    }
}

fn spawn_transport_forwarder(
    mut events: tokio::sync::mpsc::UnboundedReceiver<TransportEvent>,
    tx: mpsc::Sender<Action>,
) {
    tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            if tx.send(Action::Transport(event)).is_err() {
                debug!("Transport forwarder stopping: receiver dropped");
                return;
            }
        }
    });
}

fn spawn_documents_fetch(source: Arc<dyn DocumentSource>, tx: mpsc::Sender<Action>) {
    info!("Spawning documents fetch");
    tokio::spawn(async move {
        let action = match source.list_documents().await {
            Ok(documents) => {
                info!("Loaded {} documents", documents.len());
                Action::DocumentsLoaded(documents)
            }
            Err(e) => {
                error!("Failed to load documents: {}", e);
                Action::DocumentsFailed(e.to_string())
            }
        };
        if tx.send(action).is_err() {
            warn!("Failed to deliver documents: receiver dropped");
        }
    });
}

fn spawn_analysis(
    index: usize,
    document: Document,
    service: Arc<dyn AnalysisService>,
    tx: mpsc::Sender<Action>,
) {
    info!("Spawning analysis of {}", document.file_name);
    tokio::spawn(async move {
        let result = service
            .analyze(&document)
            .await
            .map_err(|e| e.to_string());
        if tx.send(Action::AnalysisFinished { index, result }).is_err() {
            warn!("Failed to deliver analysis of row {}: receiver dropped", index);
        }
    });
}
