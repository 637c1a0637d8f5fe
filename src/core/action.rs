//! # Actions
//!
//! Everything that can happen in echodeck becomes an `Action`.
//! User presses Enter? That's `Action::Submit(text)`.
//! A frame arrives? That's `Action::Transport(TransportEvent::Frame(..))`.
//!
//! The `update()` function applies an action to the state and returns an
//! [`Effect`] describing any follow-up work the adapter has to do (clear
//! the input, spawn a task, quit). I/O happens elsewhere.
//!
//! ```text
//! State + Action  →  update()  →  New State + Effect
//! ```

use log::{debug, info, warn};

use crate::core::state::{Analysis, App, DocumentsPhase};
use crate::documents::Document;
use crate::transport::TransportEvent;

#[derive(Debug)]
pub enum Action {
    /// Something happened on the chat connection.
    Transport(TransportEvent),
    /// The user submitted the input box.
    Submit(String),
    DocumentsLoaded(Vec<Document>),
    DocumentsFailed(String),
    /// Analyse the document at this row.
    Analyze(usize),
    AnalysisFinished {
        index: usize,
        result: Result<String, String>,
    },
    Quit,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    None,
    /// The submitted text was sent; clear the pending input.
    ClearInput,
    SpawnAnalysis { index: usize, document: Document },
    Quit,
}

pub fn update(app: &mut App, action: Action) -> Effect {
    match action {
        Action::Transport(event) => {
            app.session.handle_event(event);
            Effect::None
        }
        Action::Submit(text) => {
            if app.session.send(&text) {
                Effect::ClearInput
            } else {
                debug!("Submit ignored (blank input or not connected)");
                Effect::None
            }
        }
        Action::DocumentsLoaded(documents) => {
            app.documents.documents = documents;
            app.documents.phase = DocumentsPhase::Ready;
            Effect::None
        }
        Action::DocumentsFailed(error) => {
            app.documents.phase = DocumentsPhase::Failed(error.clone());
            app.status_message = format!("Failed to load documents: {error}");
            Effect::None
        }
        Action::Analyze(index) => {
            if app.documents.is_analyzing() {
                debug!("Analysis already running, ignoring request for row {}", index);
                return Effect::None;
            }
            let Some(document) = app.documents.documents.get(index).cloned() else {
                warn!("Analyze requested for missing row {}", index);
                return Effect::None;
            };
            app.documents.analysis = Some(Analysis {
                index,
                in_progress: true,
                result: None,
            });
            Effect::SpawnAnalysis { index, document }
        }
        Action::AnalysisFinished { index, result } => {
            let Some(analysis) = app.documents.analysis.as_mut().filter(|a| a.index == index) else {
                warn!("Analysis result for row {} arrived without a request", index);
                return Effect::None;
            };
            analysis.in_progress = false;
            match result {
                Ok(text) => analysis.result = Some(text),
                Err(e) => {
                    warn!("Analysis of row {} failed: {}", index, e);
                    app.status_message = format!("Analysis failed: {e}");
                }
            }
            Effect::None
        }
        Action::Quit => {
            info!("Quit requested");
            app.session.teardown();
            Effect::Quit
        }
    }
}
