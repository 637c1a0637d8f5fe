//! # Application State
//!
//! Core business state for echodeck. This module contains domain logic only,
//! no TUI-specific types. Presentation state lives in the `tui` module.
//!
//! ```text
//! App
//! ├── session: SessionController     // chat connection + message log
//! ├── endpoint: String               // where the session connects
//! ├── documents: DocumentsState      // table rows + analysis progress
//! └── status_message: String         // status bar text
//! ```
//!
//! State changes only happen through `update(state, action)` in action.rs.

use crate::core::config::ResolvedConfig;
use crate::core::session::SessionController;
use crate::documents::Document;

/// Progress of the one-off document listing fetch.
#[derive(Debug, Clone, PartialEq)]
pub enum DocumentsPhase {
    Loading,
    Ready,
    Failed(String),
}

/// The most recent analysis request.
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    /// Row index of the analysed document.
    pub index: usize,
    pub in_progress: bool,
    pub result: Option<String>,
}

#[derive(Debug)]
pub struct DocumentsState {
    pub phase: DocumentsPhase,
    pub documents: Vec<Document>,
    pub analysis: Option<Analysis>,
}

impl Default for DocumentsState {
    fn default() -> Self {
        Self {
            phase: DocumentsPhase::Loading,
            documents: Vec::new(),
            analysis: None,
        }
    }
}

impl DocumentsState {
    /// True while any analysis is running (only one runs at a time).
    pub fn is_analyzing(&self) -> bool {
        self.analysis.as_ref().is_some_and(|a| a.in_progress)
    }

    /// Finished result for the document at `index`, if it was the one analysed.
    pub fn result_for(&self, index: usize) -> Option<&str> {
        self.analysis
            .as_ref()
            .filter(|a| a.index == index)
            .and_then(|a| a.result.as_deref())
    }
}

pub struct App {
    pub session: SessionController,
    pub endpoint: String,
    pub documents: DocumentsState,
    pub status_message: String,
}

impl App {
    pub fn new(config: &ResolvedConfig) -> Self {
        Self {
            session: SessionController::new(),
            endpoint: config.endpoint.clone(),
            documents: DocumentsState::default(),
            status_message: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::test_app;

    #[test]
    fn test_app_new_defaults() {
        let (app, _probe) = test_app();
        assert_eq!(app.documents.phase, DocumentsPhase::Loading);
        assert!(app.documents.documents.is_empty());
        assert!(!app.documents.is_analyzing());
        assert!(app.status_message.is_empty());
    }

    #[test]
    fn test_result_only_for_analysed_row() {
        let state = DocumentsState {
            phase: DocumentsPhase::Ready,
            documents: Vec::new(),
            analysis: Some(Analysis {
                index: 2,
                in_progress: false,
                result: Some("done".into()),
            }),
        };
        assert_eq!(state.result_for(2), Some("done"));
        assert_eq!(state.result_for(1), None);
        assert!(!state.is_analyzing());
    }
}
