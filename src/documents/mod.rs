//! # Documents
//!
//! The documents table: a listing fetched from a placeholder REST API and
//! a mocked analysis action. Independent from the chat session.

pub mod service;
pub mod types;

pub use service::{
    ANALYSIS_COMPLETE, AnalysisService, DocumentSource, DocumentsError, JsonPlaceholderSource,
    MockAnalysis,
};
pub use types::{Document, Post};
