//! # TUI Components
//!
//! All UI pieces of the terminal interface.
//!
//! ## Component Architecture
//!
//! ### Stateless Components (Props-Based Rendering)
//!
//! Receive all data as fields, filled in by the parent each frame:
//! - `TitleBar`: view name, connection glyph, status text
//! - `Sidebar`: view navigation
//! - `MessageBubble`: a single chat message
//! - `DocumentDialog`: details of one document plus the analyze action
//!
//! ### Stateful Components (Event-Driven)
//!
//! Keep local state across frames and emit events to the parent:
//! - `InputBox`: single-line message editor
//! - `MessageList`: scrollable chat log with layout caching
//! - `DocumentsTable`: document rows with a selection cursor
//!
//! Components receive external data as props rather than reading `App`
//! directly, so each one renders in isolation under a `TestBackend`.
//!
//! ```text
//! components/
//! ├── mod.rs
//! ├── title_bar.rs
//! ├── sidebar.rs
//! ├── message.rs
//! ├── message_list.rs
//! ├── input_box.rs
//! ├── documents_table.rs
//! └── document_dialog.rs
//! ```

mod title_bar;
pub use title_bar::TitleBar;

pub mod document_dialog;
pub mod documents_table;
pub mod input_box;
pub mod message;
pub mod message_list;
pub mod sidebar;

pub use document_dialog::DocumentDialog;
pub use documents_table::{DocumentsTable, DocumentsTableState, TableEvent};
pub use input_box::{InputBox, InputEvent};
pub use message_list::{MessageList, MessageListState};
pub use sidebar::Sidebar;
