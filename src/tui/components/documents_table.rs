//! # DocumentsTable Component
//!
//! Table of documents with a row cursor. While the listing is still loading
//! it shows skeleton rows; if loading failed it shows the error instead.

use ratatui::Frame;
use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, BorderType, Cell, Paragraph, Row, Table, TableState, Wrap};

use crate::core::state::{DocumentsPhase, DocumentsState};
use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

const SKELETON_ROWS: usize = 10;
const SKELETON: &str = "░░░░░░░░░░░░";

/// Emitted when the user opens a row.
#[derive(Debug, Clone, PartialEq)]
pub enum TableEvent {
    OpenDetails(usize),
}

/// Row cursor for the table. Persisted in TuiState.
#[derive(Default)]
pub struct DocumentsTableState {
    pub table_state: TableState,
    /// Number of rows, refreshed every frame (for clamping selection).
    pub row_count: usize,
}

impl DocumentsTableState {
    pub fn selected(&self) -> Option<usize> {
        self.table_state.selected().filter(|&i| i < self.row_count)
    }

    fn select_offset(&mut self, delta: isize) {
        if self.row_count == 0 {
            self.table_state.select(None);
            return;
        }
        let current = self.table_state.selected().unwrap_or(0) as isize;
        let next = (current + delta).clamp(0, self.row_count as isize - 1);
        self.table_state.select(Some(next as usize));
    }
}

impl EventHandler for DocumentsTableState {
    type Event = TableEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::ScrollUp => self.select_offset(-1),
            TuiEvent::ScrollDown => self.select_offset(1),
            TuiEvent::ScrollPageUp => self.select_offset(-(SKELETON_ROWS as isize)),
            TuiEvent::ScrollPageDown => self.select_offset(SKELETON_ROWS as isize),
            TuiEvent::Submit => return self.selected().map(TableEvent::OpenDetails),
            _ => {}
        }
        None
    }
}

pub struct DocumentsTable<'a> {
    pub state: &'a mut DocumentsTableState,
    pub documents: &'a DocumentsState,
}

impl<'a> DocumentsTable<'a> {
    pub fn new(state: &'a mut DocumentsTableState, documents: &'a DocumentsState) -> Self {
        Self { state, documents }
    }

    fn header() -> Row<'static> {
        Row::new(["File name", "Version", "Size", "Uploaded", "Actions"])
            .style(Style::default().add_modifier(Modifier::BOLD))
    }

    fn widths() -> [Constraint; 5] {
        [
            Constraint::Fill(3),
            Constraint::Length(8),
            Constraint::Length(8),
            Constraint::Length(12),
            Constraint::Length(10),
        ]
    }
}

impl Component for DocumentsTable<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .title("Documents");

        let rows: Vec<Row> = match &self.documents.phase {
            DocumentsPhase::Loading => {
                self.state.row_count = 0;
                let skeleton = Style::default().fg(Color::DarkGray);
                (0..SKELETON_ROWS)
                    .map(|_| Row::new(vec![Cell::from(SKELETON); 5]).style(skeleton))
                    .collect()
            }
            DocumentsPhase::Failed(error) => {
                self.state.row_count = 0;
                let message = Paragraph::new(format!("Could not load documents: {error}"))
                    .style(Style::default().fg(Color::Red))
                    .wrap(Wrap { trim: true })
                    .block(block);
                frame.render_widget(message, area);
                return;
            }
            DocumentsPhase::Ready => {
                self.state.row_count = self.documents.documents.len();
                if self.state.table_state.selected().is_none() && self.state.row_count > 0 {
                    self.state.table_state.select(Some(0));
                }
                self.documents
                    .documents
                    .iter()
                    .map(|doc| {
                        Row::new(vec![
                            Cell::from(doc.file_name.as_str()),
                            Cell::from(doc.version.as_str()),
                            Cell::from(doc.size.as_str()),
                            Cell::from(doc.upload_date.as_str()),
                            Cell::from("[Details]"),
                        ])
                    })
                    .collect()
            }
        };

        let table = Table::new(rows, Self::widths())
            .header(Self::header())
            .block(block)
            .row_highlight_style(Style::default().bg(Color::DarkGray))
            .highlight_symbol("▸ ");

        frame.render_stateful_widget(table, area, &mut self.state.table_state);
    }
}
