//! # InputBox Component
//!
//! Single-line message input.
//!
//! ## Responsibilities
//!
//! - Capture text input and basic editing (backspace, delete, cursor movement, paste)
//! - Emit `Submit` on Enter for non-blank input
//! - Show a placeholder that reflects the connection state
//!
//! ## State Management
//!
//! The buffer is internal state and is *not* cleared on submit: the parent
//! clears it only once the session actually sent the message, so text typed
//! while disconnected is kept.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::widgets::{Block, BorderType, Paragraph};
use unicode_width::UnicodeWidthChar;

use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

/// Borders (1 left + 1 right).
const HORIZONTAL_OVERHEAD: u16 = 2;
pub const HEIGHT: u16 = 3;

pub const PLACEHOLDER_CONNECTED: &str = "Type a message...";
pub const PLACEHOLDER_DISCONNECTED: &str = "No WebSocket connection";

/// High-level events emitted by the InputBox
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// User pressed Enter with non-blank text
    Submit(String),
    ContentChanged,
}

pub struct InputBox {
    /// Text buffer (Internal State)
    pub buffer: String,
    /// Whether the session can send (Prop)
    pub connected: bool,
    /// Cursor position as byte offset in buffer
    cursor: usize,
    /// First visible display column
    scroll: usize,
}

impl Default for InputBox {
    fn default() -> Self {
        Self::new()
    }
}

impl InputBox {
    pub fn new() -> Self {
        Self {
            buffer: String::new(),
            connected: false,
            cursor: 0,
            scroll: 0,
        }
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
        self.cursor = 0;
        self.scroll = 0;
    }

    fn placeholder(&self) -> &'static str {
        if self.connected {
            PLACEHOLDER_CONNECTED
        } else {
            PLACEHOLDER_DISCONNECTED
        }
    }

    /// Display width of the text before the cursor.
    fn cursor_column(&self) -> usize {
        self.buffer[..self.cursor]
            .chars()
            .map(|c| c.width().unwrap_or(0))
            .sum()
    }

    /// Keeps the cursor inside a window of `width` columns.
    fn update_scroll(&mut self, width: usize) {
        if width == 0 {
            self.scroll = 0;
            return;
        }
        let column = self.cursor_column();
        if column < self.scroll {
            self.scroll = column;
        } else if column >= self.scroll + width {
            self.scroll = column + 1 - width;
        }
    }

    /// The slice of the buffer starting at the first visible column.
    fn visible_text(&self) -> &str {
        let mut column = 0;
        for (i, c) in self.buffer.char_indices() {
            if column >= self.scroll {
                return &self.buffer[i..];
            }
            column += c.width().unwrap_or(0);
        }
        ""
    }

    fn prev_boundary(&self) -> usize {
        self.buffer[..self.cursor]
            .char_indices()
            .next_back()
            .map(|(i, _)| i)
            .unwrap_or(0)
    }

    fn next_boundary(&self) -> usize {
        self.buffer[self.cursor..]
            .chars()
            .next()
            .map(|c| self.cursor + c.len_utf8())
            .unwrap_or(self.buffer.len())
    }
}

impl Component for InputBox {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let inner_width = area.width.saturating_sub(HORIZONTAL_OVERHEAD) as usize;
        self.update_scroll(inner_width);

        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .title("Message (Enter to send)");

        let input = if self.buffer.is_empty() {
            Paragraph::new(self.placeholder()).style(Style::default().fg(Color::DarkGray))
        } else {
            Paragraph::new(self.visible_text()).style(Style::default().fg(Color::Green))
        };
        frame.render_widget(input.block(block), area);

        let cursor_x = area.x + 1 + (self.cursor_column() - self.scroll) as u16;
        frame.set_cursor_position((cursor_x, area.y + 1));
    }
}

impl EventHandler for InputBox {
    type Event = InputEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::InputChar(c) => {
                self.buffer.insert(self.cursor, *c);
                self.cursor += c.len_utf8();
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::Paste(text) => {
                self.buffer.insert_str(self.cursor, text);
                self.cursor += text.len();
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::Backspace => (self.cursor > 0).then(|| {
                let prev = self.prev_boundary();
                self.buffer.drain(prev..self.cursor);
                self.cursor = prev;
                InputEvent::ContentChanged
            }),
            TuiEvent::Delete => (self.cursor < self.buffer.len()).then(|| {
                let next = self.next_boundary();
                self.buffer.drain(self.cursor..next);
                InputEvent::ContentChanged
            }),
            TuiEvent::CursorLeft => (self.cursor > 0).then(|| {
                self.cursor = self.prev_boundary();
                InputEvent::ContentChanged
            }),
            TuiEvent::CursorRight => (self.cursor < self.buffer.len()).then(|| {
                self.cursor = self.next_boundary();
                InputEvent::ContentChanged
            }),
            TuiEvent::CursorHome => (self.cursor != 0).then(|| {
                self.cursor = 0;
                InputEvent::ContentChanged
            }),
            TuiEvent::CursorEnd => (self.cursor != self.buffer.len()).then(|| {
                self.cursor = self.buffer.len();
                InputEvent::ContentChanged
            }),
            TuiEvent::Submit => {
                (!self.buffer.trim().is_empty()).then(|| InputEvent::Submit(self.buffer.clone()))
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn type_text(input: &mut InputBox, text: &str) {
        for c in text.chars() {
            input.handle_event(&TuiEvent::InputChar(c));
        }
    }

    fn rendered(input: &mut InputBox, width: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, HEIGHT)).unwrap();
        terminal.draw(|f| input.render(f, f.area())).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_handle_input_and_backspace() {
        let mut input = InputBox::new();
        type_text(&mut input, "ab");
        assert_eq!(input.buffer, "ab");

        assert_eq!(
            input.handle_event(&TuiEvent::Backspace),
            Some(InputEvent::ContentChanged)
        );
        assert_eq!(input.buffer, "a");
    }

    #[test]
    fn test_submit_keeps_buffer_until_cleared() {
        let mut input = InputBox::new();
        type_text(&mut input, "hello");

        assert_eq!(
            input.handle_event(&TuiEvent::Submit),
            Some(InputEvent::Submit("hello".into()))
        );
        assert_eq!(input.buffer, "hello");

        input.clear();
        assert!(input.buffer.is_empty());
    }

    #[test]
    fn test_blank_submit_emits_nothing() {
        let mut input = InputBox::new();
        assert_eq!(input.handle_event(&TuiEvent::Submit), None);
        type_text(&mut input, "   ");
        assert_eq!(input.handle_event(&TuiEvent::Submit), None);
    }

    #[test]
    fn test_cursor_editing_multibyte() {
        let mut input = InputBox::new();
        type_text(&mut input, "привет");
        input.handle_event(&TuiEvent::CursorHome);
        input.handle_event(&TuiEvent::Delete);
        assert_eq!(input.buffer, "ривет");

        input.handle_event(&TuiEvent::CursorEnd);
        input.handle_event(&TuiEvent::CursorLeft);
        input.handle_event(&TuiEvent::InputChar('!'));
        assert_eq!(input.buffer, "риве!т");
    }

    #[test]
    fn test_paste_inserts_at_cursor() {
        let mut input = InputBox::new();
        type_text(&mut input, "ad");
        input.handle_event(&TuiEvent::CursorLeft);
        input.handle_event(&TuiEvent::Paste("bc".into()));
        assert_eq!(input.buffer, "abcd");
    }

    #[test]
    fn test_placeholder_follows_connection() {
        let mut input = InputBox::new();
        assert!(rendered(&mut input, 40).contains(PLACEHOLDER_DISCONNECTED));

        input.connected = true;
        assert!(rendered(&mut input, 40).contains(PLACEHOLDER_CONNECTED));
    }

    #[test]
    fn test_long_input_scrolls_to_cursor() {
        let mut input = InputBox::new();
        input.connected = true;
        type_text(&mut input, &format!("{}END", "x".repeat(50)));
        let text = rendered(&mut input, 20);
        assert!(text.contains("END"));
    }
}
