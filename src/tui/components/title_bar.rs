//! # TitleBar Component
//!
//! Top status line: the current view, the connection glyph (chat only),
//! a transient status message and a "↓ New" hint when messages arrived
//! while the list was scrolled up.
//!
//! Stateless: every field is a prop filled in by the parent each frame.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

use crate::tui::component::Component;

pub struct TitleBar {
    pub view_title: String,
    /// `Some(connected)` shows the connection glyph, `None` hides it.
    pub connection: Option<bool>,
    pub status_message: String,
    pub has_unseen_content: bool,
}

impl TitleBar {
    pub fn new(
        view_title: String,
        connection: Option<bool>,
        status_message: String,
        has_unseen_content: bool,
    ) -> Self {
        Self {
            view_title,
            connection,
            status_message,
            has_unseen_content,
        }
    }

    fn line(&self) -> Line<'_> {
        let separator = || Span::raw(" | ");
        let mut spans = vec![Span::raw(format!("echodeck · {}", self.view_title))];

        if let Some(connected) = self.connection {
            spans.push(separator());
            spans.push(if connected {
                Span::styled("● Connected", Style::default().fg(Color::Green))
            } else {
                Span::styled("● Disconnected", Style::default().fg(Color::Red))
            });
        }
        if !self.status_message.is_empty() {
            spans.push(separator());
            spans.push(Span::raw(self.status_message.as_str()));
        }
        if self.has_unseen_content {
            spans.push(separator());
            spans.push(Span::raw("↓ New"));
        }
        Line::from(spans)
    }
}

impl Component for TitleBar {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        frame.render_widget(self.line(), area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn rendered(mut title_bar: TitleBar) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 1)).unwrap();
        terminal
            .draw(|f| title_bar.render(f, f.area()))
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_connected_glyph() {
        let text = rendered(TitleBar::new("Chat".into(), Some(true), String::new(), false));
        assert!(text.contains("echodeck · Chat"));
        assert!(text.contains("● Connected"));
        assert!(!text.contains("Disconnected"));
    }

    #[test]
    fn test_disconnected_glyph() {
        let text = rendered(TitleBar::new("Chat".into(), Some(false), String::new(), false));
        assert!(text.contains("● Disconnected"));
    }

    #[test]
    fn test_documents_view_has_no_glyph() {
        let text = rendered(TitleBar::new(
            "Documents".into(),
            None,
            "Failed to load documents".into(),
            false,
        ));
        assert!(!text.contains('●'));
        assert!(text.contains("Failed to load documents"));
    }

    #[test]
    fn test_unseen_hint() {
        let text = rendered(TitleBar::new("Chat".into(), Some(true), String::new(), true));
        assert!(text.contains("↓ New"));
    }

    #[test]
    fn test_default_no_separators() {
        let text = rendered(TitleBar::new("Documents".into(), None, String::new(), false));
        assert!(!text.contains('|'));
    }
}
