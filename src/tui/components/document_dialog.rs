use ratatui::Frame;
use ratatui::layout::{Constraint, Flex, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Clear, Paragraph, Wrap};

use crate::documents::Document;
use crate::tui::component::Component;

/// Modal with the details of one document and the analyze action.
pub struct DocumentDialog<'a> {
    pub document: &'a Document,
    /// Any analysis is running (the action is disabled meanwhile).
    pub analyzing: bool,
    /// Finished result for *this* document.
    pub result: Option<&'a str>,
}

impl DocumentDialog<'_> {
    /// Centered rect taking `percent_x` × `percent_y` of `area`.
    fn popup_area(area: Rect, percent_x: u16, percent_y: u16) -> Rect {
        let [area] = Layout::vertical([Constraint::Percentage(percent_y)])
            .flex(Flex::Center)
            .areas(area);
        let [area] = Layout::horizontal([Constraint::Percentage(percent_x)])
            .flex(Flex::Center)
            .areas(area);
        area
    }

    fn lines(&self) -> Vec<Line<'_>> {
        let label = Style::default().fg(Color::DarkGray);
        let field = |name: &'static str, value: &str| {
            vec![
                Line::styled(name, label),
                Line::from(value.to_string()),
                Line::default(),
            ]
        };

        let mut lines = Vec::new();
        lines.extend(field("Version", &self.document.version));
        lines.extend(field("Size", &self.document.size));
        lines.extend(field("Uploaded", &self.document.upload_date));
        lines.extend(field("Description", &self.document.description));

        let action = if self.analyzing {
            Span::styled("Analyzing...", label)
        } else {
            Span::styled("[a] Analyze", Style::default().add_modifier(Modifier::BOLD))
        };
        let mut action_line = vec![action];
        if let Some(result) = self.result {
            action_line.push(Span::raw("   "));
            action_line.push(Span::styled(result, Style::default().fg(Color::Green)));
        }
        lines.push(Line::from(action_line));
        lines
    }
}

impl Component for DocumentDialog<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let popup = Self::popup_area(area, 70, 80);
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .title(self.document.file_name.as_str())
            .title_bottom(Line::from("Esc to close").right_aligned());

        frame.render_widget(Clear, popup);
        frame.render_widget(
            Paragraph::new(self.lines())
                .block(block)
                .wrap(Wrap { trim: true }),
            popup,
        );
    }
}
