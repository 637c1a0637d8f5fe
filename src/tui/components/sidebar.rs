use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, BorderType, Paragraph};

use crate::tui::View;
use crate::tui::component::Component;

pub const WIDTH: u16 = 16;

/// Navigation sidebar listing the views. `Tab` cycles through them.
pub struct Sidebar {
    pub active: View,
}

impl Component for Sidebar {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let lines: Vec<Line> = View::ALL
            .iter()
            .map(|view| {
                if *view == self.active {
                    Line::styled(
                        format!("▸ {}", view.title()),
                        Style::default()
                            .fg(Color::Cyan)
                            .add_modifier(Modifier::BOLD),
                    )
                } else {
                    Line::styled(format!("  {}", view.title()), Style::default().fg(Color::Gray))
                }
            })
            .collect();

        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .title("Menu")
            .title_bottom(Line::from("Tab").right_aligned());
        frame.render_widget(Paragraph::new(lines).block(block), area);
    }
}
