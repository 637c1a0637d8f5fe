use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, BorderType, Padding, Paragraph, Widget, Wrap};

use crate::core::message::{Message, Sender};

/// Horizontal padding (per side) between the border and text content.
const CONTENT_PAD_H: u16 = 1;
/// Total horizontal space consumed by borders (1 left + 1 right) and padding.
const HORIZONTAL_OVERHEAD: u16 = 2 + CONTENT_PAD_H * 2;
/// Total vertical space consumed by borders (1 top + 1 bottom).
const VERTICAL_OVERHEAD: u16 = 2;
/// Bubbles take at most this share of the list width, in percent.
const MAX_WIDTH_PERCENT: u32 = 70;
/// Below this width bubbles use the full row.
const MIN_BUBBLE_WIDTH: u16 = 24;

/// A stateless component that renders one chat message as a bubble.
///
/// User messages sit on the right in green, assistant messages on the left
/// in blue. The sender label is the top title, the `HH:MM` time label the
/// bottom title.
///
/// [`calculate_height`](Self::calculate_height) predicts the rendered height
/// with `textwrap`, using options that match `Paragraph`'s wrapping, so the
/// parent `MessageList` can lay out the scroll canvas without rendering.
#[derive(Clone, Copy)]
pub struct MessageBubble<'a> {
    pub message: &'a Message,
}

impl<'a> MessageBubble<'a> {
    pub fn new(message: &'a Message) -> Self {
        Self { message }
    }

    /// Width of a bubble inside a list row of `row_width` columns.
    pub fn bubble_width(row_width: u16) -> u16 {
        if row_width <= MIN_BUBBLE_WIDTH {
            return row_width;
        }
        let width = u32::from(row_width) * MAX_WIDTH_PERCENT / 100;
        // 70% of a u16 always fits back into u16
        u16::try_from(width).unwrap_or(row_width).max(MIN_BUBBLE_WIDTH)
    }

    /// Where the bubble goes within its row.
    pub fn bubble_rect(&self, row: Rect) -> Rect {
        let width = Self::bubble_width(row.width);
        let x = match self.message.sender {
            Sender::User => row.x + row.width - width,
            Sender::Assistant => row.x,
        };
        Rect::new(x, row.y, width, row.height)
    }

    /// Height of the bubble for a list row of `row_width` columns.
    pub fn calculate_height(message: &Message, row_width: u16) -> u16 {
        let content_width = Self::bubble_width(row_width).saturating_sub(HORIZONTAL_OVERHEAD);
        if content_width == 0 {
            // Too narrow for borders + padding; keep one row so it still occupies space
            return 1;
        }

        let options = textwrap::Options::new(content_width as usize)
            .break_words(true)
            .word_separator(textwrap::WordSeparator::AsciiSpace);

        let lines = textwrap::wrap(&message.text, options);
        (lines.len() as u16).max(1) + VERTICAL_OVERHEAD
    }

    fn style(sender: Sender) -> Style {
        match sender {
            Sender::User => Style::default().fg(Color::Green),
            Sender::Assistant => Style::default().fg(Color::Blue),
        }
    }

    fn label(sender: Sender) -> &'static str {
        match sender {
            Sender::User => "you",
            Sender::Assistant => "echo",
        }
    }
}

impl Widget for MessageBubble<'_> {
    fn render(self, area: Rect, buf: &mut ratatui::buffer::Buffer) {
        let sender = self.message.sender;
        let style = Self::style(sender);
        let border_style = style.add_modifier(Modifier::DIM);

        let title = Line::from(Self::label(sender));
        let title = match sender {
            Sender::User => title.right_aligned(),
            Sender::Assistant => title.left_aligned(),
        };

        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(border_style)
            .title(title)
            .title_bottom(Line::from(self.message.time_label()).right_aligned())
            .title_style(border_style)
            .padding(Padding::horizontal(CONTENT_PAD_H));

        let bubble = self.bubble_rect(area);
        let inner = block.inner(bubble);
        block.render(bubble, buf);

        Paragraph::new(self.message.text.as_str())
            .style(style)
            .wrap(Wrap { trim: false })
            .render(inner, buf);
    }
}
