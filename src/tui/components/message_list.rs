//! # MessageList Component
//!
//! Scrollable view of the chat log.
//!
//! ## Responsibilities
//!
//! - Display the messages, newest at the bottom
//! - Follow new messages while pinned to the bottom
//! - Show a placeholder while the log is empty
//! - Cache bubble heights between frames
//!
//! ## Architecture
//!
//! `MessageList` is a transient component (created each frame) that wraps
//! `&'a mut MessageListState` (persistent state) and the message slice
//! (props). The log is append-only, so cached heights stay valid until the
//! width changes; new messages only extend the cache.
//!
//! Offsets in the cache are `u32`, but the scroll canvas is `u16` tall. The
//! canvas therefore covers a window of the newest messages (at most
//! `u16::MAX` rows) and slides forward as the log grows.

use ratatui::Frame;
use ratatui::layout::{Alignment, Position, Rect, Size};
use ratatui::style::{Color, Style};
use ratatui::widgets::Paragraph;
use tui_scrollview::{ScrollView, ScrollViewState, ScrollbarVisibility};

use crate::core::message::Message;
use crate::tui::component::{Component, EventHandler};
use crate::tui::components::message::MessageBubble;
use crate::tui::event::TuiEvent;

pub const EMPTY_PLACEHOLDER: &str = "Start a conversation...";

/// Tallest canvas the scroll view can address.
const MAX_CANVAS_HEIGHT: u16 = u16::MAX;

/// Layout and scroll state for the message list.
/// Must be persisted in the parent TuiState.
pub struct MessageListState {
    pub scroll_state: ScrollViewState,
    pub layout: LayoutCache,
    /// When true, auto-scroll to bottom on new content
    pub stick_to_bottom: bool,
    /// Last known viewport height (for scroll clamping between frames)
    pub viewport_height: u16,
    /// Number of messages that were visible the last time the view was pinned
    pub seen_count: usize,
    /// Layout offset of the canvas' first row
    canvas_top: u32,
    max_canvas_height: u16,
}

impl Default for MessageListState {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageListState {
    pub fn new() -> Self {
        Self {
            scroll_state: ScrollViewState::default(),
            layout: LayoutCache::new(),
            stick_to_bottom: true, // Start attached to bottom
            viewport_height: 0,
            seen_count: 0,
            canvas_top: 0,
            max_canvas_height: MAX_CANVAS_HEIGHT,
        }
    }

    /// Height of the scroll canvas: everything below `canvas_top`.
    fn canvas_height(&self) -> u16 {
        let rows = self.layout.total_height().saturating_sub(self.canvas_top);
        u16::try_from(rows).unwrap_or(u16::MAX)
    }

    fn max_offset(&self) -> u16 {
        self.canvas_height().saturating_sub(self.viewport_height)
    }

    /// Moves the canvas so it holds the newest messages that fit, keeping the
    /// scroll position on the same content.
    fn slide_canvas(&mut self) {
        let start = self
            .layout
            .window_start(u32::from(self.max_canvas_height));
        let top = self.layout.top_of(start);
        if top == self.canvas_top {
            return;
        }

        let current = self.scroll_state.offset();
        let y = if top > self.canvas_top {
            let shift = u16::try_from(top - self.canvas_top).unwrap_or(u16::MAX);
            current.y.saturating_sub(shift)
        } else {
            let shift = u16::try_from(self.canvas_top - top).unwrap_or(u16::MAX);
            current.y.saturating_add(shift)
        };
        self.scroll_state.set_offset(Position { x: current.x, y });
        self.canvas_top = top;
    }

    /// Clamp scroll offset so it never exceeds the content bounds.
    pub fn clamp_scroll(&mut self) {
        let max_y = self.max_offset();
        let current = self.scroll_state.offset();
        if current.y > max_y {
            self.scroll_state.set_offset(Position {
                x: current.x,
                y: max_y,
            });
        }
    }

    /// Re-engage auto-scroll once the user has scrolled back to the bottom.
    pub fn repin_if_at_bottom(&mut self) {
        let max_y = self.max_offset();
        let current = self.scroll_state.offset();
        if current.y >= max_y {
            self.stick_to_bottom = true;
            self.scroll_state.set_offset(Position {
                x: current.x,
                y: max_y,
            });
        }
    }

    /// Whether messages arrived while the user was scrolled up.
    pub fn has_unseen(&self, message_count: usize) -> bool {
        !self.stick_to_bottom && message_count > self.seen_count
    }
}

/// Scrollable conversation view component.
/// Created fresh each frame with references to state and data.
pub struct MessageList<'a> {
    pub state: &'a mut MessageListState,
    pub messages: &'a [Message],
}

impl<'a> MessageList<'a> {
    pub fn new(state: &'a mut MessageListState, messages: &'a [Message]) -> Self {
        Self { state, messages }
    }
}

impl Component for MessageList<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        self.state.viewport_height = area.height;

        if self.messages.is_empty() {
            let placeholder = Paragraph::new(EMPTY_PLACEHOLDER)
                .alignment(Alignment::Center)
                .style(Style::default().fg(Color::DarkGray));
            let middle = Rect::new(area.x, area.y + area.height / 2, area.width, 1.min(area.height));
            frame.render_widget(placeholder, middle);
            return;
        }

        let content_width = area.width.saturating_sub(1); // -1 for scrollbar
        self.state.layout.update(self.messages, content_width);
        self.state.slide_canvas();
        let canvas_top = self.state.canvas_top;
        let canvas_height = self.state.canvas_height();

        // While pinned, lay out for the offset the view is about to jump to
        let scroll_offset = if self.state.stick_to_bottom {
            self.state.max_offset()
        } else {
            self.state.clamp_scroll();
            self.state.scroll_state.offset().y
        };
        let visible = self
            .state
            .layout
            .visible_range(canvas_top + u32::from(scroll_offset), area.height);

        let mut scroll_view = ScrollView::new(Size::new(content_width, canvas_height))
            .vertical_scrollbar_visibility(ScrollbarVisibility::Automatic)
            .horizontal_scrollbar_visibility(ScrollbarVisibility::Never);

        for i in visible {
            // Messages above the canvas window are not drawn
            let Some(top) = self.state.layout.top_of(i).checked_sub(canvas_top) else {
                continue;
            };
            let Ok(top) = u16::try_from(top) else {
                continue;
            };
            let height = self.state.layout.heights[i];
            let row = Rect::new(0, top, content_width, height);
            scroll_view.render_widget(MessageBubble::new(&self.messages[i]), row);
        }

        if self.state.stick_to_bottom {
            self.state.scroll_state.scroll_to_bottom();
            self.state.seen_count = self.messages.len();
        }

        frame.render_stateful_widget(scroll_view, area, &mut self.state.scroll_state);
    }
}

/// EventHandler lives on `MessageListState` because scroll position must
/// survive across frames, while `MessageList` is rebuilt every frame.
impl EventHandler for MessageListState {
    type Event = ();

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::ScrollUp => {
                self.scroll_state.scroll_up();
                self.stick_to_bottom = false;
            }
            TuiEvent::ScrollDown => {
                self.scroll_state.scroll_down();
                self.repin_if_at_bottom();
            }
            TuiEvent::ScrollPageUp => {
                self.scroll_state.scroll_page_up();
                self.stick_to_bottom = false;
            }
            TuiEvent::ScrollPageDown => {
                self.scroll_state.scroll_page_down();
                self.repin_if_at_bottom();
            }
            _ => {}
        }
        None
    }
}

/// Cached bubble heights plus running totals.
pub struct LayoutCache {
    pub heights: Vec<u16>,
    /// `prefix_heights[i]` = bottom edge of message `i`
    pub prefix_heights: Vec<u32>,
    content_width: u16,
}

impl Default for LayoutCache {
    fn default() -> Self {
        Self::new()
    }
}

impl LayoutCache {
    pub fn new() -> Self {
        Self {
            heights: Vec::new(),
            prefix_heights: Vec::new(),
            content_width: 0,
        }
    }

    /// Number of cached heights that are still valid.
    pub fn reusable_count(&self, message_count: usize, content_width: u16) -> usize {
        if self.content_width != content_width {
            return 0;
        }
        self.heights.len().min(message_count)
    }

    /// Measures messages not yet in the cache.
    pub fn update(&mut self, messages: &[Message], content_width: u16) {
        let reusable = self.reusable_count(messages.len(), content_width);
        self.heights.truncate(reusable);
        self.prefix_heights.truncate(reusable);
        self.content_width = content_width;

        let mut running = self.prefix_heights.last().copied().unwrap_or(0);
        for message in &messages[reusable..] {
            let height = MessageBubble::calculate_height(message, content_width);
            running += u32::from(height);
            self.heights.push(height);
            self.prefix_heights.push(running);
        }
    }

    pub fn total_height(&self) -> u32 {
        self.prefix_heights.last().copied().unwrap_or(0)
    }

    pub fn top_of(&self, index: usize) -> u32 {
        if index == 0 {
            0
        } else {
            self.prefix_heights[index - 1]
        }
    }

    /// First message of the longest tail that is at most `max_height` rows tall.
    pub fn window_start(&self, max_height: u32) -> usize {
        let threshold = self.total_height().saturating_sub(max_height);
        if threshold == 0 {
            return 0;
        }
        // top_of(i) == prefix_heights[i - 1]
        (self.prefix_heights.partition_point(|&end| end < threshold) + 1)
            .min(self.prefix_heights.len().saturating_sub(1))
    }

    /// Messages intersecting the viewport, with half a screen of slack on
    /// either side. `scroll_offset` is a layout offset, not a canvas one.
    pub fn visible_range(&self, scroll_offset: u32, viewport_height: u16) -> std::ops::Range<usize> {
        let viewport_height = u32::from(viewport_height);
        let buffer = viewport_height / 2;
        let buffered_start = scroll_offset.saturating_sub(buffer);
        let buffered_end = scroll_offset
            .saturating_add(viewport_height)
            .saturating_add(buffer);

        let start = self
            .prefix_heights
            .partition_point(|&end| end <= buffered_start);
        let end = self
            .prefix_heights
            .partition_point(|&end| end < buffered_end)
            .saturating_add(1)
            .min(self.prefix_heights.len());

        start..end
    }
}
