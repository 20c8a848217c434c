//! # MessageList Component
//!
//! Scrollable view of the conversation transcript.
//!
//! ## Responsibilities
//!
//! - Display the transcript with a placeholder while it's empty
//! - Manage scrolling (stick-to-bottom, clamping, re-pinning)
//! - Cache message heights so layout isn't recomputed every frame
//! - Show the animated "Thinking…" indicator while an answer is pending
//!
//! ## Architecture
//!
//! `MessageList` is a transient component (created each frame) that wraps
//! `&'a mut MessageListState` (persistent state) and the transcript
//! (props). Transcript entries are immutable once appended, which keeps
//! cache invalidation trivial: cached heights only go stale when the
//! width changes.

use ratatui::Frame;
use ratatui::layout::{Alignment, Position, Rect, Size};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::Paragraph;
use tui_scrollview::{ScrollView, ScrollViewState, ScrollbarVisibility};

use crate::core::transcript::Transcript;
use crate::tui::component::{Component, EventHandler};
use crate::tui::components::message::Message;
use crate::tui::components::spinner_glyph;
use crate::tui::event::TuiEvent;

/// Rows reserved below the last message for the thinking indicator.
const THINKING_INDICATOR_HEIGHT: u16 = 2;

/// Layout and scroll state for the message list.
/// Must be persisted in the parent TuiState.
pub struct MessageListState {
    /// Scroll offset and view state
    pub scroll_state: ScrollViewState,
    /// Cached layout measurements
    pub layout: LayoutCache,
    /// When true, auto-scroll to bottom on new content
    pub stick_to_bottom: bool,
    /// Last known viewport height (for scroll clamping between frames)
    pub viewport_height: u16,
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
        }
    }

    /// Clamp scroll offset so it never exceeds the content bounds.
    /// Prevents overscrolling past the last message.
    pub fn clamp_scroll(&mut self) {
        let total_content_height: u16 = self.layout.heights.iter().sum();
        let max_y = total_content_height.saturating_sub(self.viewport_height);
        let current = self.scroll_state.offset();
        if current.y > max_y {
            self.scroll_state.set_offset(Position {
                x: current.x,
                y: max_y,
            });
        }
    }

    /// Clamp scroll and re-engage auto-scroll if the user has reached the
    /// bottom. Called on scroll-down events so that scrolling past the end
    /// re-pins to bottom.
    pub fn repin_if_at_bottom(&mut self) {
        let total_content_height: u16 = self.layout.heights.iter().sum();
        let max_y = total_content_height.saturating_sub(self.viewport_height);
        let current = self.scroll_state.offset();
        if current.y >= max_y {
            self.stick_to_bottom = true;
            self.scroll_state.set_offset(Position {
                x: current.x,
                y: max_y,
            });
        }
    }
}

impl EventHandler for MessageListState {
    type Event = (); // Scrolling is handled internally, nothing to emit

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::ScrollUp | TuiEvent::CursorUp => {
                self.scroll_state.scroll_up();
                self.stick_to_bottom = false;
                None
            }
            TuiEvent::ScrollDown | TuiEvent::CursorDown => {
                self.scroll_state.scroll_down();
                self.repin_if_at_bottom();
                None
            }
            TuiEvent::ScrollPageUp => {
                self.scroll_state.scroll_page_up();
                self.stick_to_bottom = false;
                None
            }
            TuiEvent::ScrollPageDown => {
                self.scroll_state.scroll_page_down();
                self.repin_if_at_bottom();
                None
            }
            _ => None,
        }
    }
}

/// Scrollable conversation view component.
/// Created fresh each frame with references to state and data.
pub struct MessageList<'a> {
    pub state: &'a mut MessageListState,
    pub transcript: &'a Transcript,
    /// Readiness gate satisfied — decides which placeholder to show
    pub gate_ready: bool,
    /// An /ask request is in flight
    pub pending: bool,
    pub spinner_frame: usize,
}

impl<'a> MessageList<'a> {
    pub fn new(
        state: &'a mut MessageListState,
        transcript: &'a Transcript,
        gate_ready: bool,
        pending: bool,
        spinner_frame: usize,
    ) -> Self {
        Self {
            state,
            transcript,
            gate_ready,
            pending,
            spinner_frame,
        }
    }
}

impl<'a> Component for MessageList<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        if self.transcript.is_empty() {
            let hint = if self.gate_ready {
                "Your conversation will appear here…"
            } else {
                "No document loaded. Upload a PDF to get started."
            };
            let placeholder = Paragraph::new(hint)
                .style(Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC))
                .alignment(Alignment::Center);
            let centered = Rect {
                y: area.y + area.height / 2,
                height: 1.min(area.height),
                ..area
            };
            frame.render_widget(placeholder, centered);
            return;
        }

        let content_width = area.width.saturating_sub(1); // -1 for scrollbar safe area
        let entries = self.transcript.entries();

        // 1. Update the layout cache (entries are append-only and
        // immutable, so only new ones need measuring)
        let layout = &mut self.state.layout;
        let reusable = layout.reusable_count(entries.len(), content_width);
        layout.heights.truncate(reusable);
        for entry in entries.iter().skip(layout.heights.len()) {
            layout.heights.push(Message::calculate_height(entry, content_width));
        }
        layout.rebuild_prefix_heights();
        layout.update_metadata(entries.len(), content_width);

        let total_height: u16 = self.state.layout.heights.iter().sum();
        let show_thinking = self.pending;
        let canvas_height = if show_thinking {
            total_height + THINKING_INDICATOR_HEIGHT
        } else {
            total_height
        };

        // 2. Clamp scroll offset to prevent overscrolling past content.
        // Skip when auto-scrolling: scroll_to_bottom targets canvas_height.
        self.state.viewport_height = area.height;
        if !self.state.stick_to_bottom {
            self.state.clamp_scroll();
        }

        let scroll_offset = self.state.scroll_state.offset().y;
        let visible_range = self.state.layout.visible_range(scroll_offset, area.height);

        // 3. Render visible entries into a ScrollView
        let mut scroll_view = ScrollView::new(Size::new(content_width, canvas_height))
            .vertical_scrollbar_visibility(ScrollbarVisibility::Always)
            .horizontal_scrollbar_visibility(ScrollbarVisibility::Never);

        let mut y_offset: u16 = if visible_range.start > 0 {
            self.state.layout.prefix_heights[visible_range.start - 1]
        } else {
            0
        };

        for i in visible_range {
            let height = self.state.layout.heights[i];
            let segment_rect = Rect::new(0, y_offset, content_width, height);
            scroll_view.render_widget(Message::new(&entries[i]), segment_rect);
            y_offset += height;
        }

        if show_thinking {
            let indicator = Paragraph::new(format!(
                " {} Thinking…",
                spinner_glyph(self.spinner_frame)
            ))
            .style(Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC));
            let indicator_rect = Rect::new(0, total_height + 1, content_width, 1);
            scroll_view.render_widget(indicator, indicator_rect);
        }

        // Auto-scroll (mutation)
        if self.state.stick_to_bottom {
            self.state.scroll_state.scroll_to_bottom();
        }

        frame.render_stateful_widget(scroll_view, area, &mut self.state.scroll_state);
    }
}

/// Cached layout measurements
pub struct LayoutCache {
    pub heights: Vec<u16>,
    pub prefix_heights: Vec<u16>,
    entry_count: usize,
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
            entry_count: 0,
            content_width: 0,
        }
    }

    /// How many cached heights remain valid. Entries never mutate or
    /// reorder, so everything already measured is reusable unless the
    /// width changed (or the transcript somehow shrank, which would mean a
    /// new session).
    pub fn reusable_count(&self, entry_count: usize, content_width: u16) -> usize {
        if self.content_width != content_width || entry_count < self.entry_count {
            return 0;
        }
        self.heights.len()
    }

    pub fn update_metadata(&mut self, entry_count: usize, content_width: u16) {
        self.entry_count = entry_count;
        self.content_width = content_width;
    }

    pub fn rebuild_prefix_heights(&mut self) {
        self.prefix_heights = self
            .heights
            .iter()
            .scan(0u16, |acc, &h| {
                *acc += h;
                Some(*acc)
            })
            .collect();
    }

    pub fn visible_range(
        &self,
        scroll_offset: u16,
        viewport_height: u16,
    ) -> std::ops::Range<usize> {
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_cache_reuses_measured_heights() {
        let mut cache = LayoutCache::new();
        cache.heights = vec![3; 5];
        cache.update_metadata(5, 80);

        // Same width, same count -> everything reusable
        assert_eq!(cache.reusable_count(5, 80), 5);

        // New entry appended -> the 5 measured ones stay valid
        assert_eq!(cache.reusable_count(6, 80), 5);

        // Width changed -> full re-measure
        assert_eq!(cache.reusable_count(5, 40), 0);

        // Fewer entries than cached -> new session, full re-measure
        assert_eq!(cache.reusable_count(2, 80), 0);
    }

    #[test]
    fn test_prefix_heights() {
        let mut cache = LayoutCache::new();
        cache.heights = vec![3, 5, 4];
        cache.rebuild_prefix_heights();
        assert_eq!(cache.prefix_heights, vec![3, 8, 12]);
    }

    #[test]
    fn test_visible_range_selects_on_screen_entries() {
        let mut cache = LayoutCache::new();
        cache.heights = vec![10; 10]; // 100 rows of content
        cache.rebuild_prefix_heights();

        // Viewport of 20 rows at offset 0 (+10 row buffer below)
        let range = cache.visible_range(0, 20);
        assert_eq!(range.start, 0);
        assert!(range.end >= 3, "buffered viewport should cover first entries");
        assert!(range.end <= 5);

        // Scrolled to the bottom
        let range = cache.visible_range(80, 20);
        assert_eq!(range.end, 10);
        assert!(range.start >= 6);
    }

    #[test]
    fn test_scroll_events_update_stickiness() {
        let mut state = MessageListState::new();
        assert!(state.stick_to_bottom);

        state.handle_event(&TuiEvent::ScrollUp);
        assert!(!state.stick_to_bottom);

        // With no content, scrolling down lands at the bottom and re-pins
        state.handle_event(&TuiEvent::ScrollDown);
        assert!(state.stick_to_bottom);
    }

    #[test]
    fn test_render_placeholder_before_gate_opens() {
        use ratatui::Terminal;
        use ratatui::backend::TestBackend;

        let backend = TestBackend::new(60, 10);
        let mut terminal = Terminal::new(backend).unwrap();
        let mut state = MessageListState::new();
        let transcript = Transcript::new();

        terminal
            .draw(|f| {
                let area = f.area();
                MessageList::new(&mut state, &transcript, false, false, 0).render(f, area);
            })
            .unwrap();

        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(text.contains("No document loaded"));
    }

    #[test]
    fn test_render_transcript_with_thinking_indicator() {
        use ratatui::Terminal;
        use ratatui::backend::TestBackend;

        let backend = TestBackend::new(60, 14);
        let mut terminal = Terminal::new(backend).unwrap();
        let mut state = MessageListState::new();
        let mut transcript = Transcript::new();
        transcript.push_user("What is the total?".to_string());

        terminal
            .draw(|f| {
                let area = f.area();
                MessageList::new(&mut state, &transcript, true, true, 0).render(f, area);
            })
            .unwrap();

        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(text.contains("What is the total?"));
        assert!(text.contains("Thinking…"));
    }
}
