//! # InputBox Component
//!
//! Single-line question input.
//!
//! ## Responsibilities
//!
//! - Capture text input and basic editing (cursor movement, backspace,
//!   delete, paste)
//! - Handle submission (Enter) — blank input never submits
//! - Reflect the ask availability: while the readiness gate is closed or a
//!   question is pending, the box is dimmed and Enter is ignored, but the
//!   typed buffer is preserved
//!
//! The buffer and cursor are internal state; availability is a prop synced
//! from application state each frame.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Paragraph};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

/// High-level events emitted by the InputBox
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    /// User submitted the text (Enter pressed on a non-blank buffer)
    Submit(String),
    /// Text content or cursor changed
    ContentChanged,
}

/// Why (or whether) a question may be submitted right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AskAvailability {
    #[default]
    Ready,
    /// Readiness gate closed: no ingested document yet
    AwaitingDocument,
    /// A question is already in flight; submissions are rejected, not queued
    AwaitingAnswer,
}

impl AskAvailability {
    fn title(self) -> &'static str {
        match self {
            AskAvailability::Ready => " Ask ",
            AskAvailability::AwaitingDocument => " Ask — upload a document first ",
            AskAvailability::AwaitingAnswer => " Ask — waiting for answer… ",
        }
    }

    fn placeholder(self) -> &'static str {
        match self {
            AskAvailability::Ready => "Ask something about your document…",
            AskAvailability::AwaitingDocument => "Upload a PDF to start asking questions",
            AskAvailability::AwaitingAnswer => "",
        }
    }

    fn enabled(self) -> bool {
        matches!(self, AskAvailability::Ready)
    }
}

pub struct InputBox {
    /// Text buffer (internal state)
    pub buffer: String,
    /// Whether submission is currently possible (prop, synced each frame)
    pub availability: AskAvailability,
    /// Cursor position as a byte offset into `buffer`
    cursor_pos: usize,
    /// Horizontal scroll offset in display columns
    scroll_cols: u16,
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
            availability: AskAvailability::default(),
            cursor_pos: 0,
            scroll_cols: 0,
        }
    }

    /// The slice of the buffer visible at the current scroll offset.
    fn visible_window(&self, inner_width: u16) -> String {
        let mut skipped = 0u16;
        let mut taken = 0u16;
        let mut out = String::new();
        for c in self.buffer.chars() {
            let w = c.width().unwrap_or(0) as u16;
            if skipped < self.scroll_cols {
                skipped += w;
                continue;
            }
            if taken + w > inner_width {
                break;
            }
            taken += w;
            out.push(c);
        }
        out
    }

    /// Keeps the cursor inside the visible window.
    fn update_scroll(&mut self, inner_width: u16) {
        let cursor_col = self.buffer[..self.cursor_pos].width() as u16;
        if cursor_col < self.scroll_cols {
            self.scroll_cols = cursor_col;
        } else if inner_width > 0 && cursor_col >= self.scroll_cols + inner_width {
            self.scroll_cols = cursor_col - inner_width + 1;
        }
    }
}

fn prev_char_boundary(s: &str, pos: usize) -> usize {
    s[..pos].char_indices().next_back().map(|(i, _)| i).unwrap_or(0)
}

fn next_char_boundary(s: &str, pos: usize) -> usize {
    s[pos..]
        .char_indices()
        .nth(1)
        .map(|(i, _)| pos + i)
        .unwrap_or(s.len())
}

impl Component for InputBox {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let inner_width = area.width.saturating_sub(2);
        self.update_scroll(inner_width);

        let enabled = self.availability.enabled();
        let border_style = if enabled {
            Style::default().fg(Color::Green)
        } else {
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::DIM)
        };

        let block = Block::bordered()
            .border_type(ratatui::widgets::BorderType::Rounded)
            .border_style(border_style)
            .title(self.availability.title())
            .title_style(border_style);

        let (text, text_style) = if self.buffer.is_empty() {
            (
                self.availability.placeholder().to_string(),
                Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
            )
        } else {
            (self.visible_window(inner_width), Style::default().fg(Color::Green))
        };

        let input = Paragraph::new(text).block(block).style(text_style);
        frame.render_widget(input, area);

        if enabled {
            let cursor_col = self.buffer[..self.cursor_pos].width() as u16;
            let x = area.x + 1 + cursor_col.saturating_sub(self.scroll_cols);
            frame.set_cursor_position((x, area.y + 1));
        }
    }
}

impl EventHandler for InputBox {
    type Event = InputEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        // A disabled input swallows everything and keeps its buffer, so a
        // half-typed question survives the wait for the gate or an answer.
        if !self.availability.enabled() {
            return None;
        }

        match event {
            TuiEvent::InputChar(c) => {
                self.buffer.insert(self.cursor_pos, *c);
                self.cursor_pos += c.len_utf8();
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::Paste(text) => {
                // Questions are single-line
                let text = text.replace('\n', " ");
                self.buffer.insert_str(self.cursor_pos, &text);
                self.cursor_pos += text.len();
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::Backspace => {
                if self.cursor_pos > 0 {
                    let prev = prev_char_boundary(&self.buffer, self.cursor_pos);
                    self.buffer.drain(prev..self.cursor_pos);
                    self.cursor_pos = prev;
                    Some(InputEvent::ContentChanged)
                } else {
                    None
                }
            }
            TuiEvent::Delete => {
                if self.cursor_pos < self.buffer.len() {
                    let next = next_char_boundary(&self.buffer, self.cursor_pos);
                    self.buffer.drain(self.cursor_pos..next);
                    Some(InputEvent::ContentChanged)
                } else {
                    None
                }
            }
            TuiEvent::CursorLeft => {
                if self.cursor_pos > 0 {
                    self.cursor_pos = prev_char_boundary(&self.buffer, self.cursor_pos);
                    Some(InputEvent::ContentChanged)
                } else {
                    None
                }
            }
            TuiEvent::CursorRight => {
                if self.cursor_pos < self.buffer.len() {
                    self.cursor_pos = next_char_boundary(&self.buffer, self.cursor_pos);
                    Some(InputEvent::ContentChanged)
                } else {
                    None
                }
            }
            TuiEvent::CursorHome => {
                (self.cursor_pos != 0).then(|| {
                    self.cursor_pos = 0;
                    InputEvent::ContentChanged
                })
            }
            TuiEvent::CursorEnd => {
                (self.cursor_pos != self.buffer.len()).then(|| {
                    self.cursor_pos = self.buffer.len();
                    InputEvent::ContentChanged
                })
            }
            TuiEvent::Submit => {
                if !self.buffer.trim().is_empty() {
                    let text = std::mem::take(&mut self.buffer);
                    self.cursor_pos = 0;
                    self.scroll_cols = 0;
                    Some(InputEvent::Submit(text))
                } else {
                    None
                }
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

    #[test]
    fn test_input_box_new() {
        let input = InputBox::new();
        assert!(input.buffer.is_empty());
        assert_eq!(input.availability, AskAvailability::Ready);
    }

    #[test]
    fn test_handle_input() {
        let mut input = InputBox::new();

        assert_eq!(
            input.handle_event(&TuiEvent::InputChar('a')),
            Some(InputEvent::ContentChanged)
        );
        assert_eq!(
            input.handle_event(&TuiEvent::InputChar('b')),
            Some(InputEvent::ContentChanged)
        );
        assert_eq!(input.buffer, "ab");

        assert_eq!(
            input.handle_event(&TuiEvent::Backspace),
            Some(InputEvent::ContentChanged)
        );
        assert_eq!(input.buffer, "a");
    }

    #[test]
    fn test_cursor_editing_mid_buffer() {
        let mut input = InputBox::new();
        for c in "word".chars() {
            input.handle_event(&TuiEvent::InputChar(c));
        }
        input.handle_event(&TuiEvent::CursorHome);
        input.handle_event(&TuiEvent::Delete);
        assert_eq!(input.buffer, "ord");
        input.handle_event(&TuiEvent::CursorEnd);
        input.handle_event(&TuiEvent::InputChar('!'));
        assert_eq!(input.buffer, "ord!");
    }

    #[test]
    fn test_submit_takes_buffer() {
        let mut input = InputBox::new();
        input.buffer = "What is the total?".to_string();

        match input.handle_event(&TuiEvent::Submit) {
            Some(InputEvent::Submit(text)) => assert_eq!(text, "What is the total?"),
            other => panic!("Expected Submit event, got {other:?}"),
        }
        assert!(input.buffer.is_empty(), "buffer cleared after submit");
    }

    #[test]
    fn test_blank_submit_is_noop() {
        let mut input = InputBox::new();
        input.buffer = "   ".to_string();
        assert_eq!(input.handle_event(&TuiEvent::Submit), None);
        assert_eq!(input.buffer, "   ", "buffer kept on rejected submit");
    }

    #[test]
    fn test_disabled_input_preserves_buffer() {
        let mut input = InputBox::new();
        input.buffer = "half a question".to_string();
        input.availability = AskAvailability::AwaitingAnswer;

        assert_eq!(input.handle_event(&TuiEvent::Submit), None);
        assert_eq!(input.handle_event(&TuiEvent::InputChar('x')), None);
        assert_eq!(input.handle_event(&TuiEvent::Backspace), None);
        assert_eq!(input.buffer, "half a question");
    }

    #[test]
    fn test_paste_flattens_newlines() {
        let mut input = InputBox::new();
        input.handle_event(&TuiEvent::Paste("multi\nline".to_string()));
        assert_eq!(input.buffer, "multi line");
    }

    #[test]
    fn test_render_shows_gate_placeholder() {
        let backend = TestBackend::new(50, 3);
        let mut terminal = Terminal::new(backend).unwrap();
        let mut input = InputBox::new();
        input.availability = AskAvailability::AwaitingDocument;

        terminal.draw(|f| input.render(f, f.area())).unwrap();

        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(text.contains("upload a document first"));
        assert!(text.contains("Upload a PDF to start asking questions"));
    }
}
