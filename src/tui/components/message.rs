use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Text};
use ratatui::widgets::{Block, Padding, Paragraph, Widget};

use crate::core::transcript::{ChatMessage, Role};
use crate::tui::component::Component;

/// Horizontal padding (per side) between the border and text content.
const CONTENT_PAD_H: u16 = 1;
/// Total horizontal space consumed by borders (1 left + 1 right) and padding.
const HORIZONTAL_OVERHEAD: u16 = 2 + CONTENT_PAD_H * 2;
/// Total vertical space consumed by borders (1 top + 1 bottom).
const VERTICAL_OVERHEAD: u16 = 2;

/// Sources shown under an assistant reply; anything beyond this is noise.
const MAX_SOURCES_SHOWN: usize = 4;

/// A stateless component that renders a single transcript entry.
///
/// `Message` is a **transient component**: it's created fresh each frame
/// with the data it needs to render. The same line layout feeds both
/// [`calculate_height`](Self::calculate_height) and the actual render, so
/// predicted and rendered heights cannot drift apart.
///
/// Styling per role:
/// - **User** (green): questions from the human
/// - **Assistant** (blue): answers from the backend; `❌`-prefixed error
///   replies render red
/// - Source citations render dim beneath the answer
#[derive(Clone, Copy)]
pub struct Message<'a> {
    pub message: &'a ChatMessage,
}

impl<'a> Message<'a> {
    pub fn new(message: &'a ChatMessage) -> Self {
        Self { message }
    }

    /// Calculate the height required for this message given a width.
    pub fn calculate_height(message: &ChatMessage, width: u16) -> u16 {
        let content_width = width.saturating_sub(HORIZONTAL_OVERHEAD);
        if content_width == 0 {
            // Degenerate case: terminal too narrow for borders + padding.
            // Return 1 row so the message still occupies space in the layout.
            return 1;
        }
        let (body, sources) = layout_lines(message, content_width);
        ((body.len() + sources.len()) as u16).max(1) + VERTICAL_OVERHEAD
    }
}

/// Wraps the message into display lines: body lines and source lines.
///
/// Wrapping happens here (not in `Paragraph`) so height prediction and
/// rendering share one code path.
fn layout_lines(message: &ChatMessage, content_width: u16) -> (Vec<String>, Vec<String>) {
    let options = textwrap::Options::new(content_width as usize)
        .break_words(true)
        .word_separator(textwrap::WordSeparator::AsciiSpace);

    let mut body = Vec::new();
    for raw_line in message.text.trim().split('\n') {
        if raw_line.trim().is_empty() {
            body.push(String::new());
        } else {
            body.extend(
                textwrap::wrap(raw_line, &options)
                    .into_iter()
                    .map(|l| l.into_owned()),
            );
        }
    }

    let source_options = textwrap::Options::new(content_width as usize)
        .break_words(true)
        .word_separator(textwrap::WordSeparator::AsciiSpace)
        .subsequent_indent("  ");
    let mut sources = Vec::new();
    for source in message.sources.iter().take(MAX_SOURCES_SHOWN) {
        sources.extend(
            textwrap::wrap(&format!("▪ {}", source.trim()), &source_options)
                .into_iter()
                .map(|l| l.into_owned()),
        );
    }

    (body, sources)
}

impl<'a> Widget for Message<'a> {
    fn render(self, area: Rect, buf: &mut ratatui::buffer::Buffer) {
        let role = match self.message.role {
            Role::User => "you",
            Role::Assistant => "docchat",
        };

        let is_error_reply =
            self.message.role == Role::Assistant && self.message.text.starts_with('❌');
        let style = match self.message.role {
            Role::User => Style::default().fg(Color::Green),
            Role::Assistant if is_error_reply => Style::default().fg(Color::Red),
            Role::Assistant => Style::default().fg(Color::Blue),
        };
        let border_style = style.add_modifier(Modifier::DIM);

        let block = Block::bordered()
            .title(role)
            .border_type(ratatui::widgets::BorderType::Rounded)
            .border_style(border_style)
            .title_style(border_style)
            .padding(Padding::horizontal(CONTENT_PAD_H));

        let inner_area = block.inner(area);
        block.render(area, buf);

        let content_width = area.width.saturating_sub(HORIZONTAL_OVERHEAD);
        let (body, sources) = layout_lines(self.message, content_width);

        let source_style = Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::ITALIC);
        let lines: Vec<Line> = body
            .into_iter()
            .map(|l| Line::styled(l, style))
            .chain(sources.into_iter().map(|l| Line::styled(l, source_style)))
            .collect();

        // Lines are pre-wrapped; no Paragraph wrap needed.
        Paragraph::new(Text::from(lines)).render(inner_area, buf);
    }
}

impl<'a> Component for Message<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        frame.render_widget(*self, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(text: &str) -> ChatMessage {
        ChatMessage {
            role: Role::User,
            text: text.to_string(),
            sources: Vec::new(),
        }
    }

    fn assistant(text: &str, sources: &[&str]) -> ChatMessage {
        ChatMessage {
            role: Role::Assistant,
            text: text.to_string(),
            sources: sources.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn calculate_height_single_line_fits() {
        // "Hello" fits in 80 - HORIZONTAL_OVERHEAD columns
        assert_eq!(
            Message::calculate_height(&user("Hello"), 80),
            1 + VERTICAL_OVERHEAD
        );
    }

    #[test]
    fn calculate_height_wraps_at_width_boundary() {
        // "Hello world" = 11 chars, width 9 → content_width = 5
        // Wraps to: "Hello" | "world" = 2 lines
        assert_eq!(
            Message::calculate_height(&user("Hello world"), 9),
            2 + VERTICAL_OVERHEAD
        );
    }

    #[test]
    fn calculate_height_zero_width_returns_minimum() {
        assert_eq!(Message::calculate_height(&user("Hello world"), 0), 1);
    }

    #[test]
    fn calculate_height_counts_source_lines() {
        let with_sources = assistant("42", &["p. 3", "p. 9"]);
        let without = assistant("42", &[]);
        assert_eq!(
            Message::calculate_height(&with_sources, 80),
            Message::calculate_height(&without, 80) + 2
        );
    }

    #[test]
    fn calculate_height_caps_sources() {
        let many: Vec<String> = (0..10).map(|i| format!("source {i}")).collect();
        let refs: Vec<&str> = many.iter().map(|s| s.as_str()).collect();
        let capped = assistant("42", &refs);
        assert_eq!(
            Message::calculate_height(&capped, 80),
            1 + MAX_SOURCES_SHOWN as u16 + VERTICAL_OVERHEAD
        );
    }

    #[test]
    fn layout_preserves_blank_lines() {
        let msg = assistant("para one\n\npara two", &[]);
        let (body, _) = layout_lines(&msg, 40);
        assert_eq!(body, vec!["para one", "", "para two"]);
    }

    #[test]
    fn render_smoke() {
        use ratatui::Terminal;
        use ratatui::backend::TestBackend;

        let backend = TestBackend::new(40, 8);
        let mut terminal = Terminal::new(backend).unwrap();
        let msg = assistant("The total is 42.", &["page 3"]);
        terminal
            .draw(|f| {
                let mut widget = Message::new(&msg);
                let area = f.area();
                Component::render(&mut widget, f, area);
            })
            .unwrap();

        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(text.contains("docchat"));
        assert!(text.contains("The total is 42."));
        assert!(text.contains("page 3"));
    }
}
