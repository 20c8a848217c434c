//! # TitleBar Component
//!
//! One-line status bar: which backend this session talks to, plus the
//! current status text. Purely presentational — all data arrives as props.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::Span;

use crate::tui::component::Component;

pub struct TitleBar<'a> {
    /// Base URL of the backend this session is bound to
    pub backend_url: &'a str,
    /// Transient status text (gate state, hints)
    pub status_message: &'a str,
}

impl<'a> Component for TitleBar<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let title_text = if self.status_message.is_empty() {
            format!("DocChat ({})", self.backend_url)
        } else {
            format!("DocChat ({}) | {}", self.backend_url, self.status_message)
        };

        frame.render_widget(Span::raw(title_text), area);
    }
}
