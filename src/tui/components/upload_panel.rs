//! # UploadPanel Component
//!
//! The document region: selected file, upload progress, and the outcome
//! line of the last attempt. Stateless — everything arrives as props from
//! `App`.

use std::path::Path;

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Text};
use ratatui::widgets::{Block, Padding, Paragraph};

use crate::tui::component::Component;
use crate::tui::components::spinner_glyph;

pub struct UploadPanel<'a> {
    pub selected_file: Option<&'a Path>,
    pub uploading: bool,
    /// Outcome of the last upload attempt ("✅ …" or "❌ …")
    pub status: Option<&'a str>,
    pub spinner_frame: usize,
}

impl<'a> Component for UploadPanel<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let dim = Style::default().fg(Color::DarkGray);

        let file_line = match self.selected_file {
            Some(path) => {
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| path.display().to_string());
                Line::styled(format!("file: {name}"), Style::default().fg(Color::White))
            }
            None => Line::styled(
                "no file selected — Ctrl+O to browse, or drop a PDF onto the window",
                dim.add_modifier(Modifier::ITALIC),
            ),
        };

        let action_line = if self.uploading {
            Line::styled(
                format!("{} uploading…", spinner_glyph(self.spinner_frame)),
                Style::default().fg(Color::Yellow),
            )
        } else if self.selected_file.is_some() {
            Line::styled("Ctrl+U to upload & process", dim)
        } else {
            Line::raw("")
        };

        let status_line = match self.status {
            Some(status) if status.starts_with('❌') => {
                Line::styled(status.to_string(), Style::default().fg(Color::Red))
            }
            Some(status) => Line::styled(status.to_string(), Style::default().fg(Color::Green)),
            None => Line::raw(""),
        };

        let block = Block::bordered()
            .border_type(ratatui::widgets::BorderType::Rounded)
            .border_style(dim)
            .title(" Document ")
            .padding(Padding::horizontal(1));

        let panel = Paragraph::new(Text::from(vec![file_line, action_line, status_line]))
            .block(block);
        frame.render_widget(panel, area);
    }
}
