//! # FilePicker Component
//!
//! Centered overlay for browsing the filesystem and picking a file to
//! upload. Opened with Ctrl+O, dismissed with Esc.
//!
//! Follows the persistent state + transient wrapper pattern:
//! - `FilePickerState` lives in `TuiState`
//! - `FilePicker` is created each frame with borrowed state
//!
//! All files are listed and selectable; the extension check applies only
//! to dropped paths, not to picks (the backend rejects non-PDF content
//! itself).

use std::fs;
use std::io;
use std::path::PathBuf;

use log::warn;
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Padding, Paragraph};

use crate::tui::event::TuiEvent;

/// One row in the picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickerEntry {
    pub path: PathBuf,
    pub name: String,
    pub is_dir: bool,
}

/// Persistent state for the file picker overlay.
pub struct FilePickerState {
    pub dir: PathBuf,
    pub entries: Vec<PickerEntry>,
    pub selected: usize,
    pub list_state: ListState,
}

impl FilePickerState {
    pub fn new(dir: PathBuf) -> io::Result<Self> {
        let entries = read_entries(&dir)?;
        let mut list_state = ListState::default();
        if !entries.is_empty() {
            list_state.select(Some(0));
        }
        Ok(Self {
            dir,
            entries,
            selected: 0,
            list_state,
        })
    }

    /// Handle a key event, returning a PickerEvent if the overlay should act.
    pub fn handle_event(&mut self, event: &TuiEvent) -> Option<PickerEvent> {
        match event {
            TuiEvent::Escape => Some(PickerEvent::Dismiss),
            TuiEvent::CursorUp => {
                if !self.entries.is_empty() {
                    self.selected = self.selected.saturating_sub(1);
                    self.list_state.select(Some(self.selected));
                }
                None
            }
            TuiEvent::CursorDown => {
                if !self.entries.is_empty() {
                    self.selected = (self.selected + 1).min(self.entries.len() - 1);
                    self.list_state.select(Some(self.selected));
                }
                None
            }
            TuiEvent::Submit => {
                let entry = self.entries.get(self.selected)?.clone();
                if entry.is_dir {
                    self.enter_dir(entry.path);
                    None
                } else {
                    Some(PickerEvent::Choose(entry.path))
                }
            }
            TuiEvent::Backspace => {
                if let Some(parent) = self.dir.parent() {
                    self.enter_dir(parent.to_path_buf());
                }
                None
            }
            _ => None,
        }
    }

    /// Descend into (or ascend to) `dir`, staying put if it can't be read.
    fn enter_dir(&mut self, dir: PathBuf) {
        match read_entries(&dir) {
            Ok(entries) => {
                self.dir = dir;
                self.entries = entries;
                self.selected = 0;
                self.list_state = ListState::default();
                if !self.entries.is_empty() {
                    self.list_state.select(Some(0));
                }
            }
            Err(e) => warn!("Cannot read directory {}: {}", dir.display(), e),
        }
    }
}

/// Lists `dir`: directories first, then files, each sorted by name.
/// Dotfiles are skipped.
fn read_entries(dir: &PathBuf) -> io::Result<Vec<PickerEntry>> {
    let mut entries: Vec<PickerEntry> = fs::read_dir(dir)?
        .filter_map(|res| res.ok())
        .filter_map(|entry| {
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.starts_with('.') {
                return None;
            }
            let is_dir = entry.file_type().ok()?.is_dir();
            Some(PickerEntry {
                path: entry.path(),
                name,
                is_dir,
            })
        })
        .collect();

    entries.sort_by(|a, b| {
        b.is_dir
            .cmp(&a.is_dir)
            .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
    });
    Ok(entries)
}

/// Events emitted by the file picker.
pub enum PickerEvent {
    Choose(PathBuf),
    Dismiss,
}

/// Transient render wrapper for the file picker overlay.
pub struct FilePicker<'a> {
    state: &'a mut FilePickerState,
}

impl<'a> FilePicker<'a> {
    pub fn new(state: &'a mut FilePickerState) -> Self {
        Self { state }
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect) {
        let overlay = centered_rect(70, 70, area);

        // Clear underlying content
        frame.render_widget(Clear, overlay);

        let title = format!(" Select a file — {} ", self.state.dir.display());
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(title)
            .title_alignment(Alignment::Left)
            .title_bottom(Line::from(" Enter Select  Backspace Up  Esc Close ").centered())
            .padding(Padding::horizontal(1));

        if self.state.entries.is_empty() {
            let empty = Paragraph::new("Empty directory.")
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center)
                .block(block);
            frame.render_widget(empty, overlay);
            return;
        }

        let items: Vec<ListItem> = self
            .state
            .entries
            .iter()
            .enumerate()
            .map(|(i, entry)| {
                let label = if entry.is_dir {
                    format!("{}/", entry.name)
                } else {
                    entry.name.clone()
                };
                let style = if i == self.state.selected {
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD | Modifier::REVERSED)
                } else if entry.is_dir {
                    Style::default().fg(Color::Cyan)
                } else {
                    Style::default().fg(Color::Gray)
                };
                ListItem::new(Line::from(Span::styled(label, style)))
            })
            .collect();

        let list = List::new(items).block(block);
        frame.render_stateful_widget(list, overlay, &mut self.state.list_state);
    }
}

/// Compute a centered rect using percentage of the outer rect.
fn centered_rect(percent_x: u16, percent_y: u16, outer: Rect) -> Rect {
    let [_, center_v, _] = Layout::vertical([
        Constraint::Percentage((100 - percent_y) / 2),
        Constraint::Percentage(percent_y),
        Constraint::Percentage((100 - percent_y) / 2),
    ])
    .areas(outer);
    let [_, center, _] = Layout::horizontal([
        Constraint::Percentage((100 - percent_x) / 2),
        Constraint::Percentage(percent_x),
        Constraint::Percentage((100 - percent_x) / 2),
    ])
    .areas(center_v);
    center
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;

    fn fixture_dir() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        File::create(dir.path().join("report.pdf")).unwrap();
        File::create(dir.path().join("notes.txt")).unwrap();
        File::create(dir.path().join(".hidden")).unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        dir
    }

    #[test]
    fn test_entries_dirs_first_dotfiles_hidden() {
        let dir = fixture_dir();
        let state = FilePickerState::new(dir.path().to_path_buf()).unwrap();

        let names: Vec<&str> = state.entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["sub", "notes.txt", "report.pdf"]);
        assert!(state.entries[0].is_dir);
    }

    #[test]
    fn test_navigation_and_choose() {
        let dir = fixture_dir();
        let mut state = FilePickerState::new(dir.path().to_path_buf()).unwrap();

        // Move down to "notes.txt" and pick it — any file is selectable
        state.handle_event(&TuiEvent::CursorDown);
        match state.handle_event(&TuiEvent::Submit) {
            Some(PickerEvent::Choose(path)) => {
                assert_eq!(path, dir.path().join("notes.txt"));
            }
            _ => panic!("Expected Choose event"),
        }
    }

    #[test]
    fn test_enter_directory_and_back() {
        let dir = fixture_dir();
        File::create(dir.path().join("sub").join("inner.pdf")).unwrap();
        let mut state = FilePickerState::new(dir.path().to_path_buf()).unwrap();

        // "sub" is first; Enter descends instead of choosing
        assert!(state.handle_event(&TuiEvent::Submit).is_none());
        assert_eq!(state.dir, dir.path().join("sub"));
        assert_eq!(state.entries[0].name, "inner.pdf");

        state.handle_event(&TuiEvent::Backspace);
        assert_eq!(state.dir, dir.path());
    }

    #[test]
    fn test_escape_dismisses() {
        let dir = fixture_dir();
        let mut state = FilePickerState::new(dir.path().to_path_buf()).unwrap();
        assert!(matches!(
            state.handle_event(&TuiEvent::Escape),
            Some(PickerEvent::Dismiss)
        ));
    }

    #[test]
    fn test_selection_clamped_at_ends() {
        let dir = fixture_dir();
        let mut state = FilePickerState::new(dir.path().to_path_buf()).unwrap();

        state.handle_event(&TuiEvent::CursorUp);
        assert_eq!(state.selected, 0);
        for _ in 0..10 {
            state.handle_event(&TuiEvent::CursorDown);
        }
        assert_eq!(state.selected, state.entries.len() - 1);
    }
}
