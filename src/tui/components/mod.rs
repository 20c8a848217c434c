//! # TUI Components
//!
//! Components follow two patterns:
//!
//! - **Stateless (props-based)**: created fresh each frame with the data
//!   they render — `TitleBar`, `Message`, `UploadPanel`.
//! - **Stateful (event-driven)**: hold local state and emit high-level
//!   events — `InputBox`, `MessageListState`, `FilePickerState`.
//!
//! Each component file is self-contained: state types, event types,
//! rendering, event handling, and tests live together.

pub mod file_picker;
pub mod input_box;
pub mod message;
pub mod message_list;
pub mod title_bar;
pub mod upload_panel;

pub use file_picker::{FilePicker, FilePickerState, PickerEvent};
pub use input_box::{AskAvailability, InputBox, InputEvent};
pub use message_list::{MessageList, MessageListState};
pub use title_bar::TitleBar;
pub use upload_panel::UploadPanel;

/// Braille spinner shared by the upload panel and the thinking indicator.
const SPINNER_GLYPHS: [char; 10] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];

pub fn spinner_glyph(frame: usize) -> char {
    SPINNER_GLYPHS[frame % SPINNER_GLYPHS.len()]
}
