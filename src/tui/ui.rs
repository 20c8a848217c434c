use ratatui::Frame;
use ratatui::layout::{Constraint, Layout};

use crate::core::state::App;
use crate::tui::TuiState;
use crate::tui::component::Component;
use crate::tui::components::{FilePicker, MessageList, TitleBar, UploadPanel};

/// Frame layout, top to bottom: title bar, document panel, transcript,
/// question input. The file picker overlays everything when open.
pub fn draw_ui(frame: &mut Frame, app: &App, tui: &mut TuiState, spinner_frame: usize) {
    use Constraint::{Length, Min};
    let layout = Layout::vertical([Length(1), Length(5), Min(0), Length(3)]);
    let [title_area, upload_area, transcript_area, input_area] = layout.areas(frame.area());

    TitleBar {
        backend_url: &app.backend_url,
        status_message: &app.status_message,
    }
    .render(frame, title_area);

    UploadPanel {
        selected_file: app.selected_file.as_deref(),
        uploading: app.uploading,
        status: app.upload_status.as_deref(),
        spinner_frame,
    }
    .render(frame, upload_area);

    MessageList::new(
        &mut tui.message_list,
        &app.transcript,
        app.gate.ready(),
        app.pending_question,
        spinner_frame,
    )
    .render(frame, transcript_area);

    tui.input_box.render(frame, input_area);

    if let Some(ref mut picker) = tui.file_picker {
        FilePicker::new(picker).render(frame, frame.area());
    }
}
