//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the UI,
//! and translates keyboard events into core::Action values.
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Redraw Strategy
//!
//! The event loop uses conditional redraw to avoid unnecessary work:
//!
//! - **Animating** (upload or question in flight, gate unresolved): draws
//!   every ~80ms so spinners stay smooth.
//! - **Idle**: sleeps up to 500ms, only redraws on events or resize.
//!
//! ## Background requests
//!
//! Network calls run on tokio tasks and report back as `Action`s over an
//! mpsc channel, drained once per loop iteration. There is no cancellation:
//! an in-flight request can't be aborted, and a second submission in the
//! same region is rejected by the reducer until the first resolves.

mod component;
mod components;
mod event;
mod ui;

use log::{debug, info, warn};
use std::io::stdout;
use std::path::PathBuf;
use std::sync::{Arc, mpsc};

use crossterm::cursor::{Hide, SetCursorStyle, Show};
use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
};
use crossterm::execute;

use crate::api::{Backend, HttpBackend};
use crate::core::action::{Action, Effect, update};
use crate::core::config::ResolvedConfig;
use crate::core::state::App;
use crate::tui::component::EventHandler;
use crate::tui::components::{
    AskAvailability, FilePickerState, InputBox, InputEvent, MessageListState, PickerEvent,
};
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};

/// TUI-specific presentation state (not part of core business logic)
pub struct TuiState {
    pub message_list: MessageListState,
    pub input_box: InputBox,
    /// File picker overlay (None = hidden)
    pub file_picker: Option<FilePickerState>,
}

impl Default for TuiState {
    fn default() -> Self {
        Self::new()
    }
}

impl TuiState {
    pub fn new() -> Self {
        Self {
            message_list: MessageListState::new(),
            input_box: InputBox::new(),
            file_picker: None,
        }
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        // Bracketed paste doubles as the drop target: terminals deliver a
        // dragged-in file as a pasted path.
        execute!(
            stdout(),
            EnableMouseCapture,
            EnableBracketedPaste,
            Show,
            SetCursorStyle::SteadyBlock
        )?;
        info!("Terminal modes enabled (mouse, bracketed paste, steady block cursor)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(
            stdout(),
            DisableMouseCapture,
            DisableBracketedPaste,
            Hide
        );
    }
}

pub fn run(config: ResolvedConfig) -> std::io::Result<()> {
    let backend: Arc<dyn Backend> = Arc::new(HttpBackend::new(config.base_url.clone()));
    let mut app = App::new(backend, config.base_url);
    let mut tui = TuiState::new();

    let mut terminal = ratatui::init();
    let _terminal_mode_guard = TerminalModeGuard::new();

    // Channel for actions from background tasks
    let (tx, rx) = mpsc::channel();

    // Resolve the readiness gate once at startup; it is never polled again.
    // The only later writer is the optimistic upload-success path.
    spawn_status_fetch(app.backend.clone(), tx.clone());

    let start_time = std::time::Instant::now();
    let mut needs_redraw = true; // Force first frame

    loop {
        // Sync InputBox props with App state
        tui.input_box.availability = if !app.gate.ready() {
            AskAvailability::AwaitingDocument
        } else if app.pending_question {
            AskAvailability::AwaitingAnswer
        } else {
            AskAvailability::Ready
        };

        let animating = app.uploading || app.pending_question || !app.gate.resolved;
        if animating {
            needs_redraw = true;
        }

        // Only draw when something changed
        let elapsed = start_time.elapsed().as_secs_f32();
        let spinner_frame = (elapsed * 12.0) as usize;
        if needs_redraw {
            terminal.draw(|f| ui::draw_ui(f, &app, &mut tui, spinner_frame))?;
            needs_redraw = false;
        }

        // Dynamic poll timeout: short when animating (~12fps), long when idle
        let timeout = if animating {
            std::time::Duration::from_millis(80)
        } else {
            std::time::Duration::from_millis(500)
        };
        let first_event = poll_event_timeout(timeout);

        // Process first event + drain ALL pending events before next draw
        let mut should_quit = false;
        if first_event.is_some() {
            needs_redraw = true;
        }
        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            // Resize just needs a redraw (already flagged above)
            if matches!(event, TuiEvent::Resize) {
                continue;
            }

            // ForceQuit (Ctrl+C) always quits
            if matches!(event, TuiEvent::ForceQuit) {
                if update(&mut app, Action::Quit) == Effect::Quit {
                    should_quit = true;
                }
                continue;
            }

            // Ctrl+O opens the file picker
            if matches!(event, TuiEvent::OpenFilePicker) {
                let dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
                match FilePickerState::new(dir) {
                    Ok(state) => tui.file_picker = Some(state),
                    Err(e) => {
                        warn!("Failed to open file picker: {}", e);
                        app.status_message = format!("Cannot open file picker: {e}");
                    }
                }
                continue;
            }

            // When the picker is open, it owns every event
            if let Some(ref mut picker) = tui.file_picker {
                if let Some(picker_event) = picker.handle_event(&event) {
                    match picker_event {
                        PickerEvent::Choose(path) => {
                            dispatch(
                                update(&mut app, Action::FileChosen(path)),
                                &app,
                                &tx,
                                &mut should_quit,
                            );
                            tui.file_picker = None;
                        }
                        PickerEvent::Dismiss => {
                            tui.file_picker = None;
                        }
                    }
                }
                continue;
            }

            // Ctrl+U submits the upload
            if matches!(event, TuiEvent::SubmitUpload) {
                dispatch(
                    update(&mut app, Action::SubmitUpload),
                    &app,
                    &tx,
                    &mut should_quit,
                );
                continue;
            }

            // A pasted path is a drag-and-dropped file; other pastes are typing
            if let TuiEvent::Paste(ref text) = event
                && let Some(path) = dropped_file_path(text)
            {
                dispatch(
                    update(&mut app, Action::FileDropped(path)),
                    &app,
                    &tx,
                    &mut should_quit,
                );
                continue;
            }

            // Scroll events always go to the transcript (arrow keys too:
            // the input is single-line, so Up/Down are free)
            if matches!(
                event,
                TuiEvent::ScrollUp
                    | TuiEvent::ScrollDown
                    | TuiEvent::ScrollPageUp
                    | TuiEvent::ScrollPageDown
                    | TuiEvent::CursorUp
                    | TuiEvent::CursorDown
            ) {
                tui.message_list.handle_event(&event);
                continue;
            }

            // Everything else belongs to the input box
            if let Some(InputEvent::Submit(text)) = tui.input_box.handle_event(&event) {
                dispatch(
                    update(&mut app, Action::SubmitQuestion(text)),
                    &app,
                    &tx,
                    &mut should_quit,
                );
            }
        }

        if should_quit {
            break;
        }

        // Handle background task outcomes
        while let Ok(action) = rx.try_recv() {
            needs_redraw = true;
            debug!("Event loop received: {:?}", action);
            dispatch(update(&mut app, action), &app, &tx, &mut should_quit);
        }

        if should_quit {
            break;
        }
    }

    ratatui::restore();
    Ok(())
}

/// Performs the I/O an `update()` call asked for.
fn dispatch(effect: Effect, app: &App, tx: &mpsc::Sender<Action>, should_quit: &mut bool) {
    match effect {
        Effect::Quit => *should_quit = true,
        Effect::SpawnUpload(path) => spawn_upload(app.backend.clone(), path, tx.clone()),
        Effect::SpawnAsk(question) => spawn_ask(app.backend.clone(), question, tx.clone()),
        Effect::None => {}
    }
}

/// Interprets a pasted string as a drag-and-dropped file.
///
/// Terminals paste the dropped file's path, often wrapped in quotes. Only a
/// single-line paste naming an existing file counts; anything else is
/// treated as typed input.
fn dropped_file_path(text: &str) -> Option<PathBuf> {
    let trimmed = text.trim().trim_matches(|c| c == '\'' || c == '"');
    if trimmed.is_empty() || trimmed.contains('\n') {
        return None;
    }
    let path = PathBuf::from(trimmed);
    path.is_file().then_some(path)
}

fn spawn_status_fetch(backend: Arc<dyn Backend>, tx: mpsc::Sender<Action>) {
    info!("Fetching backend document status");
    tokio::spawn(async move {
        let outcome = backend.status().await;
        if tx.send(Action::StatusResolved(outcome)).is_err() {
            warn!("Failed to send status result: receiver dropped");
        }
    });
}

fn spawn_upload(backend: Arc<dyn Backend>, path: PathBuf, tx: mpsc::Sender<Action>) {
    info!("Spawning upload of {}", path.display());
    tokio::spawn(async move {
        let outcome = backend.upload(&path).await;
        if tx.send(Action::UploadFinished(outcome)).is_err() {
            warn!("Failed to send upload result: receiver dropped");
        }
    });
}

fn spawn_ask(backend: Arc<dyn Backend>, question: String, tx: mpsc::Sender<Action>) {
    info!("Spawning ask request ({} chars)", question.len());
    tokio::spawn(async move {
        let outcome = backend.ask(&question).await;
        if tx.send(Action::AnswerArrived(outcome)).is_err() {
            warn!("Failed to send answer: receiver dropped");
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;

    #[test]
    fn test_dropped_file_path_accepts_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("report.pdf");
        File::create(&file).unwrap();

        let pasted = file.display().to_string();
        assert_eq!(dropped_file_path(&pasted), Some(file.clone()));

        // Quoted, as some terminals deliver drops
        assert_eq!(dropped_file_path(&format!("'{pasted}'")), Some(file));
    }

    #[test]
    fn test_dropped_file_path_rejects_ordinary_text() {
        assert_eq!(dropped_file_path("what is the total?"), None);
        assert_eq!(dropped_file_path(""), None);
        assert_eq!(dropped_file_path("/no/such/file.pdf"), None);
    }

    #[test]
    fn test_dropped_file_path_rejects_multiline_paste() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("report.pdf");
        File::create(&file).unwrap();
        let pasted = format!("{}\nmore text", file.display());
        assert_eq!(dropped_file_path(&pasted), None);
    }
}
