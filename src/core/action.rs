//! # Actions
//!
//! Everything that can happen in DocChat becomes an `Action`.
//! User presses Enter? That's `Action::SubmitQuestion`.
//! The backend replies? That's `Action::AnswerArrived(result)`.
//!
//! The `update()` function takes the current state and an action and
//! mutates the state, returning an `Effect` describing any I/O the caller
//! must perform. No side effects here. I/O happens elsewhere.
//!
//! ```text
//! State + Action  →  update()  →  New State + Effect
//! ```
//!
//! This makes the whole interaction contract testable without a terminal
//! or a network: feed actions, assert on state and effects.

use std::path::PathBuf;

use log::debug;

use crate::api::{ApiError, AskResponse, StatusResponse, UploadResponse};
use crate::core::state::App;

/// Shown when an upload fails without a usable server detail.
pub const UPLOAD_FAILED_FALLBACK: &str = "Upload failed. Check backend.";
/// Shown when a question fails without a usable server detail.
pub const ASK_FAILED_FALLBACK: &str = "Error fetching answer.";

#[derive(Debug)]
pub enum Action {
    /// The startup `/status` query finished (either way).
    StatusResolved(Result<StatusResponse, ApiError>),
    /// A file was picked in the file browser. Not extension-checked; the
    /// backend is the authority on content.
    FileChosen(PathBuf),
    /// A file path was dropped/pasted onto the terminal. Only `.pdf` names
    /// are accepted from this path.
    FileDropped(PathBuf),
    SubmitUpload,
    UploadFinished(Result<UploadResponse, ApiError>),
    SubmitQuestion(String),
    AnswerArrived(Result<AskResponse, ApiError>),
    Quit,
}

/// I/O the event loop must perform after a state transition.
#[derive(Debug, PartialEq, Eq)]
pub enum Effect {
    None,
    Quit,
    SpawnUpload(PathBuf),
    SpawnAsk(String),
}

pub fn update(app: &mut App, action: Action) -> Effect {
    match action {
        Action::StatusResolved(result) => {
            app.gate.resolved = true;
            // Fail closed: any status failure counts as "no document".
            app.gate.has_document = result.map(|s| s.has_document).unwrap_or(false);
            app.status_message = if app.gate.has_document {
                String::from("Document ready — ask away.")
            } else {
                String::from("No document yet — upload a PDF.")
            };
            Effect::None
        }

        Action::FileChosen(path) => {
            debug!("File chosen: {}", path.display());
            app.selected_file = Some(path);
            Effect::None
        }

        Action::FileDropped(path) => {
            let is_pdf = path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));
            if is_pdf {
                debug!("File dropped: {}", path.display());
                app.selected_file = Some(path);
            } else {
                debug!("Ignoring dropped non-PDF: {}", path.display());
            }
            Effect::None
        }

        Action::SubmitUpload => {
            // At most one upload in flight; later attempts are rejected,
            // not queued.
            if app.uploading {
                return Effect::None;
            }
            let Some(path) = app.selected_file.clone() else {
                return Effect::None;
            };
            app.uploading = true;
            app.upload_status = None;
            Effect::SpawnUpload(path)
        }

        Action::UploadFinished(result) => {
            app.uploading = false;
            match result {
                Ok(response) => {
                    app.upload_status = Some(format!("✅ {}", response.message));
                    // Optimistic: the backend just confirmed ingestion, no
                    // second /status round-trip needed.
                    app.gate.has_document = true;
                    app.status_message = String::from("Document ready — ask away.");
                }
                Err(err) => {
                    // selected_file is left alone so the user can retry
                    // without reselecting.
                    app.upload_status =
                        Some(format!("❌ {}", err.user_detail(UPLOAD_FAILED_FALLBACK)));
                }
            }
            Effect::None
        }

        Action::SubmitQuestion(text) => {
            if text.trim().is_empty() || app.pending_question || !app.gate.ready() {
                return Effect::None;
            }
            // Optimistic append: the question shows up before the request
            // resolves, and is never rolled back.
            app.transcript.push_user(text.clone());
            app.pending_question = true;
            Effect::SpawnAsk(text)
        }

        Action::AnswerArrived(result) => {
            app.pending_question = false;
            match result {
                Ok(response) => {
                    app.transcript.push_assistant(response.answer, response.sources);
                }
                Err(err) => {
                    app.transcript.push_assistant(
                        format!("❌ {}", err.user_detail(ASK_FAILED_FALLBACK)),
                        Vec::new(),
                    );
                }
            }
            Effect::None
        }

        Action::Quit => Effect::Quit,
    }
}
