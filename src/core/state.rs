//! # Application State
//!
//! Core business state for DocChat. This module contains domain logic only -
//! no TUI-specific types. Presentation state lives in the `tui` module.
//!
//! ```text
//! App
//! ├── backend: Arc<dyn Backend>        // remote document Q&A service
//! ├── backend_url: String              // shown in the title bar
//! ├── transcript: Transcript           // conversation log
//! ├── pending_question: bool           // an /ask request is in flight
//! ├── selected_file: Option<PathBuf>   // file queued for upload
//! ├── uploading: bool                  // an /upload request is in flight
//! ├── upload_status: Option<String>    // outcome line of the last attempt
//! ├── gate: ReadinessGate              // may questions be asked yet?
//! └── status_message: String           // title bar text
//! ```
//!
//! State changes only happen through `update(state, action)` in action.rs.
//! This keeps things predictable, so no surprise mutations.

use std::path::PathBuf;
use std::sync::Arc;

use crate::api::Backend;
use crate::core::transcript::Transcript;

/// Whether question submission is currently permitted.
///
/// `resolved` flips once the initial `/status` query finishes, success or
/// failure. `has_document` stays false until the backend proves otherwise
/// (or an upload succeeds). Failing closed is deliberate: asking questions
/// against a nonexistent document is worse than asking the user to wait.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReadinessGate {
    pub has_document: bool,
    pub resolved: bool,
}

impl ReadinessGate {
    pub fn ready(&self) -> bool {
        self.resolved && self.has_document
    }
}

pub struct App {
    pub backend: Arc<dyn Backend>,
    pub backend_url: String,
    pub transcript: Transcript,
    pub pending_question: bool,
    pub selected_file: Option<PathBuf>,
    pub uploading: bool,
    pub upload_status: Option<String>,
    pub gate: ReadinessGate,
    pub status_message: String,
}

impl App {
    pub fn new(backend: Arc<dyn Backend>, backend_url: String) -> Self {
        Self {
            backend,
            backend_url,
            transcript: Transcript::new(),
            pending_question: false,
            selected_file: None,
            uploading: false,
            upload_status: None,
            gate: ReadinessGate::default(),
            status_message: String::from("Checking backend…"),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::test_support::test_app;

    #[test]
    fn test_app_new_defaults() {
        let app = test_app();
        assert!(app.transcript.is_empty());
        assert!(!app.pending_question);
        assert!(!app.uploading);
        assert!(app.selected_file.is_none());
        assert!(app.upload_status.is_none());
        assert!(!app.gate.resolved);
        assert!(!app.gate.ready());
        assert_eq!(app.status_message, "Checking backend…");
    }

    #[test]
    fn test_gate_requires_both_flags() {
        let mut app = test_app();
        app.gate.has_document = true;
        assert!(!app.gate.ready(), "unresolved gate must stay closed");
        app.gate.resolved = true;
        assert!(app.gate.ready());
        app.gate.has_document = false;
        assert!(!app.gate.ready());
    }
}
