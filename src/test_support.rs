//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::collections::VecDeque;
use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::api::{ApiError, AskResponse, Backend, StatusResponse, UploadResponse};
use crate::core::state::App;

/// A backend double that replays scripted responses in FIFO order.
///
/// Calls with no scripted response left fail with a network error, which
/// keeps forgotten expectations loud instead of hanging a test.
#[derive(Default)]
pub struct ScriptedBackend {
    statuses: Mutex<VecDeque<Result<StatusResponse, ApiError>>>,
    uploads: Mutex<VecDeque<Result<UploadResponse, ApiError>>>,
    answers: Mutex<VecDeque<Result<AskResponse, ApiError>>>,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_status(&self, result: Result<StatusResponse, ApiError>) {
        self.statuses.lock().unwrap().push_back(result);
    }

    pub fn push_upload(&self, result: Result<UploadResponse, ApiError>) {
        self.uploads.lock().unwrap().push_back(result);
    }

    pub fn push_answer(&self, result: Result<AskResponse, ApiError>) {
        self.answers.lock().unwrap().push_back(result);
    }
}

#[async_trait]
impl Backend for ScriptedBackend {
    async fn status(&self) -> Result<StatusResponse, ApiError> {
        self.statuses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ApiError::Network("no scripted status".to_string())))
    }

    async fn upload(&self, _path: &Path) -> Result<UploadResponse, ApiError> {
        self.uploads
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ApiError::Network("no scripted upload".to_string())))
    }

    async fn ask(&self, _question: &str) -> Result<AskResponse, ApiError> {
        self.answers
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ApiError::Network("no scripted answer".to_string())))
    }
}

/// Creates a test App with an empty ScriptedBackend.
pub fn test_app() -> App {
    App::new(
        Arc::new(ScriptedBackend::new()),
        "http://localhost:8000".to_string(),
    )
}
