use serde::{Deserialize, Serialize};

/// Response body of `GET /status`.
///
/// A missing flag is treated the same as `false` — the question input must
/// never unlock on a malformed status reply.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct StatusResponse {
    #[serde(default)]
    pub has_document: bool,
}

/// Success body of `POST /upload`.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct UploadResponse {
    pub message: String,
}

/// Request body of `POST /ask`.
#[derive(Serialize, Debug)]
pub struct AskRequest<'a> {
    pub question: &'a str,
}

/// Success body of `POST /ask`. `sources` is optional on the wire.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct AskResponse {
    pub answer: String,
    #[serde(default)]
    pub sources: Vec<String>,
}

/// Error body the backend returns on failed requests.
///
/// FastAPI-style: `detail` is usually a string, but validation errors carry
/// a list instead.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ErrorBody {
    pub detail: Option<ErrorDetail>,
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum ErrorDetail {
    Text(String),
    List(Vec<String>),
}

impl ErrorDetail {
    /// Collapses the detail into one display string; list items are joined
    /// with single spaces.
    pub fn into_text(self) -> String {
        match self {
            ErrorDetail::Text(text) => text,
            ErrorDetail::List(items) => items.join(" "),
        }
    }
}
