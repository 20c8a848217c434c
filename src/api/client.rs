use std::fmt;
use std::path::Path;

use async_trait::async_trait;
use log::{debug, info, warn};

use super::types::{AskRequest, AskResponse, ErrorBody, StatusResponse, UploadResponse};

/// Errors that can occur talking to the backend.
#[derive(Debug)]
pub enum ApiError {
    /// Network-level failure (timeout, DNS, connection refused).
    Network(String),
    /// The backend answered with an error status. `detail` is the decoded
    /// `detail` field, or empty when the body carried none.
    Api { status: u16, detail: String },
    /// The backend answered 2xx but the body didn't decode.
    Parse(String),
    /// Local filesystem failure while reading the file to upload.
    Io(String),
}

impl ApiError {
    /// The text shown to the user for this error: the server's detail when
    /// there is one, `fallback` for everything else. Transport and
    /// application failures deliberately collapse to one message.
    pub fn user_detail<'a>(&'a self, fallback: &'a str) -> &'a str {
        match self {
            ApiError::Api { detail, .. } if !detail.is_empty() => detail,
            _ => fallback,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Network(msg) => write!(f, "network error: {msg}"),
            ApiError::Api { status, detail } => {
                write!(f, "backend error (HTTP {status}): {detail}")
            }
            ApiError::Parse(msg) => write!(f, "parse error: {msg}"),
            ApiError::Io(msg) => write!(f, "file error: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {}

/// The backend operations the client depends on.
///
/// One method per endpoint. Implementations are free to decide how the
/// calls happen; the core never sees anything but these signatures.
#[async_trait]
pub trait Backend: Send + Sync {
    /// `GET /status` — whether at least one document has been ingested.
    async fn status(&self) -> Result<StatusResponse, ApiError>;

    /// `POST /upload` — sends the file at `path` for ingestion.
    async fn upload(&self, path: &Path) -> Result<UploadResponse, ApiError>;

    /// `POST /ask` — asks a question about the ingested document.
    async fn ask(&self, question: &str) -> Result<AskResponse, ApiError>;
}

/// Live backend over HTTP.
pub struct HttpBackend {
    base_url: String,
    client: reqwest::Client,
}

impl HttpBackend {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client: reqwest::Client::new(),
        }
    }

    /// Decodes an error response into `ApiError::Api`.
    ///
    /// Bodies that aren't the expected JSON error shape yield an empty
    /// detail, so the UI falls back to its generic message; the raw body
    /// only goes to the log.
    async fn decode_error(response: reqwest::Response) -> ApiError {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        let detail = serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .and_then(|b| b.detail)
            .map(|d| d.into_text())
            .unwrap_or_default();
        if detail.is_empty() {
            warn!("Backend error HTTP {status} with undecodable body: {body}");
        } else {
            warn!("Backend error HTTP {status}: {detail}");
        }
        ApiError::Api { status, detail }
    }
}

#[async_trait]
impl Backend for HttpBackend {
    async fn status(&self) -> Result<StatusResponse, ApiError> {
        debug!("GET {}/status", self.base_url);
        let response = self
            .client
            .get(format!("{}/status", self.base_url))
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::decode_error(response).await);
        }
        response
            .json::<StatusResponse>()
            .await
            .map_err(|e| ApiError::Parse(e.to_string()))
    }

    async fn upload(&self, path: &Path) -> Result<UploadResponse, ApiError> {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "document.pdf".to_string());
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| ApiError::Io(format!("{}: {e}", path.display())))?;
        info!("POST {}/upload ({file_name}, {} bytes)", self.base_url, bytes.len());

        // Field name "file" is part of the backend contract.
        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(file_name)
            .mime_str("application/pdf")
            .map_err(|e| ApiError::Parse(e.to_string()))?;
        let form = reqwest::multipart::Form::new().part("file", part);

        let response = self
            .client
            .post(format!("{}/upload", self.base_url))
            .multipart(form)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::decode_error(response).await);
        }
        response
            .json::<UploadResponse>()
            .await
            .map_err(|e| ApiError::Parse(e.to_string()))
    }

    async fn ask(&self, question: &str) -> Result<AskResponse, ApiError> {
        info!("POST {}/ask ({} chars)", self.base_url, question.len());
        let response = self
            .client
            .post(format!("{}/ask", self.base_url))
            .json(&AskRequest { question })
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::decode_error(response).await);
        }
        response
            .json::<AskResponse>()
            .await
            .map_err(|e| ApiError::Parse(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_detail_prefers_server_detail() {
        let err = ApiError::Api {
            status: 409,
            detail: "No document indexed".to_string(),
        };
        assert_eq!(err.user_detail("generic"), "No document indexed");
    }

    #[test]
    fn test_user_detail_falls_back_for_empty_detail() {
        let err = ApiError::Api {
            status: 500,
            detail: String::new(),
        };
        assert_eq!(err.user_detail("generic"), "generic");
    }

    #[test]
    fn test_user_detail_falls_back_for_transport_errors() {
        let err = ApiError::Network("connection refused".to_string());
        assert_eq!(err.user_detail("generic"), "generic");
    }

    #[test]
    fn test_display_includes_status() {
        let err = ApiError::Api {
            status: 400,
            detail: "bad".to_string(),
        };
        assert_eq!(err.to_string(), "backend error (HTTP 400): bad");
    }
}
