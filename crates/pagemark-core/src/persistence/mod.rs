//! Save-request plumbing to the document backend.

mod memory;

#[cfg(feature = "http")]
mod http;

pub use memory::MemoryBackend;

#[cfg(feature = "http")]
pub use http::HttpBackend;

use crate::serialize::DocumentAnnotation;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Persistence errors.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Save rejected: {0}")]
    Rejected(String),
}

/// Result type for persistence operations.
pub type PersistenceResult<T> = Result<T, PersistenceError>;

/// Boxed future for async operations (compatible with WASM).
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Body posted to the save endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveRequest {
    /// Backend identifier of the source document.
    pub document_id: String,
    /// Annotations in document space, insertion order.
    pub annotations: Vec<DocumentAnnotation>,
}

impl SaveRequest {
    pub fn to_json(&self) -> PersistenceResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SaveStatus {
    Success,
    Error,
    #[serde(other)]
    Unknown,
}

/// Backend reply to a save request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveResponse {
    pub status: SaveStatus,
    /// Where the annotated output can be fetched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl SaveResponse {
    pub fn success(download_url: impl Into<String>) -> Self {
        Self {
            status: SaveStatus::Success,
            download_url: Some(download_url.into()),
            message: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: SaveStatus::Error,
            download_url: None,
            message: Some(message.into()),
        }
    }

    /// Turn a non-success status into an error.
    pub fn into_result(self) -> PersistenceResult<Option<String>> {
        match self.status {
            SaveStatus::Success => Ok(self.download_url),
            SaveStatus::Error | SaveStatus::Unknown => Err(PersistenceError::Rejected(
                self.message.unwrap_or_else(|| "backend reported an error".to_string()),
            )),
        }
    }
}

/// What a save attempt did to the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// The backend accepted the annotations; the session is finished.
    Completed { download_url: Option<String> },
    /// Nothing was persisted; the annotations are still editable.
    Failed { reason: String },
    /// A save is already in flight or the session already finished.
    Skipped,
}

impl SaveOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, SaveOutcome::Completed { .. })
    }
}

/// Trait for save backends.
///
/// The editor is single-threaded, so implementations need not be `Send`.
pub trait PersistenceBackend {
    /// Post one save request and wait for the backend's reply.
    fn save<'a>(
        &'a self,
        request: &'a SaveRequest,
    ) -> BoxFuture<'a, PersistenceResult<SaveResponse>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_wire_names() {
        let request = SaveRequest {
            document_id: "contract.pdf".to_string(),
            annotations: Vec::new(),
        };
        let json = request.to_json().unwrap();
        assert_eq!(json, r#"{"documentId":"contract.pdf","annotations":[]}"#);
    }

    #[test]
    fn test_response_parsing() {
        let ok: SaveResponse =
            serde_json::from_str(r#"{"status":"success","downloadUrl":"/download/x.pdf"}"#)
                .unwrap();
        assert_eq!(ok.into_result().unwrap(), Some("/download/x.pdf".to_string()));

        let err: SaveResponse =
            serde_json::from_str(r#"{"status":"error","message":"disk full"}"#).unwrap();
        assert!(matches!(
            err.into_result(),
            Err(PersistenceError::Rejected(m)) if m == "disk full"
        ));

        let odd: SaveResponse = serde_json::from_str(r#"{"status":"pending"}"#).unwrap();
        assert_eq!(odd.status, SaveStatus::Unknown);
        assert!(odd.into_result().is_err());
    }
}
