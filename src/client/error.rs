//! Errors raised while talking to the content API

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("content API returned status {status} for {path}: {body}")]
    Status {
        status: u16,
        path: String,
        body: String,
    },
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),
    #[error("content API exposes no master ref")]
    MissingMasterRef,
    #[error("invalid pagination cursor {0:?}")]
    InvalidCursor(String),
    #[error("no {doc_type} document with uid {uid:?}")]
    NotFound { doc_type: String, uid: String },
    #[error("invalid document {id}: {reason}")]
    InvalidDocument { id: String, reason: String },
}

impl ContentError {
    pub fn invalid_document(id: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        Self::InvalidDocument {
            id: id.into(),
            reason: reason.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
