use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

pub type Result<T> = std::result::Result<T, MakerError>;

#[derive(Debug, Error)]
pub enum MakerError {
    #[error("{0}")]
    InvalidApiName(String),

    #[error("invariant failed: {0}")]
    Validation(String),

    #[error("ontology violation: {0}")]
    OntologyViolation(String),

    #[error("unsupported: {0}")]
    Unsupported(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("invalid definition document: {0}")]
    InvalidDocument(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorPayload {
    pub code: String,
    pub message: String,
    pub operation: String,
    pub trace_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl MakerError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidApiName(_) => "INVALID_API_NAME",
            Self::Validation(_) => "VALIDATION_FAILED",
            Self::OntologyViolation(_) => "ONTOLOGY_VIOLATION",
            Self::Unsupported(_) => "UNSUPPORTED",
            Self::Conflict(_) => "CONFLICT",
            Self::NotFound(_) => "NOT_FOUND",
            Self::InvalidDocument(_) => "INVALID_DOCUMENT",
            Self::Io(_) => "IO_ERROR",
            Self::Json(_) => "JSON_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    pub fn to_payload(&self, operation: impl Into<String>) -> ErrorPayload {
        ErrorPayload {
            code: self.code().to_string(),
            message: self.to_string(),
            operation: operation.into(),
            trace_id: Uuid::new_v4().to_string(),
            details: None,
        }
    }
}
