//! Error types for Travelog

use thiserror::Error;

pub type Result<T> = std::result::Result<T, TravelogError>;

#[derive(Error, Debug)]
pub enum TravelogError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid record id: {0}")]
    InvalidRecordId(String),

    #[error("Attachment exceeds {limit} bytes")]
    AttachmentTooLarge { limit: usize },

    #[error("Invalid data URI: {0}")]
    InvalidDataUri(String),

    #[error("Storage error: {0}")]
    Store(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl TravelogError {
    /// Whether the failure was caused by the caller's input rather than the
    /// service or its store.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            TravelogError::Validation(_)
                | TravelogError::InvalidRecordId(_)
                | TravelogError::AttachmentTooLarge { .. }
                | TravelogError::InvalidDataUri(_)
        )
    }
}

impl From<serde_json::Error> for TravelogError {
    fn from(e: serde_json::Error) -> Self {
        TravelogError::Serialization(e.to_string())
    }
}
