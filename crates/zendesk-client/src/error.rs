//! Client error types.

use reqwest::StatusCode;

/// Errors that can occur when using the Zendesk client.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// HTTP request failed (request construction, transport, or body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server returned a status outside the 2xx/3xx success range.
    ///
    /// The raw response body is carried alongside the status so callers can
    /// extract Zendesk's error detail themselves; the Display message is
    /// deliberately generic.
    #[error("unexpected status {status}: check status and body for error details")]
    Status {
        /// HTTP status code.
        status: StatusCode,
        /// Raw response body.
        body: Vec<u8>,
    },

    /// JSON envelope could not be serialized or deserialized.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Local file access failed (profile image uploads).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A required argument was missing or empty.
    #[error("required argument is missing: {0}")]
    InvalidArgument(&'static str),
}

impl Error {
    /// The HTTP status of a [`Error::Status`] failure, if that is what this is.
    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}
