//! Error taxonomy shared by the API client and the workspace state machines.
//!
//! Every failure a screen can see falls into one of four buckets:
//!
//! - [`ValidationError`]: rejected locally, no request was built.
//! - [`ApiError::Request`]: the server answered with a non-success status, or
//!   the exchange failed before a usable answer arrived.
//! - [`ApiError::Timeout`]: no answer within the configured bound.
//! - [`ApiError::SessionExpired`]: the server no longer accepts our token; the
//!   session store has already been cleared when this is returned.

use thiserror::Error;

/// Result alias used by the API client.
pub type Result<T> = std::result::Result<T, ApiError>;

/// Input rejected before any network traffic.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please paste some code first")]
    EmptyCode,

    #[error("Password must be at least {min} characters")]
    PasswordTooShort { min: usize },

    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("A request is already in progress")]
    RequestPending,
}

/// Failure of a backend exchange.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// `status` is `None` when no HTTP response was received at all.
    #[error("{message}")]
    Request { status: Option<u16>, message: String },

    #[error("The server took too long to respond")]
    Timeout,

    #[error("Session expired: {message}")]
    SessionExpired { message: String },
}

impl ApiError {
    /// Builds a transport-level `Request` error (no HTTP status).
    pub fn transport(message: impl Into<String>) -> Self {
        ApiError::Request { status: None, message: message.into() }
    }

    /// True when this error forced a logout.
    pub fn is_session_expired(&self) -> bool {
        matches!(self, ApiError::SessionExpired { .. })
    }
}

/// Failure of the durable client storage.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage database error: {0}")]
    Database(#[from] tokio_rusqlite::Error),

    #[error("stored user record is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_messages_are_user_facing() {
        assert_eq!(
            ValidationError::PasswordTooShort { min: 6 }.to_string(),
            "Password must be at least 6 characters"
        );
        assert_eq!(ValidationError::MissingField("Email").to_string(), "Email is required");
    }

    #[test]
    fn request_error_displays_server_message() {
        let err = ApiError::Request { status: Some(400), message: "Email already registered".into() };
        assert_eq!(err.to_string(), "Email already registered");
        assert!(!err.is_session_expired());
    }

    #[test]
    fn validation_converts_into_api_error() {
        let err: ApiError = ValidationError::EmptyCode.into();
        assert_eq!(err, ApiError::Validation(ValidationError::EmptyCode));
    }
}
