//! Error types shared by the session store and its collaborators.
use thiserror::Error;

/// Input rejected before any state change or network call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("User ID is required")]
    MissingUserId,
    #[error("User profile is required")]
    MissingProfile,
    #[error("User profile must be an object, got {0}")]
    InvalidProfile(&'static str),
}

/// Failure talking to the balance service.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("HTTP {status}: {status_text}")]
    Status { status: u16, status_text: String },
    #[error("Malformed response: {0}")]
    Decode(String),
    #[error("Request timed out after {0} ms")]
    Timeout(u32),
}

impl From<serde_json::Error> for TransportError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

/// Errors surfaced by [`crate::SessionStore`] operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error("Balance is read-only outside development mode")]
    ReadOnly,
    #[error("Storage error: {0}")]
    Storage(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_are_user_presentable() {
        assert_eq!(ValidationError::MissingUserId.to_string(), "User ID is required");
        let status = TransportError::Status {
            status: 502,
            status_text: "Bad Gateway".into(),
        };
        assert_eq!(status.to_string(), "HTTP 502: Bad Gateway");
        assert_eq!(
            StoreError::from(TransportError::Timeout(250)).to_string(),
            "Request timed out after 250 ms"
        );
    }

    #[test]
    fn json_errors_become_decode_failures() {
        let err = serde_json::from_str::<u64>("-1").expect_err("negative is not u64");
        assert!(matches!(TransportError::from(err), TransportError::Decode(_)));
    }
}
