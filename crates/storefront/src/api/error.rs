//! Errors surfaced by the remote client.

use thiserror::Error;

/// Errors that can occur when talking to the backend.
///
/// Facades return these unchanged; only page controllers decide how a failure
/// is presented.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced a response (connection, timeout, TLS).
    #[error("HTTP error: {0}")]
    Transport(#[from] reqwest::Error),

    /// A request URL could not be built.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The backend rejected the request (400). At checkout this means
    /// insufficient stock.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// The entity does not exist (404).
    #[error("Not found: {0}")]
    NotFound(String),

    /// Any other non-success status.
    #[error("API error: {status} - {message}")]
    Status { status: u16, message: String },

    /// The response body did not match the expected schema.
    #[error("Decode error: {0}")]
    Decode(String),
}

/// Result type for backend calls.
pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    /// The HTTP status behind this error, if the backend answered.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::BadRequest(_) => Some(400),
            Self::NotFound(_) => Some(404),
            Self::Status { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            Self::InvalidUrl(_) | Self::Decode(_) => None,
        }
    }

    /// Whether the entity was missing.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display() {
        let err = ApiError::NotFound("product 9".to_string());
        assert_eq!(err.to_string(), "Not found: product 9");

        let err = ApiError::Status {
            status: 503,
            message: "down".to_string(),
        };
        assert_eq!(err.to_string(), "API error: 503 - down");
    }

    #[test]
    fn test_status() {
        assert_eq!(ApiError::BadRequest(String::new()).status(), Some(400));
        assert_eq!(ApiError::NotFound(String::new()).status(), Some(404));
        assert_eq!(ApiError::Decode(String::new()).status(), None);
        assert!(ApiError::NotFound(String::new()).is_not_found());
    }
}
