//! Errors surfaced by the HTTP client.

use reqwest::StatusCode;
use thiserror::Error;

use salonhub_auth::AuthError;
use salonhub_core::error::{AppError, ErrorKind};

/// Failure of an API call.
///
/// Apart from the 401 recovery path, errors reach the caller exactly as the
/// server or transport produced them.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server answered with a non-success status.
    #[error("HTTP {status} from {url}: {body}")]
    Status {
        /// Response status.
        status: StatusCode,
        /// Final request URL.
        url: String,
        /// Response body text, possibly empty.
        body: String,
    },
    /// The request was sent but no response arrived (timeout, refused
    /// connection, DNS failure).
    #[error("No response from {url}: {source}")]
    NoResponse {
        /// Request URL.
        url: String,
        /// Transport error.
        #[source]
        source: reqwest::Error,
    },
    /// The request could not be constructed, so nothing was sent.
    #[error("Failed to build request: {0}")]
    Request(String),
    /// The response body did not match the expected shape.
    #[error("Failed to decode response from {url}: {source}")]
    Decode {
        /// Request URL.
        url: String,
        /// Decoding error.
        #[source]
        source: reqwest::Error,
    },
    /// A replacement token could not be obtained.
    #[error("Token refresh failed: {0}")]
    Refresh(String),
    /// The session store rejected a token.
    #[error(transparent)]
    Session(#[from] AuthError),
}

impl ApiError {
    /// HTTP status, when the server responded.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the server answered 401.
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(StatusCode::UNAUTHORIZED)
    }

    /// Error category for the application boundary.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Status { status, .. } => match *status {
                StatusCode::UNAUTHORIZED => ErrorKind::Authentication,
                StatusCode::FORBIDDEN => ErrorKind::Authorization,
                StatusCode::NOT_FOUND => ErrorKind::NotFound,
                s if s.is_server_error() => ErrorKind::ExternalService,
                _ => ErrorKind::Validation,
            },
            Self::NoResponse { .. } => ErrorKind::ServiceUnavailable,
            Self::Request(_) => ErrorKind::Internal,
            Self::Decode { .. } => ErrorKind::Serialization,
            Self::Refresh(_) | Self::Session(_) => ErrorKind::Authentication,
        }
    }
}

impl From<ApiError> for AppError {
    fn from(err: ApiError) -> Self {
        let kind = err.kind();
        AppError::with_source(kind, err.to_string(), err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(code: u16) -> ApiError {
        ApiError::Status {
            status: StatusCode::from_u16(code).unwrap(),
            url: "http://localhost/api/x".to_string(),
            body: String::new(),
        }
    }

    #[test]
    fn test_status_kinds() {
        assert_eq!(status(401).kind(), ErrorKind::Authentication);
        assert_eq!(status(403).kind(), ErrorKind::Authorization);
        assert_eq!(status(404).kind(), ErrorKind::NotFound);
        assert_eq!(status(500).kind(), ErrorKind::ExternalService);
        assert_eq!(status(503).kind(), ErrorKind::ExternalService);
        assert_eq!(status(422).kind(), ErrorKind::Validation);
    }

    #[test]
    fn test_conversion_keeps_kind() {
        let app: AppError = status(404).into();
        assert_eq!(app.kind, ErrorKind::NotFound);
        assert!(app.message.contains("404"));
    }

    #[test]
    fn test_session_errors_are_authentication() {
        let err: ApiError = AuthError::Malformed("bad".to_string()).into();
        assert_eq!(err.kind(), ErrorKind::Authentication);
        assert!(!err.is_unauthorized());
    }
}
