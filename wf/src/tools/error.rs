//! External service error types

use thiserror::Error;

/// Errors from the route and places service clients
///
/// These never reach the pipeline directly: the adapter catches them and
/// substitutes the empty-result sentinel.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Service error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Missing API key: environment variable {0} is not set")]
    MissingApiKey(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ServiceError::Api {
            status: 502,
            message: "bad gateway".to_string(),
        };
        assert_eq!(err.to_string(), "Service error 502: bad gateway");

        let err = ServiceError::MissingApiKey("HERE_API_KEY".to_string());
        assert!(err.to_string().contains("HERE_API_KEY"));
    }
}
