//! Transiter client error types.

use std::fmt;

/// Errors from the Transiter HTTP client.
#[derive(Debug)]
pub enum TransiterError {
    /// HTTP request failed (network error, timeout, etc.)
    Http(reqwest::Error),

    /// JSON deserialization or conversion failed
    Json {
        message: String,
        body: Option<String>,
    },

    /// API returned an error status code
    Api { status: u16, message: String },

    /// The requested trip or stop does not exist upstream
    NotFound,
}

impl TransiterError {
    /// True for a definitive "resource does not exist" response.
    ///
    /// NotFound must never be retried: the subject itself is invalid.
    pub fn is_not_found(&self) -> bool {
        matches!(self, TransiterError::NotFound)
    }
}

impl fmt::Display for TransiterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransiterError::Http(e) => write!(f, "HTTP error: {e}"),
            TransiterError::Json { message, body } => {
                write!(f, "JSON parse error: {message}")?;
                if let Some(body) = body {
                    write!(f, " (body: {body})")?;
                }
                Ok(())
            }
            TransiterError::Api { status, message } => {
                write!(f, "API error {status}: {message}")
            }
            TransiterError::NotFound => write!(f, "resource not found upstream"),
        }
    }
}

impl std::error::Error for TransiterError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TransiterError::Http(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for TransiterError {
    fn from(err: reqwest::Error) -> Self {
        TransiterError::Http(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = TransiterError::NotFound;
        assert_eq!(err.to_string(), "resource not found upstream");

        let err = TransiterError::Api {
            status: 500,
            message: "Internal Server Error".into(),
        };
        assert_eq!(err.to_string(), "API error 500: Internal Server Error");

        let err = TransiterError::Json {
            message: "expected string".into(),
            body: Some("{}".into()),
        };
        assert!(err.to_string().contains("JSON parse error"));
        assert!(err.to_string().contains("expected string"));
    }

    #[test]
    fn not_found_classification() {
        assert!(TransiterError::NotFound.is_not_found());
        assert!(
            !TransiterError::Api {
                status: 500,
                message: String::new()
            }
            .is_not_found()
        );
    }
}
