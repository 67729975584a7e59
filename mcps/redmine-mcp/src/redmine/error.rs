//! Error types for Redmine operations

use thiserror::Error;

/// Errors that can occur while talking to Redmine
#[derive(Error, Debug)]
pub enum RedmineError {
    /// Arguments were rejected before any request was sent
    #[error("invalid arguments: {0}")]
    Validation(String),

    /// The request did not complete within the configured timeout
    #[error("request to {0} timed out")]
    Timeout(String),

    /// Connection, TLS or protocol failure
    #[error("failed to reach Redmine: {0}")]
    Transport(#[source] reqwest::Error),

    /// Redmine answered with a non-2xx status
    #[error("Redmine API error {status}: {body}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Response body text
        body: String,
    },

    /// The response did not have the expected shape
    #[error("unexpected Redmine response: {0}")]
    Decode(String),

    /// Settings that cannot produce a working client
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl RedmineError {
    pub fn validation(message: impl Into<String>) -> Self {
        RedmineError::Validation(message.into())
    }
}

impl From<serde_json::Error> for RedmineError {
    fn from(e: serde_json::Error) -> Self {
        RedmineError::Decode(e.to_string())
    }
}

/// Result type alias for Redmine operations
pub type RedmineResult<T> = Result<T, RedmineError>;

/// Reject zero ids before they reach a URL
pub fn ensure_positive(field: &str, id: u64) -> RedmineResult<u64> {
    if id == 0 {
        return Err(RedmineError::Validation(format!(
            "{} must be a positive integer",
            field
        )));
    }
    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_message_carries_status_and_body() {
        let err = RedmineError::Api {
            status: 422,
            body: r#"{"errors":["Subject cannot be blank"]}"#.to_string(),
        };
        let message = err.to_string();
        assert!(message.contains("422"));
        assert!(message.contains("Subject cannot be blank"));
    }

    #[test]
    fn test_ensure_positive() {
        assert_eq!(ensure_positive("issue_id", 5).unwrap(), 5);
        let err = ensure_positive("issue_id", 0).unwrap_err();
        assert!(matches!(err, RedmineError::Validation(_)));
        assert!(err.to_string().contains("issue_id"));
    }
}
