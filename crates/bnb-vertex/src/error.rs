//! Vertex client error types.

use thiserror::Error;

/// Result type for Vertex and metadata operations.
pub type VertexResult<T> = Result<T, VertexError>;

/// Errors that can occur talking to Vertex AI or the metadata server.
#[derive(Debug, Error)]
pub enum VertexError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("{operation} returned {status}: {body}")]
    Http {
        operation: String,
        status: u16,
        body: String,
    },

    #[error("Invalid response: {0}")]
    Decode(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl VertexError {
    pub fn http(operation: impl Into<String>, status: u16, body: impl Into<String>) -> Self {
        Self::Http {
            operation: operation.into(),
            status,
            body: body.into(),
        }
    }

    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// True if the backend answered but the body could not be understood.
    pub fn is_decode(&self) -> bool {
        matches!(self, VertexError::Decode(_))
    }

    /// HTTP status of a non-2xx response, if any.
    pub fn http_status(&self) -> Option<u16> {
        match self {
            VertexError::Http { status, .. } => Some(*status),
            VertexError::Network(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_error_status() {
        let err = VertexError::http("predictLongRunning", 401, "unauthenticated");
        assert_eq!(err.http_status(), Some(401));
        assert!(!err.is_decode());
        assert!(err.to_string().contains("predictLongRunning returned 401"));
    }

    #[test]
    fn test_decode_error() {
        let err = VertexError::decode("missing name");
        assert!(err.is_decode());
        assert_eq!(err.http_status(), None);
    }
}
