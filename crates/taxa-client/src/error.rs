//! Error types for the taxonomy client
//!
//! Every remote call can fail. Failures are reported to the caller and never
//! retried automatically; [`ServiceError::is_retryable`] lets callers decide.

use taxa_core::NodeId;

/// Failure of a taxonomy service call
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Connection, TLS or timeout failure
    #[error("transport error: {0}")]
    Transport(#[source] reqwest::Error),

    /// Non-success HTTP status
    #[error("taxonomy service returned {status}: {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body, possibly truncated
        body: String,
    },

    /// Node does not exist
    #[error("taxonomy node not found: {0}")]
    NotFound(NodeId),

    /// Response body could not be decoded
    #[error("invalid response body: {0}")]
    Decode(String),

    /// Parent pointers loop or run deeper than the rank list
    #[error("corrupt hierarchy at node {0}")]
    CorruptHierarchy(NodeId),

    /// Client configuration rejected
    #[error("configuration error: {0}")]
    Config(String),

    /// Service-specific failure (used by non-HTTP implementations)
    #[error("taxonomy service unavailable: {0}")]
    Unavailable(String),
}

impl ServiceError {
    /// Whether repeating the call may succeed
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(_) | Self::Unavailable(_) => true,
            Self::Status { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

impl From<reqwest::Error> for ServiceError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Transport(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retryable_classification() {
        assert!(ServiceError::Status { status: 503, body: String::new() }.is_retryable());
        assert!(!ServiceError::Status { status: 400, body: String::new() }.is_retryable());
        assert!(!ServiceError::NotFound(NodeId::new("x")).is_retryable());
        assert!(ServiceError::Unavailable("down".into()).is_retryable());
    }

    #[test]
    fn status_display() {
        let err = ServiceError::Status {
            status: 500,
            body: "oops".into(),
        };
        assert_eq!(err.to_string(), "taxonomy service returned 500: oops");
    }
}
