use thiserror::Error;

/// Input rejected before any state change.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("message is empty")]
    EmptyInput,
}

/// Failure to obtain a reply from a resolver.
///
/// Recovered by the session controller, which substitutes the fallback message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NetworkError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("request timed out after {0}ms")]
    Timeout(u64),

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("failed to decode response: {0}")]
    Decode(String),

    #[error("resolver misconfigured: {0}")]
    Config(String),
}

/// Errors from persistence adapters.
///
/// Never surfaced to the user; the in-memory conversation stays authoritative.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("storage connection error: {0}")]
    Connection(String),

    #[error("query error: {0}")]
    Query(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_display() {
        assert_eq!(ValidationError::EmptyInput.to_string(), "message is empty");
    }

    #[test]
    fn test_network_error_display() {
        let err = NetworkError::Status {
            status: 503,
            body: "unavailable".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP 503: unavailable");
        assert!(NetworkError::Timeout(30_000).to_string().contains("30000"));
    }

    #[test]
    fn test_persistence_error_display() {
        let err = PersistenceError::Query("disk full".to_string());
        assert_eq!(err.to_string(), "query error: disk full");
    }
}
