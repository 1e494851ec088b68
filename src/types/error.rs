//! Error types for Hearth

use hyper::StatusCode;

/// Main error type for Hearth operations
#[derive(Debug, thiserror::Error)]
pub enum HearthError {
    #[error("Missing required field: {0}")]
    Validation(&'static str),

    #[error("{kind} not found")]
    NotFound { kind: &'static str, id: String },

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Trading service error: {0}")]
    Upstream(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl HearthError {
    /// Convert error to HTTP status code
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            // Upstream failures keep the original surface contract: the
            // response is a 200 whose body carries an `error` field.
            Self::Upstream(_) => StatusCode::OK,
            Self::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<std::io::Error> for HearthError {
    fn from(err: std::io::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

impl From<hyper::Error> for HearthError {
    fn from(err: hyper::Error) -> Self {
        Self::Internal(format!("HTTP error: {}", err))
    }
}

impl From<tokio_tungstenite::tungstenite::Error> for HearthError {
    fn from(err: tokio_tungstenite::tungstenite::Error) -> Self {
        Self::Internal(format!("WebSocket error: {}", err))
    }
}

/// Result type alias for Hearth operations
pub type Result<T> = std::result::Result<T, HearthError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message_names_the_kind() {
        let err = HearthError::NotFound {
            kind: "Task",
            id: "task_123".to_string(),
        };
        assert_eq!(err.to_string(), "Task not found");
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_validation_maps_to_400() {
        let err = HearthError::Validation("title");
        assert_eq!(err.to_string(), "Missing required field: title");
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_upstream_keeps_200_contract() {
        let err = HearthError::Upstream("connection refused".to_string());
        assert_eq!(err.status_code(), StatusCode::OK);
    }
}
