use thiserror::Error;

pub type Result<T> = std::result::Result<T, BrowserError>;

#[derive(Debug, Error)]
pub enum BrowserError {
    #[error("chromium error: {0}")]
    ChromiumError(String),

    #[error("could not connect to remote browser at {endpoint}: {reason}")]
    ConnectError { endpoint: String, reason: String },

    #[error("browser launch failed: {0}")]
    LaunchError(String),

    #[error("navigation failed: {0}")]
    NavigationError(String),

    #[error("script evaluation failed: {0}")]
    EvaluationError(String),

    #[error("timeout: {0}")]
    Timeout(String),

    #[error("page session is not open")]
    NotOpen,

    #[error("page session is already open")]
    AlreadyOpen,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = BrowserError::NavigationError("page not found".to_string());
        assert_eq!(err.to_string(), "navigation failed: page not found");
    }

    #[test]
    fn test_connect_error() {
        let err = BrowserError::ConnectError {
            endpoint: "ws://host.docker.internal:8585".to_string(),
            reason: "connection refused".to_string(),
        };
        assert!(err.to_string().contains("ws://host.docker.internal:8585"));
        assert!(err.to_string().contains("connection refused"));
    }
}
