//! Error types for garden_stock

use thiserror::Error;

/// Unified error type for garden_stock operations
#[derive(Debug, Error)]
pub enum StockError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    /// Failed to parse JSON response
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
    /// HTTP error status code
    #[error("HTTP error: {0}")]
    HttpStatus(reqwest::StatusCode),
    /// Telegram accepted the request but refused to deliver it
    #[error("Telegram rejected message: {0}")]
    Rejected(String),
    /// A required environment variable or flag was not supplied
    #[error("Configuration error: {0} is not set")]
    MissingVar(&'static str),
    /// Invalid startup configuration
    #[error("Configuration error: {0}")]
    Config(String),
    /// Socket or file I/O failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl StockError {
    /// True when the request never got a response in time
    pub fn is_timeout(&self) -> bool {
        matches!(self, StockError::Network(e) if e.is_timeout())
    }
}

/// Result alias for garden_stock operations
pub type Result<T> = std::result::Result<T, StockError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_names_the_problem() {
        let err = StockError::Config("CHECK_INTERVAL_SECS must be at least 1".to_string());
        assert_eq!(
            err.to_string(),
            "Configuration error: CHECK_INTERVAL_SECS must be at least 1"
        );
        assert!(!err.is_timeout());
    }

    #[test]
    fn missing_var_display() {
        let err = StockError::MissingVar("TELEGRAM_CHAT_ID");
        assert_eq!(
            err.to_string(),
            "Configuration error: TELEGRAM_CHAT_ID is not set"
        );
    }

    #[test]
    fn http_status_display() {
        let err = StockError::HttpStatus(reqwest::StatusCode::BAD_GATEWAY);
        assert_eq!(err.to_string(), "HTTP error: 502 Bad Gateway");
    }

    #[test]
    fn parse_error_converts() {
        let parse = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: StockError = parse.into();
        assert!(matches!(err, StockError::Parse(_)));
    }
}
