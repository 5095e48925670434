//! Error types for Tern.
//!
//! Defines the main error enum used throughout the application.

use thiserror::Error;

/// Main error type for Tern operations.
#[derive(Error, Debug)]
pub enum TernError {
    /// Repository access errors (store unreachable, corrupted, load failures).
    #[error("Repository error: {0}")]
    Repository(String),

    /// The query language is not supported by the repository backend.
    #[error("Unsupported query language: {0}")]
    UnsupportedLanguage(String),

    /// The query text failed to parse.
    #[error("Malformed query: {0}")]
    MalformedQuery(String),

    /// The query failed while producing results.
    #[error("Query evaluation error: {0}")]
    Evaluation(String),

    /// Configuration errors (invalid config file, unknown repository name, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O errors (query file, data file, output stream).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl TernError {
    /// Creates a repository error with the given message.
    pub fn repository(msg: impl Into<String>) -> Self {
        Self::Repository(msg.into())
    }

    /// Creates an unsupported-query-language error with the given message.
    pub fn unsupported_language(msg: impl Into<String>) -> Self {
        Self::UnsupportedLanguage(msg.into())
    }

    /// Creates a malformed-query error with the given message.
    pub fn malformed_query(msg: impl Into<String>) -> Self {
        Self::MalformedQuery(msg.into())
    }

    /// Creates a query evaluation error with the given message.
    pub fn evaluation(msg: impl Into<String>) -> Self {
        Self::Evaluation(msg.into())
    }

    /// Creates a configuration error with the given message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Returns the error category as a string for display purposes.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Repository(_) => "Repository Error",
            Self::UnsupportedLanguage(_) => "Unsupported Query Language",
            Self::MalformedQuery(_) => "Malformed Query",
            Self::Evaluation(_) => "Query Evaluation Error",
            Self::Config(_) => "Configuration Error",
            Self::Io(_) => "I/O Error",
        }
    }
}

/// Result type alias using TernError.
pub type Result<T> = std::result::Result<T, TernError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_repository() {
        let err = TernError::repository("cannot open store at /var/data");
        assert_eq!(
            err.to_string(),
            "Repository error: cannot open store at /var/data"
        );
        assert_eq!(err.category(), "Repository Error");
    }

    #[test]
    fn test_error_display_unsupported_language() {
        let err = TernError::unsupported_language("SeRQL");
        assert_eq!(err.to_string(), "Unsupported query language: SeRQL");
        assert_eq!(err.category(), "Unsupported Query Language");
    }

    #[test]
    fn test_error_display_malformed_query() {
        let err = TernError::malformed_query("expected '{' at line 1");
        assert_eq!(err.to_string(), "Malformed query: expected '{' at line 1");
        assert_eq!(err.category(), "Malformed Query");
    }

    #[test]
    fn test_error_display_evaluation() {
        let err = TernError::evaluation("store read failed mid-stream");
        assert_eq!(
            err.to_string(),
            "Query evaluation error: store read failed mid-stream"
        );
        assert_eq!(err.category(), "Query Evaluation Error");
    }

    #[test]
    fn test_error_display_config() {
        let err = TernError::config("repository 'prod' not found in config file");
        assert_eq!(
            err.to_string(),
            "Configuration error: repository 'prod' not found in config file"
        );
        assert_eq!(err.category(), "Configuration Error");
    }

    #[test]
    fn test_error_from_io() {
        let err = TernError::from(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "no such file",
        ));
        assert_eq!(err.category(), "I/O Error");
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<TernError>();
    }
}
