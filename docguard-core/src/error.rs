//! Error types for the docguard validator
//!
//! These cover everything that stops a run before checks start (bad
//! configuration, unreadable docs root) and the transport errors surfaced by
//! remote probes. Check outcomes themselves are never errors: a probe error is
//! folded into a failed check by the caller.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for docguard operations
#[derive(Error, Debug)]
pub enum DocGuardError {
    /// Filesystem error with the path that caused it
    #[error("I/O error on {path}: {source}")]
    Io {
        /// Path being read or walked
        path:   PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Docs root missing or not a directory
    #[error("Docs root not found: {0}")]
    DocsRoot(PathBuf),

    /// Configuration file could not be read or parsed
    #[error("Configuration error: {0}")]
    Config(String),

    /// A configured pattern is not a valid regex
    #[error("Invalid pattern `{pattern}`: {source}")]
    Pattern {
        /// Pattern text as configured
        pattern: String,
        /// Regex compiler error
        #[source]
        source:  regex::Error,
    },

    /// Remote request failed (DNS, TLS, timeout, bad body)
    #[error("HTTP error: {0}")]
    Http(String),

    /// Remote answered but without the data asked for
    #[error("Unexpected response: {0}")]
    Response(String),

    /// Report could not be rendered
    #[error("Output error: {0}")]
    Output(String),
}

impl DocGuardError {
    /// Wrap an I/O error with the path it happened on
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        DocGuardError::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<reqwest::Error> for DocGuardError {
    fn from(err: reqwest::Error) -> Self {
        DocGuardError::Http(err.to_string())
    }
}

/// Result type alias for docguard operations
pub type DocGuardResult<T> = std::result::Result<T, DocGuardError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_mentions_path() {
        let err = DocGuardError::io(
            "docs/SKILL.md",
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        let text = err.to_string();
        assert!(text.contains("docs/SKILL.md"));
        assert!(text.contains("gone"));
    }

    #[test]
    fn test_pattern_error_mentions_pattern() {
        let source = regex::Regex::new("(unclosed").unwrap_err();
        let err = DocGuardError::Pattern {
            pattern: "(unclosed".to_string(),
            source,
        };
        assert!(err.to_string().contains("(unclosed"));
    }
}
