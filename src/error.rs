//! Application error types.
//!
//! Provides unified error handling with actionable context for debugging.

use thiserror::Error;

/// Application result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Application error types with specific context for actionable debugging
#[derive(Debug, Error)]
pub enum Error {
    /// IO error with path context
    #[error("IO error at {path:?}: {source}")]
    Io {
        /// The underlying IO error.
        source: std::io::Error,
        /// File path where the error occurred, if known.
        path: Option<std::path::PathBuf>,
    },

    /// Book identifier has no match in the version's canonical index
    #[error("Book not found in {version}: {identifier}")]
    BookNotFound {
        /// Version the lookup ran against.
        version: String,
        /// The identifier that failed to match.
        identifier: String,
    },

    /// Unknown primary version identifier
    #[error("Version not found: {0}")]
    VersionNotFound(String),

    /// A range whose end precedes its start at book or chapter granularity
    #[error("Invalid range: {0}")]
    InvalidRange(&'static str),

    /// Corpus validation rule failure after import
    #[error("Validation failed for {version}: {message}")]
    Validation {
        /// Version being validated.
        version: String,
        /// Description of the rule that failed.
        message: String,
    },

    /// Import pipeline error
    #[error("Import error for {version}: {message}")]
    Import {
        /// Version being imported.
        version: String,
        /// Description of the failure.
        message: String,
    },

    /// File parsing error
    #[error("Parse error in {file:?}: {message}")]
    Parse {
        /// File that failed to parse, if known.
        file: Option<std::path::PathBuf>,
        /// Description of the parse failure.
        message: String,
    },

    /// Configuration error with guidance
    #[error("Configuration error: {message}. {hint}")]
    Config {
        /// Description of the configuration problem.
        message: String,
        /// Actionable guidance for fixing the issue.
        hint: &'static str,
    },

    /// Generic message error (escape hatch)
    #[error("{0}")]
    Msg(String),
}

impl Error {
    /// Create an IO error with path context
    pub fn io(source: std::io::Error, path: impl Into<Option<std::path::PathBuf>>) -> Self {
        Self::Io { source, path: path.into() }
    }

    /// Create a book-not-found error
    pub fn book_not_found(version: impl Into<String>, identifier: impl Into<String>) -> Self {
        Self::BookNotFound {
            version: version.into(),
            identifier: identifier.into(),
        }
    }

    /// Create an import error with version context
    pub fn import(version: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Import {
            version: version.into(),
            message: message.into(),
        }
    }

    /// Create a validation error with version context
    pub fn validation(version: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            version: version.into(),
            message: message.into(),
        }
    }

    /// Create a config error with actionable hint
    pub fn config(message: impl Into<String>, hint: &'static str) -> Self {
        Self::Config { message: message.into(), hint }
    }

    /// Create a parse error with file context
    pub fn parse(message: impl Into<String>, file: impl Into<Option<std::path::PathBuf>>) -> Self {
        Self::Parse { file: file.into(), message: message.into() }
    }
}

// Convenience conversions
impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self::Io { source: e, path: None }
    }
}

impl From<String> for Error {
    fn from(s: String) -> Self {
        Self::Msg(s)
    }
}

impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Self::Msg(s.to_string())
    }
}
