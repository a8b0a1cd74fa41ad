use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using the library's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the docgenie library.
///
/// Every variant is fatal to the run: the binary prints the single-line
/// diagnostic and exits non-zero. Dry-run mode terminates before any code
/// path that can produce a [`Error::Provider`].
#[derive(Error, Debug, Clone)]
#[non_exhaustive]
pub enum Error {
    /// Configuration error (missing/invalid argument, unreadable credential).
    #[error("Invalid configuration: {message}")]
    Config {
        /// Detailed error message
        message: String,
    },

    /// File selection error (bad root, or an empty mandatory selection).
    #[error("Selection failed for '{path}': {message}")]
    Selection {
        /// Root directory that was scanned
        path: PathBuf,
        /// Error message
        message: String,
    },

    /// Remote model call failure (auth, quota, network, malformed response).
    #[error("Provider error: {message}")]
    Provider {
        /// Error message
        message: String,
    },

    /// IO error with context about the file path.
    #[error("IO error accessing '{path}': {message}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// Error message
        message: String,
    },

    /// Prompt template rendering error.
    #[error("Failed to render prompt template: {message}")]
    Template {
        /// Error message
        message: String,
    },

    /// Invalid include/exclude glob pattern.
    #[error("Invalid glob pattern '{pattern}': {reason}")]
    InvalidPattern {
        /// The invalid pattern
        pattern: String,
        /// Reason why it's invalid
        reason: String,
    },
}

impl Error {
    /// Creates a configuration error.
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Creates a selection error with root path context.
    #[must_use]
    pub fn selection(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Selection {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates an empty-selection error for the given root.
    #[must_use]
    pub fn empty_selection(path: impl Into<PathBuf>) -> Self {
        Self::Selection {
            path: path.into(),
            message: "no suitable files found (check include/exclude patterns)".to_string(),
        }
    }

    /// Creates a provider error.
    #[must_use]
    pub fn provider(message: impl Into<String>) -> Self {
        Self::Provider {
            message: message.into(),
        }
    }

    /// Creates an IO error with path context.
    #[must_use]
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            message: source.to_string(),
        }
    }

    /// Creates an invalid pattern error.
    #[must_use]
    pub fn invalid_pattern(pattern: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidPattern {
            pattern: pattern.into(),
            reason: reason.into(),
        }
    }

    /// Returns true if this is a configuration error.
    #[must_use]
    pub const fn is_config(&self) -> bool {
        matches!(self, Self::Config { .. })
    }

    /// Returns true if this is a selection error.
    #[must_use]
    pub const fn is_selection(&self) -> bool {
        matches!(self, Self::Selection { .. })
    }

    /// Returns true if this is a provider error.
    #[must_use]
    pub const fn is_provider(&self) -> bool {
        matches!(self, Self::Provider { .. })
    }
}

impl From<tera::Error> for Error {
    fn from(e: tera::Error) -> Self {
        Self::Template {
            message: e.to_string(),
        }
    }
}
