//! Error types for docpack.
//!
//! Library crates use [`DocpackError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all docpack operations.
#[derive(Debug, thiserror::Error)]
pub enum DocpackError {
    /// Configuration loading or validation error. Fatal at startup.
    #[error("config error: {message}")]
    Config { message: String },

    /// A document could not be read or parsed. Recoverable per file.
    #[error("parse error: {message}")]
    Parse { message: String },

    /// A declaration filename did not split into kind + name.
    /// Recoverable per file; no symbol is recorded.
    #[error("naming error: {message}")]
    Naming { message: String },

    /// Symbol index store error. Fatal, aborts the build.
    #[error("storage error: {0}")]
    Storage(String),

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, DocpackError>;

impl DocpackError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a parse error from any displayable message.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse {
            message: msg.into(),
        }
    }

    /// Create a naming error from any displayable message.
    pub fn naming(msg: impl Into<String>) -> Self {
        Self::Naming {
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether this error must abort the whole build.
    ///
    /// Storage and configuration problems terminate the run; everything
    /// else is isolated to the file being processed.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Storage(_) | Self::Config { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_formatting() {
        let err = DocpackError::config("missing docset name");
        assert_eq!(err.to_string(), "config error: missing docset name");

        let err = DocpackError::naming("cannot split 'fn.a.b'");
        assert!(err.to_string().contains("fn.a.b"));
    }

    #[test]
    fn fatality_classification() {
        assert!(DocpackError::Storage("disk full".into()).is_fatal());
        assert!(DocpackError::config("bad rule").is_fatal());
        assert!(!DocpackError::parse("bad html").is_fatal());
        assert!(!DocpackError::naming("bad stem").is_fatal());
    }
}
