//! Error types for StoryPlan.
//!
//! Library crates use [`StoryPlanError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all StoryPlan operations.
#[derive(Debug, thiserror::Error)]
pub enum StoryPlanError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The spreadsheet or CSV source could not be opened or decoded.
    #[error("sheet error in {path:?}: {message}")]
    Sheet { path: PathBuf, message: String },

    /// The requested sheet does not exist in the workbook.
    #[error("sheet '{sheet}' not found in {path:?}")]
    SheetNotFound { path: PathBuf, sheet: String },

    /// A required column header is absent.
    #[error("missing column '{column}' in {path:?}")]
    MissingColumn { path: PathBuf, column: String },

    /// Input text could not be parsed (TOML manuscript, etc.).
    #[error("parse error: {message}")]
    Parse { message: String },

    /// Data validation error (empty manuscript, bad selector, etc.).
    #[error("validation error: {message}")]
    Validation { message: String },

    /// Chart drawing or encoding error.
    #[error("chart error: {0}")]
    Chart(String),
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, StoryPlanError>;

impl StoryPlanError {
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

    /// Create a validation error from any displayable message.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
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

    /// Create a sheet error for the given source path.
    pub fn sheet(path: impl Into<PathBuf>, msg: impl Into<String>) -> Self {
        Self::Sheet {
            path: path.into(),
            message: msg.into(),
        }
    }

    /// Wrap any displayable drawing error.
    pub fn chart(err: impl std::fmt::Display) -> Self {
        Self::Chart(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_formatting() {
        let err = StoryPlanError::config("bad sheet selector");
        assert_eq!(err.to_string(), "config error: bad sheet selector");

        let err = StoryPlanError::MissingColumn {
            path: "plan.xlsx".into(),
            column: "POV".into(),
        };
        assert!(err.to_string().contains("missing column 'POV'"));
    }

    #[test]
    fn io_error_keeps_path() {
        let source = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = StoryPlanError::io("/tmp/plan.xlsx", source);
        assert!(err.to_string().contains("/tmp/plan.xlsx"));
        assert!(err.to_string().contains("gone"));
    }
}
