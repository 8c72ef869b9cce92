//! Error types for the world book converter.
//!
//! Library crates use [`WorldBookError`] via `thiserror`.
//! App crates (cli/tui) wrap this with `color-eyre` for rich diagnostics.
//!
//! The `Display` text of the conversion variants is user-facing: the shells
//! show it verbatim in their error popups.

use std::path::PathBuf;

/// Top-level error type for all conversion operations.
#[derive(Debug, thiserror::Error)]
pub enum WorldBookError {
    /// Raw text was empty or whitespace only. Rejected before any background work.
    #[error("请输入XML内容")]
    EmptyInput,

    /// Input was non-empty but contained no `<startl>…<endl>` block.
    #[error("未找到有效的XML条目")]
    NoEntriesFound,

    /// Any other failure inside the parse/format pipeline.
    #[error("转换失败: {0}")]
    Unexpected(String),

    /// A conversion is already in flight on this orchestrator.
    #[error("conversion already in progress")]
    Busy,

    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, WorldBookError>;

impl WorldBookError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Wrap an arbitrary failure description as [`WorldBookError::Unexpected`].
    pub fn unexpected(msg: impl Into<String>) -> Self {
        Self::Unexpected(msg.into())
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<serde_json::Error> for WorldBookError {
    fn from(err: serde_json::Error) -> Self {
        Self::Unexpected(err.to_string())
    }
}
