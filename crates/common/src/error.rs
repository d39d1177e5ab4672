//! Error types shared across reelcut crates.

use std::path::PathBuf;

/// Top-level error type for reelcut operations.
#[derive(Debug, thiserror::Error)]
pub enum ReelcutError {
    #[error("Probe error: {message}")]
    Probe { message: String },

    /// The frame source could not decode the requested index.
    #[error("Unreadable frame {index}: {message}")]
    UnreadableFrame { index: u64, message: String },

    /// No transition runs were detected, so no play session can be seeded.
    #[error("No transition runs detected; cannot infer play sessions")]
    NoTransitionRuns,

    #[error("Pattern error: {message}")]
    Pattern { message: String },

    #[error("Export error: {message}")]
    Export { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("Unsupported operation: {message}")]
    Unsupported { message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Image(#[from] image::ImageError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using ReelcutError.
pub type ReelcutResult<T> = Result<T, ReelcutError>;

impl ReelcutError {
    pub fn probe(msg: impl Into<String>) -> Self {
        Self::Probe {
            message: msg.into(),
        }
    }

    pub fn unreadable_frame(index: u64, msg: impl Into<String>) -> Self {
        Self::UnreadableFrame {
            index,
            message: msg.into(),
        }
    }

    pub fn pattern(msg: impl Into<String>) -> Self {
        Self::Pattern {
            message: msg.into(),
        }
    }

    pub fn export(msg: impl Into<String>) -> Self {
        Self::Export {
            message: msg.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: msg.into(),
        }
    }

    pub fn unsupported(msg: impl Into<String>) -> Self {
        Self::Unsupported {
            message: msg.into(),
        }
    }

    /// Whether this error came from a single frame failing to decode.
    pub fn is_unreadable_frame(&self) -> bool {
        matches!(self, Self::UnreadableFrame { .. })
    }
}
