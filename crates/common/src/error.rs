//! Error types shared across Podium crates.

use std::path::PathBuf;

/// Top-level error type for Podium operations.
#[derive(Debug, thiserror::Error)]
pub enum PodiumError {
    #[error("Video read error: {message}")]
    VideoRead { message: String },

    #[error("Frame decode failed at {timestamp_secs:.2}s: {message}")]
    Decode {
        timestamp_secs: f64,
        message: String,
    },

    #[error("Image compression error: {message}")]
    Compression { message: String },

    #[error("Analysis error: {message}")]
    Analysis { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("Unsupported operation: {message}")]
    Unsupported { message: String },

    #[error("Sampling cancelled")]
    Cancelled,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using PodiumError.
pub type PodiumResult<T> = Result<T, PodiumError>;

impl PodiumError {
    pub fn video_read(msg: impl Into<String>) -> Self {
        Self::VideoRead {
            message: msg.into(),
        }
    }

    pub fn decode(timestamp_secs: f64, msg: impl Into<String>) -> Self {
        Self::Decode {
            timestamp_secs,
            message: msg.into(),
        }
    }

    pub fn compression(msg: impl Into<String>) -> Self {
        Self::Compression {
            message: msg.into(),
        }
    }

    pub fn analysis(msg: impl Into<String>) -> Self {
        Self::Analysis {
            message: msg.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    pub fn unsupported(msg: impl Into<String>) -> Self {
        Self::Unsupported {
            message: msg.into(),
        }
    }

    /// Whether sampling may continue past this error (best-effort coverage).
    pub fn is_skippable(&self) -> bool {
        matches!(self, Self::Decode { .. } | Self::Compression { .. })
    }
}
