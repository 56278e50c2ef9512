//! Error types for hello-tts

use std::io;
use thiserror::Error;

/// Main error type for hello-tts
///
/// Per-language synthesis failures in the batch runner are caught and
/// counted; configuration and backend-initialization failures are fatal
/// to the invoking process.
#[derive(Error, Debug)]
pub enum TtsError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("TTS synthesis error: {0}")]
    Synthesis(String),

    #[error("Audio playback error: {0}")]
    Audio(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("{0}")]
    Other(String),
}

/// Result type alias for hello-tts operations
pub type Result<T> = std::result::Result<T, TtsError>;

impl From<String> for TtsError {
    fn from(s: String) -> Self {
        TtsError::Other(s)
    }
}

impl From<&str> for TtsError {
    fn from(s: &str) -> Self {
        TtsError::Other(s.to_string())
    }
}

impl From<serde_json::Error> for TtsError {
    fn from(e: serde_json::Error) -> Self {
        TtsError::Parse(format!("JSON error: {}", e))
    }
}
