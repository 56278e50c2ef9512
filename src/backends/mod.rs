//! Synthesis backends
//!
//! Each backend wraps one third-party speech provider behind the same
//! contract. The facade selects one through [`create_backend`].

pub mod edge;
pub mod google;

use crate::config::TtsConfig;
use crate::voice::Voice;
use crate::{Result, TtsError};
use async_trait::async_trait;
use log::info;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Identifies a concrete backend implementation
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum BackendKind {
    Edge,
    Google,
}

impl BackendKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendKind::Edge => "edge",
            BackendKind::Google => "google",
        }
    }

    /// Tag used in generated batch filenames. The Google variant is
    /// tagged `gtts` after the service it talks to; other backends use
    /// their own name.
    pub fn file_tag(&self) -> &'static str {
        match self {
            BackendKind::Edge => "edge",
            BackendKind::Google => "gtts",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BackendKind {
    type Err = TtsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "edge" => Ok(BackendKind::Edge),
            "google" => Ok(BackendKind::Google),
            other => Err(TtsError::Config(format!("Unknown backend: {}", other))),
        }
    }
}

/// Backend client contract
///
/// All operations are declared potentially-suspending; a backend either
/// suspends genuinely (network exchange) or returns immediately. Callers
/// never branch on the calling convention — the facade normalizes it to
/// a blocking API.
#[async_trait]
pub trait TtsBackend: Send + Sync {
    fn kind(&self) -> BackendKind;

    /// Synthesize `text` with `voice`, returning encoded audio bytes.
    ///
    /// Fails with a `Synthesis` error when the provider returns no
    /// audio, the voice or language is unsupported, or the underlying
    /// exchange fails.
    async fn synthesize_text(&self, text: &str, voice: &str) -> Result<Vec<u8>>;

    /// List the voices this backend can synthesize with. Cached per
    /// client instance after the first call.
    async fn list_voices(&self) -> Result<Vec<Voice>>;

    /// Write audio bytes to `path`, overwriting any existing file.
    async fn save_audio(&self, audio: &[u8], path: &Path) -> Result<()> {
        tokio::fs::write(path, audio).await.map_err(|e| {
            TtsError::Synthesis(format!("Failed to save audio to {}: {}", path.display(), e))
        })
    }
}

/// Construct the requested backend, or probe for the first available one
/// (Edge, then Google) when none is named.
///
/// Fails with a fatal `Config` error when the explicitly requested
/// backend cannot be constructed, or when no backend is available at
/// all.
pub fn create_backend(
    kind: Option<BackendKind>,
    config: &TtsConfig,
) -> Result<Box<dyn TtsBackend>> {
    if let Some(kind) = kind {
        return match kind {
            BackendKind::Edge => match edge::EdgeClient::new(config.clone()) {
                Ok(client) => Ok(Box::new(client)),
                Err(e) => Err(TtsError::Config(format!(
                    "Requested backend 'edge' not available: {}",
                    e
                ))),
            },
            BackendKind::Google => match google::GoogleClient::new(config.clone()) {
                Ok(client) => Ok(Box::new(client)),
                Err(e) => Err(TtsError::Config(format!(
                    "Requested backend 'google' not available: {}",
                    e
                ))),
            },
        };
    }

    info!("Trying Edge TTS backend...");
    match edge::EdgeClient::new(config.clone()) {
        Ok(client) => {
            info!("✓ Successfully initialized Edge backend");
            return Ok(Box::new(client));
        }
        Err(e) => {
            info!("✗ Edge backend unavailable: {}", e);
        }
    }

    info!("Trying Google TTS backend...");
    match google::GoogleClient::new(config.clone()) {
        Ok(client) => {
            info!("✓ Successfully initialized Google backend");
            Ok(Box::new(client))
        }
        Err(e) => Err(TtsError::Config(format!(
            "No TTS backends available. Tried:\n\
             1. Edge neural voices\n\
             2. Google Translate synthesis\n\
             Error: {}",
            e
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_kind_from_str() {
        assert_eq!("edge".parse::<BackendKind>().unwrap(), BackendKind::Edge);
        assert_eq!("Google".parse::<BackendKind>().unwrap(), BackendKind::Google);
        assert!("espeak".parse::<BackendKind>().is_err());
    }

    #[test]
    fn test_backend_file_tag() {
        assert_eq!(BackendKind::Edge.file_tag(), "edge");
        assert_eq!(BackendKind::Google.file_tag(), "gtts");
    }
}
