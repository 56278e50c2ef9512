//! TTS facade
//!
//! Hides backend selection behind one interface and normalizes the
//! potentially-suspending backend contract into a blocking API. Callers
//! never see the calling convention: the facade owns a small runtime
//! and drives each provider exchange to completion.

use crate::backends::{self, BackendKind, TtsBackend};
use crate::config::TtsConfig;
use crate::voice::Voice;
use crate::{Result, TtsError};
use log::debug;
use std::path::Path;
use tokio::runtime::Runtime;

/// Blocking facade over the selected synthesis backend
pub struct HelloTts {
    config: TtsConfig,
    client: Box<dyn TtsBackend>,
    runtime: Runtime,
}

impl HelloTts {
    /// Select and construct a backend.
    ///
    /// With an explicit `backend` the request is honored or fails
    /// fatally; otherwise available backends are probed in order (Edge,
    /// then Google).
    pub fn new(backend: Option<BackendKind>, config: TtsConfig) -> Result<Self> {
        let client = backends::create_backend(backend, &config)?;
        Self::with_client(client, config)
    }

    /// Wrap an already-constructed backend client.
    ///
    /// Useful for custom providers and for tests that inject a mock.
    pub fn with_client(client: Box<dyn TtsBackend>, config: TtsConfig) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| TtsError::Config(format!("Failed to build async runtime: {}", e)))?;

        Ok(Self {
            config,
            client,
            runtime,
        })
    }

    pub fn backend_kind(&self) -> BackendKind {
        self.client.kind()
    }

    pub fn config(&self) -> &TtsConfig {
        &self.config
    }

    /// Backend-specific default voice from configuration
    fn default_voice(&self) -> &str {
        match self.client.kind() {
            BackendKind::Edge => &self.config.default_voice,
            BackendKind::Google => &self.config.google_default_voice,
        }
    }

    /// Synthesize `text`, resolving the configured default voice when
    /// none is given. Blocks until the provider exchange completes.
    pub fn synthesize_text(&self, text: &str, voice: Option<&str>) -> Result<Vec<u8>> {
        let voice = voice.unwrap_or_else(|| self.default_voice());
        debug!("Synthesizing {} chars with voice {}", text.chars().count(), voice);
        self.runtime
            .block_on(self.client.synthesize_text(text, voice))
    }

    /// Write audio bytes to `path`, overwriting any existing file.
    pub fn save_audio(&self, audio: &[u8], path: &Path) -> Result<()> {
        self.runtime.block_on(self.client.save_audio(audio, path))
    }

    /// List the selected backend's voices (cached per client).
    pub fn list_voices(&self) -> Result<Vec<Voice>> {
        self.runtime.block_on(self.client.list_voices())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::voice::Gender;
    use async_trait::async_trait;

    /// Mock backend that records the voice it was asked for
    struct EchoBackend;

    #[async_trait]
    impl TtsBackend for EchoBackend {
        fn kind(&self) -> BackendKind {
            BackendKind::Edge
        }

        async fn synthesize_text(&self, _text: &str, voice: &str) -> Result<Vec<u8>> {
            Ok(voice.as_bytes().to_vec())
        }

        async fn list_voices(&self) -> Result<Vec<Voice>> {
            Ok(vec![Voice::new(
                "en-US-JennyNeural".to_string(),
                "Jenny".to_string(),
                "en-US".to_string(),
                Gender::Female,
            )])
        }
    }

    #[test]
    fn test_default_voice_resolution() {
        let mut config = TtsConfig::default();
        config.default_voice = "en-US-AriaNeural".to_string();
        let tts = HelloTts::with_client(Box::new(EchoBackend), config).unwrap();

        let audio = tts.synthesize_text("hello", None).unwrap();
        assert_eq!(audio, b"en-US-AriaNeural");

        let audio = tts.synthesize_text("hello", Some("de-DE-KatjaNeural")).unwrap();
        assert_eq!(audio, b"de-DE-KatjaNeural");
    }

    #[test]
    fn test_list_voices_blocking() {
        let tts = HelloTts::with_client(Box::new(EchoBackend), TtsConfig::default()).unwrap();
        let voices = tts.list_voices().unwrap();
        assert_eq!(voices.len(), 1);
        assert_eq!(voices[0].language_code(), "en");
    }

    #[test]
    fn test_save_audio_round_trip() {
        let tts = HelloTts::with_client(Box::new(EchoBackend), TtsConfig::default()).unwrap();
        let audio = tts.synthesize_text("hello", None).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.mp3");
        tts.save_audio(&audio, &path).unwrap();

        let read_back = std::fs::read(&path).unwrap();
        assert_eq!(read_back, audio);
    }
}
