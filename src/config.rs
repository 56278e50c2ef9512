//! Configuration management
//!
//! Runtime synthesis defaults (`TtsConfig`) and the shared JSON config
//! file that drives the multilingual batch demo and the Edge voice
//! catalog.

use crate::{Result, TtsError};
use log::debug;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// Synthesis defaults shared by all backends
///
/// Passed by value/reference at construction; there is no process-wide
/// mutable instance.
#[derive(Debug, Clone)]
pub struct TtsConfig {
    /// Default voice for the Edge backend
    pub default_voice: String,
    /// Default voice (language code) for the Google backend
    pub google_default_voice: String,
    /// Google-only binary speed toggle. The provider supports no numeric
    /// rate; Edge speed control goes through SSML prosody markup instead.
    pub google_slow_speech: bool,
    /// File extension for generated audio. The actual encoding is
    /// whatever the selected provider emits.
    pub output_format: String,
    pub output_directory: String,
    /// Play generated audio through the platform player by default
    pub auto_play: bool,
    /// Cache provider voice listings per client instance
    pub cache_voices: bool,
    /// Reserved: retry policy beyond the alternate-voice fallback is not
    /// implemented.
    pub max_retries: u32,
    /// Reserved: no caller-side timeout is enforced.
    pub timeout: Duration,
}

impl Default for TtsConfig {
    fn default() -> Self {
        Self {
            default_voice: "en-US-JennyNeural".to_string(),
            google_default_voice: "en".to_string(),
            google_slow_speech: false,
            output_format: "mp3".to_string(),
            output_directory: "./output".to_string(),
            auto_play: true,
            cache_voices: true,
            max_retries: 3,
            timeout: Duration::from_secs(30),
        }
    }
}

/// Load configuration.
///
/// File-backed configuration is not implemented; the path argument is
/// accepted for interface stability and ignored, and the defaults are
/// returned.
pub fn load_config(path: Option<&Path>) -> TtsConfig {
    if let Some(path) = path {
        debug!(
            "Config file loading not implemented, ignoring {}",
            path.display()
        );
    }
    TtsConfig::default()
}

/// One language row of the shared JSON config file
#[derive(Debug, Clone, Deserialize)]
pub struct LanguageEntry {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub name: String,
    /// Display glyph shown while processing, e.g. a flag
    #[serde(default)]
    pub flag: String,
    #[serde(default)]
    pub text: String,
    /// Backend-agnostic voice, used when no backend-specific key exists
    #[serde(default)]
    pub voice: String,
    #[serde(default)]
    pub edge_voice: String,
    #[serde(default)]
    pub google_voice: String,
    /// Fallback voice tried once when the primary voice fails
    #[serde(default)]
    pub alt_voice: Option<String>,
}

/// Shape of the shared JSON config file: `{"languages": [...]}`
#[derive(Debug, Deserialize)]
pub struct SharedConfig {
    #[serde(default)]
    pub languages: Vec<LanguageEntry>,
}

/// Read and parse the shared JSON config file.
///
/// Fails with `NotFound` for a missing file and `Parse` for malformed
/// JSON.
pub fn load_shared_config(path: &Path) -> Result<SharedConfig> {
    if !path.exists() {
        return Err(TtsError::NotFound(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let content = std::fs::read_to_string(path)?;
    serde_json::from_str(&content)
        .map_err(|e| TtsError::Parse(format!("Invalid JSON in {}: {}", path.display(), e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_config_defaults() {
        let config = TtsConfig::default();
        assert_eq!(config.default_voice, "en-US-JennyNeural");
        assert_eq!(config.google_default_voice, "en");
        assert!(!config.google_slow_speech);
        assert_eq!(config.output_format, "mp3");
        assert_eq!(config.output_directory, "./output");
        assert!(config.auto_play);
        assert!(config.cache_voices);
    }

    #[test]
    fn test_load_config_ignores_path() {
        // File-backed loading is a stated gap: any path yields defaults.
        let config = load_config(Some(Path::new("/nonexistent/config.json")));
        assert_eq!(config.default_voice, TtsConfig::default().default_voice);
    }

    #[test]
    fn test_load_shared_config() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"languages": [{{"code": "zh-CN", "name": "Chinese", "flag": "CN",
                "text": "你好", "edge_voice": "zh-CN-XiaoxiaoNeural",
                "google_voice": "zh", "alt_voice": "zh-CN-YunxiNeural"}}]}}"#
        )
        .unwrap();

        let shared = load_shared_config(file.path()).unwrap();
        assert_eq!(shared.languages.len(), 1);
        let entry = &shared.languages[0];
        assert_eq!(entry.code, "zh-CN");
        assert_eq!(entry.edge_voice, "zh-CN-XiaoxiaoNeural");
        assert_eq!(entry.google_voice, "zh");
        assert_eq!(entry.alt_voice.as_deref(), Some("zh-CN-YunxiNeural"));
    }

    #[test]
    fn test_load_shared_config_missing() {
        let err = load_shared_config(Path::new("/nonexistent/tts_config.json")).unwrap_err();
        assert!(matches!(err, TtsError::NotFound(_)));
    }
}
