//! Multilingual batch runner
//!
//! Iterates the language entries of the shared JSON config file,
//! synthesizes each one through the facade, and applies the
//! alternate-voice fallback policy: one retry with the configured
//! alternate voice, nothing more. Languages are processed strictly in
//! sequence with a fixed pause between them to stay polite to the
//! provider.

use crate::audio::AudioPlayer;
use crate::backends::BackendKind;
use crate::config::{self, LanguageEntry};
use crate::tts::HelloTts;
use crate::{Result, TtsError};
use log::{error, info, warn};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Unconditional pause between languages; not a failure backoff
const LANGUAGE_DELAY: Duration = Duration::from_secs(2);

/// One language to synthesize, resolved for a specific backend
#[derive(Debug, Clone)]
pub struct LanguageConfig {
    pub code: String,
    pub name: String,
    /// Display glyph shown in progress output
    pub flag: String,
    pub text: String,
    pub voice: String,
    /// Fallback voice tried once when the primary fails
    pub alt_voice: Option<String>,
}

impl LanguageConfig {
    /// Resolve a shared-config row for `kind`.
    ///
    /// The backend-specific voice key wins over the generic `voice` key.
    /// Entries without a language code are skipped.
    pub fn from_entry(entry: &LanguageEntry, kind: BackendKind) -> Option<Self> {
        if entry.code.is_empty() {
            return None;
        }

        let backend_voice = match kind {
            BackendKind::Edge => &entry.edge_voice,
            BackendKind::Google => &entry.google_voice,
        };
        let voice = if backend_voice.is_empty() {
            entry.voice.clone()
        } else {
            backend_voice.clone()
        };

        Some(Self {
            code: entry.code.clone(),
            name: entry.name.clone(),
            flag: entry.flag.clone(),
            text: entry.text.clone(),
            voice,
            alt_voice: entry.alt_voice.clone(),
        })
    }
}

/// Load the ordered language list from the shared JSON config file
pub fn load_language_configs(path: &Path, kind: BackendKind) -> Result<Vec<LanguageConfig>> {
    let shared = config::load_shared_config(path)?;
    Ok(shared
        .languages
        .iter()
        .filter_map(|entry| LanguageConfig::from_entry(entry, kind))
        .collect())
}

/// Outcome counts of one batch run
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BatchSummary {
    pub succeeded: usize,
    pub failed: usize,
}

impl BatchSummary {
    pub fn total(&self) -> usize {
        self.succeeded + self.failed
    }

    /// True only when no language failed
    pub fn is_success(&self) -> bool {
        self.failed == 0
    }
}

/// Generated batch filename: `{langPrefix}_rust_{backendTag}_{ts}.mp3`
fn output_filename(code: &str, kind: BackendKind, timestamp: u64) -> String {
    let prefix = code.split('-').next().unwrap_or(code);
    format!("{}_rust_{}_{}.mp3", prefix, kind.file_tag(), timestamp)
}

/// Synthesize, save, and optionally play one language.
///
/// Applies the fallback policy: a failing primary voice is retried once
/// with the alternate voice if one is configured; a second failure (or a
/// missing alternate) propagates. Playback failures are downgraded to
/// warnings. Returns the written path and the voice actually used.
pub fn generate_audio_for_language(
    tts: &HelloTts,
    lang: &LanguageConfig,
    output_dir: &Path,
    play_audio: bool,
) -> Result<(PathBuf, String)> {
    info!("{} {} ({})", lang.flag, lang.name, lang.code.to_uppercase());
    info!("Text: {}", lang.text);
    info!("Voice: {}", lang.voice);

    let mut used_voice = lang.voice.clone();
    let audio = match tts.synthesize_text(&lang.text, Some(&lang.voice)) {
        Ok(audio) => audio,
        Err(e) => {
            warn!("Primary voice failed: {}", e);
            match &lang.alt_voice {
                Some(alt) => {
                    info!("Trying alternative voice: {}", alt);
                    match tts.synthesize_text(&lang.text, Some(alt)) {
                        Ok(audio) => {
                            used_voice = alt.clone();
                            audio
                        }
                        Err(e2) => {
                            warn!("Alternative voice also failed: {}", e2);
                            return Err(e2);
                        }
                    }
                }
                None => return Err(e),
            }
        }
    };

    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| TtsError::Other(format!("System clock before Unix epoch: {}", e)))?
        .as_secs();
    let filename = output_filename(&lang.code, tts.backend_kind(), timestamp);
    let output_path = output_dir.join(&filename);

    tts.save_audio(&audio, &output_path)?;
    info!("✓ Generated: {}", filename);
    info!("Saved to: {}", output_path.display());
    info!("Used voice: {}", used_voice);

    if play_audio {
        match AudioPlayer::new().and_then(|player| {
            info!("Playing audio...");
            player.play_file(&output_path)
        }) {
            Ok(()) => info!("Playback completed"),
            Err(e) => warn!("Could not play audio: {}", e),
        }
    }

    Ok((output_path, used_voice))
}

/// Process every language in sequence and tally the outcome.
///
/// Per-language failures are counted, never propagated — a bad voice
/// must not abort the rest of the batch.
pub fn run_batch(
    tts: &HelloTts,
    languages: &[LanguageConfig],
    output_dir: &Path,
    play_audio: bool,
) -> BatchSummary {
    let mut summary = BatchSummary::default();

    for (i, lang) in languages.iter().enumerate() {
        info!("Processing language {}/{}", i + 1, languages.len());

        match generate_audio_for_language(tts, lang, output_dir, play_audio) {
            Ok(_) => summary.succeeded += 1,
            Err(e) => {
                error!("✗ Failed to generate audio for {}: {}", lang.name, e);
                summary.failed += 1;
            }
        }

        if i + 1 < languages.len() {
            info!("Waiting before next language...");
            std::thread::sleep(LANGUAGE_DELAY);
        }
    }

    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::TtsBackend;
    use crate::config::TtsConfig;
    use crate::voice::Voice;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Backend that rejects one specific voice and counts attempts
    struct FlakyBackend {
        bad_voice: String,
        attempts: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl TtsBackend for FlakyBackend {
        fn kind(&self) -> BackendKind {
            BackendKind::Edge
        }

        async fn synthesize_text(&self, _text: &str, voice: &str) -> crate::Result<Vec<u8>> {
            self.attempts.fetch_add(1, Ordering::SeqCst);
            if voice == self.bad_voice {
                Err(TtsError::Synthesis(format!("Unsupported voice: {}", voice)))
            } else {
                Ok(vec![0xFF, 0xF3, 0x01])
            }
        }

        async fn list_voices(&self) -> crate::Result<Vec<Voice>> {
            Ok(Vec::new())
        }
    }

    fn flaky_tts(bad_voice: &str, attempts: Arc<AtomicUsize>) -> HelloTts {
        let backend = FlakyBackend {
            bad_voice: bad_voice.to_string(),
            attempts,
        };
        HelloTts::with_client(Box::new(backend), TtsConfig::default()).unwrap()
    }

    fn lang(voice: &str, alt: Option<&str>) -> LanguageConfig {
        LanguageConfig {
            code: "zh-CN".to_string(),
            name: "Chinese".to_string(),
            flag: "CN".to_string(),
            text: "你好".to_string(),
            voice: voice.to_string(),
            alt_voice: alt.map(|s| s.to_string()),
        }
    }

    #[test]
    fn test_alternate_voice_rescues_failing_primary() {
        let attempts = Arc::new(AtomicUsize::new(0));
        let tts = flaky_tts("zh-CN-Primary", attempts.clone());
        let dir = tempfile::tempdir().unwrap();

        let languages = vec![lang("zh-CN-Primary", Some("zh-CN-Alt"))];
        let summary = run_batch(&tts, &languages, dir.path(), false);

        assert_eq!(summary, BatchSummary { succeeded: 1, failed: 0 });
        assert!(summary.is_success());
        assert_eq!(attempts.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_used_voice_reflects_alternate() {
        let attempts = Arc::new(AtomicUsize::new(0));
        let tts = flaky_tts("zh-CN-Primary", attempts);
        let dir = tempfile::tempdir().unwrap();

        let (path, used_voice) = generate_audio_for_language(
            &tts,
            &lang("zh-CN-Primary", Some("zh-CN-Alt")),
            dir.path(),
            false,
        )
        .unwrap();

        assert_eq!(used_voice, "zh-CN-Alt");
        assert!(path.exists());
        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("zh_rust_edge_"));
        assert!(name.ends_with(".mp3"));
    }

    #[test]
    fn test_no_alternate_fails_without_retry() {
        let attempts = Arc::new(AtomicUsize::new(0));
        let tts = flaky_tts("zh-CN-Primary", attempts.clone());
        let dir = tempfile::tempdir().unwrap();

        let languages = vec![lang("zh-CN-Primary", None)];
        let summary = run_batch(&tts, &languages, dir.path(), false);

        assert_eq!(summary, BatchSummary { succeeded: 0, failed: 1 });
        assert!(!summary.is_success());
        // Exactly one attempt: no retry without an alternate voice
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_both_voices_failing_marks_language_failed() {
        let attempts = Arc::new(AtomicUsize::new(0));
        // Primary and alternate are the same bad voice, so both fail
        let tts = flaky_tts("zh-CN-Primary", attempts.clone());
        let dir = tempfile::tempdir().unwrap();

        let languages = vec![lang("zh-CN-Primary", Some("zh-CN-Primary"))];
        let summary = run_batch(&tts, &languages, dir.path(), false);

        assert_eq!(summary, BatchSummary { succeeded: 0, failed: 1 });
        assert_eq!(attempts.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_from_entry_voice_selection() {
        let entry = LanguageEntry {
            code: "fr-FR".to_string(),
            name: "French".to_string(),
            flag: "FR".to_string(),
            text: "Bonjour".to_string(),
            voice: "generic".to_string(),
            edge_voice: "fr-FR-DeniseNeural".to_string(),
            google_voice: "fr".to_string(),
            alt_voice: None,
        };

        let edge = LanguageConfig::from_entry(&entry, BackendKind::Edge).unwrap();
        assert_eq!(edge.voice, "fr-FR-DeniseNeural");

        let google = LanguageConfig::from_entry(&entry, BackendKind::Google).unwrap();
        assert_eq!(google.voice, "fr");
    }

    #[test]
    fn test_from_entry_falls_back_to_generic_voice() {
        let entry = LanguageEntry {
            code: "fr-FR".to_string(),
            name: "French".to_string(),
            flag: String::new(),
            text: "Bonjour".to_string(),
            voice: "generic".to_string(),
            edge_voice: String::new(),
            google_voice: String::new(),
            alt_voice: None,
        };

        let edge = LanguageConfig::from_entry(&entry, BackendKind::Edge).unwrap();
        assert_eq!(edge.voice, "generic");
    }

    #[test]
    fn test_from_entry_skips_missing_code() {
        let entry = LanguageEntry {
            code: String::new(),
            name: "Nameless".to_string(),
            flag: String::new(),
            text: String::new(),
            voice: String::new(),
            edge_voice: String::new(),
            google_voice: String::new(),
            alt_voice: None,
        };

        assert!(LanguageConfig::from_entry(&entry, BackendKind::Edge).is_none());
    }

    #[test]
    fn test_output_filename_format() {
        assert_eq!(
            output_filename("zh-CN", BackendKind::Edge, 1700000000),
            "zh_rust_edge_1700000000.mp3"
        );
        assert_eq!(
            output_filename("fr", BackendKind::Google, 1700000000),
            "fr_rust_gtts_1700000000.mp3"
        );
    }
}
