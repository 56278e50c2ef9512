//! Google-Translate synthesis backend
//!
//! Uses the translate endpoint that backs the web reader. The service
//! takes a bare language code rather than a named voice, and its only
//! speed control is a binary slow toggle.

use crate::backends::{BackendKind, TtsBackend};
use crate::config::TtsConfig;
use crate::voice::{Gender, Voice};
use crate::{Result, TtsError};
use async_trait::async_trait;
use log::debug;
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::sync::Mutex;

const TRANSLATE_TTS_URL: &str = "https://translate.google.com/translate_tts";

/// Languages the translate service can synthesize, code -> English name
const SUPPORTED_LANGUAGES: &[(&str, &str)] = &[
    ("af", "Afrikaans"),
    ("am", "Amharic"),
    ("ar", "Arabic"),
    ("bg", "Bulgarian"),
    ("bn", "Bengali"),
    ("bs", "Bosnian"),
    ("ca", "Catalan"),
    ("cs", "Czech"),
    ("cy", "Welsh"),
    ("da", "Danish"),
    ("de", "German"),
    ("el", "Greek"),
    ("en", "English"),
    ("es", "Spanish"),
    ("et", "Estonian"),
    ("eu", "Basque"),
    ("fi", "Finnish"),
    ("fr", "French"),
    ("fr-CA", "French (Canada)"),
    ("gl", "Galician"),
    ("gu", "Gujarati"),
    ("ha", "Hausa"),
    ("hi", "Hindi"),
    ("hr", "Croatian"),
    ("hu", "Hungarian"),
    ("id", "Indonesian"),
    ("is", "Icelandic"),
    ("it", "Italian"),
    ("iw", "Hebrew"),
    ("ja", "Japanese"),
    ("jw", "Javanese"),
    ("km", "Khmer"),
    ("kn", "Kannada"),
    ("ko", "Korean"),
    ("la", "Latin"),
    ("lt", "Lithuanian"),
    ("lv", "Latvian"),
    ("ml", "Malayalam"),
    ("mr", "Marathi"),
    ("ms", "Malay"),
    ("my", "Myanmar (Burmese)"),
    ("ne", "Nepali"),
    ("nl", "Dutch"),
    ("no", "Norwegian"),
    ("pa", "Punjabi (Gurmukhi)"),
    ("pl", "Polish"),
    ("pt", "Portuguese (Brazil)"),
    ("pt-PT", "Portuguese (Portugal)"),
    ("ro", "Romanian"),
    ("ru", "Russian"),
    ("si", "Sinhala"),
    ("sk", "Slovak"),
    ("sq", "Albanian"),
    ("sr", "Serbian"),
    ("su", "Sundanese"),
    ("sv", "Swedish"),
    ("sw", "Swahili"),
    ("ta", "Tamil"),
    ("te", "Telugu"),
    ("th", "Thai"),
    ("tl", "Filipino"),
    ("tr", "Turkish"),
    ("uk", "Ukrainian"),
    ("ur", "Urdu"),
    ("vi", "Vietnamese"),
    ("yue", "Cantonese"),
    ("zh", "Chinese (Mandarin)"),
    ("zh-CN", "Chinese (Simplified)"),
    ("zh-TW", "Chinese (Traditional)"),
];

/// Lowercased code -> canonical code, for case-insensitive resolution
static LANGUAGE_LOOKUP: Lazy<HashMap<String, &'static str>> = Lazy::new(|| {
    SUPPORTED_LANGUAGES
        .iter()
        .map(|(code, _)| (code.to_ascii_lowercase(), *code))
        .collect()
});

/// Client for Google-Translate-based synthesis
pub struct GoogleClient {
    config: TtsConfig,
    http: reqwest::Client,
    // Guard is never held across an await point
    voices: Mutex<Option<Vec<Voice>>>,
}

impl GoogleClient {
    pub fn new(config: TtsConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| TtsError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            config,
            http,
            voices: Mutex::new(None),
        })
    }

    /// Resolve a voice string to a supported language code.
    ///
    /// The primary part (before the first `-`) is tried first; if it is
    /// not supported, the `primary-secondary` composite is tried; if
    /// neither resolves, `en` is used. Lookup is case-insensitive and
    /// yields the canonical code (`zh-cn` resolves to `zh-CN`).
    fn extract_lang(voice: &str) -> &'static str {
        let mut parts = voice.split('-');
        let primary = parts.next().unwrap_or("");
        if let Some(code) = LANGUAGE_LOOKUP.get(&primary.to_ascii_lowercase()) {
            return code;
        }
        if let Some(secondary) = parts.next() {
            let composite = format!("{}-{}", primary, secondary).to_ascii_lowercase();
            if let Some(code) = LANGUAGE_LOOKUP.get(&composite) {
                return code;
            }
        }
        "en"
    }
}

#[async_trait]
impl TtsBackend for GoogleClient {
    fn kind(&self) -> BackendKind {
        BackendKind::Google
    }

    async fn synthesize_text(&self, text: &str, voice: &str) -> Result<Vec<u8>> {
        let lang = Self::extract_lang(voice);
        debug!("Resolved voice '{}' to language '{}'", voice, lang);

        // The service supports no numeric rate, only a slow toggle
        let speed = if self.config.google_slow_speech {
            "0.3"
        } else {
            "1"
        };

        let textlen = text.chars().count().to_string();
        let response = self
            .http
            .get(TRANSLATE_TTS_URL)
            .query(&[
                ("ie", "UTF-8"),
                ("client", "tw-ob"),
                ("q", text),
                ("tl", lang),
                ("ttsspeed", speed),
                ("total", "1"),
                ("idx", "0"),
                ("textlen", textlen.as_str()),
            ])
            .send()
            .await
            .map_err(|e| TtsError::Synthesis(format!("Failed to synthesize text: {}", e)))?;

        if !response.status().is_success() {
            return Err(TtsError::Synthesis(format!(
                "Google TTS request failed with status {}",
                response.status()
            )));
        }

        let audio = response
            .bytes()
            .await
            .map_err(|e| TtsError::Synthesis(format!("Failed to read audio bytes: {}", e)))?
            .to_vec();

        if audio.is_empty() {
            return Err(TtsError::Synthesis("No audio data generated".to_string()));
        }
        Ok(audio)
    }

    async fn list_voices(&self) -> Result<Vec<Voice>> {
        if let Some(cached) = self.voices.lock().expect("voice cache lock poisoned").clone() {
            debug!("Using cached voice list ({} voices)", cached.len());
            return Ok(cached);
        }

        // One synthetic voice per supported language
        let voices: Vec<Voice> = SUPPORTED_LANGUAGES
            .iter()
            .map(|(code, name)| {
                Voice::new(
                    format!("{}-Standard", code),
                    format!("{} (Standard)", name),
                    code.to_string(),
                    Gender::Unknown,
                )
            })
            .collect();

        if self.config.cache_voices {
            *self.voices.lock().expect("voice cache lock poisoned") = Some(voices.clone());
        }
        Ok(voices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_lang_primary() {
        assert_eq!(GoogleClient::extract_lang("en"), "en");
        assert_eq!(GoogleClient::extract_lang("en-US-Standard"), "en");
        assert_eq!(GoogleClient::extract_lang("FR-fr"), "fr");
    }

    #[test]
    fn test_extract_lang_composite_fallback() {
        // "zh" resolves directly; a composite-only code needs both parts
        assert_eq!(GoogleClient::extract_lang("zh"), "zh");
        assert_eq!(GoogleClient::extract_lang("zh-CN-XiaoxiaoNeural"), "zh");
        // No "pt-BR" in the table, primary "pt" resolves first
        assert_eq!(GoogleClient::extract_lang("pt-BR"), "pt");
    }

    #[test]
    fn test_extract_lang_canonical_case() {
        // Lookup is case-insensitive and returns the canonical code
        assert_eq!(GoogleClient::extract_lang("FR-ca-something"), "fr");
        assert_eq!(GoogleClient::extract_lang("yue"), "yue");
    }

    #[test]
    fn test_extract_lang_default() {
        assert_eq!(GoogleClient::extract_lang("xx-YY"), "en");
        assert_eq!(GoogleClient::extract_lang(""), "en");
    }

    #[tokio::test]
    async fn test_list_voices_synthesized() {
        let client = GoogleClient::new(TtsConfig::default()).unwrap();
        let voices = client.list_voices().await.unwrap();

        assert_eq!(voices.len(), SUPPORTED_LANGUAGES.len());
        let en = voices.iter().find(|v| v.locale == "en").unwrap();
        assert_eq!(en.name, "en-Standard");
        assert_eq!(en.display_name, "English (Standard)");
        assert_eq!(en.gender, Gender::Unknown);
    }

    #[tokio::test]
    async fn test_list_voices_cached() {
        let client = GoogleClient::new(TtsConfig::default()).unwrap();
        let first = client.list_voices().await.unwrap();
        let second = client.list_voices().await.unwrap();
        assert_eq!(first.len(), second.len());
        assert!(client.voices.lock().unwrap().is_some());
    }
}
