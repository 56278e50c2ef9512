//! Voice directory
//!
//! Represents the catalog of synthesizable voices for a backend and
//! provides pure, non-destructive filtering over it. Voices come either
//! from a live provider listing or from the shared JSON config file.

use crate::config::SharedConfig;
use crate::{Result, TtsError};
use std::fmt;
use std::path::Path;

/// Voice gender as reported by a provider
///
/// Providers that don't report gender get `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gender {
    Male,
    Female,
    Unknown,
}

impl Gender {
    /// Parse a provider gender string, case-insensitively.
    /// Anything unrecognized maps to `Unknown`.
    pub fn parse(s: &str) -> Gender {
        match s.to_ascii_lowercase().as_str() {
            "male" => Gender::Male,
            "female" => Gender::Female,
            _ => Gender::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One synthesizable voice offered by a backend
///
/// Immutable once constructed; in particular `locale` is never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Voice {
    /// Provider voice identifier, e.g. `en-US-JennyNeural`
    pub name: String,
    /// Human-readable name
    pub display_name: String,
    /// BCP-47-like locale tag, e.g. `en-US`
    pub locale: String,
    pub gender: Gender,
    pub description: Option<String>,
}

impl Voice {
    pub fn new(name: String, display_name: String, locale: String, gender: Gender) -> Self {
        Self {
            name,
            display_name,
            locale,
            gender,
            description: None,
        }
    }

    /// Primary language subtag: the part of the locale before the first
    /// `-`, or the whole locale if there is no `-`.
    pub fn language_code(&self) -> &str {
        self.locale.split('-').next().unwrap_or(&self.locale)
    }

    /// True if `code` equals the locale or the primary language subtag,
    /// case-insensitively. `en` matches locales `en` and `en-US`.
    pub fn matches_language(&self, code: &str) -> bool {
        self.locale.eq_ignore_ascii_case(code) || self.language_code().eq_ignore_ascii_case(code)
    }
}

/// Load voices from the shared JSON config file.
///
/// Each language entry with a non-empty `edge_voice` contributes one
/// voice. Fails with `NotFound` if the path does not exist and with
/// `Parse` if the JSON is malformed.
pub fn parse_voices_from_json_file(path: &Path) -> Result<Vec<Voice>> {
    if !path.exists() {
        return Err(TtsError::NotFound(format!(
            "Voice config file not found: {}",
            path.display()
        )));
    }

    let content = std::fs::read_to_string(path)?;
    let config: SharedConfig = serde_json::from_str(&content)
        .map_err(|e| TtsError::Parse(format!("Invalid JSON in {}: {}", path.display(), e)))?;

    Ok(config
        .languages
        .iter()
        .filter(|lang| !lang.edge_voice.is_empty())
        .map(|lang| Voice::new(
            lang.edge_voice.clone(),
            lang.name.clone(),
            lang.code.clone(),
            Gender::Unknown,
        ))
        .collect())
}

/// Voices whose locale starts with `language`, case-insensitively.
/// `en` matches `en-US` and `en-GB`. Order is preserved.
pub fn by_language(voices: &[Voice], language: &str) -> Vec<Voice> {
    let needle = language.to_ascii_lowercase();
    voices
        .iter()
        .filter(|v| v.locale.to_ascii_lowercase().starts_with(&needle))
        .cloned()
        .collect()
}

/// Voices whose locale equals `locale`, case-insensitively.
pub fn by_locale(voices: &[Voice], locale: &str) -> Vec<Voice> {
    voices
        .iter()
        .filter(|v| v.locale.eq_ignore_ascii_case(locale))
        .cloned()
        .collect()
}

/// Voices whose gender matches `gender`, case-insensitively.
pub fn by_gender(voices: &[Voice], gender: &str) -> Vec<Voice> {
    voices
        .iter()
        .filter(|v| v.gender.as_str().eq_ignore_ascii_case(gender))
        .cloned()
        .collect()
}
