//! Edge neural-voice backend
//!
//! Talks to the consumer readaloud websocket endpoint. A synthesis
//! exchange sends a `speech.config` message followed by one SSML
//! message, then collects the streamed reply: binary frames whose
//! header carries `Path:audio` hold audio payload; text frames carry
//! timing metadata and the terminating `turn.end` marker.

use crate::backends::{BackendKind, TtsBackend};
use crate::config::TtsConfig;
use crate::voice::{self, Gender, Voice};
use crate::{Result, TtsError};
use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use log::{debug, warn};
use serde::Deserialize;
use sha2::{Digest, Sha256};
use std::path::Path;
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::HeaderValue;
use tokio_tungstenite::tungstenite::Message;

const TRUSTED_CLIENT_TOKEN: &str = "6A5AA1D4EAFF4E9FB37E23D68491D6F4";
const WSS_URL: &str =
    "wss://speech.platform.bing.com/consumer/speech/synthesize/readaloud/edge/v1";
const VOICES_URL: &str =
    "https://speech.platform.bing.com/consumer/speech/synthesize/readaloud/voices/list";
const CHROMIUM_VERSION: &str = "130.0.2849.68";
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/130.0.0.0 Safari/537.36 Edg/130.0.0.0";
const OUTPUT_FORMAT: &str = "audio-24khz-48kbitrate-mono-mp3";

/// Seconds between the Windows epoch (1601) and the Unix epoch (1970)
const WINDOWS_EPOCH_OFFSET: u64 = 11_644_473_600;

/// Shared catalog consulted before querying the live voice listing
const SHARED_CONFIG_PATH: &str = "shared/tts_config.json";

/// One entry of the live voice listing
#[derive(Debug, Deserialize)]
struct EdgeVoiceEntry {
    #[serde(rename = "ShortName")]
    short_name: String,
    #[serde(rename = "FriendlyName", default)]
    friendly_name: String,
    #[serde(rename = "Locale", default)]
    locale: String,
    #[serde(rename = "Gender", default)]
    gender: String,
}

/// Client for the Edge neural-voice service
pub struct EdgeClient {
    config: TtsConfig,
    http: reqwest::Client,
    // Guard is never held across an await point
    voices: Mutex<Option<Vec<Voice>>>,
}

impl EdgeClient {
    pub fn new(config: TtsConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| TtsError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            config,
            http,
            voices: Mutex::new(None),
        })
    }

    /// Drop the cached voice list so the next `list_voices` call reloads
    /// it.
    pub fn clear_voice_cache(&self) {
        *self.voices.lock().expect("voice cache lock poisoned") = None;
    }

    /// Rolling access token: SHA-256 over the current 5-minute window of
    /// the Windows file clock concatenated with the trusted client
    /// token, uppercase hex.
    fn sec_ms_gec() -> String {
        let unix = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();
        let mut windows_secs = unix + WINDOWS_EPOCH_OFFSET;
        windows_secs -= windows_secs % 300;
        let ticks = windows_secs as u128 * 10_000_000;

        let digest = Sha256::digest(format!("{}{}", ticks, TRUSTED_CLIENT_TOKEN).as_bytes());
        digest.iter().map(|b| format!("{:02X}", b)).collect()
    }

    /// Timestamp header in the JavaScript date format the service
    /// expects
    fn timestamp() -> String {
        chrono::Utc::now()
            .format("%a %b %d %Y %H:%M:%S GMT+0000 (Coordinated Universal Time)")
            .to_string()
    }

    fn escape_xml(text: &str) -> String {
        text.replace('&', "&amp;")
            .replace('<', "&lt;")
            .replace('>', "&gt;")
    }

    /// Build the SSML document for a synthesis request.
    ///
    /// Text that already is an SSML document is sent verbatim, which is
    /// how callers reach Edge-specific prosody controls (e.g. rate
    /// markup). Plain text is escaped and wrapped.
    fn build_ssml(text: &str, voice: &str) -> String {
        if text.trim_start().starts_with("<speak") {
            return text.to_string();
        }

        // xml:lang is derived from the voice name, e.g. en-US-JennyNeural
        let parts: Vec<&str> = voice.splitn(3, '-').collect();
        let lang = if parts.len() >= 2 {
            format!("{}-{}", parts[0], parts[1])
        } else {
            "en-US".to_string()
        };

        format!(
            "<speak version='1.0' xmlns='http://www.w3.org/2001/10/synthesis' xml:lang='{}'>\
             <voice name='{}'>\
             <prosody pitch='+0Hz' rate='+0%' volume='+0%'>{}</prosody>\
             </voice></speak>",
            lang,
            voice,
            Self::escape_xml(text)
        )
    }

    /// Extract the audio payload from a binary websocket frame.
    ///
    /// Frame layout: a big-endian u16 header length, the UTF-8 header
    /// block, then the payload. Only frames whose header carries
    /// `Path:audio` contribute audio; everything else is ignored.
    fn audio_payload(frame: &[u8]) -> Option<&[u8]> {
        if frame.len() < 2 {
            return None;
        }
        let header_len = u16::from_be_bytes([frame[0], frame[1]]) as usize;
        if frame.len() < 2 + header_len {
            return None;
        }
        let header = std::str::from_utf8(&frame[2..2 + header_len]).ok()?;
        if header.contains("Path:audio") {
            Some(&frame[2 + header_len..])
        } else {
            None
        }
    }

    async fn fetch_voices_from_api(&self) -> Result<Vec<Voice>> {
        let url = format!(
            "{}?trustedclienttoken={}&Sec-MS-GEC={}&Sec-MS-GEC-Version=1-{}",
            VOICES_URL,
            TRUSTED_CLIENT_TOKEN,
            Self::sec_ms_gec(),
            CHROMIUM_VERSION
        );

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| TtsError::Synthesis(format!("Failed to fetch voice list: {}", e)))?;

        if !response.status().is_success() {
            return Err(TtsError::Synthesis(format!(
                "Voice list request failed with status {}",
                response.status()
            )));
        }

        let entries: Vec<EdgeVoiceEntry> = response
            .json()
            .await
            .map_err(|e| TtsError::Parse(format!("Invalid voice list response: {}", e)))?;

        Ok(entries
            .into_iter()
            .map(|e| {
                let display_name = if e.friendly_name.is_empty() {
                    e.short_name.clone()
                } else {
                    e.friendly_name
                };
                Voice::new(e.short_name, display_name, e.locale, Gender::parse(&e.gender))
            })
            .collect())
    }
}

#[async_trait]
impl TtsBackend for EdgeClient {
    fn kind(&self) -> BackendKind {
        BackendKind::Edge
    }

    async fn synthesize_text(&self, text: &str, voice: &str) -> Result<Vec<u8>> {
        let connection_id = uuid::Uuid::new_v4().simple().to_string();
        let url = format!(
            "{}?TrustedClientToken={}&Sec-MS-GEC={}&Sec-MS-GEC-Version=1-{}&ConnectionId={}",
            WSS_URL,
            TRUSTED_CLIENT_TOKEN,
            Self::sec_ms_gec(),
            CHROMIUM_VERSION,
            connection_id
        );

        let mut request = url
            .into_client_request()
            .map_err(|e| TtsError::Synthesis(format!("Invalid websocket request: {}", e)))?;
        let headers = request.headers_mut();
        headers.insert("Pragma", HeaderValue::from_static("no-cache"));
        headers.insert("Cache-Control", HeaderValue::from_static("no-cache"));
        headers.insert(
            "Origin",
            HeaderValue::from_static(
                "chrome-extension://jdiccldimpdaibmpdkjnbmckianbfold",
            ),
        );
        headers.insert("User-Agent", HeaderValue::from_static(USER_AGENT));

        let (mut ws, _) = connect_async(request)
            .await
            .map_err(|e| TtsError::Synthesis(format!("Edge TTS connection failed: {}", e)))?;

        let speech_config = format!(
            "X-Timestamp:{}\r\n\
             Content-Type:application/json; charset=utf-8\r\n\
             Path:speech.config\r\n\r\n\
             {{\"context\":{{\"synthesis\":{{\"audio\":{{\"metadataoptions\":{{\
             \"sentenceBoundaryEnabled\":\"false\",\"wordBoundaryEnabled\":\"true\"}},\
             \"outputFormat\":\"{}\"}}}}}}}}",
            Self::timestamp(),
            OUTPUT_FORMAT
        );
        ws.send(Message::Text(speech_config))
            .await
            .map_err(|e| TtsError::Synthesis(format!("Failed to send speech config: {}", e)))?;

        let ssml_message = format!(
            "X-RequestId:{}\r\n\
             Content-Type:application/ssml+xml\r\n\
             X-Timestamp:{}Z\r\n\
             Path:ssml\r\n\r\n{}",
            uuid::Uuid::new_v4().simple(),
            Self::timestamp(),
            Self::build_ssml(text, voice)
        );
        ws.send(Message::Text(ssml_message))
            .await
            .map_err(|e| TtsError::Synthesis(format!("Failed to send SSML: {}", e)))?;

        let mut audio = Vec::new();
        while let Some(message) = ws.next().await {
            let message = message
                .map_err(|e| TtsError::Synthesis(format!("Edge TTS stream error: {}", e)))?;
            match message {
                Message::Text(metadata) => {
                    if metadata.contains("Path:turn.end") {
                        debug!("Received turn.end, closing stream");
                        break;
                    }
                    // turn.start / audio.metadata frames are ignored
                }
                Message::Binary(frame) => {
                    if let Some(payload) = Self::audio_payload(&frame) {
                        audio.extend_from_slice(payload);
                    }
                }
                Message::Close(_) => break,
                _ => {}
            }
        }
        let _ = ws.close(None).await;

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

        // Prefer the shared JSON catalog, fall back to the live listing
        let shared = Path::new(SHARED_CONFIG_PATH);
        let voices = match voice::parse_voices_from_json_file(shared) {
            Ok(voices) => voices,
            Err(TtsError::NotFound(_)) => self.fetch_voices_from_api().await?,
            Err(e) => {
                warn!("Failed to load voices from config file: {}", e);
                self.fetch_voices_from_api().await?
            }
        };

        if self.config.cache_voices {
            *self.voices.lock().expect("voice cache lock poisoned") = Some(voices.clone());
        }
        Ok(voices)
    }
}
