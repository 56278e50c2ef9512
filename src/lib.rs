//! hello-tts - multi-backend text-to-speech demo
//!
//! Synthesizes speech through third-party providers (Edge neural voices
//! or Google-Translate synthesis), saves the audio to disk, and
//! optionally plays it through a platform audio player.

pub mod audio;
pub mod backends;
pub mod batch;
pub mod config;
pub mod error;
pub mod tts;
pub mod utils;
pub mod voice;

pub use error::{Result, TtsError};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const APP_NAME: &str = "hello-tts";
