//! hello-tts main entry point
//!
//! Unified CLI for text-to-speech synthesis across backends: pick a
//! backend, synthesize, save, optionally play.

use clap::Parser;
use hello_tts::audio::AudioPlayer;
use hello_tts::backends::BackendKind;
use hello_tts::config;
use hello_tts::tts::HelloTts;
use hello_tts::utils::create_output_directory;
use hello_tts::Result;
use log::{error, info, warn};
use std::path::{Path, PathBuf};
use std::process;
use std::time::{SystemTime, UNIX_EPOCH};

#[derive(Parser, Debug)]
#[command(name = "hello-tts", version, about = "Unified text-to-speech CLI")]
struct Args {
    /// Text to synthesize
    #[arg(short, long, default_value = "Hello, World!")]
    text: String,

    /// Voice to use (backend default when omitted)
    #[arg(short, long)]
    voice: Option<String>,

    /// Backend to use (first available when omitted)
    #[arg(short, long, value_enum)]
    backend: Option<BackendKind>,

    /// Output filename
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Don't play audio after saving
    #[arg(long)]
    no_play: bool,

    /// List voices and exit
    #[arg(long)]
    list_voices: bool,

    /// Use slow speech (Google TTS only)
    #[arg(long)]
    slow: bool,
}

fn main() {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let args = Args::parse();
    if let Err(e) = run(args) {
        error!("An error occurred: {}", e);
        process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let mut cfg = config::load_config(None);
    if args.slow {
        cfg.google_slow_speech = true;
    }
    create_output_directory(Path::new(&cfg.output_directory))?;

    let tts = HelloTts::new(args.backend, cfg.clone())?;
    info!("TTS initialized with {} backend", tts.backend_kind());

    if args.list_voices {
        let voices = tts.list_voices()?;
        println!("Found {} voices", voices.len());
        for v in voices.iter().take(50) {
            println!("{} - {} - {}", v.name, v.locale, v.gender);
        }
        return Ok(());
    }

    let output_file = match args.output {
        Some(path) => path,
        None => default_output_file(&cfg.output_directory, args.voice.as_deref(), &cfg.output_format),
    };

    info!("Synthesizing text: {}", args.text);
    let audio = tts.synthesize_text(&args.text, args.voice.as_deref())?;
    tts.save_audio(&audio, &output_file)?;
    info!("Saved audio to {}", output_file.display());

    if !args.no_play && cfg.auto_play {
        match AudioPlayer::new().and_then(|player| player.play_file(&output_file)) {
            Ok(()) => info!("Audio playback completed"),
            Err(e) => warn!("Playback failed: {}", e),
        }
    }

    Ok(())
}

/// `{output_dir}/hello_tts_{langPrefix}_{unixTimestamp}.{format}`
fn default_output_file(output_dir: &str, voice: Option<&str>, format: &str) -> PathBuf {
    let lang = voice
        .and_then(|v| v.split('-').next())
        .filter(|s| !s.is_empty())
        .unwrap_or("en");
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    PathBuf::from(output_dir).join(format!("hello_tts_{}_{}.{}", lang, timestamp, format))
}
