//! Multilingual batch demo
//!
//! Generates one audio file per language listed in the shared JSON
//! config file, applying the alternate-voice fallback policy. Exits
//! zero only when every language succeeded.

use clap::Parser;
use hello_tts::backends::BackendKind;
use hello_tts::batch::{self, BatchSummary};
use hello_tts::config;
use hello_tts::tts::HelloTts;
use hello_tts::utils::create_output_directory;
use hello_tts::Result;
use log::{error, info};
use std::path::PathBuf;
use std::process;
use std::time::Instant;

#[derive(Parser, Debug)]
#[command(name = "multilingual", version, about = "Multilingual TTS batch demo")]
struct Args {
    /// Backend to use (TTS_BACKEND env var, then edge, when omitted)
    #[arg(short, long, value_enum)]
    backend: Option<BackendKind>,

    /// Shared language config file
    #[arg(short, long, default_value = "shared/tts_config.json")]
    config: PathBuf,

    /// Output directory for generated audio
    #[arg(short, long, default_value = "output")]
    output: PathBuf,

    /// Play each generated file
    #[arg(long)]
    play: bool,
}

/// Explicit flag wins; TTS_BACKEND only fills the gap
fn resolve_backend(flag: Option<BackendKind>) -> BackendKind {
    if let Some(kind) = flag {
        return kind;
    }
    std::env::var("TTS_BACKEND")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(BackendKind::Edge)
}

fn main() {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    info!("Multilingual TTS Demo - Rust Implementation");
    info!("{}", "=".repeat(60));

    match run(Args::parse()) {
        Ok(summary) if summary.is_success() => {}
        Ok(_) => process::exit(1),
        Err(e) => {
            error!("{}", e);
            process::exit(1);
        }
    }
}

fn run(args: Args) -> Result<BatchSummary> {
    let kind = resolve_backend(args.backend);

    let languages = batch::load_language_configs(&args.config, kind).map_err(|e| {
        error!("Failed to load language configuration: {}", e);
        e
    })?;
    if languages.is_empty() {
        return Err("No languages found in configuration".into());
    }
    info!("Found {} languages to process", languages.len());

    create_output_directory(&args.output)?;
    info!("Output directory: {}", args.output.display());

    let tts = HelloTts::new(Some(kind), config::load_config(None))?;
    info!("✓ TTS client initialized with {} backend", kind);

    let start = Instant::now();
    let summary = batch::run_batch(&tts, &languages, &args.output, args.play);
    let duration = start.elapsed();

    info!("Processing complete");
    info!("{}", "=".repeat(40));
    info!("✓ Successful: {}", summary.succeeded);
    info!("✗ Failed: {}", summary.failed);
    info!("Total time: {:.2} seconds", duration.as_secs_f64());
    info!("Output files saved in: {}", args.output.display());

    Ok(summary)
}
