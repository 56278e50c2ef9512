//! Audio playback through an external platform player
//!
//! No decoding happens in-process: the player binary found on PATH at
//! construction time is run to completion for each file.

use crate::{Result, TtsError};
use log::debug;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Player candidates probed per platform, in preference order.
///
/// `mpg123` and `ffplay` decode mp3 directly; `paplay`/`aplay` cover
/// PCM formats and are kept last for parity with common setups.
#[cfg(target_os = "macos")]
const PLAYER_CANDIDATES: &[(&str, &[&str])] = &[("afplay", &[])];

#[cfg(not(target_os = "macos"))]
const PLAYER_CANDIDATES: &[(&str, &[&str])] = &[
    ("mpg123", &["-q"]),
    ("ffplay", &["-nodisp", "-autoexit", "-loglevel", "quiet"]),
    ("paplay", &[]),
    ("aplay", &[]),
];

/// Plays audio files through whichever platform player is installed
pub struct AudioPlayer {
    player: PathBuf,
    args: &'static [&'static str],
}

impl AudioPlayer {
    /// Probe PATH for a usable player.
    ///
    /// Fails with an `Audio` error when no playback mechanism exists on
    /// the host.
    pub fn new() -> Result<Self> {
        for (name, args) in PLAYER_CANDIDATES {
            if let Some(path) = find_in_path(name) {
                debug!("Using audio player {}", path.display());
                return Ok(Self { player: path, args });
            }
        }

        Err(TtsError::Audio(
            "No audio playback method available".to_string(),
        ))
    }

    /// Play `path` to completion.
    ///
    /// Fails with an `Audio` error when the file is missing or the
    /// player exits unsuccessfully.
    pub fn play_file(&self, path: &Path) -> Result<()> {
        if !path.exists() {
            return Err(TtsError::Audio(format!(
                "File not found: {}",
                path.display()
            )));
        }

        let status = Command::new(&self.player)
            .args(self.args)
            .arg(path)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map_err(|e| {
                TtsError::Audio(format!(
                    "Failed to run {}: {}",
                    self.player.display(),
                    e
                ))
            })?;

        if !status.success() {
            return Err(TtsError::Audio(format!(
                "{} exited with {}",
                self.player.display(),
                status
            )));
        }
        Ok(())
    }
}

/// Locate an executable on PATH
fn find_in_path(name: &str) -> Option<PathBuf> {
    let path_var = std::env::var_os("PATH")?;
    for dir in std::env::split_paths(&path_var) {
        let candidate = dir.join(name);
        if candidate.is_file() {
            return Some(candidate);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_in_path() {
        // `ls` exists on every platform this crate targets
        assert!(find_in_path("ls").is_some());
        assert!(find_in_path("definitely-not-a-real-binary-42").is_none());
    }

    #[test]
    fn test_play_missing_file() {
        // Skip when the host has no player at all
        if let Ok(player) = AudioPlayer::new() {
            let err = player.play_file(Path::new("/nonexistent/audio.mp3")).unwrap_err();
            assert!(matches!(err, TtsError::Audio(_)));
        }
    }
}
