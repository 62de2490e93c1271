//! Playback devices for the adhan.

use log::info;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::config::{PlaybackBackend, PlaybackConfig};
use crate::models::PrayerType;

#[derive(Debug, thiserror::Error)]
pub enum PlaybackError {
    #[error("could not start '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
    #[error("'{program}' exited with {status} while playing {file}")]
    ExitStatus {
        program: String,
        file: PathBuf,
        status: std::process::ExitStatus,
    },
    #[error("audio output failed: {0}")]
    Io(#[from] io::Error),
}

/// Something that can sound the adhan for a given prayer.
pub trait Player: Send {
    fn play(&self, prayer: PrayerType) -> Result<(), PlaybackError>;
}

impl Player for Box<dyn Player> {
    fn play(&self, prayer: PrayerType) -> Result<(), PlaybackError> {
        (**self).play(prayer)
    }
}

/// Prints the prayer name instead of playing audio.
#[derive(Debug, Default)]
pub struct StdoutPlayer;

impl Player for StdoutPlayer {
    fn play(&self, prayer: PrayerType) -> Result<(), PlaybackError> {
        use std::io::Write;
        let mut out = io::stdout().lock();
        writeln!(out, "{}", prayer)?;
        out.flush()?;
        Ok(())
    }
}

/// Runs an external audio player, e.g. `omxplayer -o local --vol 1000 <file>`.
///
/// Fajr gets its own recording; every other prayer shares the default one.
#[derive(Debug, Clone)]
pub struct CommandPlayer {
    program: String,
    args: Vec<String>,
    fajr_file: PathBuf,
    default_file: PathBuf,
}

impl CommandPlayer {
    pub fn new(
        program: impl Into<String>,
        args: Vec<String>,
        fajr_file: impl Into<PathBuf>,
        default_file: impl Into<PathBuf>,
    ) -> Self {
        Self {
            program: program.into(),
            args,
            fajr_file: fajr_file.into(),
            default_file: default_file.into(),
        }
    }

    pub fn file_for(&self, prayer: PrayerType) -> &Path {
        match prayer {
            PrayerType::Fajr => &self.fajr_file,
            _ => &self.default_file,
        }
    }
}

impl Player for CommandPlayer {
    fn play(&self, prayer: PrayerType) -> Result<(), PlaybackError> {
        let file = self.file_for(prayer);
        info!("Executing {} {} {}", self.program, self.args.join(" "), file.display());

        let status = Command::new(&self.program)
            .args(&self.args)
            .arg(file)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map_err(|source| PlaybackError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if !status.success() {
            return Err(PlaybackError::ExitStatus {
                program: self.program.clone(),
                file: file.to_path_buf(),
                status,
            });
        }
        Ok(())
    }
}

pub fn from_config(config: &PlaybackConfig) -> Box<dyn Player> {
    match config.backend {
        PlaybackBackend::Stdout => Box::new(StdoutPlayer),
        PlaybackBackend::Command => Box::new(CommandPlayer::new(
            config.program.clone(),
            config.args.clone(),
            config.fajr_file.clone(),
            config.default_file.clone(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fajr_has_its_own_recording() {
        let player = CommandPlayer::new("true", vec![], "fajr.mp3", "adhan.mp3");
        assert_eq!(player.file_for(PrayerType::Fajr), Path::new("fajr.mp3"));
        assert_eq!(player.file_for(PrayerType::Maghrib), Path::new("adhan.mp3"));
    }

    #[test]
    fn missing_program_is_a_spawn_error() {
        let player = CommandPlayer::new(
            "prayeralarm-no-such-player",
            vec![],
            "fajr.mp3",
            "adhan.mp3",
        );
        assert!(matches!(
            player.play(PrayerType::Isha),
            Err(PlaybackError::Spawn { .. })
        ));
    }

    #[cfg(unix)]
    #[test]
    fn non_zero_exit_is_reported() {
        let player = CommandPlayer::new("false", vec![], "fajr.mp3", "adhan.mp3");
        match player.play(PrayerType::Fajr) {
            Err(PlaybackError::ExitStatus { file, .. }) => assert_eq!(file, PathBuf::from("fajr.mp3")),
            other => panic!("expected exit status error, got {:?}", other),
        }
    }

    #[cfg(unix)]
    #[test]
    fn successful_exit_is_ok() {
        let player = CommandPlayer::new("true", vec![], "fajr.mp3", "adhan.mp3");
        assert!(player.play(PrayerType::Asr).is_ok());
    }

    #[test]
    fn stdout_backend_is_default() {
        let config = PlaybackConfig::default();
        assert_eq!(config.backend, PlaybackBackend::Stdout);
        assert!(from_config(&config).play(PrayerType::Dhuhr).is_ok());
    }
}
