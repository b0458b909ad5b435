//! Local audio collaborators: prompt playback and microphone capture.

use std::path::Path;
use std::time::Duration;

use tempfile::NamedTempFile;
use tracing::debug;

use dockhand_core::ToolCommand;

use crate::error::Result;

/// Which local tools handle playback and capture, and how long to listen.
#[derive(Debug, Clone)]
pub struct AudioConfig {
    /// Player binary for the synthesized prompt.
    pub player_program: String,
    /// Recorder binary for the microphone.
    pub recorder_program: String,
    /// Capture window in seconds; one utterance has to fit inside it.
    pub capture_secs: u32,
    /// Capture sample rate in Hz; the transcriber reports the same rate
    /// to the speech service.
    pub sample_rate: u32,
}

impl Default for AudioConfig {
    fn default() -> Self {
        AudioConfig {
            player_program: "mpg123".to_string(),
            recorder_program: "arecord".to_string(),
            capture_secs: 10,
            sample_rate: 16_000,
        }
    }
}

/// Plays a synthesized prompt out loud and waits for playback to finish.
pub struct Player {
    config: AudioConfig,
}

impl Player {
    pub fn new(config: AudioConfig) -> Self {
        Player { config }
    }

    pub async fn play(&self, file: &Path) -> Result<()> {
        debug!(file = %file.display(), "playing prompt");
        ToolCommand::new(&self.config.player_program)
            .arg("-q")
            .arg(file.to_string_lossy())
            .timeout(Duration::from_secs(60))
            .run_checked()
            .await?;
        Ok(())
    }
}

/// Captures one utterance from the microphone.
pub struct Recorder {
    config: AudioConfig,
}

impl Recorder {
    pub fn new(config: AudioConfig) -> Self {
        Recorder { config }
    }

    /// Record raw signed-16-bit mono audio for the configured window and
    /// return the temp file holding it.
    pub async fn capture(&self) -> Result<NamedTempFile> {
        let file = NamedTempFile::new()?;
        debug!(secs = self.config.capture_secs, "recording");
        ToolCommand::new(&self.config.recorder_program)
            .args([
                "-q".to_string(),
                "-f".to_string(),
                "S16_LE".to_string(),
                "-c".to_string(),
                "1".to_string(),
                "-t".to_string(),
                "raw".to_string(),
                "-r".to_string(),
                self.config.sample_rate.to_string(),
                "-d".to_string(),
                self.config.capture_secs.to_string(),
            ])
            .arg(file.path().to_string_lossy())
            .timeout(Duration::from_secs(u64::from(self.config.capture_secs) + 15))
            .run_checked()
            .await?;
        Ok(file)
    }
}
