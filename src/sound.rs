use anyhow::Context;
use std::path::Path;
use tokio::process::Command;

/// Plays an audio file by handing it to a system player command
/// (`aplay`, `afplay`, ...). One fallible call, no state.
pub struct SoundPlayer {
    command: String,
}

impl SoundPlayer {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }

    pub async fn play(&self, path: &Path) -> anyhow::Result<()> {
        let status = Command::new(&self.command)
            .arg(path)
            .status()
            .await
            .with_context(|| format!("failed to launch sound player {:?}", self.command))?;

        anyhow::ensure!(
            status.success(),
            "sound player {:?} exited with {} for {}",
            self.command,
            status,
            path.display()
        );

        Ok(())
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[tokio::test]
    async fn test_successful_player_run() {
        let player = SoundPlayer::new("true");
        player.play(&PathBuf::from("whatever.wav")).await.expect("should succeed");
    }

    #[tokio::test]
    async fn test_player_exit_failure_is_reported() {
        let player = SoundPlayer::new("false");
        let result = player.play(&PathBuf::from("missing.wav")).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_missing_player_binary_is_reported() {
        let player = SoundPlayer::new("definitely-not-a-real-player");
        let result = player.play(&PathBuf::from("alert.wav")).await;
        assert!(result.is_err());
    }
}
