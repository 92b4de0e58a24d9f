use async_trait::async_trait;
use std::path::PathBuf;

use crate::slot::Slot;
use crate::sound::SoundPlayer;

/// Side effect performed when a fetch finds available slots.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, slots: &[Slot]);
}

/// Production notifier: one log line per slot, then an audible alert.
pub struct AlertNotifier {
    player: SoundPlayer,
    sound_file: PathBuf,
}

impl AlertNotifier {
    pub fn new(player: SoundPlayer, sound_file: PathBuf) -> Self {
        Self { player, sound_file }
    }
}

#[async_trait]
impl Notifier for AlertNotifier {
    async fn notify(&self, slots: &[Slot]) {
        for slot in slots {
            tracing::info!(
                "Slot available in {} on {} at {}! URL: {}",
                slot.city,
                slot.date,
                slot.time,
                slot.booking_url
            );
        }

        // A broken or missing sound setup must never take the watcher down.
        if let Err(e) = self.player.play(&self.sound_file).await {
            tracing::error!("Failed to play alert sound: {e:#}");
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn slot() -> Slot {
        Slot {
            city: "Lyon".to_string(),
            date: "01/06/2024".to_string(),
            time: "14:00".to_string(),
            booking_url: "https://x/1".to_string(),
        }
    }

    #[tokio::test]
    async fn test_sound_failure_is_contained() {
        let notifier = AlertNotifier::new(
            SoundPlayer::new("definitely-not-a-real-player"),
            PathBuf::from("alert.wav"),
        );

        // Must return normally despite the unplayable sound.
        notifier.notify(&[slot()]).await;
    }

    #[tokio::test]
    async fn test_notify_with_working_player() {
        let notifier = AlertNotifier::new(SoundPlayer::new("true"), PathBuf::from("alert.wav"));
        notifier.notify(&[slot(), slot()]).await;
    }
}
