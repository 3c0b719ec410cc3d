//! Alarm playback
//!
//! Starting the drowsiness alarm speaks once immediately; a tokio task then
//! repeats the phrase every interval until the watch flag drops to `false`.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::{AlarmAction, AlarmError};

/// Text-to-speech sink
pub trait Speaker: Send + Sync + 'static {
    fn speak(&self, text: &str);
}

/// Speaker that only writes phrases to the log
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSpeaker;

impl Speaker for LogSpeaker {
    fn speak(&self, text: &str) {
        info!(target: "alarm", "{}", text);
    }
}

struct RepeatTask {
    active: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

/// Executes alarm actions against a speaker
pub struct AlarmPlayer<S: Speaker> {
    speaker: Arc<S>,
    repeat: Option<RepeatTask>,
}

impl<S: Speaker> AlarmPlayer<S> {
    pub fn new(speaker: S) -> Self {
        Self {
            speaker: Arc::new(speaker),
            repeat: None,
        }
    }

    /// Apply one action. Must be called inside a tokio runtime.
    pub async fn apply(&mut self, action: AlarmAction) -> Result<(), AlarmError> {
        match action {
            AlarmAction::StartRepeating { phrase, interval } => {
                if self.repeat.is_some() {
                    warn!("Repeating alarm already running");
                    return Ok(());
                }
                if interval.is_zero() {
                    return Err(AlarmError::Config("repeat interval must be non-zero".into()));
                }
                self.speaker.speak(&phrase);
                let (active, rx) = watch::channel(true);
                let handle = tokio::spawn(repeat_loop(self.speaker.clone(), phrase, interval, rx));
                self.repeat = Some(RepeatTask { active, handle });
            }
            AlarmAction::StopRepeating => self.stop().await?,
            AlarmAction::Speak(phrase) => self.speaker.speak(&phrase),
        }
        Ok(())
    }

    /// Stop the repeating alarm and wait for its task to finish
    pub async fn stop(&mut self) -> Result<(), AlarmError> {
        let Some(task) = self.repeat.take() else {
            return Ok(());
        };
        // The receiver is gone only if the task already ended
        let _ = task.active.send(false);
        task.handle
            .await
            .map_err(|e| AlarmError::Task(e.to_string()))
    }

    pub fn is_repeating(&self) -> bool {
        self.repeat.is_some()
    }
}

async fn repeat_loop<S: Speaker>(
    speaker: Arc<S>,
    phrase: String,
    interval: Duration,
    mut active: watch::Receiver<bool>,
) {
    debug!("Alarm loop started");
    loop {
        tokio::select! {
            _ = tokio::time::sleep(interval) => speaker.speak(&phrase),
            changed = active.changed() => {
                if changed.is_err() || !*active.borrow() {
                    break;
                }
            }
        }
    }
    debug!("Alarm loop stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Clone, Default)]
    struct RecordingSpeaker {
        spoken: Arc<Mutex<Vec<String>>>,
    }

    impl RecordingSpeaker {
        fn spoken(&self) -> Vec<String> {
            self.spoken.lock().unwrap().clone()
        }
    }

    impl Speaker for RecordingSpeaker {
        fn speak(&self, text: &str) {
            self.spoken.lock().unwrap().push(text.to_string());
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_repeats_until_stopped() {
        let speaker = RecordingSpeaker::default();
        let mut player = AlarmPlayer::new(speaker.clone());

        player
            .apply(AlarmAction::StartRepeating {
                phrase: "wake up".into(),
                interval: Duration::from_secs(2),
            })
            .await
            .unwrap();
        assert!(player.is_repeating());

        tokio::time::sleep(Duration::from_millis(4500)).await;
        assert_eq!(speaker.spoken().len(), 3);

        player.apply(AlarmAction::StopRepeating).await.unwrap();
        assert!(!player.is_repeating());

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(speaker.spoken().len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_start_ignored() {
        let speaker = RecordingSpeaker::default();
        let mut player = AlarmPlayer::new(speaker.clone());
        let start = AlarmAction::StartRepeating {
            phrase: "wake up".into(),
            interval: Duration::from_secs(2),
        };

        player.apply(start.clone()).await.unwrap();
        player.apply(start).await.unwrap();
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(speaker.spoken(), vec!["wake up".to_string()]);

        player.stop().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_interval_rejected() {
        let speaker = RecordingSpeaker::default();
        let mut player = AlarmPlayer::new(speaker.clone());

        let result = player
            .apply(AlarmAction::StartRepeating {
                phrase: "wake up".into(),
                interval: Duration::ZERO,
            })
            .await;
        assert!(matches!(result, Err(AlarmError::Config(_))));
        assert!(!player.is_repeating());

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(speaker.spoken().is_empty());
    }

    #[tokio::test]
    async fn test_one_shot_speak() {
        let speaker = RecordingSpeaker::default();
        let mut player = AlarmPlayer::new(speaker.clone());
        player.apply(AlarmAction::Speak("Yawn Detected".into())).await.unwrap();
        player.apply(AlarmAction::StopRepeating).await.unwrap();
        assert_eq!(speaker.spoken(), vec!["Yawn Detected".to_string()]);
    }
}
