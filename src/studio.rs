use std::time::Duration;

use time::OffsetDateTime;
use tokio::sync::mpsc;
use tracing::{debug, error, info};

use crate::clipboard::{ClipboardSink, SystemClipboard};
use crate::config::Config;
use crate::logging::{record_generation, GenerationRecord};
use crate::session::{GenerationOutcome, GenerationTicket, SessionState};
use crate::templates::generate_captions;

const EVENT_CHANNEL_CAPACITY: usize = 16;

/// Completions produced by the studio's timers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StudioEvent {
    GenerationReady {
        ticket: GenerationTicket,
        captions: Vec<String>,
    },
    CopiedExpired(String),
}

/// What applying a [`StudioEvent`] did to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StudioUpdate {
    Generation(GenerationOutcome),
    CopiedCleared(bool),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StudioSettings {
    pub generation_delay: Duration,
    pub copied_indicator: Duration,
    pub drop_stale_generations: bool,
}

impl From<&Config> for StudioSettings {
    fn from(config: &Config) -> Self {
        Self {
            generation_delay: config.generation_delay(),
            copied_indicator: config.copied_indicator(),
            drop_stale_generations: config.drop_stale_generations,
        }
    }
}

/// Owns the form state and runs its two timers: the simulated generation
/// latency and the "just copied" indicator.
///
/// Timers run as spawned tasks that only report back over a channel; every
/// state change happens on the task that owns the studio, via [`apply`].
///
/// [`apply`]: CaptionStudio::apply
pub struct CaptionStudio<C: ClipboardSink = SystemClipboard> {
    state: SessionState,
    settings: StudioSettings,
    clipboard: C,
    events_tx: mpsc::Sender<StudioEvent>,
    events_rx: mpsc::Receiver<StudioEvent>,
}

impl<C: ClipboardSink> CaptionStudio<C> {
    pub fn new(config: &Config, clipboard: C) -> Self {
        let state = SessionState::new(
            config.default_platform,
            config.default_tone,
            config.default_mood,
            config.format_options(),
        );
        let (events_tx, events_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);

        Self {
            state,
            settings: StudioSettings::from(config),
            clipboard,
            events_tx,
            events_rx,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut SessionState {
        &mut self.state
    }

    pub fn settings(&self) -> StudioSettings {
        self.settings
    }

    pub fn clipboard(&self) -> &C {
        &self.clipboard
    }

    /// Timing changes apply to the next timer started; live selections are kept.
    pub fn apply_settings(&mut self, config: &Config) {
        let settings = StudioSettings::from(config);
        if settings != self.settings {
            debug!(?settings, "Studio settings updated");
            self.settings = settings;
        }
    }

    /// Starts a generation if the form allows it. The delay cannot be
    /// cancelled; its batch always comes back as a
    /// [`StudioEvent::GenerationReady`].
    pub fn generate(&mut self) -> bool {
        let Some(ticket) = self.state.begin_generation() else {
            return false;
        };

        info!(
            token = ticket.token,
            platform = ticket.request.platform.as_str(),
            tone = ticket.request.tone.as_str(),
            mood = ticket.request.mood.as_str(),
            "✨ Generating captions..."
        );

        let delay = self.settings.generation_delay;
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let captions = generate_captions(&ticket.request);
            if tx
                .send(StudioEvent::GenerationReady { ticket, captions })
                .await
                .is_err()
            {
                debug!("Studio dropped before generation finished");
            }
        });

        true
    }

    /// Copies the caption text. Failures are logged and otherwise ignored.
    pub fn copy(&mut self, id: &str) -> bool {
        let Some(caption) = self.state.caption(id) else {
            debug!(id, "No caption to copy");
            return false;
        };
        let text = caption.text.clone();

        if let Err(err) = self.clipboard.write_text(&text) {
            error!("Failed to copy text: {}", err);
            return false;
        }

        self.state.mark_copied(id);

        let delay = self.settings.copied_indicator;
        let tx = self.events_tx.clone();
        let id = id.to_string();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send(StudioEvent::CopiedExpired(id)).await;
        });

        true
    }

    pub async fn next_event(&mut self) -> Option<StudioEvent> {
        self.events_rx.recv().await
    }

    pub fn apply(&mut self, event: StudioEvent) -> StudioUpdate {
        match event {
            StudioEvent::GenerationReady { ticket, captions } => {
                let previous: Vec<String> = self
                    .state
                    .captions()
                    .iter()
                    .map(|caption| caption.text.clone())
                    .collect();
                let record =
                    GenerationRecord::new(ticket.token, ticket.request.clone(), &previous, &captions);

                let outcome = self.state.complete_generation(
                    &ticket,
                    captions,
                    now_millis(),
                    self.settings.drop_stale_generations,
                );
                match outcome {
                    GenerationOutcome::Committed => {
                        info!("✅ {} captions ready", self.state.captions().len());
                        record_generation(&record);
                    }
                    GenerationOutcome::DroppedStale => {
                        info!("Inputs changed while generating; batch discarded");
                    }
                    GenerationOutcome::Ignored => {}
                }
                StudioUpdate::Generation(outcome)
            }
            StudioEvent::CopiedExpired(id) => StudioUpdate::CopiedCleared(self.state.clear_copied(&id)),
        }
    }

    /// Waits for the next timer completion and applies it.
    pub async fn pump(&mut self) -> Option<StudioUpdate> {
        let event = self.next_event().await?;
        Some(self.apply(event))
    }
}

fn now_millis() -> i128 {
    OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clipboard::ClipboardError;

    #[derive(Default)]
    struct MemoryClipboard {
        writes: Vec<String>,
    }

    impl ClipboardSink for MemoryClipboard {
        fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
            self.writes.push(text.to_string());
            Ok(())
        }
    }

    struct BrokenClipboard;

    impl ClipboardSink for BrokenClipboard {
        fn write_text(&mut self, _text: &str) -> Result<(), ClipboardError> {
            Err(ClipboardError::Unavailable("no display".into()))
        }
    }

    #[tokio::test(start_paused = true)]
    async fn generation_waits_for_delay() {
        let mut studio = CaptionStudio::new(&Config::default(), MemoryClipboard::default());
        studio.state_mut().set_description("Sunset at the beach");
        assert!(studio.generate());
        assert!(studio.state().is_generating());
        assert!(!studio.generate());

        tokio::time::advance(Duration::from_millis(2400)).await;
        assert!(studio.events_rx.try_recv().is_err());

        let update = studio.pump().await;
        assert_eq!(update, Some(StudioUpdate::Generation(GenerationOutcome::Committed)));
        assert!(!studio.state().is_generating());
        assert_eq!(studio.state().captions().len(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn copy_indicator_expires() {
        let mut studio = CaptionStudio::new(&Config::default(), MemoryClipboard::default());
        studio.state_mut().set_description("Sunset");
        studio.generate();
        studio.pump().await;

        let id = studio.state().captions()[0].id.clone();
        assert!(studio.copy(&id));
        assert_eq!(studio.state().copied_id(), Some(id.as_str()));
        assert_eq!(studio.clipboard().writes, vec![studio.state().captions()[0].text.clone()]);

        let update = studio.pump().await;
        assert_eq!(update, Some(StudioUpdate::CopiedCleared(true)));
        assert_eq!(studio.state().copied_id(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn clipboard_failure_is_swallowed() {
        let mut studio = CaptionStudio::new(&Config::default(), BrokenClipboard);
        studio.state_mut().set_description("Sunset");
        studio.generate();
        studio.pump().await;

        let id = studio.state().captions()[0].id.clone();
        assert!(!studio.copy(&id));
        assert_eq!(studio.state().copied_id(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn settings_follow_config_updates() {
        let mut studio = CaptionStudio::new(&Config::default(), MemoryClipboard::default());
        let config = Config {
            generation_delay_ms: 10,
            drop_stale_generations: true,
            ..Config::default()
        };
        studio.apply_settings(&config);
        assert_eq!(studio.settings().generation_delay, Duration::from_millis(10));

        studio.state_mut().set_description("Sunset");
        studio.generate();
        studio.state_mut().set_description("Changed");
        assert_eq!(
            studio.pump().await,
            Some(StudioUpdate::Generation(GenerationOutcome::DroppedStale))
        );
        assert!(studio.state().captions().is_empty());
    }
}
