use std::time::Duration;

use captioncraft::clipboard::{ClipboardError, ClipboardSink};
use captioncraft::image::ImageFile;
use captioncraft::session::GenerationOutcome;
use captioncraft::studio::StudioUpdate;
use captioncraft::templates::platform_hashtags;
use captioncraft::{CaptionStudio, Config, Mood, Platform, Tone};

#[derive(Default)]
struct RecordingClipboard {
    last: Option<String>,
}

impl ClipboardSink for RecordingClipboard {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        self.last = Some(text.to_string());
        Ok(())
    }
}

fn studio() -> CaptionStudio<RecordingClipboard> {
    CaptionStudio::new(&Config::default(), RecordingClipboard::default())
}

#[tokio::test(start_paused = true)]
async fn sunset_at_the_beach_end_to_end() {
    let mut studio = studio();
    {
        let state = studio.state_mut();
        state.set_description("Sunset at the beach");
        state.set_platform(Platform::Twitter);
        state.set_tone(Tone::Casual);
        state.set_mood(Mood::Excited);
        state.set_include_hashtags(true);
        state.set_include_emojis(true);
        state.set_include_cta(false);
    }

    assert!(studio.generate());
    assert_eq!(
        studio.pump().await,
        Some(StudioUpdate::Generation(GenerationOutcome::Committed))
    );

    let captions = studio.state().captions();
    assert_eq!(captions.len(), 4);
    assert_eq!(
        captions[0].text,
        "Sunset at the beach 🎉 😊🌟👋\n\n\n\n#TwitterUpdate #SocialMedia #Content #Trending"
    );
    assert!(captions.iter().all(|c| c.rating == 0 && !c.saved));
}

#[tokio::test(start_paused = true)]
async fn generation_commits_inputs_captured_at_start() {
    let mut studio = studio();
    studio.state_mut().set_description("Morning coffee");
    assert!(studio.generate());

    tokio::time::advance(Duration::from_millis(1000)).await;
    studio.state_mut().set_platform(Platform::TikTok);
    studio.state_mut().set_description("Evening tea");
    assert!(!studio.generate());

    studio.pump().await;
    let first = &studio.state().captions()[0].text;
    assert!(first.starts_with("Morning coffee"));
    assert!(first.ends_with(platform_hashtags(Platform::Instagram)));
}

#[tokio::test(start_paused = true)]
async fn image_only_generation_uses_fallback_phrase() {
    let mut studio = studio();
    assert!(!studio.generate());

    let png = ImageFile::new("shot.png", Some("image/png"), vec![0x89, b'P', b'N', b'G']);
    assert!(studio.state_mut().select_image(&png));
    assert!(studio.generate());
    studio.pump().await;

    assert!(studio.state().captions()[0]
        .text
        .starts_with("Sharing this amazing moment"));
}

#[tokio::test(start_paused = true)]
async fn rate_save_and_copy_flow() {
    let mut studio = studio();
    studio.state_mut().set_description("Product launch");
    studio.generate();
    studio.pump().await;

    let id = studio.state().captions()[3].id.clone();
    assert!(studio.state_mut().rate(&id, 3));
    assert!(studio.state_mut().rate(&id, 5));
    assert!(!studio.state_mut().rate("caption-unknown", 2));
    assert_eq!(studio.state().caption(&id).map(|c| c.rating), Some(5));

    assert_eq!(studio.state_mut().toggle_saved(&id), Some(true));
    assert_eq!(studio.state().saved_count(), 1);

    assert!(studio.copy(&id));
    assert_eq!(studio.state().copied_id(), Some(id.as_str()));
    assert_eq!(
        studio.clipboard().last.as_deref(),
        studio.state().caption(&id).map(|c| c.text.as_str())
    );

    tokio::time::advance(Duration::from_millis(1999)).await;
    assert!(
        tokio::time::timeout(Duration::ZERO, studio.next_event())
            .await
            .is_err(),
        "copied indicator expired early"
    );
    assert_eq!(studio.state().copied_id(), Some(id.as_str()));

    assert_eq!(studio.pump().await, Some(StudioUpdate::CopiedCleared(true)));
    assert_eq!(studio.state().copied_id(), None);
}

#[tokio::test(start_paused = true)]
async fn regenerating_replaces_the_whole_batch() {
    let mut studio = studio();
    studio.state_mut().set_description("Hiking trip");
    studio.generate();
    studio.pump().await;
    let first_ids: Vec<String> = studio
        .state()
        .captions()
        .iter()
        .map(|c| c.id.clone())
        .collect();

    tokio::time::advance(Duration::from_millis(5)).await;
    studio.state_mut().set_mood(Mood::Adventurous);
    assert!(studio.generate());
    studio.state_mut().rate(&first_ids[0], 4);
    studio.pump().await;

    let captions = studio.state().captions();
    assert_eq!(captions.len(), 4);
    assert!(captions.iter().all(|c| c.rating == 0));
    assert!(captions[1].text.starts_with("Feeling adventurous about this: hiking trip 🌟"));
}
