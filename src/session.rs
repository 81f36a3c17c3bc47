//! Form state and the transitions driven by user actions.
//!
//! [`SessionState`] is a plain value; every user action is a method that
//! mutates it in place and reports whether anything happened. Timers live in
//! [`crate::studio`], which feeds their results back through
//! [`SessionState::complete_generation`] and [`SessionState::clear_copied`].

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::catalog::{Mood, Platform, Tone};
use crate::image::{ImageFile, UploadedImage};
use crate::templates::{CaptionRequest, FormatOptions, CAPTION_BATCH_SIZE};

pub const MIN_RATING: u8 = 1;
pub const MAX_RATING: u8 = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Caption {
    pub id: String,
    pub text: String,
    /// 0 while unrated, otherwise 1..=5.
    pub rating: u8,
    pub saved: bool,
}

impl Caption {
    fn fresh(id: String, text: String) -> Self {
        Self {
            id,
            text,
            rating: 0,
            saved: false,
        }
    }

    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    pub fn exceeds_limit(&self, platform: Platform) -> bool {
        self.char_count() > platform.max_length()
    }
}

/// Issued when a generation starts. Carries the inputs as they were at that
/// moment; the committed captions are built from this snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationTicket {
    pub token: u64,
    pub request: CaptionRequest,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationOutcome {
    Committed,
    /// Inputs changed while the batch was pending and stale results are dropped.
    DroppedStale,
    /// The ticket does not belong to the pending generation.
    Ignored,
}

/// Sidebar stats for the current form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSummary {
    pub platform_label: &'static str,
    pub caption_count: usize,
    pub saved_count: usize,
}

/// Trims whitespace and byte-order marks, which `str::trim` keeps.
pub fn trim_input(text: &str) -> &str {
    text.trim_matches(|c: char| c.is_whitespace() || c == '\u{FEFF}')
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    description: String,
    platform: Platform,
    tone: Tone,
    mood: Mood,
    options: FormatOptions,
    image: Option<UploadedImage>,
    drag_active: bool,
    pending_token: Option<u64>,
    next_token: u64,
    captions: Vec<Caption>,
    batch_platform: Option<Platform>,
    copied_id: Option<String>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new(
            Platform::default(),
            Tone::default(),
            Mood::default(),
            FormatOptions::default(),
        )
    }
}

impl SessionState {
    pub fn new(platform: Platform, tone: Tone, mood: Mood, options: FormatOptions) -> Self {
        Self {
            description: String::new(),
            platform,
            tone,
            mood,
            options,
            image: None,
            drag_active: false,
            pending_token: None,
            next_token: 1,
            captions: Vec::new(),
            batch_platform: None,
            copied_id: None,
        }
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    pub fn tone(&self) -> Tone {
        self.tone
    }

    pub fn mood(&self) -> Mood {
        self.mood
    }

    pub fn options(&self) -> FormatOptions {
        self.options
    }

    pub fn image(&self) -> Option<&UploadedImage> {
        self.image.as_ref()
    }

    pub fn is_drag_active(&self) -> bool {
        self.drag_active
    }

    pub fn is_generating(&self) -> bool {
        self.pending_token.is_some()
    }

    pub fn captions(&self) -> &[Caption] {
        &self.captions
    }

    pub fn caption(&self, id: &str) -> Option<&Caption> {
        self.captions.iter().find(|caption| caption.id == id)
    }

    /// Platform the current batch was generated for.
    pub fn batch_platform(&self) -> Option<Platform> {
        self.batch_platform
    }

    pub fn copied_id(&self) -> Option<&str> {
        self.copied_id.as_deref()
    }

    pub fn saved_count(&self) -> usize {
        self.captions.iter().filter(|caption| caption.saved).count()
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            platform_label: self.platform.label(),
            caption_count: self.captions.len(),
            saved_count: self.saved_count(),
        }
    }

    pub fn set_description(&mut self, text: impl Into<String>) {
        self.description = text.into();
    }

    /// Stores the file as the uploaded image if it is an image. Anything else
    /// is ignored and the current image is kept.
    pub fn select_image(&mut self, file: &ImageFile) -> bool {
        match UploadedImage::from_file(file) {
            Some(image) => {
                debug!(
                    name = %image.name,
                    media_type = %image.media_type,
                    bytes = image.size_bytes,
                    "Image selected"
                );
                self.image = Some(image);
                true
            }
            None => {
                debug!(
                    name = %file.name,
                    media_type = file.media_type.as_deref().unwrap_or("unknown"),
                    "Ignoring non-image file"
                );
                false
            }
        }
    }

    pub fn remove_image(&mut self) {
        self.image = None;
    }

    pub fn drag_enter(&mut self) {
        self.drag_active = true;
    }

    pub fn drag_over(&mut self) {
        self.drag_active = true;
    }

    pub fn drag_leave(&mut self) {
        self.drag_active = false;
    }

    pub fn drop_file(&mut self, file: &ImageFile) -> bool {
        self.drag_active = false;
        self.select_image(file)
    }

    pub fn set_platform(&mut self, platform: Platform) {
        self.platform = platform;
    }

    pub fn set_tone(&mut self, tone: Tone) {
        self.tone = tone;
    }

    pub fn set_mood(&mut self, mood: Mood) {
        self.mood = mood;
    }

    pub fn set_include_hashtags(&mut self, enabled: bool) {
        self.options.hashtags = enabled;
    }

    pub fn set_include_emojis(&mut self, enabled: bool) {
        self.options.emojis = enabled;
    }

    pub fn set_include_cta(&mut self, enabled: bool) {
        self.options.call_to_action = enabled;
    }

    pub fn toggle_hashtags(&mut self) -> bool {
        self.options.hashtags = !self.options.hashtags;
        self.options.hashtags
    }

    pub fn toggle_emojis(&mut self) -> bool {
        self.options.emojis = !self.options.emojis;
        self.options.emojis
    }

    pub fn toggle_cta(&mut self) -> bool {
        self.options.call_to_action = !self.options.call_to_action;
        self.options.call_to_action
    }

    pub fn has_input(&self) -> bool {
        !trim_input(&self.description).is_empty() || self.image.is_some()
    }

    pub fn can_generate(&self) -> bool {
        self.has_input() && !self.is_generating()
    }

    /// Snapshot of the current inputs in the shape the engine takes.
    pub fn request(&self) -> CaptionRequest {
        CaptionRequest {
            description: self.description.clone(),
            platform: self.platform,
            tone: self.tone,
            mood: self.mood,
            options: self.options,
        }
    }

    pub fn begin_generation(&mut self) -> Option<GenerationTicket> {
        if self.is_generating() {
            debug!("Generation already in progress; ignoring request");
            return None;
        }
        if !self.has_input() {
            debug!("Nothing to caption yet; ignoring request");
            return None;
        }

        let token = self.next_token;
        self.next_token += 1;
        self.pending_token = Some(token);

        Some(GenerationTicket {
            token,
            request: self.request(),
        })
    }

    /// Replaces the caption list with the finished batch.
    ///
    /// Ids are `caption-<issued_at_millis>-<index>`. When `drop_stale` is set
    /// and the inputs no longer match the ticket snapshot, the batch is thrown
    /// away instead.
    pub fn complete_generation(
        &mut self,
        ticket: &GenerationTicket,
        texts: Vec<String>,
        issued_at_millis: i128,
        drop_stale: bool,
    ) -> GenerationOutcome {
        if self.pending_token != Some(ticket.token) {
            warn!(token = ticket.token, "Ignoring completion for unknown generation");
            return GenerationOutcome::Ignored;
        }
        self.pending_token = None;

        if drop_stale && self.request() != ticket.request {
            debug!(token = ticket.token, "Inputs changed during generation; dropping batch");
            return GenerationOutcome::DroppedStale;
        }

        debug_assert_eq!(texts.len(), CAPTION_BATCH_SIZE);
        self.captions = texts
            .into_iter()
            .enumerate()
            .map(|(index, text)| {
                Caption::fresh(format!("caption-{issued_at_millis}-{index}"), text)
            })
            .collect();
        self.batch_platform = Some(ticket.request.platform);

        GenerationOutcome::Committed
    }

    /// Sets the rating of the caption with `id`. Unknown ids and ratings
    /// outside 1..=5 leave the list untouched.
    pub fn rate(&mut self, id: &str, rating: u8) -> bool {
        if !(MIN_RATING..=MAX_RATING).contains(&rating) {
            warn!(rating, "Rating out of range; expected {MIN_RATING}-{MAX_RATING}");
            return false;
        }
        match self.captions.iter_mut().find(|caption| caption.id == id) {
            Some(caption) => {
                caption.rating = rating;
                true
            }
            None => false,
        }
    }

    pub fn toggle_saved(&mut self, id: &str) -> Option<bool> {
        let caption = self.captions.iter_mut().find(|caption| caption.id == id)?;
        caption.saved = !caption.saved;
        Some(caption.saved)
    }

    pub fn mark_copied(&mut self, id: &str) {
        self.copied_id = Some(id.to_string());
    }

    /// Expires the "just copied" marker, but only if it still names `id`.
    pub fn clear_copied(&mut self, id: &str) -> bool {
        if self.copied_id.as_deref() == Some(id) {
            self.copied_id = None;
            true
        } else {
            false
        }
    }
}
