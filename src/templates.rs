//! Caption template engine.
//!
//! Captions are built by interpolating the description into a fixed set of
//! lead-in templates and decorating them with the mood emoji, the tone emoji
//! strip, a platform call-to-action and the platform hashtags.

use serde::{Deserialize, Serialize};

use crate::catalog::{Mood, Platform, Tone};
use crate::session::trim_input;

/// Number of captions handed back per generation.
pub const CAPTION_BATCH_SIZE: usize = 4;

/// Phrase used when the description is empty (e.g. only an image was given).
pub const FALLBACK_PHRASE: &str = "Sharing this amazing moment";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatOptions {
    pub hashtags: bool,
    pub emojis: bool,
    pub call_to_action: bool,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            hashtags: true,
            emojis: true,
            call_to_action: false,
        }
    }
}

/// Everything the engine needs to build a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptionRequest {
    pub description: String,
    pub platform: Platform,
    pub tone: Tone,
    pub mood: Mood,
    pub options: FormatOptions,
}

pub fn tone_emojis(tone: Tone) -> &'static str {
    match tone {
        Tone::Professional => "💼✨📈",
        Tone::Funny => "😂🤣😄",
        Tone::Motivational => "💪🔥⚡",
        Tone::Romantic => "💕❤️🌹",
        Tone::Casual => "😊🌟👋",
    }
}

pub fn platform_hashtags(platform: Platform) -> &'static str {
    match platform {
        Platform::Instagram => {
            "#photooftheday #instagood #love #beautiful #happy #lifestyle #memories"
        }
        Platform::Twitter => "#TwitterUpdate #SocialMedia #Content #Trending",
        Platform::LinkedIn => "#Professional #Career #Business #Growth #Success #Leadership",
        Platform::Facebook => "#Friends #Family #Memories #Life #Grateful #Community",
        Platform::TikTok => "#viral #fyp #trending #content #creative #fun",
    }
}

pub fn platform_call_to_action(platform: Platform) -> &'static str {
    match platform {
        Platform::Instagram => "Double tap if you agree! 💖",
        Platform::Twitter => "What do you think? Let me know! 👇",
        Platform::LinkedIn => "What are your thoughts on this? Share in the comments.",
        Platform::Facebook => "Tag someone who needs to see this! 👇",
        Platform::TikTok => "Follow for more content like this! ✨",
    }
}

struct Decorations<'a> {
    mood_emoji: &'a str,
    emojis: &'a str,
    call_to_action: &'a str,
    hashtags: &'a str,
}

impl Decorations<'_> {
    fn wrap(&self, lead: &str) -> String {
        let caption = format!(
            "{lead} {} {}\n\n{}\n\n{}",
            self.mood_emoji, self.emojis, self.call_to_action, self.hashtags
        );
        trim_input(&caption).to_string()
    }
}

/// Builds a batch of captions. Deterministic for a given request.
///
/// Five templates are rendered and the batch is cut down to
/// [`CAPTION_BATCH_SIZE`]; the last template never reaches the user.
pub fn generate_captions(request: &CaptionRequest) -> Vec<String> {
    let options = request.options;
    let decorations = Decorations {
        mood_emoji: request.mood.emoji(),
        emojis: if options.emojis {
            tone_emojis(request.tone)
        } else {
            ""
        },
        call_to_action: if options.call_to_action {
            platform_call_to_action(request.platform)
        } else {
            ""
        },
        hashtags: if options.hashtags {
            platform_hashtags(request.platform)
        } else {
            ""
        },
    };

    let trimmed = trim_input(&request.description);
    let base = if trimmed.is_empty() {
        FALLBACK_PHRASE
    } else {
        trimmed
    };
    let base_lower = base.to_lowercase();
    let mood_lower = request.mood.label().to_lowercase();

    let leads = [
        base.to_string(),
        format!("Feeling {mood_lower} about this: {base_lower}"),
        format!("{base}... and I'm absolutely loving every second of it!"),
        format!("When life gives you moments like this: {base_lower}"),
        format!("Just had to share this {mood_lower} moment: {base_lower}"),
    ];

    let mut captions: Vec<String> = leads.iter().map(|lead| decorations.wrap(lead)).collect();
    captions.truncate(CAPTION_BATCH_SIZE);
    captions
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(description: &str) -> CaptionRequest {
        CaptionRequest {
            description: description.to_string(),
            platform: Platform::Twitter,
            tone: Tone::Casual,
            mood: Mood::Excited,
            options: FormatOptions::default(),
        }
    }

    #[test]
    fn sunset_scenario_matches_expected_text() {
        let captions = generate_captions(&request("Sunset at the beach"));
        assert_eq!(captions.len(), 4);
        assert_eq!(
            captions[0],
            "Sunset at the beach 🎉 😊🌟👋\n\n\n\n#TwitterUpdate #SocialMedia #Content #Trending"
        );
        assert_eq!(
            captions[1],
            "Feeling excited about this: sunset at the beach 🎉 😊🌟👋\n\n\n\n#TwitterUpdate #SocialMedia #Content #Trending"
        );
        assert!(captions[2].starts_with(
            "Sunset at the beach... and I'm absolutely loving every second of it! 🎉"
        ));
        assert!(captions[3].starts_with("When life gives you moments like this: sunset at the beach"));
    }

    #[test]
    fn fifth_template_is_dropped() {
        let captions = generate_captions(&request("Road trip"));
        assert!(captions
            .iter()
            .all(|caption| !caption.starts_with("Just had to share this")));
    }

    #[test]
    fn every_combination_yields_four_non_empty_captions() {
        for platform in Platform::ALL {
            for tone in Tone::ALL {
                for mood in Mood::ALL {
                    for bits in 0..8u8 {
                        let request = CaptionRequest {
                            description: "Coffee with friends".into(),
                            platform,
                            tone,
                            mood,
                            options: FormatOptions {
                                hashtags: bits & 1 != 0,
                                emojis: bits & 2 != 0,
                                call_to_action: bits & 4 != 0,
                            },
                        };
                        let captions = generate_captions(&request);
                        assert_eq!(captions.len(), CAPTION_BATCH_SIZE);
                        assert!(captions.iter().all(|c| !c.trim().is_empty()));
                        assert_eq!(captions, generate_captions(&request));
                    }
                }
            }
        }
    }

    #[test]
    fn hashtag_flag_controls_platform_tags() {
        let mut with_tags = request("Launch day");
        with_tags.platform = Platform::LinkedIn;
        let tags = platform_hashtags(Platform::LinkedIn);
        assert!(generate_captions(&with_tags)
            .iter()
            .all(|caption| caption.ends_with(tags)));

        let mut without_tags = with_tags.clone();
        without_tags.options.hashtags = false;
        assert!(generate_captions(&without_tags)
            .iter()
            .all(|caption| !caption.contains(tags) && !caption.contains('#')));
    }

    #[test]
    fn call_to_action_sits_between_blank_lines() {
        let mut req = request("New video");
        req.platform = Platform::TikTok;
        req.options.call_to_action = true;
        let captions = generate_captions(&req);
        assert!(captions[0].contains("\n\nFollow for more content like this! ✨\n\n#viral"));
    }

    #[test]
    fn empty_description_uses_fallback_phrase() {
        let mut req = request("   ");
        req.options = FormatOptions {
            hashtags: false,
            emojis: false,
            call_to_action: false,
        };
        let captions = generate_captions(&req);
        assert_eq!(captions[0], "Sharing this amazing moment 🎉");
        assert_eq!(
            captions[1],
            "Feeling excited about this: sharing this amazing moment 🎉"
        );
    }

    #[test]
    fn byte_order_mark_description_uses_fallback_phrase() {
        let captions = generate_captions(&request("\u{FEFF}"));
        assert!(captions[0].starts_with("Sharing this amazing moment 🎉"));
    }

    #[test]
    fn description_is_trimmed_before_interpolation() {
        let captions = generate_captions(&request("  Morning run \n"));
        assert!(captions[0].starts_with("Morning run 🎉"));
    }
}
