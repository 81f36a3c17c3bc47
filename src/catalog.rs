//! Static option tables for the caption form: target platforms, tones and moods.
//!
//! Every selection is an enum variant backed by a constant record, so lookups
//! can never miss. Parsing user-supplied identifiers is the only place an
//! unknown value can show up, and it surfaces as a [`CatalogError`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("unknown platform '{0}' (expected one of: {list})", list = Platform::identifiers())]
    UnknownPlatform(String),
    #[error("unknown tone '{0}' (expected one of: {list})", list = Tone::identifiers())]
    UnknownTone(String),
    #[error("unknown mood '{0}' (expected one of: {list})", list = Mood::identifiers())]
    UnknownMood(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlatformInfo {
    pub id: &'static str,
    pub label: &'static str,
    pub color: &'static str,
    pub icon: &'static str,
    pub max_length: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    #[default]
    Instagram,
    Twitter,
    LinkedIn,
    Facebook,
    TikTok,
}

impl Platform {
    pub const ALL: [Platform; 5] = [
        Platform::Instagram,
        Platform::Twitter,
        Platform::LinkedIn,
        Platform::Facebook,
        Platform::TikTok,
    ];

    pub const fn info(self) -> PlatformInfo {
        match self {
            Platform::Instagram => PlatformInfo {
                id: "instagram",
                label: "Instagram",
                color: "from-purple-500 to-pink-500",
                icon: "📸",
                max_length: 2200,
            },
            Platform::Twitter => PlatformInfo {
                id: "twitter",
                label: "Twitter",
                color: "from-blue-400 to-blue-600",
                icon: "🐦",
                max_length: 280,
            },
            Platform::LinkedIn => PlatformInfo {
                id: "linkedin",
                label: "LinkedIn",
                color: "from-blue-600 to-blue-800",
                icon: "💼",
                max_length: 3000,
            },
            Platform::Facebook => PlatformInfo {
                id: "facebook",
                label: "Facebook",
                color: "from-blue-500 to-blue-700",
                icon: "👥",
                max_length: 63206,
            },
            Platform::TikTok => PlatformInfo {
                id: "tiktok",
                label: "TikTok",
                color: "from-black to-gray-800",
                icon: "🎵",
                max_length: 300,
            },
        }
    }

    pub fn as_str(self) -> &'static str {
        self.info().id
    }

    pub fn label(self) -> &'static str {
        self.info().label
    }

    pub fn max_length(self) -> usize {
        self.info().max_length
    }

    fn identifiers() -> String {
        Self::ALL.map(Self::as_str).join(", ")
    }
}

impl FromStr for Platform {
    type Err = CatalogError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let needle = raw.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|platform| platform.as_str() == needle)
            .ok_or_else(|| CatalogError::UnknownPlatform(raw.trim().to_string()))
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToneInfo {
    pub id: &'static str,
    pub label: &'static str,
    /// Name of the icon shown next to the tone button.
    pub icon: &'static str,
    pub color: &'static str,
    pub background: &'static str,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Professional,
    Funny,
    Motivational,
    Romantic,
    // The form opens on "casual" even though it is listed last.
    #[default]
    Casual,
}

impl Tone {
    pub const ALL: [Tone; 5] = [
        Tone::Professional,
        Tone::Funny,
        Tone::Motivational,
        Tone::Romantic,
        Tone::Casual,
    ];

    pub const fn info(self) -> ToneInfo {
        match self {
            Tone::Professional => ToneInfo {
                id: "professional",
                label: "Professional",
                icon: "Briefcase",
                color: "text-blue-600",
                background: "bg-blue-50",
            },
            Tone::Funny => ToneInfo {
                id: "funny",
                label: "Funny",
                icon: "Laugh",
                color: "text-yellow-500",
                background: "bg-yellow-50",
            },
            Tone::Motivational => ToneInfo {
                id: "motivational",
                label: "Motivational",
                icon: "Zap",
                color: "text-orange-500",
                background: "bg-orange-50",
            },
            Tone::Romantic => ToneInfo {
                id: "romantic",
                label: "Romantic",
                icon: "Heart",
                color: "text-red-500",
                background: "bg-red-50",
            },
            Tone::Casual => ToneInfo {
                id: "casual",
                label: "Casual",
                icon: "Users",
                color: "text-green-500",
                background: "bg-green-50",
            },
        }
    }

    pub fn as_str(self) -> &'static str {
        self.info().id
    }

    pub fn label(self) -> &'static str {
        self.info().label
    }

    fn identifiers() -> String {
        Self::ALL.map(Self::as_str).join(", ")
    }
}

impl FromStr for Tone {
    type Err = CatalogError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let needle = raw.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|tone| tone.as_str() == needle)
            .ok_or_else(|| CatalogError::UnknownTone(raw.trim().to_string()))
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoodInfo {
    pub id: &'static str,
    pub label: &'static str,
    pub emoji: &'static str,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    #[default]
    Excited,
    Grateful,
    Adventurous,
    Peaceful,
    Confident,
    Nostalgic,
}

impl Mood {
    pub const ALL: [Mood; 6] = [
        Mood::Excited,
        Mood::Grateful,
        Mood::Adventurous,
        Mood::Peaceful,
        Mood::Confident,
        Mood::Nostalgic,
    ];

    pub const fn info(self) -> MoodInfo {
        match self {
            Mood::Excited => MoodInfo {
                id: "excited",
                label: "Excited",
                emoji: "🎉",
            },
            Mood::Grateful => MoodInfo {
                id: "grateful",
                label: "Grateful",
                emoji: "🙏",
            },
            Mood::Adventurous => MoodInfo {
                id: "adventurous",
                label: "Adventurous",
                emoji: "🌟",
            },
            Mood::Peaceful => MoodInfo {
                id: "peaceful",
                label: "Peaceful",
                emoji: "🧘",
            },
            Mood::Confident => MoodInfo {
                id: "confident",
                label: "Confident",
                emoji: "💪",
            },
            Mood::Nostalgic => MoodInfo {
                id: "nostalgic",
                label: "Nostalgic",
                emoji: "💭",
            },
        }
    }

    pub fn as_str(self) -> &'static str {
        self.info().id
    }

    pub fn label(self) -> &'static str {
        self.info().label
    }

    pub fn emoji(self) -> &'static str {
        self.info().emoji
    }

    fn identifiers() -> String {
        Self::ALL.map(Self::as_str).join(", ")
    }
}

impl FromStr for Mood {
    type Err = CatalogError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let needle = raw.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|mood| mood.as_str() == needle)
            .ok_or_else(|| CatalogError::UnknownMood(raw.trim().to_string()))
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.emoji(), self.label())
    }
}
