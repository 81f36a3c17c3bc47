pub mod catalog;
pub mod clipboard;
pub mod command;
pub mod config;
pub mod image;
pub mod logging;
pub mod render;
pub mod session;
pub mod studio;
pub mod templates;

pub use catalog::{Mood, Platform, Tone};
pub use config::{Config, ConfigManager};
pub use session::{Caption, SessionState};
pub use studio::CaptionStudio;
pub use templates::{generate_captions, CaptionRequest, FormatOptions};
