use std::path::PathBuf;

use thiserror::Error;

use crate::catalog::{CatalogError, Mood, Platform, Tone};
use crate::session::{MAX_RATING, MIN_RATING};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("unknown command '{0}' (try 'help')")]
    Unknown(String),
    #[error("'{command}' needs {expected}")]
    MissingArgument {
        command: &'static str,
        expected: &'static str,
    },
    #[error("expected a caption number, got '{0}'")]
    InvalidCaptionNumber(String),
    #[error("expected a rating between {min} and {max}, got '{0}'", min = MIN_RATING, max = MAX_RATING)]
    InvalidRating(String),
    #[error("expected 'on' or 'off', got '{0}'")]
    InvalidSwitch(String),
    #[error("expected 'enter', 'over' or 'leave', got '{0}'")]
    InvalidDrag(String),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatToggle {
    Hashtags,
    Emojis,
    CallToAction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragPhase {
    Enter,
    Over,
    Leave,
}

/// One line of interactive input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Describe(String),
    ClearDescription,
    Image(PathBuf),
    Drop(PathBuf),
    Drag(DragPhase),
    RemoveImage,
    Platform(Platform),
    Tone(Tone),
    Mood(Mood),
    /// `None` flips the current value.
    Format(FormatToggle, Option<bool>),
    Generate,
    /// Caption numbers are 1-based positions in the current batch.
    Rate { number: usize, rating: u8 },
    Save(usize),
    Copy(usize),
    Show,
    Options,
    Help,
    Quit,
}

impl Command {
    pub fn parse(line: &str) -> Result<Option<Self>, CommandError> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }

        let (keyword, rest) = match line.split_once(char::is_whitespace) {
            Some((keyword, rest)) => (keyword, rest.trim()),
            None => (line, ""),
        };

        let command = match keyword.to_ascii_lowercase().as_str() {
            "describe" | "d" => {
                if rest.is_empty() {
                    return Err(CommandError::MissingArgument {
                        command: "describe",
                        expected: "some text",
                    });
                }
                Command::Describe(rest.to_string())
            }
            "clear-description" | "clear" => Command::ClearDescription,
            "image" | "upload" => Command::Image(path_argument("image", rest)?),
            "drop" => Command::Drop(path_argument("drop", rest)?),
            "drag" => Command::Drag(match rest.to_ascii_lowercase().as_str() {
                "enter" => DragPhase::Enter,
                "over" => DragPhase::Over,
                "leave" => DragPhase::Leave,
                "" => {
                    return Err(CommandError::MissingArgument {
                        command: "drag",
                        expected: "enter, over or leave",
                    })
                }
                _ => return Err(CommandError::InvalidDrag(rest.to_string())),
            }),
            "remove-image" => Command::RemoveImage,
            "platform" | "p" => Command::Platform(required("platform", "a platform", rest)?.parse()?),
            "tone" | "t" => Command::Tone(required("tone", "a tone", rest)?.parse()?),
            "mood" | "m" => Command::Mood(required("mood", "a mood", rest)?.parse()?),
            "hashtags" => Command::Format(FormatToggle::Hashtags, switch(rest)?),
            "emojis" => Command::Format(FormatToggle::Emojis, switch(rest)?),
            "cta" => Command::Format(FormatToggle::CallToAction, switch(rest)?),
            "generate" | "g" => Command::Generate,
            "rate" | "r" => {
                let mut parts = rest.split_whitespace();
                let number = caption_number(parts.next().unwrap_or(""), "rate")?;
                let raw = parts.next().ok_or(CommandError::MissingArgument {
                    command: "rate",
                    expected: "a caption number and a rating",
                })?;
                let rating = raw
                    .parse::<u8>()
                    .ok()
                    .filter(|value| (MIN_RATING..=MAX_RATING).contains(value))
                    .ok_or_else(|| CommandError::InvalidRating(raw.to_string()))?;
                Command::Rate { number, rating }
            }
            "save" | "star" | "s" => Command::Save(caption_number(rest, "save")?),
            "copy" | "c" => Command::Copy(caption_number(rest, "copy")?),
            "show" | "ls" => Command::Show,
            "options" => Command::Options,
            "help" | "?" => Command::Help,
            "quit" | "exit" | "q" => Command::Quit,
            other => return Err(CommandError::Unknown(other.to_string())),
        };

        Ok(Some(command))
    }
}

fn required<'a>(
    command: &'static str,
    expected: &'static str,
    rest: &'a str,
) -> Result<&'a str, CommandError> {
    if rest.is_empty() {
        Err(CommandError::MissingArgument { command, expected })
    } else {
        Ok(rest)
    }
}

fn path_argument(command: &'static str, rest: &str) -> Result<PathBuf, CommandError> {
    let raw = required(command, "a file path", rest)?;
    let unquoted = raw
        .strip_prefix('"')
        .and_then(|value| value.strip_suffix('"'))
        .unwrap_or(raw);
    Ok(PathBuf::from(unquoted))
}

fn switch(rest: &str) -> Result<Option<bool>, CommandError> {
    match rest.to_ascii_lowercase().as_str() {
        "" => Ok(None),
        "on" | "yes" | "true" => Ok(Some(true)),
        "off" | "no" | "false" => Ok(Some(false)),
        _ => Err(CommandError::InvalidSwitch(rest.to_string())),
    }
}

fn caption_number(raw: &str, command: &'static str) -> Result<usize, CommandError> {
    if raw.is_empty() {
        return Err(CommandError::MissingArgument {
            command,
            expected: "a caption number",
        });
    }
    raw.parse::<usize>()
        .ok()
        .filter(|number| *number >= 1)
        .ok_or_else(|| CommandError::InvalidCaptionNumber(raw.to_string()))
}

pub const HELP: &str = "\
describe <text>          set the content description
clear                    clear the description
image <path>             upload an image (non-images are ignored)
drag enter|over|leave    simulate dragging a file over the drop zone
drop <path>              drop a file onto the drop zone
remove-image             forget the uploaded image
platform <id>            instagram, twitter, linkedin, facebook, tiktok
tone <id>                professional, funny, motivational, romantic, casual
mood <id>                excited, grateful, adventurous, peaceful, confident, nostalgic
hashtags|emojis|cta [on|off]  set or flip a format option
generate                 create a new batch of captions
rate <n> <1-5>           rate caption n
save <n>                 star or unstar caption n
copy <n>                 copy caption n to the clipboard
show                     show the form and the current captions
options                  list platforms, tones and moods
quit                     exit";
