//! Terminal presentation of the form and the caption cards.

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, Color, ContentArrangement, Table};
use owo_colors::OwoColorize;

use crate::catalog::{Mood, Platform, Tone};
use crate::session::{trim_input, Caption, SessionState, MAX_RATING};
use crate::templates::{platform_hashtags, tone_emojis};

const DESCRIPTION_PREVIEW_CHARS: usize = 60;

pub fn render_form(state: &SessionState, use_color: bool) -> String {
    let platform = state.platform();
    let options = state.options();
    let mut lines = Vec::new();

    let summary = state.summary();
    let description = if trim_input(state.description()).is_empty() {
        "(empty)".to_string()
    } else {
        preview(state.description())
    };
    lines.push(format!("Description : {description}"));

    let image = match state.image() {
        Some(image) => format!("{} ({}, {} bytes)", image.name, image.media_type, image.size_bytes),
        None if state.is_drag_active() => "drop your file here...".to_string(),
        None => "none (JPG, PNG, GIF up to 10MB)".to_string(),
    };
    lines.push(format!("Image       : {image}"));

    lines.push(format!(
        "Platform    : {} {}  (Max {} characters for {})",
        platform.info().icon,
        platform.label(),
        platform.max_length(),
        summary.platform_label
    ));
    lines.push(format!("Tone        : {}", state.tone().label()));
    lines.push(format!("Mood        : {}", state.mood()));
    lines.push(format!(
        "Options     : hashtags {} | emojis {} | call-to-action {}",
        on_off(options.hashtags),
        on_off(options.emojis),
        on_off(options.call_to_action)
    ));

    let status = if state.is_generating() {
        "generating..."
    } else if state.can_generate() {
        "ready"
    } else {
        "add a description or an image"
    };
    lines.push(format!(
        "Captions    : {} generated, {} saved ({status})",
        summary.caption_count, summary.saved_count
    ));

    let body = lines.join("\n");
    if use_color {
        body.bold().to_string()
    } else {
        body
    }
}

pub fn render_captions(state: &SessionState, use_color: bool) -> String {
    if state.captions().is_empty() {
        return "No captions yet. Use 'generate' to create some.".to_string();
    }

    // Length limits follow the platform the batch was written for.
    let platform = state.batch_platform().unwrap_or(state.platform());
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["#", "Caption", "Length", "Rating", "Saved"]);
    if !use_color {
        table.force_no_tty();
    }

    for (index, caption) in state.captions().iter().enumerate() {
        let copied = state.copied_id() == Some(caption.id.as_str());
        table.add_row(vec![
            Cell::new(index + 1),
            caption_cell(caption, copied),
            length_cell(caption, platform),
            Cell::new(stars(caption.rating)),
            if caption.saved {
                Cell::new("★").fg(Color::Yellow)
            } else {
                Cell::new("☆")
            },
        ]);
    }

    table.to_string()
}

fn caption_cell(caption: &Caption, copied: bool) -> Cell {
    if copied {
        Cell::new(format!("{}\n\n✔ Copied to clipboard!", caption.text))
    } else {
        Cell::new(&caption.text)
    }
}

fn length_cell(caption: &Caption, platform: Platform) -> Cell {
    let text = format!("{} characters", caption.char_count());
    if caption.exceeds_limit(platform) {
        Cell::new(format!("{text}\nover {} limit", platform.label())).fg(Color::Red)
    } else {
        Cell::new(text)
    }
}

pub fn stars(rating: u8) -> String {
    (1..=MAX_RATING)
        .map(|star| if star <= rating { '★' } else { '☆' })
        .collect()
}

pub fn render_options() -> String {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_header(vec!["Kind", "Id", "Label", "Details"]);

    for platform in Platform::ALL {
        let info = platform.info();
        table.add_row(vec![
            "platform".to_string(),
            info.id.to_string(),
            format!("{} {}", info.icon, info.label),
            format!("max {} chars | {}", info.max_length, platform_hashtags(platform)),
        ]);
    }
    for tone in Tone::ALL {
        let info = tone.info();
        table.add_row(vec![
            "tone".to_string(),
            info.id.to_string(),
            info.label.to_string(),
            format!("{} {}", info.icon, tone_emojis(tone)),
        ]);
    }
    for mood in Mood::ALL {
        let info = mood.info();
        table.add_row(vec![
            "mood".to_string(),
            info.id.to_string(),
            info.label.to_string(),
            info.emoji.to_string(),
        ]);
    }

    table.to_string()
}

fn on_off(value: bool) -> &'static str {
    if value {
        "on"
    } else {
        "off"
    }
}

fn preview(value: &str) -> String {
    let flattened = value.trim().replace('\n', " ⏎ ");
    let mut shown: String = flattened.chars().take(DESCRIPTION_PREVIEW_CHARS).collect();
    if flattened.chars().count() > DESCRIPTION_PREVIEW_CHARS {
        shown.push_str("...");
    }
    shown
}
