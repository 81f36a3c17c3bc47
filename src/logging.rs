use owo_colors::OwoColorize;
use serde::{Deserialize, Serialize};
use similar::{ChangeTag, TextDiff};
use std::fmt;
use time::{format_description::FormatItem, macros::format_description, OffsetDateTime};
use tracing::{Level, Subscriber};
use tracing_subscriber::{
    fmt::{format::Writer, FmtContext, FormatEvent, FormatFields},
    registry::LookupSpan,
};

use crate::templates::CaptionRequest;

const GENERATION_TARGET: &str = "captioncraft::generation";
const MAX_DIFF_CHARS: usize = 2048;
const PREVIEW_CHAR_LIMIT: usize = 160;
const TARGET_GUTTER_WIDTH: usize = 28;
const TIMESTAMP_FORMAT: &[FormatItem<'_>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");

/// Debug snapshot of one finished generation: the inputs it was built from
/// and each caption next to the one it replaced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRecord {
    pub token: u64,
    pub request: CaptionRequest,
    pub captions: Vec<CaptionChange>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptionChange {
    pub previous: Option<String>,
    pub current: String,
}

impl GenerationRecord {
    pub fn new(token: u64, request: CaptionRequest, previous: &[String], current: &[String]) -> Self {
        let captions = current
            .iter()
            .enumerate()
            .map(|(index, text)| CaptionChange {
                previous: previous.get(index).cloned(),
                current: text.clone(),
            })
            .collect();
        Self {
            token,
            request,
            captions,
        }
    }

    pub fn changed_captions(&self) -> usize {
        self.captions
            .iter()
            .filter(|change| change.previous.as_deref() != Some(change.current.as_str()))
            .count()
    }

    pub fn render_pretty(&self, use_color: bool) -> String {
        let request = &self.request;
        let mut lines = Vec::new();
        lines.push(format!(
            "┌─ Generation #{} (captions: {}, changed: {})",
            self.token,
            self.captions.len(),
            self.changed_captions()
        ));
        push_body_line(
            &mut lines,
            format!(
                "IN  : {} | {} | {} | hashtags={} emojis={} cta={}",
                request.platform.as_str(),
                request.tone.as_str(),
                request.mood.as_str(),
                request.options.hashtags,
                request.options.emojis,
                request.options.call_to_action
            ),
        );
        push_body_line(
            &mut lines,
            format!("DESC: {}", preview_value(&request.description, use_color)),
        );

        for (index, change) in self.captions.iter().enumerate() {
            for line in change.render_lines(index + 1, use_color) {
                push_body_line(&mut lines, line);
            }
        }

        lines.push("└─".to_string());
        lines.join("\n")
    }
}

impl CaptionChange {
    fn render_lines(&self, number: usize, use_color: bool) -> Vec<String> {
        let mut lines = Vec::new();
        match self.previous.as_deref() {
            None => {
                lines.push(format!("• #{number} (new)"));
                lines.push(format!("  + {}", preview_value(&self.current, use_color)));
            }
            Some(previous) if previous == self.current => {
                lines.push(format!("• #{number} (unchanged)"));
            }
            Some(previous) => {
                lines.push(format!("• #{number} (changed)"));
                match inline_diff(previous, &self.current, use_color) {
                    Some(diff_lines) => {
                        for diff in diff_lines {
                            lines.push(format!("  {}", diff));
                        }
                    }
                    None => {
                        lines.push(format!("  - {}", preview_value(previous, use_color)));
                        lines.push(format!("  + {}", preview_value(&self.current, use_color)));
                    }
                }
            }
        }
        lines
    }
}

fn inline_diff(before: &str, after: &str, use_color: bool) -> Option<Vec<String>> {
    if before.len() + after.len() > MAX_DIFF_CHARS {
        return None;
    }

    let diff = TextDiff::from_words(before, after);
    let mut removed = String::new();
    let mut added = String::new();
    let mut has_delete = false;
    let mut has_insert = false;

    for change in diff.iter_all_changes() {
        let escaped = escape_fragment(change.value());
        match change.tag() {
            ChangeTag::Delete => {
                has_delete = true;
                removed.push_str(&stylize(escaped.clone(), use_color, DiffStyle::Delete));
            }
            ChangeTag::Insert => {
                has_insert = true;
                added.push_str(&stylize(escaped.clone(), use_color, DiffStyle::Insert));
            }
            ChangeTag::Equal => {
                removed.push_str(&stylize(escaped.clone(), use_color, DiffStyle::Context));
                added.push_str(&stylize(escaped, use_color, DiffStyle::Context));
            }
        }
    }

    if !has_delete && !has_insert {
        return None;
    }

    let mut lines = Vec::new();
    if has_delete {
        lines.push(format!("- {}", removed));
    }
    if has_insert {
        lines.push(format!("+ {}", added));
    }

    Some(lines)
}

#[derive(Debug, Clone, Copy)]
enum DiffStyle {
    Delete,
    Insert,
    Context,
}

fn stylize(fragment: String, use_color: bool, style: DiffStyle) -> String {
    if !use_color {
        return fragment;
    }

    match style {
        DiffStyle::Delete => fragment.red().to_string(),
        DiffStyle::Insert => fragment.green().to_string(),
        DiffStyle::Context => fragment.dimmed().to_string(),
    }
}

fn escape_fragment(value: &str) -> String {
    let mut rendered = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '\n' => rendered.push('⏎'),
            '\t' => rendered.push('⇥'),
            '\r' => rendered.push('␍'),
            c if c.is_control() => rendered.push_str(&format!("\\u{{{:04X}}}", c as u32)),
            c => rendered.push(c),
        }
    }
    rendered
}

fn push_body_line(lines: &mut Vec<String>, content: String) {
    lines.push(format!("│ {}", content));
}

fn preview_value(value: &str, use_color: bool) -> String {
    let mut preview: String = value.chars().take(PREVIEW_CHAR_LIMIT).collect();
    if value.chars().count() > PREVIEW_CHAR_LIMIT {
        preview.push_str("...");
    }
    let escaped = escape_fragment(&preview);
    if use_color {
        escaped.cyan().to_string()
    } else {
        escaped
    }
}

#[derive(Debug, Default)]
struct GenerationEventVisitor {
    record_json: Option<String>,
}

impl tracing::field::Visit for GenerationEventVisitor {
    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "record_json" {
            self.record_json = Some(value.to_string());
        }
    }

    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn fmt::Debug) {
        if field.name() == "record_json" && self.record_json.is_none() {
            self.record_json = Some(format!("{value:?}"));
        }
    }
}

/// Log line layout: dimmed timestamp, colored level, fixed-width target gutter.
/// Generation records get rendered as a box below their log line.
#[derive(Default)]
pub struct StudioFormatter;

impl StudioFormatter {
    pub fn new() -> Self {
        Self
    }
}

impl<S, N> FormatEvent<S, N> for StudioFormatter
where
    S: Subscriber + for<'lookup> LookupSpan<'lookup>,
    N: for<'writer> FormatFields<'writer> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &tracing::Event<'_>,
    ) -> fmt::Result {
        let metadata = event.metadata();
        let use_color = writer.has_ansi_escapes();

        write_prefix(&mut writer, metadata, use_color)?;

        if metadata.target() == GENERATION_TARGET {
            let mut visitor = GenerationEventVisitor::default();
            event.record(&mut visitor);
            writer.write_str("generation finished\n")?;
            if let Some(json) = visitor.record_json {
                match serde_json::from_str::<GenerationRecord>(&json) {
                    Ok(record) => {
                        writer.write_str(&record.render_pretty(use_color))?;
                        writer.write_char('\n')?;
                    }
                    Err(err) => {
                        writer.write_str("│ Failed to render generation record: ")?;
                        writer.write_str(&err.to_string())?;
                        writer.write_char('\n')?;
                    }
                }
            }
            return Ok(());
        }

        ctx.format_fields(writer.by_ref(), event)?;
        writer.write_char('\n')
    }
}

pub fn record_generation(record: &GenerationRecord) {
    if !tracing::enabled!(target: GENERATION_TARGET, Level::DEBUG) {
        return;
    }
    match serde_json::to_string(record) {
        Ok(json) => {
            tracing::event!(
                target: GENERATION_TARGET,
                Level::DEBUG,
                record_json = json.as_str(),
                token = record.token,
                changed = record.changed_captions(),
                "generation finished"
            );
        }
        Err(err) => {
            tracing::event!(
                target: GENERATION_TARGET,
                Level::DEBUG,
                "generation finished (serialization failure: {err})"
            );
        }
    }
}

fn write_prefix(
    writer: &mut Writer<'_>,
    metadata: &tracing::Metadata<'_>,
    use_color: bool,
) -> fmt::Result {
    let timestamp_plain = format_timestamp();
    let timestamp_display = if use_color {
        timestamp_plain.as_str().dimmed().to_string()
    } else {
        timestamp_plain
    };
    writer.write_str(&timestamp_display)?;

    let level_plain = format!("{:>5}", metadata.level());
    let level_display = if use_color {
        color_level(&level_plain, *metadata.level())
    } else {
        level_plain
    };
    writer.write_char(' ')?;
    writer.write_str(&level_display)?;
    writer.write_char(' ')?;

    let target_text = format!("{:<width$}", metadata.target(), width = TARGET_GUTTER_WIDTH);
    let target_text = if use_color {
        target_text.blue().dimmed().to_string()
    } else {
        target_text
    };
    writer.write_str(&target_text)?;
    writer.write_str(": ")?;

    Ok(())
}

fn color_level(text: &str, level: Level) -> String {
    match level {
        Level::ERROR => text.red().bold().to_string(),
        Level::WARN => text.yellow().bold().to_string(),
        Level::INFO => text.green().to_string(),
        Level::DEBUG => text.cyan().to_string(),
        Level::TRACE => text.dimmed().to_string(),
    }
}

fn format_timestamp() -> String {
    let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
    now.format(&TIMESTAMP_FORMAT)
        .unwrap_or_else(|_| "0000-00-00 00:00:00".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Mood, Platform, Tone};
    use crate::templates::FormatOptions;

    fn request() -> CaptionRequest {
        CaptionRequest {
            description: "Sunset\nat the beach".into(),
            platform: Platform::Twitter,
            tone: Tone::Casual,
            mood: Mood::Excited,
            options: FormatOptions::default(),
        }
    }

    #[test]
    fn first_batch_renders_as_new() {
        let current = vec!["one".to_string(), "two".to_string()];
        let record = GenerationRecord::new(1, request(), &[], &current);
        assert_eq!(record.changed_captions(), 2);

        let rendered = record.render_pretty(false);
        assert!(rendered.starts_with("┌─ Generation #1 (captions: 2, changed: 2)"));
        assert!(rendered.contains("│ DESC: Sunset⏎at the beach"));
        assert!(rendered.contains("│ • #1 (new)"));
        assert!(rendered.contains("│   + two"));
        assert!(rendered.ends_with("└─"));
    }

    #[test]
    fn regenerated_batch_shows_word_diff() {
        let previous = vec!["Sunset at the beach".to_string(), "same".to_string()];
        let current = vec!["Sunrise at the beach".to_string(), "same".to_string()];
        let record = GenerationRecord::new(2, request(), &previous, &current);
        assert_eq!(record.changed_captions(), 1);

        let rendered = record.render_pretty(false);
        assert!(rendered.contains("• #1 (changed)"));
        assert!(rendered.contains("- Sunset at the beach"));
        assert!(rendered.contains("+ Sunrise at the beach"));
        assert!(rendered.contains("• #2 (unchanged)"));
    }

    #[test]
    fn record_survives_json_round_trip() {
        let record = GenerationRecord::new(3, request(), &[], &["a".to_string()]);
        let json = serde_json::to_string(&record).expect("serialize");
        let parsed: GenerationRecord = serde_json::from_str(&json).expect("parse");
        assert_eq!(parsed.render_pretty(false), record.render_pretty(false));
    }

    #[test]
    fn preview_truncates_long_values() {
        let long = "x".repeat(PREVIEW_CHAR_LIMIT + 10);
        let preview = preview_value(&long, false);
        assert!(preview.ends_with("..."));
        assert_eq!(preview.chars().count(), PREVIEW_CHAR_LIMIT + 3);
    }
}
