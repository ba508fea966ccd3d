//! Text cleanup for exercise descriptions.
//!
//! Catalog descriptions arrive as HTML fragments. These helpers turn them
//! into short plain-text previews.

use std::sync::OnceLock;

use regex::Regex;

fn block_tag_regex() -> &'static Regex {
    static BLOCK: OnceLock<Regex> = OnceLock::new();
    BLOCK.get_or_init(|| {
        Regex::new(r"(?i)</?(?:p|br|li|ul|ol|div|h[1-6]|tr|td)\b[^>]*>")
            .expect("block tag pattern is valid")
    })
}

fn any_tag_regex() -> &'static Regex {
    static TAG: OnceLock<Regex> = OnceLock::new();
    TAG.get_or_init(|| Regex::new(r"<[^>]*>").expect("tag pattern is valid"))
}

/// Remove markup from `input`, leaving readable plain text.
///
/// Block-level tags become word breaks, inline tags vanish, the common
/// character entities are decoded and runs of whitespace collapse to a
/// single space.
#[must_use]
pub fn strip_markup(input: &str) -> String {
    let spaced = block_tag_regex().replace_all(input, " ");
    let bare = any_tag_regex().replace_all(&spaced, "");
    let decoded = decode_entities(&bare);
    decoded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Truncate `text` to at most `max_chars` characters, appending `...` when cut.
#[must_use]
pub fn preview(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let cut: String = text.chars().take(max_chars).collect();
    format!("{}...", cut.trim_end())
}

/// [`strip_markup`] followed by [`preview`].
#[must_use]
pub fn description_preview(raw: &str, max_chars: usize) -> String {
    preview(&strip_markup(raw), max_chars)
}

fn decode_entities(text: &str) -> String {
    // `&amp;` last so "&amp;lt;" decodes to "&lt;" rather than "<".
    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}
