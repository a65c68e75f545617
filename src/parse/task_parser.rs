use std::sync::LazyLock;

use indexmap::IndexSet;
use regex::Regex;

/// Separator between tasks in a single `add`
pub const SEGMENT_DELIMITER: char = ';';

static LEADING_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(!{1,3})\s+(.*)$").expect("leading marker regex"));
static TRAILING_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.*?)\s+(!{1,3})$").expect("trailing marker regex"));
static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"@\w+").expect("tag regex"));

/// Split raw `add` input on `;`, trimming and dropping empty segments
pub fn split_segments(raw: &str) -> Vec<String> {
    raw.split(SEGMENT_DELIMITER)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Strip a leading or trailing priority marker.
///
/// A marker is 1-3 `!` at the very start or end of the text, separated from
/// the rest by whitespace. A leading marker wins when both are present.
/// Returns the remaining text and the marker length (0 when absent).
pub fn parse_priority(text: &str) -> (String, u8) {
    let text = text.trim();
    if let Some(caps) = LEADING_MARKER.captures(text) {
        let level = caps[1].len() as u8;
        return (caps[2].trim().to_string(), level);
    }
    if let Some(caps) = TRAILING_MARKER.captures(text) {
        let level = caps[2].len() as u8;
        return (caps[1].trim().to_string(), level);
    }
    (text.to_string(), 0)
}

/// Every `@word` token in `text`, in order of appearance
pub fn find_tags(text: &str) -> Vec<&str> {
    TAG.find_iter(text).map(|m| m.as_str()).collect()
}

/// Split `text` into runs, flagging the runs that are `@tag` tokens
pub fn split_tags(text: &str) -> Vec<(&str, bool)> {
    let mut runs = Vec::new();
    let mut last = 0;
    for m in TAG.find_iter(text) {
        if m.start() > last {
            runs.push((&text[last..m.start()], false));
        }
        runs.push((m.as_str(), true));
        last = m.end();
    }
    if last < text.len() {
        runs.push((&text[last..], false));
    }
    runs
}

/// Distinct tags across many texts
pub fn distinct_tags<'a>(texts: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut seen = IndexSet::new();
    for text in texts {
        for tag in find_tags(text) {
            seen.insert(tag.to_string());
        }
    }
    seen.into_iter().collect()
}

/// First `max` characters of `s`, on a char boundary
pub fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
