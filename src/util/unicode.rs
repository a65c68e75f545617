use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Width of `s` in terminal cells
pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Right-pad `s` with spaces to `cells` terminal cells
pub fn pad_to_width(s: &str, cells: usize) -> String {
    let width = display_width(s);
    let mut out = s.to_string();
    if width < cells {
        out.push_str(&" ".repeat(cells - width));
    }
    out
}

/// Byte offset of the grapheme boundary after `offset`, if any
pub fn next_grapheme_boundary(s: &str, offset: usize) -> Option<usize> {
    let rest = s.get(offset..)?;
    rest.graphemes(true).next().map(|g| offset + g.len())
}

/// Byte offset of the grapheme boundary before `offset`, if any
pub fn prev_grapheme_boundary(s: &str, offset: usize) -> Option<usize> {
    let head = s.get(..offset)?;
    head.graphemes(true).next_back().map(|g| offset - g.len())
}

/// Start of the whitespace-delimited word left of `offset`
pub fn word_start_before(s: &str, offset: usize) -> usize {
    let head = &s[..offset.min(s.len())];
    let trimmed = head.trim_end();
    match trimmed.rfind(char::is_whitespace) {
        Some(i) => i + trimmed[i..].chars().next().map_or(1, char::len_utf8),
        None => 0,
    }
}

/// Terminal column of a byte offset
pub fn column_of(s: &str, offset: usize) -> usize {
    display_width(&s[..offset.min(s.len())])
}
