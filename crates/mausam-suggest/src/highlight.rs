use std::ops::Range;

/// Byte range of the first case-insensitive occurrence of `query` in `text`.
///
/// Comparison is char by char so the range always falls on char boundaries
/// of `text`, even when lowercasing changes byte lengths.
pub fn match_span(text: &str, query: &str) -> Option<Range<usize>> {
    if query.is_empty() {
        return None;
    }

    let needle: Vec<char> = query.chars().collect();

    for (start, _) in text.char_indices() {
        let mut end = start;
        let mut matched = 0;

        for (c, q) in text[start..].chars().zip(needle.iter()) {
            if !c.to_lowercase().eq(q.to_lowercase()) {
                break;
            }
            end += c.len_utf8();
            matched += 1;
        }

        if matched == needle.len() {
            return Some(start..end);
        }
    }

    None
}
