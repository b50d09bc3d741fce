//! Markdown code fence extraction.

const FENCE: &str = "```";
const JSON_FENCE: &str = "```json";

/// Body of the first ```` ```json ```` block, trimmed.
///
/// An unclosed block runs to the end of the text.
pub fn json_block(text: &str) -> Option<&str> {
    block_after(text, JSON_FENCE)
}

/// Whether `text` carries a ```` ```json ```` marker at all.
pub fn has_json_block(text: &str) -> bool {
    text.contains(JSON_FENCE)
}

/// Body of the first ```` ``` ```` block of any kind, trimmed.
pub fn any_block(text: &str) -> Option<&str> {
    block_after(text, FENCE)
}

fn block_after<'a>(text: &'a str, opener: &str) -> Option<&'a str> {
    let start = text.find(opener)? + opener.len();
    let rest = &text[start..];
    let body = match rest.find(FENCE) {
        Some(end) => &rest[..end],
        None => rest,
    };
    Some(body.trim())
}
