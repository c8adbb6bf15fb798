//! Shared UTF-8-safe truncation helpers.
//!
//! Tool output shown in the terminal is previewed, not dumped. Cuts count
//! characters so they never land inside a multi-byte sequence.

/// Default preview budget for tool output, in characters.
pub const PREVIEW_CHARS: usize = 500;

/// Keep the first `max_chars` characters and note how many were dropped.
pub fn preview(text: &str, max_chars: usize) -> String {
    let total = text.chars().count();
    if total <= max_chars {
        return text.to_string();
    }
    let prefix: String = text.chars().take(max_chars).collect();
    format!(
        "{}\n… +{} chars truncated",
        prefix.trim_end_matches('\n'),
        total - max_chars
    )
}

/// Flatten to one line and clip to `max_chars`, for headers and prompts.
pub fn single_line(text: &str, max_chars: usize) -> String {
    let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= max_chars {
        return flat;
    }
    let prefix: String = flat.chars().take(max_chars.saturating_sub(1)).collect();
    format!("{prefix}…")
}
