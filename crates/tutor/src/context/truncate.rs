//! Token estimation and truncation.
//!
//! Uses a character-based heuristic: ~4 characters per token. Truncation is
//! deliberately naive (no word or line boundaries) so its cost is a single
//! scan of the input.

use std::borrow::Cow;

/// Characters per token used by every budget in the pipeline.
pub const CHARS_PER_TOKEN: usize = 4;

/// Appended to any text that was cut.
pub const TRUNCATION_MARKER: &str = "\n... (truncated)";

/// Estimate the token count for a string.
///
/// Heuristic: 1 token ≈ 4 characters. Rounds up.
pub fn estimate_tokens(text: &str) -> usize {
    text.chars().count().div_ceil(CHARS_PER_TOKEN)
}

/// Clip `text` to roughly `max_tokens` tokens.
///
/// Text of at most `max_tokens * 4` characters is returned as-is (borrowed).
/// Longer text keeps its first `max_tokens * 4` characters followed by
/// [`TRUNCATION_MARKER`]. Cuts always fall on a `char` boundary.
pub fn truncate_to_tokens(text: &str, max_tokens: usize) -> Cow<'_, str> {
    let max_chars = max_tokens.saturating_mul(CHARS_PER_TOKEN);
    match text.char_indices().nth(max_chars) {
        None => Cow::Borrowed(text),
        Some((cut, _)) => Cow::Owned(format!("{}{}", &text[..cut], TRUNCATION_MARKER)),
    }
}
