//! Interpolation placeholder detection
//!
//! ARB messages embed placeholders such as `{name}` or `{count}` that the Flutter
//! formatter substitutes at runtime. Machine translation tends to translate, reorder or
//! re-space them, so any message carrying one is kept verbatim.

use regex::Regex;
use std::sync::LazyLock;

static PLACEHOLDER_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    // Literal pattern, cannot fail to compile
    Regex::new(r"\{(\w+)\}").unwrap()
});

/// Returns true iff `text` contains at least one `{word}` placeholder.
pub fn contains_placeholder(text: &str) -> bool {
    PLACEHOLDER_PATTERN.is_match(text)
}

/// Names of all placeholders in `text`, in order of appearance.
pub fn placeholders(text: &str) -> Vec<&str> {
    PLACEHOLDER_PATTERN
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str())
        .collect()
}
