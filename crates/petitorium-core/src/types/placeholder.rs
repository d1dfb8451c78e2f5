//! `{{name}}` template placeholders.
//!
//! A placeholder is any non-blank text between `{{` and `}}` that contains
//! no brace; surrounding whitespace is not part of the name. Substitution
//! and leftover detection both use [`PLACEHOLDER`], so a placeholder that
//! cannot be substituted is always reported.

use std::sync::LazyLock;

use regex::Regex;

/// Matches one placeholder; capture group 1 is the trimmed name.
pub static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{\s*([^{}\s][^{}]*?)\s*\}\}").expect("placeholder pattern is valid")
});

/// Returns the placeholder names in `text`, in order of appearance.
pub fn placeholder_names(text: &str) -> impl Iterator<Item = &str> {
    PLACEHOLDER
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|name| name.as_str())
}
