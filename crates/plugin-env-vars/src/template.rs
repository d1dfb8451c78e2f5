//! `{{name}}` placeholder interpolation.

use regex::Captures;

use petitorium_core::types::PLACEHOLDER;

/// Result of interpolating one string.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Interpolated {
    /// Text with every resolvable placeholder replaced.
    pub text: String,
    /// Number of placeholders replaced.
    pub replaced: usize,
}

/// Replaces each `{{name}}` whose name `lookup` resolves; unknown
/// placeholders are left in place.
pub fn interpolate<F>(input: &str, lookup: F) -> Interpolated
where
    F: Fn(&str) -> Option<String>,
{
    let mut replaced = 0;
    let text = PLACEHOLDER
        .replace_all(input, |caps: &Captures<'_>| match lookup(&caps[1]) {
            Some(value) => {
                replaced += 1;
                value
            }
            None => caps[0].to_string(),
        })
        .into_owned();

    Interpolated { text, replaced }
}
