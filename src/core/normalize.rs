//! core::normalize
//!
//! Text canonicalization into the supported alphabet.
//!
//! # Rules
//!
//! - Input is uppercased
//! - With replacement, unsupported characters become spaces, whitespace runs
//!   collapse to one space, and the ends are trimmed
//! - Without replacement, unsupported characters are deleted outright
//!
//! Neither mode fails; empty input yields an empty string.

use crate::core::types::is_supported;

/// Normalize raw text into the supported alphabet.
///
/// # Example
///
/// ```
/// use qbc::core::normalize::normalize;
///
/// assert_eq!(normalize("Hello, World! 123", true), "HELLO WORLD");
/// assert_eq!(normalize("Hello, World!", false), "HELLO WORLD");
/// assert_eq!(normalize("a-b", false), "AB");
/// ```
pub fn normalize(text: &str, replace_unsupported: bool) -> String {
    let upper = text.to_uppercase();

    if !replace_unsupported {
        return upper.chars().filter(|&c| is_supported(c)).collect();
    }

    upper
        .chars()
        .map(|c| if is_supported(c) { c } else { ' ' })
        .collect::<String>()
        .split(' ')
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Returns true if `text` consists only of `A`-`Z` and spaces.
///
/// The empty string is valid.
pub fn is_valid_text(text: &str) -> bool {
    text.chars().all(is_supported)
}
