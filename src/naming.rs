//! Filename rules: sanitizing free-form text into a safe file name and
//! rejecting names that are unsafe to create.
//!
//! # Examples
//!
//! ```
//! use tidyname::naming::{is_valid, sanitize};
//!
//! assert_eq!(sanitize("Bad*Name?.txt"), "Bad_Name_.txt");
//! assert!(is_valid("Hello.txt"));
//! assert!(!is_valid(" bad.txt"));
//! ```

use regex::Regex;
use std::sync::LazyLock;

/// Longest file name accepted by [`is_valid`], in characters.
pub const MAX_NAME_LEN: usize = 255;

static UNSAFE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9._-]+").expect("static regex"));
static UNDERSCORE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"_{2,}").expect("static regex"));
static PUNCTUATION_ONLY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[._-]+$").expect("static regex"));
static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s{2,}").expect("static regex"));

/// Turns a free-form string into a filesystem-safe file name.
///
/// Leading and trailing whitespace is trimmed, every run of characters outside
/// ASCII letters, digits, `.`, `_` and `-` becomes a single `_`, and repeated
/// underscores collapse into one. The result is idempotent.
pub fn sanitize(name: &str) -> String {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return String::new();
    }
    let replaced = UNSAFE_RUN.replace_all(trimmed, "_");
    UNDERSCORE_RUN.replace_all(&replaced, "_").into_owned()
}

/// Conservative safety check for a candidate file name.
///
/// Rejects empty names, names longer than [`MAX_NAME_LEN`] characters, names
/// with surrounding whitespace, names containing `/` or `"`, names made only of
/// `.`, `_` and `-`, and names with two or more consecutive whitespace characters.
pub fn is_valid(name: &str) -> bool {
    if name.is_empty() || name.chars().count() > MAX_NAME_LEN {
        return false;
    }
    if name.trim() != name {
        return false;
    }
    if name.contains(['/', '"']) {
        return false;
    }
    if PUNCTUATION_ONLY.is_match(name) {
        return false;
    }
    !WHITESPACE_RUN.is_match(name)
}

/// Upper-cases the first letter of every word and lower-cases the rest.
///
/// A word starts at any letter that does not follow another letter, so
/// `"2nd take"` becomes `"2Nd Take"`.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_word = false;
    for ch in text.chars() {
        if ch.is_alphabetic() {
            if in_word {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(ch);
            in_word = false;
        }
    }
    out
}
