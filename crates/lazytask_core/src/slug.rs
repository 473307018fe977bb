//! Identifier derivation from human-entered text.
//!
//! # Responsibility
//! - Turn project names and task titles into URL-safe slugs.
//! - Keep key derivation pure so repositories can recompute ids.
//!
//! # Invariants
//! - Output only contains `[a-z0-9]` and single `-` separators.
//! - Output never starts or ends with `-`.
//! - `slugify(slugify(x)) == slugify(x)`.
//! - No uniqueness guarantee: different texts may collide.

use once_cell::sync::Lazy;
use regex::Regex;

/// Separator inserted between alphanumeric runs.
pub const SLUG_SEPARATOR: char = '-';

static NON_ALNUM_RUN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-z0-9]+").expect("valid slug separator regex"));

/// Derives a slug from free text.
///
/// Lowercases, trims, collapses every run of non-alphanumeric characters
/// into one separator and strips separators at both ends. Returns an empty
/// string when the text has no ASCII alphanumeric content.
pub fn slugify(text: &str) -> String {
    let lowered = text.trim().to_lowercase();
    let replaced = NON_ALNUM_RUN_RE.replace_all(&lowered, "-");
    replaced.trim_matches(SLUG_SEPARATOR).to_string()
}
