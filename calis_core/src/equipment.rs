//! Equipment tag resolution.
//!
//! User-facing equipment input is free-form; the catalog speaks a small
//! fixed tag vocabulary. This module normalizes and maps the former onto
//! the latter, dropping anything unmapped with a diagnostic rather than
//! letting an unknown string silently filter out every exercise.

use std::collections::HashSet;

/// Tags the catalog is allowed to reference. "none" is the bodyweight
/// marker and never appears in a user's set.
pub const KNOWN_TAGS: &[&str] = [
    "pull_up_bar",
    "low_bar",
    "bench",
    "wall",
    "parallettes",
]
.as_slice();

/// Map one free-form equipment name to a catalog tag.
///
/// Input is lowercased with spaces and hyphens collapsed to underscores
/// before matching, so "Pull-up Bar" and "pullup bar" both resolve.
fn resolve_tag(input: &str) -> Option<&'static str> {
    let normalized: String = input
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| if c == ' ' || c == '-' { '_' } else { c })
        .collect();

    let tag = match normalized.as_str() {
        "pull_up_bar" | "pullup_bar" | "bar" | "chin_up_bar" | "chinup_bar" => "pull_up_bar",
        "low_bar" | "table" | "smith_bar" => "low_bar",
        "bench" | "chair" | "box" | "step" => "bench",
        "wall" => "wall",
        "parallettes" | "paralettes" | "dip_bars" | "push_up_handles" => "parallettes",
        _ => return None,
    };
    Some(tag)
}

/// Resolve a user's equipment list into the catalog tag vocabulary.
///
/// Unmapped entries are dropped with a warning; duplicates collapse. An
/// empty result is valid and means bodyweight-only exercises.
pub fn resolve(inputs: &[String]) -> HashSet<String> {
    let mut tags = HashSet::new();
    for input in inputs {
        match resolve_tag(input) {
            Some(tag) => {
                tags.insert(tag.to_string());
            }
            None => {
                tracing::warn!("Ignoring unrecognized equipment '{}'", input);
            }
        }
    }
    tags
}
