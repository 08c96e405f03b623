//! Emphasis markup for entity mentions inside a summary.

use std::collections::HashSet;

use regex::{Captures, Regex};
use tracing::warn;

use crate::nlp::ner::{strip_continuation, TaggedSpan};

/// Wrap every whole-word mention of a tagged entity in `**_..._**`.
///
/// Matching is case-insensitive and the original casing in `text` is kept.
/// Longer entity texts win when candidates overlap, and the replacement runs in
/// one pass so markup never nests.
pub fn highlight(text: &str, spans: &[TaggedSpan]) -> String {
    let mut seen = HashSet::new();
    let mut terms: Vec<&str> = spans
        .iter()
        .map(|span| strip_continuation(&span.text).trim())
        .filter(|term| !term.is_empty())
        .filter(|term| seen.insert(term.to_lowercase()))
        .collect();
    if terms.is_empty() {
        return text.to_string();
    }
    terms.sort_by(|a, b| b.len().cmp(&a.len()).then(a.cmp(b)));

    let alternation = terms
        .iter()
        .map(|term| regex::escape(term))
        .collect::<Vec<_>>()
        .join("|");
    let pattern = match Regex::new(&format!(r"(?i)\b(?:{alternation})\b")) {
        Ok(pattern) => pattern,
        Err(err) => {
            warn!(%err, "could not build highlight pattern; returning text unchanged");
            return text.to_string();
        }
    };
    pattern
        .replace_all(text, |caps: &Captures| format!("**_{}_**", &caps[0]))
        .into_owned()
}
