//! Reassembles drug-name phrases from tagged spans.
//!
//! Spans from a whole-span backend carry no offsets and each one stands alone.
//! Spans from a sub-token backend carry offsets, and fragments whose start lies
//! within one character of the previous fragment's end are glued into the same
//! phrase. The grouper never looks at which backend produced a span, only at
//! whether offsets are present.

use std::collections::HashSet;

use indexmap::IndexSet;
use serde::Serialize;
use tracing::debug;

use crate::nlp::ner::{strip_continuation, TaggedSpan};

const DEFAULT_DRUG_LABELS: &[&str] = &["chemical", "drug", "medication", "treatment"];

/// Labels considered drug-like, matched case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrugLabelSet {
    labels: HashSet<String>,
}

impl DrugLabelSet {
    /// Build a label set from arbitrary label strings. Blank entries are ignored.
    pub fn from_labels<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let labels = labels
            .into_iter()
            .map(|label| label.as_ref().trim().to_lowercase())
            .filter(|label| !label.is_empty())
            .collect();
        Self { labels }
    }

    pub fn contains(&self, label: &str) -> bool {
        self.labels.contains(&label.trim().to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

impl Default for DrugLabelSet {
    fn default() -> Self {
        Self::from_labels(DEFAULT_DRUG_LABELS)
    }
}

/// Unique, lower-cased drug phrases in order of first appearance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DrugNameSet(IndexSet<String>);

impl DrugNameSet {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn into_vec(self) -> Vec<String> {
        self.0.into_iter().collect()
    }
}

impl<'a> IntoIterator for &'a DrugNameSet {
    type Item = &'a String;
    type IntoIter = indexmap::set::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Merge drug-like spans into phrases and collapse them into a set.
pub fn group_drug_phrases(spans: &[TaggedSpan], labels: &DrugLabelSet) -> DrugNameSet {
    let mut phrases: Vec<Vec<&str>> = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    let mut last_end: Option<usize> = None;

    for span in spans {
        if !labels.contains(&span.label) {
            flush(&mut current, &mut phrases);
            continue;
        }

        let fragment = match span.offsets() {
            Some(_) => strip_continuation(&span.text),
            None => span.text.as_str(),
        };

        let contiguous = match (span.offsets(), last_end) {
            (Some((start, _)), Some(end)) => !current.is_empty() && start <= end.saturating_add(1),
            _ => false,
        };

        if !contiguous {
            flush(&mut current, &mut phrases);
        }
        // A bare "##" leaves nothing to keep but still advances `last_end`.
        if !fragment.is_empty() {
            current.push(fragment);
        }
        last_end = span.end;
    }
    flush(&mut current, &mut phrases);

    let mut names = IndexSet::new();
    for phrase in phrases {
        let joined = phrase.join(" ").to_lowercase();
        let trimmed = joined.trim();
        if trimmed.is_empty() {
            continue;
        }
        names.insert(trimmed.to_string());
    }
    debug!(spans = spans.len(), phrases = names.len(), "grouped drug phrases");
    DrugNameSet(names)
}

fn flush<'a>(current: &mut Vec<&'a str>, phrases: &mut Vec<Vec<&'a str>>) {
    if !current.is_empty() {
        phrases.push(std::mem::take(current));
    }
}
