//! Static drug interaction knowledge.

use std::{collections::HashMap, path::Path};

use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use serde::Deserialize;
use tracing::info;

const BUILTIN_INTERACTIONS: &[(&str, &str, &str)] = &[
    (
        "amoxicillin",
        "methotrexate",
        "Amoxicillin may increase the blood levels of methotrexate.",
    ),
    (
        "ibuprofen",
        "aspirin",
        "Ibuprofen may interfere with the anti-platelet effect of aspirin.",
    ),
    (
        "warfarin",
        "acetaminophen",
        "High doses of acetaminophen can increase bleeding risk with warfarin.",
    ),
];

static BUILTIN: Lazy<InteractionTable> = Lazy::new(|| {
    let mut table = InteractionTable::new();
    for (a, b, info) in BUILTIN_INTERACTIONS {
        table.insert(a, b, info);
    }
    table
});

/// Canonical form used as a lookup key.
pub fn canonical_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Explanatory text keyed by drug pairs in one stored order.
///
/// The meaning is symmetric; callers probe both orders.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InteractionTable {
    entries: HashMap<(String, String), String>,
}

#[derive(Debug, Deserialize)]
struct InteractionRow {
    drug_a: String,
    drug_b: String,
    info: String,
}

impl InteractionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// The table shipped with the binary.
    pub fn builtin() -> &'static InteractionTable {
        &BUILTIN
    }

    /// Record an interaction under the given order, canonicalising both names.
    pub fn insert(&mut self, drug_a: &str, drug_b: &str, info: &str) {
        self.entries.insert(
            (canonical_name(drug_a), canonical_name(drug_b)),
            info.trim().to_string(),
        );
    }

    /// Exact lookup in stored order. Keys must already be canonical.
    pub fn get(&self, drug_a: &str, drug_b: &str) -> Option<&str> {
        self.entries
            .get(&(drug_a.to_string(), drug_b.to_string()))
            .map(String::as_str)
    }

    /// Merge `other` into this table; entries from `other` replace existing ones.
    pub fn extend(&mut self, other: InteractionTable) {
        self.entries.extend(other.entries);
    }

    /// Read a `drug_a,drug_b,info` CSV. Rows with a blank drug name are skipped.
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_path(path)
            .with_context(|| format!("opening interaction table {}", path.display()))?;
        let mut table = Self::new();
        for result in reader.deserialize::<InteractionRow>() {
            let row = result.with_context(|| format!("reading {}", path.display()))?;
            if row.drug_a.trim().is_empty() || row.drug_b.trim().is_empty() {
                continue;
            }
            table.insert(&row.drug_a, &row.drug_b, &row.info);
        }
        info!(path = %path.display(), rows = table.len(), "loaded interaction table");
        Ok(table)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
