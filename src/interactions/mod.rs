//! Pairwise drug interaction matching.

pub mod table;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::Settings;

pub use table::{canonical_name, InteractionTable};

/// One matched pair with the table's explanation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractionEntry {
    pub drug_pair: (String, String),
    pub info: String,
}

impl InteractionTable {
    /// Check every unordered pair of positions against the table.
    ///
    /// Names are trimmed and lower-cased; blank names are dropped. Duplicate
    /// names at different positions still form pairs. The reported pair keeps
    /// the input order, whichever order the table stores.
    pub fn check_interactions<S: AsRef<str>>(&self, names: &[S]) -> Vec<InteractionEntry> {
        let drugs: Vec<String> = names
            .iter()
            .map(|name| canonical_name(name.as_ref()))
            .filter(|name| !name.is_empty())
            .collect();

        let mut found = Vec::new();
        for (i, first) in drugs.iter().enumerate() {
            for second in &drugs[i + 1..] {
                let info = self
                    .get(first, second)
                    .or_else(|| self.get(second, first));
                if let Some(info) = info {
                    found.push(InteractionEntry {
                        drug_pair: (first.clone(), second.clone()),
                        info: info.to_string(),
                    });
                }
            }
        }
        debug!(drugs = drugs.len(), matches = found.len(), "checked interactions");
        found
    }
}

/// Check names against the built-in table.
pub fn check_interactions<S: AsRef<str>>(names: &[S]) -> Vec<InteractionEntry> {
    InteractionTable::builtin().check_interactions(names)
}

/// Built-in table, extended by `INTERACTIONS_CSV` when configured.
pub fn load_table(settings: &Settings) -> Result<InteractionTable> {
    let mut table = InteractionTable::builtin().clone();
    if let Some(path) = &settings.interactions_csv {
        table.extend(InteractionTable::from_csv(path)?);
    }
    info!(pairs = table.len(), "interaction table ready");
    Ok(table)
}
