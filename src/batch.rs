//! Directory-wide note analysis with bounded concurrency.

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use futures::{stream, StreamExt};
use serde::Serialize;
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::{
    interactions::{InteractionEntry, InteractionTable},
    nlp::{self, grouper::DrugLabelSet, ner::EntityTagger},
};

/// One analysed note, written as a JSONL line.
#[derive(Debug, Clone, Serialize)]
pub struct BatchRecord {
    pub file: String,
    pub drugs: Vec<String>,
    pub interactions: Vec<InteractionEntry>,
    pub generated_at: DateTime<Utc>,
}

/// Every `.txt` file below `dir`, sorted by path.
pub fn discover_notes(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut notes = Vec::new();
    for entry in WalkDir::new(dir).follow_links(true) {
        let entry = entry.with_context(|| format!("walking {}", dir.display()))?;
        if entry.file_type().is_file()
            && entry.path().extension().and_then(|s| s.to_str()) == Some("txt")
        {
            notes.push(entry.into_path());
        }
    }
    notes.sort();
    Ok(notes)
}

/// Analyse every note under `dir`. The first backend failure aborts the batch.
pub async fn analyse_dir(
    dir: &Path,
    tagger: &dyn EntityTagger,
    labels: &DrugLabelSet,
    table: &InteractionTable,
    concurrency: usize,
) -> Result<Vec<BatchRecord>> {
    let notes = discover_notes(dir)?;
    info!(dir = %dir.display(), notes = notes.len(), "starting batch");

    let mut records = stream::iter(notes)
        .map(|path| async move {
            let text = tokio::fs::read_to_string(&path)
                .await
                .with_context(|| format!("reading note {}", path.display()))?;
            let report = nlp::analyse_note(tagger, labels, table, &text)
                .await
                .with_context(|| format!("analysing {}", path.display()))?;
            debug!(file = %path.display(), drugs = report.drugs.len(), "note done");
            Ok::<_, anyhow::Error>(BatchRecord {
                file: path.display().to_string(),
                drugs: report.drugs,
                interactions: report.interactions,
                generated_at: Utc::now(),
            })
        })
        .buffer_unordered(concurrency.max(1))
        .collect::<Vec<_>>()
        .await
        .into_iter()
        .collect::<Result<Vec<_>>>()?;

    records.sort_by(|a, b| a.file.cmp(&b.file));
    Ok(records)
}

/// Write records as JSON lines, creating parent folders as needed.
pub fn write_report(path: &Path, records: &[BatchRecord]) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = File::create(path).with_context(|| format!("create {path:?}"))?;
    let mut writer = BufWriter::new(file);
    for record in records {
        serde_json::to_writer(&mut writer, record)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    info!(path = %path.display(), rows = records.len(), "wrote batch report");
    Ok(())
}
