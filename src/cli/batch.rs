//! CLI entry-point for analysing a directory of notes.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args as ClapArgs;
use tracing::{info, instrument};

use crate::{batch, config::Settings, interactions, nlp::ner};

/// Args for the `batch` command.
#[derive(Debug, Clone, ClapArgs)]
pub struct Args {
    /// Directory searched recursively for `.txt` notes.
    #[arg(long)]
    pub dir: PathBuf,
    /// Notes analysed concurrently.
    #[arg(long, default_value_t = 4)]
    pub concurrency: usize,
}

#[instrument(skip(settings))]
pub async fn run(args: Args, settings: Settings) -> Result<()> {
    let tagger = ner::load_tagger(&settings)?;
    let table = interactions::load_table(&settings)?;
    let records = batch::analyse_dir(
        &args.dir,
        tagger.as_ref(),
        &settings.drug_labels,
        &table,
        args.concurrency,
    )
    .await?;
    let flagged = records
        .iter()
        .filter(|record| !record.interactions.is_empty())
        .count();
    let out_path = settings.join_output("batch_report.jsonl");
    batch::write_report(&out_path, &records)?;
    info!(notes = records.len(), flagged, "batch finished");
    println!("{}", out_path.display());
    Ok(())
}
