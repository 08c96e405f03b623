//! CLI entry-point for interaction checks.

use anyhow::Result;
use clap::Args as ClapArgs;
use tracing::{info, instrument};

use crate::{
    cli::{emit, NoteInput},
    config::Settings,
    interactions,
    nlp::{self, ner, NoteReport},
};

/// Args for the `interactions` command.
#[derive(Debug, Clone, ClapArgs)]
pub struct Args {
    /// Comma-separated drug names; skips entity extraction.
    #[arg(long, value_delimiter = ',', conflicts_with_all = ["text", "file"])]
    pub drugs: Option<Vec<String>>,
    #[command(flatten)]
    pub input: NoteInput,
}

#[instrument(skip(settings))]
pub async fn run(args: Args, settings: Settings) -> Result<()> {
    let table = interactions::load_table(&settings)?;
    let report = match args.drugs {
        Some(names) => {
            let drugs: Vec<String> = names
                .iter()
                .map(|name| interactions::canonical_name(name))
                .filter(|name| !name.is_empty())
                .collect();
            let interactions = table.check_interactions(&drugs);
            NoteReport {
                drugs,
                interactions,
            }
        }
        None => {
            let note = args.input.read()?;
            let tagger = ner::load_tagger(&settings)?;
            nlp::analyse_note(tagger.as_ref(), &settings.drug_labels, &table, &note).await?
        }
    };
    if report.interactions.is_empty() {
        info!(drugs = report.drugs.len(), "no known interactions");
    }
    emit(&report)
}
