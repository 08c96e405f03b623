//! CLI entry-point for drug name extraction.

use anyhow::Result;
use clap::Args as ClapArgs;
use tracing::instrument;

use crate::{
    cli::{emit, NoteInput},
    config::Settings,
    nlp::{self, ner},
};

/// Args for the `drugs` command.
#[derive(Debug, Clone, ClapArgs)]
pub struct Args {
    #[command(flatten)]
    pub input: NoteInput,
}

#[instrument(skip(settings))]
pub async fn run(args: Args, settings: Settings) -> Result<()> {
    let note = args.input.read()?;
    let tagger = ner::load_tagger(&settings)?;
    let drugs = nlp::extract_drug_names(tagger.as_ref(), &settings.drug_labels, &note).await?;
    emit(&drugs)
}
