//! CLI entry-point for entity tagging.

use anyhow::Result;
use clap::Args as ClapArgs;
use tracing::{info, instrument};

use crate::{
    cli::{emit, NoteInput},
    config::Settings,
    nlp::ner,
};

/// Args for the `entities` command.
#[derive(Debug, Clone, ClapArgs)]
pub struct Args {
    #[command(flatten)]
    pub input: NoteInput,
}

#[instrument(skip(settings))]
pub async fn run(args: Args, settings: Settings) -> Result<()> {
    let note = args.input.read()?;
    let tagger = ner::load_tagger(&settings)?;
    let spans = tagger.extract_entities(&note).await?;
    info!(spans = spans.len(), "tagged note");
    emit(&spans)
}
