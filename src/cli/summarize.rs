//! CLI entry-point for note summaries with highlighted clinical terms.

use anyhow::Result;
use clap::Args as ClapArgs;
use tracing::instrument;

use crate::{
    cli::{emit, NoteInput},
    config::Settings,
    nlp::{
        self, ner,
        summarize::{self, LengthBounds, DEFAULT_MAX_LENGTH, DEFAULT_MIN_LENGTH},
    },
};

/// Args for the `summarize` command.
#[derive(Debug, Clone, ClapArgs)]
pub struct Args {
    #[command(flatten)]
    pub input: NoteInput,
    /// Upper bound on summary length.
    #[arg(long, default_value_t = DEFAULT_MAX_LENGTH)]
    pub max_length: usize,
    /// Lower bound on summary length.
    #[arg(long, default_value_t = DEFAULT_MIN_LENGTH)]
    pub min_length: usize,
}

#[instrument(skip(settings))]
pub async fn run(args: Args, settings: Settings) -> Result<()> {
    let bounds = LengthBounds::new(args.max_length, args.min_length)?;
    let note = args.input.read()?;
    let tagger = ner::load_tagger(&settings)?;
    let summarizer = summarize::load_summarizer(&settings)?;
    let report = nlp::summarize_note(summarizer.as_ref(), tagger.as_ref(), &note, bounds).await?;
    emit(&report)
}
