//! Command-line interface wiring for mednlp-assistant.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args as ClapArgs, Parser, Subcommand};
use serde::Serialize;

use crate::config::Settings;

pub mod batch;
pub mod drugs;
pub mod entities;
pub mod interactions;
pub mod serve;
pub mod summarize;

/// Top-level CLI definition.
#[derive(Debug, Parser)]
#[command(author, version, about = "Clinical note NLP assistant", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    /// Parse CLI arguments from the environment.
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    /// Dispatch the selected sub-command.
    pub async fn dispatch(self, settings: Settings) -> Result<()> {
        match self.command {
            Commands::Entities(args) => entities::run(args, settings).await,
            Commands::Drugs(args) => drugs::run(args, settings).await,
            Commands::Interactions(args) => interactions::run(args, settings).await,
            Commands::Summarize(args) => summarize::run(args, settings).await,
            Commands::Batch(args) => batch::run(args, settings).await,
            Commands::Serve(args) => serve::run(args, settings).await,
        }
    }
}

/// Supported sub-commands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Tag clinical entities in a note.
    Entities(entities::Args),
    /// List the drug names mentioned in a note.
    Drugs(drugs::Args),
    /// Check drug pairs against the interaction table.
    Interactions(interactions::Args),
    /// Condense a note and highlight its clinical terms.
    Summarize(summarize::Args),
    /// Analyse every `.txt` note under a directory.
    Batch(batch::Args),
    /// Serve the JSON API.
    Serve(serve::Args),
}

/// Note text given inline or as a file.
#[derive(Debug, Clone, ClapArgs)]
pub struct NoteInput {
    /// Note text.
    #[arg(long, conflicts_with = "file")]
    pub text: Option<String>,
    /// UTF-8 file holding the note.
    #[arg(long)]
    pub file: Option<PathBuf>,
}

impl NoteInput {
    /// Resolve the note body. Neither flag means an empty note.
    pub fn read(&self) -> Result<String> {
        match (&self.text, &self.file) {
            (Some(text), _) => Ok(text.clone()),
            (None, Some(path)) => std::fs::read_to_string(path)
                .with_context(|| format!("reading note {}", path.display())),
            (None, None) => Ok(String::new()),
        }
    }
}

/// Print a result as pretty JSON on stdout.
pub(crate) fn emit<T: Serialize>(value: &T) -> Result<()> {
    let rendered = serde_json::to_string_pretty(value).context("serialising output")?;
    println!("{rendered}");
    Ok(())
}
