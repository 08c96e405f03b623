//! Natural language processing orchestration layer.

pub mod dictionary;
pub mod grouper;
pub mod highlight;
pub mod ner;
pub mod remote;
pub mod summarize;

use serde::Serialize;
use tracing::{info, instrument};

use crate::{
    error::NlpError,
    interactions::{InteractionEntry, InteractionTable},
    nlp::{
        grouper::{DrugLabelSet, DrugNameSet},
        ner::{EntityTagger, TaggedSpan},
        summarize::{LengthBounds, Summarizer},
    },
};

/// Drugs detected in a note and the known interactions between them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NoteReport {
    pub drugs: Vec<String>,
    pub interactions: Vec<InteractionEntry>,
}

/// A condensed note with its clinical terms emphasised.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SummaryReport {
    pub summary: String,
    pub highlighted: String,
    pub entities: Vec<TaggedSpan>,
}

/// Tag `text` and reassemble the drug-name phrases.
pub async fn extract_drug_names(
    tagger: &dyn EntityTagger,
    labels: &DrugLabelSet,
    text: &str,
) -> Result<DrugNameSet, NlpError> {
    let spans = tagger.extract_entities(text).await?;
    Ok(grouper::group_drug_phrases(&spans, labels))
}

/// Run the full note pipeline: tag, group, match interactions.
#[instrument(skip_all, fields(tagger = tagger.name(), chars = text.len()))]
pub async fn analyse_note(
    tagger: &dyn EntityTagger,
    labels: &DrugLabelSet,
    table: &InteractionTable,
    text: &str,
) -> Result<NoteReport, NlpError> {
    let drugs = extract_drug_names(tagger, labels, text).await?.into_vec();
    let interactions = table.check_interactions(&drugs);
    info!(
        drugs = drugs.len(),
        interactions = interactions.len(),
        "analysed note"
    );
    Ok(NoteReport {
        drugs,
        interactions,
    })
}

/// Summarize a note, then tag the summary and highlight its entities.
#[instrument(skip_all, fields(summarizer = summarizer.name(), tagger = tagger.name()))]
pub async fn summarize_note(
    summarizer: &dyn Summarizer,
    tagger: &dyn EntityTagger,
    text: &str,
    bounds: LengthBounds,
) -> Result<SummaryReport, NlpError> {
    if text.trim().is_empty() {
        return Ok(SummaryReport::default());
    }
    let summary = summarizer.summarize(text, bounds).await?;
    let entities = tagger.extract_entities(&summary).await?;
    let highlighted = highlight::highlight(&summary, &entities);
    info!(
        summary_chars = summary.len(),
        entities = entities.len(),
        "summarized note"
    );
    Ok(SummaryReport {
        summary,
        highlighted,
        entities,
    })
}
