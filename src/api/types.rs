//! Shared DTOs for JSON requests and responses.

use serde::{Deserialize, Serialize};

use crate::nlp::ner::TaggedSpan;

#[derive(Debug, Clone, Deserialize)]
pub struct TextRequest {
    #[serde(default)]
    pub text: String,
}

/// Either an explicit drug list or note text to extract drugs from.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InteractionRequest {
    pub drugs: Option<Vec<String>>,
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SummarizeRequest {
    #[serde(default)]
    pub text: String,
    pub max_length: Option<usize>,
    pub min_length: Option<usize>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EntitiesResponse {
    pub entities: Vec<TaggedSpan>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DrugsResponse {
    pub drugs: Vec<String>,
}
