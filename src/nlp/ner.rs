//! Entity tagger adapters. Two backend shapes, one contract.
//!
//! A whole-span backend returns finished entities (`label`, `text`); the
//! adapter surfaces them without offsets. A sub-token backend returns word
//! pieces with character offsets, possibly out of order and carrying `##`
//! continuation markers and IOB label prefixes; the adapter sorts and cleans
//! them so the grouper only ever sees document-ordered spans.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::{
    config::{NerBackend, Settings},
    error::NlpError,
    nlp::{dictionary::DictionaryBackend, remote::HttpTokenBackend},
};

/// One unit of tagger output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaggedSpan {
    pub label: String,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<usize>,
}

impl TaggedSpan {
    /// Span from a whole-entity backend.
    pub fn whole(label: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            text: text.into(),
            start: None,
            end: None,
        }
    }

    /// Span with character offsets into the source text.
    pub fn with_offsets(
        label: impl Into<String>,
        text: impl Into<String>,
        start: usize,
        end: usize,
    ) -> Self {
        Self {
            label: label.into(),
            text: text.into(),
            start: Some(start),
            end: Some(end),
        }
    }

    /// Both offsets, or `None` when either is missing.
    pub fn offsets(&self) -> Option<(usize, usize)> {
        self.start.zip(self.end)
    }
}

/// Remove leading sub-word continuation markers (`##formin` -> `formin`).
pub fn strip_continuation(word: &str) -> &str {
    word.trim_start_matches('#')
}

/// Remove an IOB prefix from a token-classification label (`B-Drug` -> `Drug`).
pub fn strip_iob_prefix(label: &str) -> &str {
    let bytes = label.as_bytes();
    if bytes.len() > 2 && matches!(bytes[0], b'B' | b'I' | b'b' | b'i') && bytes[1] == b'-' {
        &label[2..]
    } else {
        label
    }
}

/// Text in, document-ordered spans out.
#[async_trait]
pub trait EntityTagger: Send + Sync {
    /// Short backend name for logs and errors.
    fn name(&self) -> &'static str;

    async fn extract_entities(&self, text: &str) -> Result<Vec<TaggedSpan>, NlpError>;
}

/// A finished entity from a whole-span backend.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WholeEntity {
    pub label: String,
    pub text: String,
}

/// Backend returning complete entity phrases.
#[async_trait]
pub trait WholeSpanBackend: Send + Sync {
    fn name(&self) -> &'static str;

    /// Entities in document order.
    async fn entities(&self, text: &str) -> Result<Vec<WholeEntity>, NlpError>;
}

/// A raw token from a token-classification backend.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawToken {
    #[serde(default)]
    pub entity_group: Option<String>,
    #[serde(default)]
    pub entity: Option<String>,
    pub word: String,
    pub start: usize,
    pub end: usize,
    #[serde(default)]
    pub score: Option<f32>,
}

impl RawToken {
    /// Aggregated group label when the backend provides one, else the per-token tag.
    pub fn label(&self) -> &str {
        self.entity_group
            .as_deref()
            .or(self.entity.as_deref())
            .unwrap_or("")
    }
}

/// Backend returning word pieces with offsets, in any order.
#[async_trait]
pub trait SubTokenBackend: Send + Sync {
    fn name(&self) -> &'static str;

    async fn tokens(&self, text: &str) -> Result<Vec<RawToken>, NlpError>;
}

/// Adapter for whole-span backends. Offsets are dropped so spans never merge.
pub struct WholeSpanTagger<B> {
    backend: B,
}

impl<B: WholeSpanBackend> WholeSpanTagger<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }
}

#[async_trait]
impl<B: WholeSpanBackend> EntityTagger for WholeSpanTagger<B> {
    fn name(&self) -> &'static str {
        self.backend.name()
    }

    async fn extract_entities(&self, text: &str) -> Result<Vec<TaggedSpan>, NlpError> {
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }
        let entities = self.backend.entities(text).await?;
        Ok(entities
            .into_iter()
            .map(|entity| TaggedSpan::whole(entity.label, entity.text))
            .collect())
    }
}

/// Adapter for sub-token backends: sorts by start, strips markers and IOB prefixes.
pub struct SubTokenTagger<B> {
    backend: B,
}

impl<B: SubTokenBackend> SubTokenTagger<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }
}

#[async_trait]
impl<B: SubTokenBackend> EntityTagger for SubTokenTagger<B> {
    fn name(&self) -> &'static str {
        self.backend.name()
    }

    async fn extract_entities(&self, text: &str) -> Result<Vec<TaggedSpan>, NlpError> {
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }
        let tokens = self.backend.tokens(text).await?;
        let mut spans: Vec<TaggedSpan> = tokens
            .into_iter()
            .filter_map(|token| {
                if token.end < token.start {
                    warn!(
                        word = %token.word,
                        start = token.start,
                        end = token.end,
                        "dropping token with inverted offsets"
                    );
                    return None;
                }
                Some(TaggedSpan::with_offsets(
                    strip_iob_prefix(token.label()),
                    strip_continuation(&token.word),
                    token.start,
                    token.end,
                ))
            })
            .collect();
        spans.sort_by_key(|span| span.start);
        Ok(spans)
    }
}

/// Pick the tagging backend once for the whole process.
///
/// A remote backend that cannot be initialised falls back to the dictionary.
pub fn load_tagger(settings: &Settings) -> Result<Arc<dyn EntityTagger>> {
    let dictionary = || -> Arc<dyn EntityTagger> {
        Arc::new(WholeSpanTagger::new(DictionaryBackend::new()))
    };

    let selection = (settings.ner_backend, settings.ner_endpoint.as_deref());
    let tagger: Arc<dyn EntityTagger> = match selection {
        (NerBackend::Dictionary, _) => dictionary(),
        (NerBackend::Remote, None) => {
            warn!("NER_BACKEND=remote without NER_ENDPOINT; using dictionary tagger");
            dictionary()
        }
        (NerBackend::Remote, Some(endpoint)) => match HttpTokenBackend::new(
            endpoint,
            settings.ner_api_token.clone(),
            settings.http_timeout,
        ) {
            Ok(backend) => Arc::new(SubTokenTagger::new(backend)),
            Err(err) => {
                warn!(%err, "remote tagger unavailable; using dictionary tagger");
                dictionary()
            }
        },
    };
    info!(backend = tagger.name(), "entity tagger ready");
    Ok(tagger)
}
