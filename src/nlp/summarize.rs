//! Note summarization adapters.

use std::{sync::Arc, time::Duration};

use anyhow::Result;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, warn};

use crate::{config::Settings, error::NlpError, nlp::remote::InferenceClient};

pub const DEFAULT_MAX_LENGTH: usize = 120;
pub const DEFAULT_MIN_LENGTH: usize = 30;

/// Target summary length, in model tokens for hosted models and words for the fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LengthBounds {
    pub max_length: usize,
    pub min_length: usize,
}

impl LengthBounds {
    pub fn new(max_length: usize, min_length: usize) -> Result<Self, NlpError> {
        if min_length > max_length {
            return Err(NlpError::InvalidBounds {
                min: min_length,
                max: max_length,
            });
        }
        Ok(Self {
            max_length,
            min_length,
        })
    }
}

impl Default for LengthBounds {
    fn default() -> Self {
        Self {
            max_length: DEFAULT_MAX_LENGTH,
            min_length: DEFAULT_MIN_LENGTH,
        }
    }
}

/// Text plus length bounds in, shorter text out.
#[async_trait]
pub trait Summarizer: Send + Sync {
    fn name(&self) -> &'static str;

    async fn summarize(&self, text: &str, bounds: LengthBounds) -> Result<String, NlpError>;
}

/// Split note text into coarse sentences.
pub fn split_sentences(text: &str) -> Vec<String> {
    static PATTERN: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"[^.!?]+[.!?]*").expect("valid regex"));
    PATTERN
        .find_iter(text)
        .map(|m| m.as_str().trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Offline extractive fallback: keeps the leading sentences of the note.
#[derive(Debug, Clone, Copy, Default)]
pub struct LeadSentenceSummarizer;

impl LeadSentenceSummarizer {
    fn condense(text: &str, bounds: LengthBounds) -> String {
        let mut picked: Vec<String> = Vec::new();
        let mut words = 0usize;
        for sentence in split_sentences(text) {
            if !picked.is_empty() && words >= bounds.min_length {
                break;
            }
            let count = sentence.split_whitespace().count();
            if words + count > bounds.max_length {
                if picked.is_empty() {
                    let head: Vec<&str> =
                        sentence.split_whitespace().take(bounds.max_length).collect();
                    picked.push(head.join(" "));
                }
                break;
            }
            words += count;
            picked.push(sentence);
        }
        picked.join(" ").trim().to_string()
    }
}

#[async_trait]
impl Summarizer for LeadSentenceSummarizer {
    fn name(&self) -> &'static str {
        "lead-sentences"
    }

    async fn summarize(&self, text: &str, bounds: LengthBounds) -> Result<String, NlpError> {
        Ok(Self::condense(text, bounds))
    }
}

#[derive(Debug, Deserialize)]
struct SummaryOutput {
    summary_text: String,
}

/// Hosted abstractive summarization model.
#[derive(Debug, Clone)]
pub struct HttpSummarizer {
    inner: InferenceClient,
}

impl HttpSummarizer {
    pub fn new(endpoint: &str, token: Option<String>, timeout: Duration) -> Result<Self> {
        Ok(Self {
            inner: InferenceClient::new(endpoint, token, timeout)?,
        })
    }
}

#[async_trait]
impl Summarizer for HttpSummarizer {
    fn name(&self) -> &'static str {
        "remote"
    }

    async fn summarize(&self, text: &str, bounds: LengthBounds) -> Result<String, NlpError> {
        if text.trim().is_empty() {
            return Ok(String::new());
        }
        let body = json!({
            "inputs": text,
            "parameters": {
                "max_length": bounds.max_length,
                "min_length": bounds.min_length,
                "do_sample": false,
            },
        });
        let outputs: Vec<SummaryOutput> = self
            .inner
            .post_json(&body)
            .await
            .map_err(|reason| NlpError::summarizer(self.name(), reason))?;
        outputs
            .into_iter()
            .next()
            .map(|out| out.summary_text.trim().to_string())
            .ok_or_else(|| NlpError::summarizer(self.name(), "empty response"))
    }
}

/// Pick the summarization backend once for the whole process.
pub fn load_summarizer(settings: &Settings) -> Result<Arc<dyn Summarizer>> {
    let summarizer: Arc<dyn Summarizer> = match settings.summarizer_endpoint.as_deref() {
        Some(endpoint) => match HttpSummarizer::new(
            endpoint,
            settings.summarizer_api_token.clone(),
            settings.http_timeout,
        ) {
            Ok(remote) => Arc::new(remote),
            Err(err) => {
                warn!(%err, "remote summarizer unavailable; using lead sentences");
                Arc::new(LeadSentenceSummarizer)
            }
        },
        None => Arc::new(LeadSentenceSummarizer),
    };
    info!(backend = summarizer.name(), "summarizer ready");
    Ok(summarizer)
}
