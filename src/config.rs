//! Runtime configuration utilities for mednlp-assistant.

use std::{
    env,
    path::{Path, PathBuf},
    str::FromStr,
    time::Duration,
};

use anyhow::Context;

use crate::nlp::grouper::DrugLabelSet;

/// Which entity tagging backend to initialise at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NerBackend {
    /// Offline lexicon tagger returning whole-entity spans.
    Dictionary,
    /// HTTP token-classification service returning sub-word tokens with offsets.
    Remote,
}

impl FromStr for NerBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dictionary" | "dict" | "lexicon" => Ok(Self::Dictionary),
            "remote" | "http" | "hf" => Ok(Self::Remote),
            other => anyhow::bail!("unknown NER_BACKEND `{other}`"),
        }
    }
}

/// Application configuration resolved from `.env` and defaults.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Entity tagging backend selected once for the process.
    pub ner_backend: NerBackend,
    /// Token-classification endpoint used by the remote backend.
    pub ner_endpoint: Option<String>,
    /// Bearer token for the token-classification endpoint.
    pub ner_api_token: Option<String>,
    /// Summarization endpoint; the lead-sentence fallback is used when unset.
    pub summarizer_endpoint: Option<String>,
    /// Bearer token for the summarization endpoint.
    pub summarizer_api_token: Option<String>,
    /// Labels treated as drug-like by the phrase grouper.
    pub drug_labels: DrugLabelSet,
    /// Optional CSV extending the built-in interaction table.
    pub interactions_csv: Option<PathBuf>,
    /// Root folder for batch reports.
    pub outputs_dir: PathBuf,
    /// Per-request timeout for HTTP backends.
    pub http_timeout: Duration,
}

impl Settings {
    /// Load configuration from environment with reasonable defaults.
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let ner_backend = match env::var("NER_BACKEND") {
            Ok(raw) => raw.parse().context("parsing NER_BACKEND")?,
            Err(_) => NerBackend::Dictionary,
        };
        let ner_endpoint = non_empty_var("NER_ENDPOINT");
        let ner_api_token = non_empty_var("NER_API_TOKEN");
        let summarizer_endpoint = non_empty_var("SUMMARIZER_ENDPOINT");
        let summarizer_api_token = non_empty_var("SUMMARIZER_API_TOKEN");
        let drug_labels = non_empty_var("DRUG_LABELS")
            .map(|raw| DrugLabelSet::from_labels(raw.split(',')))
            .unwrap_or_default();
        let interactions_csv = non_empty_var("INTERACTIONS_CSV").map(PathBuf::from);
        let outputs_dir = env::var("OUTPUTS_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./outputs"));
        let http_timeout = env::var("HTTP_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(30));

        std::fs::create_dir_all(&outputs_dir).context("creating outputs dir")?;

        Ok(Self {
            ner_backend,
            ner_endpoint,
            ner_api_token,
            summarizer_endpoint,
            summarizer_api_token,
            drug_labels,
            interactions_csv,
            outputs_dir,
            http_timeout,
        })
    }

    /// Convenience helper for derived output path segments.
    pub fn join_output<P: AsRef<Path>>(&self, path: P) -> PathBuf {
        self.outputs_dir.join(path)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            ner_backend: NerBackend::Dictionary,
            ner_endpoint: None,
            ner_api_token: None,
            summarizer_endpoint: None,
            summarizer_api_token: None,
            drug_labels: DrugLabelSet::default(),
            interactions_csv: None,
            outputs_dir: PathBuf::from("./outputs"),
            http_timeout: Duration::from_secs(30),
        }
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
