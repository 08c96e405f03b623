//! Error kinds surfaced by the extraction and summarization adapters.

use thiserror::Error;

/// Failures raised by the NLP layer.
///
/// Empty input is never an error: "no entities" and "no interactions" are
/// successful, empty results. These variants only cover backends that could
/// not do their job.
#[derive(Debug, Error)]
pub enum NlpError {
    /// The entity tagging backend failed or is not initialised.
    #[error("entity tagger `{backend}` unavailable: {reason}")]
    TaggerUnavailable {
        backend: &'static str,
        reason: String,
    },
    /// The summarization backend failed or is not initialised.
    #[error("summarizer `{backend}` unavailable: {reason}")]
    SummarizerUnavailable {
        backend: &'static str,
        reason: String,
    },
    /// Summary length bounds are inconsistent.
    #[error("invalid summary bounds: min_length {min} exceeds max_length {max}")]
    InvalidBounds { min: usize, max: usize },
}

impl NlpError {
    pub fn tagger(backend: &'static str, reason: impl ToString) -> Self {
        Self::TaggerUnavailable {
            backend,
            reason: reason.to_string(),
        }
    }

    pub fn summarizer(backend: &'static str, reason: impl ToString) -> Self {
        Self::SummarizerUnavailable {
            backend,
            reason: reason.to_string(),
        }
    }

    /// True when the failure comes from an unreachable or broken backend.
    pub fn is_unavailable(&self) -> bool {
        matches!(
            self,
            Self::TaggerUnavailable { .. } | Self::SummarizerUnavailable { .. }
        )
    }
}
