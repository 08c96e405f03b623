//! Lexicon-backed whole-span tagger. Works offline, no model required.

use std::collections::HashMap;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::{
    error::NlpError,
    nlp::ner::{WholeEntity, WholeSpanBackend},
};

const CHEMICAL: &str = "CHEMICAL";
const DISEASE: &str = "DISEASE";
const TREATMENT: &str = "TREATMENT";

static DRUG_TERMS: &[&str] = &[
    "acetaminophen",
    "amoxicillin",
    "aspirin",
    "atorvastatin",
    "clopidogrel",
    "dasatinib",
    "digoxin",
    "gleevec",
    "heparin",
    "ibuprofen",
    "imatinib",
    "insulin",
    "insulin glargine",
    "keytruda",
    "lisinopril",
    "metformin",
    "methotrexate",
    "metoprolol",
    "naproxen",
    "nivolumab",
    "omeprazole",
    "pembrolizumab",
    "prednisone",
    "simvastatin",
    "tylenol",
    "valproic acid",
    "warfarin",
];

static CONDITION_TERMS: &[&str] = &[
    "anemia",
    "atrial fibrillation",
    "cardiotoxicity",
    "diabetes",
    "diarrhoea",
    "fatigue",
    "fever",
    "flu",
    "headache",
    "hepatotoxicity",
    "hypertension",
    "infection",
    "nausea",
    "neutropenia",
    "pneumonia",
    "rash",
    "rheumatoid arthritis",
    "thrombocytopenia",
    "type 2 diabetes",
];

static TREATMENT_TERMS: &[&str] = &[
    "chemotherapy",
    "dialysis",
    "physical therapy",
    "radiation therapy",
];

static LEXICON: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    let mut lexicon = HashMap::new();
    lexicon.extend(CONDITION_TERMS.iter().map(|term| (*term, DISEASE)));
    lexicon.extend(TREATMENT_TERMS.iter().map(|term| (*term, TREATMENT)));
    lexicon.extend(DRUG_TERMS.iter().map(|term| (*term, CHEMICAL)));
    lexicon
});

// Longest terms first so "insulin glargine" wins over "insulin" at the same start.
static PATTERN: Lazy<Regex> = Lazy::new(|| {
    let mut terms: Vec<&str> = LEXICON.keys().copied().collect();
    terms.sort_by(|a, b| b.len().cmp(&a.len()).then(a.cmp(b)));
    let alternation = terms
        .iter()
        .map(|term| regex::escape(term))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"(?i)\b(?:{alternation})\b")).expect("lexicon pattern is valid")
});

/// Whole-word, case-insensitive lexicon matcher.
#[derive(Debug, Clone, Copy, Default)]
pub struct DictionaryBackend;

impl DictionaryBackend {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl WholeSpanBackend for DictionaryBackend {
    fn name(&self) -> &'static str {
        "dictionary"
    }

    async fn entities(&self, text: &str) -> Result<Vec<WholeEntity>, NlpError> {
        Ok(find_terms(text))
    }
}

fn find_terms(text: &str) -> Vec<WholeEntity> {
    PATTERN
        .find_iter(text)
        .filter_map(|found| {
            let surface = found.as_str();
            LEXICON
                .get(surface.to_lowercase().as_str())
                .map(|label| WholeEntity {
                    label: (*label).to_string(),
                    text: surface.to_string(),
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefers_longest_term_at_same_position() {
        let found = find_terms("Started Insulin Glargine nightly.");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].text, "Insulin Glargine");
        assert_eq!(found[0].label, CHEMICAL);
    }

    #[test]
    fn ignores_terms_inside_words() {
        assert!(find_terms("The crash was minor.").is_empty());
    }
}
