use mednlp_assistant::{
    nlp::{
        self,
        dictionary::DictionaryBackend,
        highlight::highlight,
        ner::{TaggedSpan, WholeSpanTagger},
        summarize::{LeadSentenceSummarizer, LengthBounds, Summarizer},
    },
    NlpError,
};

const NOTE: &str = "Patient admitted with pneumonia. Started amoxicillin twice daily. \
    Continues methotrexate for rheumatoid arthritis. Family history is unremarkable. \
    Discharge planned for Friday.";

#[test]
fn inverted_bounds_are_rejected() {
    let err = LengthBounds::new(10, 20).unwrap_err();
    assert!(matches!(err, NlpError::InvalidBounds { min: 20, max: 10 }));
}

#[tokio::test]
async fn lead_sentences_stop_once_min_length_is_reached() {
    let bounds = LengthBounds::new(12, 6).unwrap();
    let summary = LeadSentenceSummarizer.summarize(NOTE, bounds).await.unwrap();
    assert_eq!(
        summary,
        "Patient admitted with pneumonia. Started amoxicillin twice daily."
    );
}

#[tokio::test]
async fn lead_sentences_never_exceed_max_length() {
    let bounds = LengthBounds::new(9, 9).unwrap();
    let summary = LeadSentenceSummarizer.summarize(NOTE, bounds).await.unwrap();
    assert!(summary.split_whitespace().count() <= 9);
    assert!(summary.starts_with("Patient admitted"));
}

#[test]
fn highlight_prefers_longer_terms_without_nesting() {
    let spans = vec![
        TaggedSpan::whole("CHEMICAL", "insulin"),
        TaggedSpan::whole("CHEMICAL", "insulin glargine"),
    ];
    let out = highlight("Insulin glargine replaces regular insulin.", &spans);
    assert_eq!(
        out,
        "**_Insulin glargine_** replaces regular **_insulin_**."
    );
}

#[test]
fn highlight_ignores_blank_spans_and_partial_words() {
    let spans = vec![
        TaggedSpan::whole("DISEASE", "rash"),
        TaggedSpan::with_offsets("Drug", "##", 0, 2),
    ];
    assert_eq!(highlight("No crash reported.", &spans), "No crash reported.");
}

#[tokio::test]
async fn summary_report_highlights_entities() {
    let tagger = WholeSpanTagger::new(DictionaryBackend::new());
    let bounds = LengthBounds::new(20, 5).unwrap();
    let report = nlp::summarize_note(&LeadSentenceSummarizer, &tagger, NOTE, bounds)
        .await
        .unwrap();
    assert_eq!(
        report.highlighted,
        "Patient admitted with **_pneumonia_**. Started **_amoxicillin_** twice daily."
    );
    assert_eq!(report.entities.len(), 2);
}

#[tokio::test]
async fn empty_note_summarizes_to_nothing() {
    let tagger = WholeSpanTagger::new(DictionaryBackend::new());
    let report = nlp::summarize_note(&LeadSentenceSummarizer, &tagger, "  ", LengthBounds::default())
        .await
        .unwrap();
    assert!(report.summary.is_empty());
    assert!(report.entities.is_empty());
}
