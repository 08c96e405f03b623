use async_trait::async_trait;
use mednlp_assistant::{
    interactions::InteractionTable,
    nlp::{
        self,
        dictionary::DictionaryBackend,
        grouper::DrugLabelSet,
        ner::{
            strip_iob_prefix, EntityTagger, RawToken, SubTokenBackend, SubTokenTagger,
            TaggedSpan, WholeSpanTagger,
        },
    },
    NlpError,
};

const SAMPLE: &str = "The patient was prescribed Amoxicillin for infection and is on \
    Methotrexate. Ibuprofen was taken along with Aspirin; Warfarin was stopped.";

fn token(entity: &str, word: &str, start: usize, end: usize) -> RawToken {
    RawToken {
        entity_group: None,
        entity: Some(entity.to_string()),
        word: word.to_string(),
        start,
        end,
        score: Some(0.9),
    }
}

struct CannedTokens(Vec<RawToken>);

#[async_trait]
impl SubTokenBackend for CannedTokens {
    fn name(&self) -> &'static str {
        "canned"
    }

    async fn tokens(&self, _text: &str) -> Result<Vec<RawToken>, NlpError> {
        Ok(self.0.clone())
    }
}

struct Offline;

#[async_trait]
impl SubTokenBackend for Offline {
    fn name(&self) -> &'static str {
        "offline"
    }

    async fn tokens(&self, _text: &str) -> Result<Vec<RawToken>, NlpError> {
        Err(NlpError::tagger("offline", "connection refused"))
    }
}

#[tokio::test]
async fn empty_text_returns_no_spans() {
    let tagger = WholeSpanTagger::new(DictionaryBackend::new());
    assert!(tagger.extract_entities("").await.unwrap().is_empty());
    // Empty input short-circuits before the backend is consulted.
    let offline = SubTokenTagger::new(Offline);
    assert!(offline.extract_entities("").await.unwrap().is_empty());
}

#[tokio::test]
async fn dictionary_spans_are_whole_and_ordered() {
    let tagger = WholeSpanTagger::new(DictionaryBackend::new());
    let spans = tagger.extract_entities(SAMPLE).await.unwrap();
    assert!(spans.iter().all(|s| s.offsets().is_none()));
    let words: Vec<&str> = spans.iter().map(|s| s.text.as_str()).collect();
    assert_eq!(
        words,
        vec!["Amoxicillin", "infection", "Methotrexate", "Ibuprofen", "Aspirin", "Warfarin"]
    );
    assert_eq!(spans[1].label, "DISEASE");
}

#[tokio::test]
async fn sub_tokens_are_sorted_and_cleaned() {
    let tagger = SubTokenTagger::new(CannedTokens(vec![
        token("I-Medication", "##formin", 3, 10),
        token("B-Medication", "Met", 0, 2),
        token("O", "daily", 11, 16),
    ]));
    let spans = tagger.extract_entities("Metformin daily").await.unwrap();
    assert_eq!(
        spans,
        vec![
            TaggedSpan::with_offsets("Medication", "Met", 0, 2),
            TaggedSpan::with_offsets("Medication", "formin", 3, 10),
            TaggedSpan::with_offsets("O", "daily", 11, 16),
        ]
    );
}

#[tokio::test]
async fn inverted_offsets_are_dropped() {
    let tagger = SubTokenTagger::new(CannedTokens(vec![token("Drug", "bogus", 9, 4)]));
    assert!(tagger.extract_entities("whatever").await.unwrap().is_empty());
}

#[tokio::test]
async fn backend_failure_is_not_an_empty_result() {
    let tagger = SubTokenTagger::new(Offline);
    let err = tagger.extract_entities("Aspirin daily").await.unwrap_err();
    assert!(matches!(err, NlpError::TaggerUnavailable { .. }));
}

#[test]
fn entity_group_wins_over_token_tag() {
    let raw: RawToken = serde_json::from_str(
        r#"{"entity_group":"Medication","entity":"B-Medication","word":"aspirin","start":0,"end":7}"#,
    )
    .unwrap();
    assert_eq!(raw.label(), "Medication");
    assert_eq!(strip_iob_prefix("i-Drug"), "Drug");
    assert_eq!(strip_iob_prefix("B-"), "B-");
    assert_eq!(strip_iob_prefix("Bio"), "Bio");
}

#[tokio::test]
async fn sub_token_pipeline_reassembles_phrases() {
    let tagger = SubTokenTagger::new(CannedTokens(vec![
        token("B-Medication", "Met", 0, 3),
        token("I-Medication", "##formin", 3, 9),
        token("O", "and", 10, 13),
        token("B-Medication", "war", 14, 17),
        token("I-Medication", "##farin", 17, 23),
    ]));
    let drugs = nlp::extract_drug_names(&tagger, &DrugLabelSet::default(), "Metformin and warfarin")
        .await
        .unwrap();
    assert_eq!(drugs.into_vec(), vec!["met formin", "war farin"]);
}

#[tokio::test]
async fn note_analysis_finds_sample_interactions() {
    let tagger = WholeSpanTagger::new(DictionaryBackend::new());
    let report = nlp::analyse_note(
        &tagger,
        &DrugLabelSet::default(),
        InteractionTable::builtin(),
        SAMPLE,
    )
    .await
    .unwrap();
    assert_eq!(
        report.drugs,
        vec!["amoxicillin", "methotrexate", "ibuprofen", "aspirin", "warfarin"]
    );
    let pairs: Vec<_> = report.interactions.iter().map(|e| e.drug_pair.clone()).collect();
    assert_eq!(
        pairs,
        vec![
            ("amoxicillin".to_string(), "methotrexate".to_string()),
            ("ibuprofen".to_string(), "aspirin".to_string()),
        ]
    );
}
