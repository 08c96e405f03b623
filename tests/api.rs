use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
};
use mednlp_assistant::{
    api::{router, AppState},
    interactions::InteractionTable,
    nlp::{
        dictionary::DictionaryBackend,
        grouper::DrugLabelSet,
        ner::{EntityTagger, TaggedSpan, WholeSpanTagger},
        summarize::LeadSentenceSummarizer,
    },
    NlpError,
};
use serde_json::{json, Value};
use tower::ServiceExt;

struct BrokenTagger;

#[async_trait]
impl EntityTagger for BrokenTagger {
    fn name(&self) -> &'static str {
        "broken"
    }

    async fn extract_entities(&self, _text: &str) -> Result<Vec<TaggedSpan>, NlpError> {
        Err(NlpError::tagger("broken", "model not loaded"))
    }
}

fn state_with(tagger: Arc<dyn EntityTagger>) -> AppState {
    AppState {
        tagger,
        summarizer: Arc::new(LeadSentenceSummarizer),
        labels: Arc::new(DrugLabelSet::default()),
        table: Arc::new(InteractionTable::builtin().clone()),
    }
}

fn dictionary_state() -> AppState {
    state_with(Arc::new(WholeSpanTagger::new(DictionaryBackend::new())))
}

async fn post(state: AppState, uri: &str, body: Value) -> (StatusCode, Vec<u8>) {
    let request = Request::post(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let response = router(state).oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, bytes.to_vec())
}

#[tokio::test]
async fn interactions_from_drug_list() {
    let (status, body) = post(
        dictionary_state(),
        "/interactions",
        json!({ "drugs": ["Warfarin", " acetaminophen "] }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let report: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(report["drugs"], json!(["warfarin", "acetaminophen"]));
    assert_eq!(
        report["interactions"][0]["info"],
        json!("High doses of acetaminophen can increase bleeding risk with warfarin.")
    );
}

#[tokio::test]
async fn interactions_from_note_text() {
    let (status, body) = post(
        dictionary_state(),
        "/interactions",
        json!({ "text": "Takes aspirin and ibuprofen for pain." }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let report: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(report["drugs"], json!(["aspirin", "ibuprofen"]));
    assert_eq!(
        report["interactions"][0]["drug_pair"],
        json!(["aspirin", "ibuprofen"])
    );
}

#[tokio::test]
async fn empty_text_is_an_empty_success() {
    let (status, body) = post(dictionary_state(), "/drugs", json!({ "text": "" })).await;
    assert_eq!(status, StatusCode::OK);
    let payload: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(payload["drugs"], json!([]));
}

#[tokio::test]
async fn tagger_failure_maps_to_service_unavailable() {
    let (status, body) = post(
        state_with(Arc::new(BrokenTagger)),
        "/entities",
        json!({ "text": "Aspirin daily" }),
    )
    .await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(String::from_utf8_lossy(&body).contains("model not loaded"));
}

#[tokio::test]
async fn inverted_summary_bounds_are_bad_requests() {
    let (status, _) = post(
        dictionary_state(),
        "/summarize",
        json!({ "text": "Aspirin daily.", "max_length": 5, "min_length": 10 }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
