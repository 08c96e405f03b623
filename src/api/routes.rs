//! HTTP route handlers for Axum.

use axum::{extract::State, http::StatusCode, Json};
use tracing::warn;

use crate::{
    api::types::{
        DrugsResponse, EntitiesResponse, InteractionRequest, SummarizeRequest, TextRequest,
    },
    error::NlpError,
    interactions::canonical_name,
    nlp::{self, summarize::LengthBounds, NoteReport, SummaryReport},
};

use super::AppState;

type ApiResult<T> = Result<Json<T>, (StatusCode, String)>;

fn reject(err: NlpError) -> (StatusCode, String) {
    let status = if err.is_unavailable() {
        StatusCode::SERVICE_UNAVAILABLE
    } else {
        StatusCode::BAD_REQUEST
    };
    warn!(%err, %status, "request failed");
    (status, err.to_string())
}

pub async fn health() -> &'static str {
    "ok"
}

pub async fn entities(
    State(state): State<AppState>,
    Json(req): Json<TextRequest>,
) -> ApiResult<EntitiesResponse> {
    let entities = state
        .tagger
        .extract_entities(&req.text)
        .await
        .map_err(reject)?;
    Ok(Json(EntitiesResponse { entities }))
}

pub async fn drugs(
    State(state): State<AppState>,
    Json(req): Json<TextRequest>,
) -> ApiResult<DrugsResponse> {
    let drugs = nlp::extract_drug_names(state.tagger.as_ref(), &state.labels, &req.text)
        .await
        .map_err(reject)?;
    Ok(Json(DrugsResponse {
        drugs: drugs.into_vec(),
    }))
}

/// An explicit `drugs` list takes precedence over `text`.
pub async fn interactions(
    State(state): State<AppState>,
    Json(req): Json<InteractionRequest>,
) -> ApiResult<NoteReport> {
    if let Some(names) = req.drugs {
        let drugs: Vec<String> = names
            .iter()
            .map(|name| canonical_name(name))
            .filter(|name| !name.is_empty())
            .collect();
        let interactions = state.table.check_interactions(&drugs);
        return Ok(Json(NoteReport {
            drugs,
            interactions,
        }));
    }
    let text = req.text.unwrap_or_default();
    let report = nlp::analyse_note(state.tagger.as_ref(), &state.labels, &state.table, &text)
        .await
        .map_err(reject)?;
    Ok(Json(report))
}

pub async fn summarize(
    State(state): State<AppState>,
    Json(req): Json<SummarizeRequest>,
) -> ApiResult<SummaryReport> {
    let defaults = LengthBounds::default();
    let bounds = LengthBounds::new(
        req.max_length.unwrap_or(defaults.max_length),
        req.min_length.unwrap_or(defaults.min_length),
    )
    .map_err(reject)?;
    let report = nlp::summarize_note(
        state.summarizer.as_ref(),
        state.tagger.as_ref(),
        &req.text,
        bounds,
    )
    .await
    .map_err(reject)?;
    Ok(Json(report))
}
