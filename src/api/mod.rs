//! JSON API exposing entity extraction, interaction checks and summaries.

pub mod routes;
pub mod types;

use std::{net::SocketAddr, sync::Arc};

use anyhow::Result;
use axum::{
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

use crate::{
    config::Settings,
    interactions::{self, InteractionTable},
    nlp::{
        grouper::DrugLabelSet,
        ner::{self, EntityTagger},
        summarize::{self, Summarizer},
    },
};

/// Backends and read-only knowledge shared by every request.
#[derive(Clone)]
pub struct AppState {
    pub tagger: Arc<dyn EntityTagger>,
    pub summarizer: Arc<dyn Summarizer>,
    pub labels: Arc<DrugLabelSet>,
    pub table: Arc<InteractionTable>,
}

impl AppState {
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        Ok(Self {
            tagger: ner::load_tagger(settings)?,
            summarizer: summarize::load_summarizer(settings)?,
            labels: Arc::new(settings.drug_labels.clone()),
            table: Arc::new(interactions::load_table(settings)?),
        })
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(routes::health))
        .route("/entities", post(routes::entities))
        .route("/drugs", post(routes::drugs))
        .route("/interactions", post(routes::interactions))
        .route("/summarize", post(routes::summarize))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn serve(settings: Settings, host: String, port: u16) -> Result<()> {
    let state = AppState::from_settings(&settings)?;
    let addr: SocketAddr = format!("{host}:{port}").parse()?;
    info!(%addr, "serving mednlp-assistant API");
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, router(state).into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!(%err, "failed to listen for ctrl-c; serving until killed");
        std::future::pending::<()>().await;
    }
    info!("shutdown requested");
}
