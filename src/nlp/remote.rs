//! HTTP clients for hosted token-classification and summarization models.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Url};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::json;
use tracing::debug;

use crate::{
    error::NlpError,
    nlp::ner::{RawToken, SubTokenBackend},
};

const USER_AGENT: &str = concat!("mednlp-assistant/", env!("CARGO_PKG_VERSION"));

/// Shared JSON-over-HTTP plumbing for hosted inference endpoints.
#[derive(Debug, Clone)]
pub(crate) struct InferenceClient {
    client: Client,
    endpoint: Url,
    token: Option<String>,
}

impl InferenceClient {
    pub(crate) fn new(endpoint: &str, token: Option<String>, timeout: Duration) -> Result<Self> {
        let endpoint =
            Url::parse(endpoint).with_context(|| format!("parsing endpoint {endpoint}"))?;
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .context("building http client")?;
        Ok(Self {
            client,
            endpoint,
            token,
        })
    }

    pub(crate) fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// POST `body` and decode the JSON reply. Errors come back as display strings
    /// so callers can wrap them in the right `NlpError` variant.
    pub(crate) async fn post_json<B, T>(&self, body: &B) -> Result<T, String>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let resp = self
            .authorised(self.client.post(self.endpoint.clone()))
            .json(body)
            .send()
            .await
            .map_err(|err| err.to_string())?;
        let status = resp.status();
        if !status.is_success() {
            let detail = resp.text().await.unwrap_or_default();
            return Err(format!("{status}: {}", detail.trim()));
        }
        resp.json::<T>().await.map_err(|err| err.to_string())
    }

    fn authorised(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

/// Sub-token backend talking to a hosted token-classification model.
#[derive(Debug, Clone)]
pub struct HttpTokenBackend {
    inner: InferenceClient,
}

impl HttpTokenBackend {
    pub fn new(endpoint: &str, token: Option<String>, timeout: Duration) -> Result<Self> {
        Ok(Self {
            inner: InferenceClient::new(endpoint, token, timeout)?,
        })
    }
}

#[async_trait]
impl SubTokenBackend for HttpTokenBackend {
    fn name(&self) -> &'static str {
        "remote"
    }

    async fn tokens(&self, text: &str) -> Result<Vec<RawToken>, NlpError> {
        let body = json!({
            "inputs": text,
            "parameters": { "aggregation_strategy": "none" },
        });
        let tokens: Vec<RawToken> = self
            .inner
            .post_json(&body)
            .await
            .map_err(|reason| NlpError::tagger(self.name(), reason))?;
        debug!(
            endpoint = %self.inner.endpoint(),
            tokens = tokens.len(),
            "token classification done"
        );
        Ok(tokens)
    }
}
