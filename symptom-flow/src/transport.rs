use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};

use crate::{
    answers::AnswerMap,
    error::{FlowError, Result},
    models::{ChatExchange, ChatRequest, ChatResponse, DiagnoseRequest, RankedResult},
};

/// Sends one conversational turn to the diagnosis engine.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    async fn send(&self, request: ChatRequest) -> Result<ChatExchange>;
}

/// Submits a finished interview to the diagnosis engine.
#[async_trait]
pub trait DiagnosisTransport: Send + Sync {
    async fn diagnose(&self, answers: &AnswerMap) -> Result<RankedResult>;
}

#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub base_url: String,
    pub chat_path: String,
    pub diagnose_path: String,
    /// `None` waits for the engine indefinitely.
    pub timeout: Option<Duration>,
}

impl EngineConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            chat_path: "/api/chat".to_string(),
            diagnose_path: "/diagnose".to_string(),
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new("http://127.0.0.1:5000")
    }
}

/// JSON-over-HTTP client for both engine endpoints.
#[derive(Clone)]
pub struct HttpEngineClient {
    http: reqwest::Client,
    config: EngineConfig,
}

impl HttpEngineClient {
    pub fn new(config: EngineConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            http: builder.build()?,
            config,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let endpoint = self.config.url(path);
        debug!("POST {}", endpoint);

        let response = self.http.post(&endpoint).json(body).send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            warn!("Engine answered {} for {}", status, endpoint);
            return Err(FlowError::EngineStatus {
                endpoint,
                status: status.as_u16(),
                body: text,
            });
        }

        serde_json::from_str(&text).map_err(|source| FlowError::MalformedResponse { endpoint, source })
    }
}

#[async_trait]
impl ChatTransport for HttpEngineClient {
    async fn send(&self, request: ChatRequest) -> Result<ChatExchange> {
        let response: ChatResponse = self.post_json(&self.config.chat_path, &request).await?;
        Ok(response.into())
    }
}

#[async_trait]
impl DiagnosisTransport for HttpEngineClient {
    async fn diagnose(&self, answers: &AnswerMap) -> Result<RankedResult> {
        let request = DiagnoseRequest {
            answers: answers.clone(),
        };
        self.post_json(&self.config.diagnose_path, &request).await
    }
}
