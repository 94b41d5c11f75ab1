//! HTTP client for the remote prediction service.
//!
//! `POST {base}/predict`, `GET {base}/health` and `POST {base}/save-engagement`.
//! Every call is a single attempt. The configured timeout bounds the whole
//! exchange, body included, independently of the HTTP client's own timeout.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use vark_algo::{EngagementSnapshot, Modality, QuestionnaireResponse, SessionTelemetry};

use crate::config::Config;

#[derive(Debug, Error)]
pub enum PredictError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("no response within {0:?}")]
    Timeout(Duration),
    #[error("HTTP {status}: {body}")]
    HttpStatus { status: reqwest::StatusCode, body: String },
    #[error("prediction rejected: {0}")]
    Rejected(String),
    #[error("JSON decode failed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("response missing {0}")]
    Incomplete(&'static str),
    #[error("unknown learning style: {0}")]
    UnknownStyle(String),
}

#[derive(Debug, Clone, Serialize)]
pub struct PredictRequest<'a> {
    pub engagement: &'a EngagementSnapshot,
    pub questionnaire: &'a QuestionnaireResponse,
}

/// Raw `/predict` payload. Failure bodies carry only `success` and `error`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PredictResponse {
    #[serde(default)]
    pub success: bool,
    pub predicted_style: Option<String>,
    pub description: Option<String>,
    pub confidence: Option<f64>,
    pub all_scores: Option<BTreeMap<String, f64>>,
    pub error: Option<String>,
    pub timestamp: Option<String>,
}

/// A fully populated remote classification.
#[derive(Debug, Clone, PartialEq)]
pub struct RemotePrediction {
    pub style: Modality,
    pub description: String,
    pub confidence: f64,
    pub all_scores: BTreeMap<String, f64>,
}

impl PredictResponse {
    pub fn into_prediction(self) -> Result<RemotePrediction, PredictError> {
        if !self.success {
            return Err(PredictError::Rejected(
                self.error.unwrap_or_else(|| "prediction failed".to_string()),
            ));
        }

        let raw_style = self
            .predicted_style
            .ok_or(PredictError::Incomplete("predicted_style"))?;
        let style = match raw_style.parse::<Modality>() {
            Ok(style) => style,
            Err(_) => return Err(PredictError::UnknownStyle(raw_style)),
        };

        Ok(RemotePrediction {
            style,
            description: self
                .description
                .ok_or(PredictError::Incomplete("description"))?,
            confidence: self.confidence.ok_or(PredictError::Incomplete("confidence"))?,
            all_scores: self.all_scores.ok_or(PredictError::Incomplete("all_scores"))?,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub model_loaded: bool,
    pub timestamp: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SaveAck {
    #[serde(default)]
    pub success: bool,
    pub message: Option<String>,
}

#[derive(Clone)]
pub struct PredictClient {
    api_base: String,
    timeout: Duration,
    client: reqwest::Client,
}

impl PredictClient {
    pub fn new(config: &Config) -> Self {
        let client = match reqwest::Client::builder()
            .timeout(config.predict_timeout)
            .build()
        {
            Ok(client) => client,
            Err(e) => {
                warn!(error = %e, "HTTP client build failed, falling back to default client");
                reqwest::Client::new()
            }
        };

        Self {
            api_base: config.api_base.trim_end_matches('/').to_string(),
            timeout: config.predict_timeout,
            client,
        }
    }

    pub fn from_env() -> Self {
        Self::new(&Config::from_env())
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub async fn predict(
        &self,
        engagement: &EngagementSnapshot,
        questionnaire: &QuestionnaireResponse,
    ) -> Result<RemotePrediction, PredictError> {
        let url = format!("{}/predict", self.api_base);
        let payload = PredictRequest {
            engagement,
            questionnaire,
        };

        debug!(%url, answers = questionnaire.len(), "sending prediction request");
        let response: PredictResponse = self.exchange(self.client.post(&url).json(&payload)).await?;
        response.into_prediction()
    }

    pub async fn health(&self) -> Result<HealthStatus, PredictError> {
        let url = format!("{}/health", self.api_base);
        self.exchange(self.client.get(&url)).await
    }

    pub async fn save_engagement(&self, telemetry: &SessionTelemetry) -> Result<SaveAck, PredictError> {
        let url = format!("{}/save-engagement", self.api_base);
        let ack: SaveAck = self.exchange(self.client.post(&url).json(telemetry)).await?;
        if !ack.success {
            return Err(PredictError::Rejected(
                ack.message.unwrap_or_else(|| "engagement not saved".to_string()),
            ));
        }
        Ok(ack)
    }

    async fn exchange<T: serde::de::DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, PredictError> {
        match tokio::time::timeout(self.timeout, send_and_decode(request)).await {
            Ok(result) => result,
            Err(_) => Err(PredictError::Timeout(self.timeout)),
        }
    }
}

impl PredictError {
    /// True for both the outer deadline and the HTTP client's own timeout.
    pub fn is_timeout(&self) -> bool {
        match self {
            PredictError::Timeout(_) => true,
            PredictError::Request(e) => e.is_timeout(),
            _ => false,
        }
    }
}

async fn send_and_decode<T: serde::de::DeserializeOwned>(
    request: reqwest::RequestBuilder,
) -> Result<T, PredictError> {
    let resp = request.send().await?;
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(PredictError::HttpStatus { status, body });
    }
    let bytes = resp.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}
