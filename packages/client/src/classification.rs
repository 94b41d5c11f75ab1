//! Classification Client
//!
//! One remote attempt, then the local majority-vote classifier on any
//! failure. Callers always get a fully populated result from exactly one
//! of the two paths.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use vark_algo::scoring;
use vark_algo::{
    EngagementSnapshot, LearningStyleScores, Modality, QuestionnaireResponse, FALLBACK_CONFIDENCE,
};

use crate::predict::{PredictClient, PredictError, RemotePrediction};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResultSource {
    Remote,
    LocalFallback,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationResult {
    pub style: Modality,
    pub description: String,
    pub confidence: f64,
    /// Per-style scores keyed by style name; empty on the fallback path.
    pub all_scores: BTreeMap<String, f64>,
    pub source: ResultSource,
    /// Advisory text shown next to a fallback result.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

impl ClassificationResult {
    pub fn from_remote(prediction: RemotePrediction) -> Self {
        Self {
            style: prediction.style,
            description: prediction.description,
            confidence: prediction.confidence,
            all_scores: prediction.all_scores,
            source: ResultSource::Remote,
            warning: None,
        }
    }

    pub fn local_fallback(answers: &QuestionnaireResponse, error: &PredictError) -> Self {
        let local = scoring::classify_answers(&answers.answers);
        Self {
            style: local.style,
            description: local.description.to_string(),
            confidence: FALLBACK_CONFIDENCE,
            all_scores: BTreeMap::new(),
            source: ResultSource::LocalFallback,
            warning: Some(format!(
                "Prediction service unavailable ({error}); showing an estimate from your answers."
            )),
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.source == ResultSource::LocalFallback
    }

    /// Remote scores as a typed breakdown, normalized to sum to one.
    /// `None` on the fallback path.
    pub fn score_breakdown(&self) -> Option<LearningStyleScores> {
        if self.all_scores.is_empty() {
            return None;
        }
        let mut scores = LearningStyleScores::from_map(&self.all_scores);
        scores.normalize();
        Some(scores)
    }
}

#[derive(Clone)]
pub struct ClassificationClient {
    predict: PredictClient,
}

impl ClassificationClient {
    pub fn new(predict: PredictClient) -> Self {
        Self { predict }
    }

    pub fn predict_client(&self) -> &PredictClient {
        &self.predict
    }

    pub async fn classify(
        &self,
        engagement: &EngagementSnapshot,
        answers: &QuestionnaireResponse,
    ) -> ClassificationResult {
        match self.predict.predict(engagement, answers).await {
            Ok(prediction) => {
                let result = ClassificationResult::from_remote(prediction);
                info!(
                    style = %result.style,
                    confidence = result.confidence,
                    "remote classification complete"
                );
                result
            }
            Err(err) => {
                warn!(error = %err, "remote classification failed, using local fallback");
                let result = ClassificationResult::local_fallback(answers, &err);
                info!(style = %result.style, "local classification complete");
                result
            }
        }
    }
}
