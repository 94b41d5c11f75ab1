//! Exploration session context.
//!
//! Owns the single-writer telemetry (through the recorder) and the
//! questionnaire for one run of the discovery flow, and threads both into
//! the classification client on submission.

use std::sync::Arc;

use chrono::Utc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use vark_algo::{
    Advance, EngagementFeatures, EngagementRecorder, QuestionBank, Questionnaire,
    QuestionnaireError, SessionTelemetry,
};

use crate::classification::{ClassificationClient, ClassificationResult};
use crate::events::{
    ClassificationCompletePayload, EventBus, FlowEvent, QuestionnaireStartedPayload,
    SessionRestartedPayload, SessionStartedPayload,
};

/// Explored activities required before the kids flow lets the user continue.
pub const KIDS_MIN_EXPLORED: usize = 2;

pub struct ExplorationSession {
    id: String,
    recorder: EngagementRecorder,
    questionnaire: Questionnaire,
    classifier: ClassificationClient,
    bus: Arc<EventBus>,
    save_on_exit: bool,
    result: Option<ClassificationResult>,
}

impl ExplorationSession {
    pub async fn start(
        bank: QuestionBank,
        classifier: ClassificationClient,
        bus: Arc<EventBus>,
        save_on_exit: bool,
    ) -> Self {
        let session = Self {
            id: uuid::Uuid::new_v4().to_string(),
            recorder: EngagementRecorder::new(),
            questionnaire: Questionnaire::new(bank),
            classifier,
            bus,
            save_on_exit,
            result: None,
        };
        session.announce_start().await;
        session
    }

    async fn announce_start(&self) {
        debug!(session_id = %self.id, "exploration session started");
        self.bus
            .publish(FlowEvent::SessionStarted(SessionStartedPayload {
                session_id: self.id.clone(),
                timestamp: Utc::now(),
            }))
            .await;
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn recorder(&self) -> &EngagementRecorder {
        &self.recorder
    }

    pub fn recorder_mut(&mut self) -> &mut EngagementRecorder {
        &mut self.recorder
    }

    pub fn telemetry(&self) -> &SessionTelemetry {
        self.recorder.telemetry()
    }

    pub fn questionnaire(&self) -> &Questionnaire {
        &self.questionnaire
    }

    pub fn result(&self) -> Option<&ClassificationResult> {
        self.result.as_ref()
    }

    pub fn can_continue(&self, min_explored: usize) -> bool {
        self.telemetry().distinct_modalities() >= min_explored
    }

    pub fn features(&self) -> EngagementFeatures {
        let answers = self
            .questionnaire
            .response()
            .map(|r| r.answers)
            .unwrap_or_default();
        EngagementFeatures::from_session(self.recorder.engagement(), &answers)
    }

    /// Leaves the exploration page: stops every engagement clock and
    /// announces the questionnaire. Time spent answering is not credited to
    /// any modality.
    pub async fn begin_questionnaire(&mut self, now_ms: i64) {
        self.recorder.close(now_ms);
        self.bus
            .publish(FlowEvent::QuestionnaireStarted(QuestionnaireStartedPayload {
                session_id: self.id.clone(),
                explored_modalities: self.telemetry().distinct_modalities(),
                question_count: self.questionnaire.bank().len(),
                timestamp: Utc::now(),
            }))
            .await;
    }

    /// Abrupt exit. Flushes the active clock and, when enabled, posts the
    /// telemetry without waiting for an answer. Returns the spawned task so
    /// callers may await it, though nothing requires them to.
    pub fn exit_hook(&mut self, now_ms: i64) -> Option<JoinHandle<()>> {
        self.recorder.flush_active(now_ms);
        if !self.save_on_exit {
            return None;
        }

        let runtime = match tokio::runtime::Handle::try_current() {
            Ok(handle) => handle,
            Err(_) => {
                debug!(session_id = %self.id, "no async runtime, skipping engagement save");
                return None;
            }
        };

        let client = self.classifier.predict_client().clone();
        let telemetry = self.recorder.telemetry().clone();
        let session_id = self.id.clone();
        Some(runtime.spawn(async move {
            match client.save_engagement(&telemetry).await {
                Ok(_) => debug!(session_id = %session_id, "engagement saved"),
                Err(e) => warn!(session_id = %session_id, error = %e, "engagement save failed"),
            }
        }))
    }

    pub fn select_option(&mut self, option_index: usize) -> Result<(), QuestionnaireError> {
        self.questionnaire.select_option(option_index)
    }

    pub fn go_back(&mut self) -> bool {
        self.questionnaire.retreat()
    }

    /// Moves to the next question, or on the last one submits and classifies.
    pub async fn advance(
        &mut self,
        now_ms: i64,
    ) -> Result<Option<ClassificationResult>, QuestionnaireError> {
        match self.questionnaire.advance()? {
            Advance::Next(_) => Ok(None),
            Advance::Submitted(_) => Ok(self.classify(now_ms).await),
        }
    }

    /// Classifies the submitted answers and emits the navigation trigger.
    /// `None` until the questionnaire has been submitted.
    pub async fn classify(&mut self, now_ms: i64) -> Option<ClassificationResult> {
        let answers = self.questionnaire.response()?;
        self.recorder.flush_active(now_ms);

        let result = self
            .classifier
            .classify(self.recorder.engagement(), &answers)
            .await;
        info!(
            session_id = %self.id,
            style = %result.style,
            source = ?result.source,
            "classification ready"
        );

        self.bus
            .publish(FlowEvent::ClassificationComplete(ClassificationCompletePayload {
                session_id: self.id.clone(),
                result: result.clone(),
                timestamp: Utc::now(),
            }))
            .await;

        self.result = Some(result.clone());
        Some(result)
    }

    /// Discards all telemetry and answers and starts over under a new id.
    pub async fn restart(&mut self) {
        let previous = std::mem::replace(&mut self.id, uuid::Uuid::new_v4().to_string());
        self.recorder.restart();
        self.questionnaire.reset();
        self.result = None;

        self.bus
            .publish(FlowEvent::SessionRestarted(SessionRestartedPayload {
                session_id: previous,
                timestamp: Utc::now(),
            }))
            .await;
        self.announce_start().await;
    }
}
