//! Scripted replay of an exploration session.
//!
//! A script is a JSON document of timestamped interaction events followed
//! by the option chosen for each question:
//!
//! ```json
//! {
//!   "bank": "quick",
//!   "steps": [
//!     { "atMs": 0, "type": "activate", "modality": "visual" },
//!     { "atMs": 500, "type": "video_play" },
//!     { "atMs": 30000, "type": "activate", "modality": "kinesthetic" },
//!     { "atMs": 31000, "type": "drag_start", "label": "Evaporation" },
//!     { "atMs": 32000, "type": "drop", "slot": "step-1", "label": "Evaporation" }
//!   ],
//!   "answers": [3, 3, 0],
//!   "finishAtMs": 60000
//! }
//! ```

use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use vark_algo::{
    CycleLabel, EngagementFeatures, EngagementRecorder, Modality, QuestionBank,
    QuestionnaireError, SessionTelemetry, Slot,
};

use crate::classification::{ClassificationClient, ClassificationResult};
use crate::events::EventBus;
use crate::session::ExplorationSession;

#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("failed to read script: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid script: {0}")]
    Json(#[from] serde_json::Error),
    #[error("questionnaire: {0}")]
    Questionnaire(#[from] QuestionnaireError),
    #[error("unknown slot id: {0}")]
    UnknownSlot(String),
    #[error("unknown label id: {0}")]
    UnknownLabel(String),
    #[error("script answers {got} of {expected} questions")]
    AnswerCount { expected: usize, got: usize },
    #[error("questionnaire was not submitted")]
    NotSubmitted,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BankKind {
    #[default]
    Full,
    Quick,
}

impl BankKind {
    pub fn bank(self) -> QuestionBank {
        match self {
            BankKind::Full => QuestionBank::full(),
            BankKind::Quick => QuestionBank::quick(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InteractionEvent {
    Activate { modality: Modality },
    HoverStart { modality: Modality },
    HoverEnd { modality: Modality },
    VideoPlay,
    VideoPause,
    VideoProgress { position: f64, duration: f64 },
    AudioPlay,
    AudioPause,
    AudioTimeUpdate { position: f64, duration: f64 },
    Scroll { percent: f64 },
    TextSelected { text: String },
    DragStart { label: String },
    Drop { slot: String, label: String },
    ResetPuzzle,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptStep {
    pub at_ms: i64,
    #[serde(flatten)]
    pub event: InteractionEvent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplayScript {
    #[serde(default)]
    pub bank: BankKind,
    #[serde(default)]
    pub steps: Vec<ScriptStep>,
    /// Option index chosen for each question, in order.
    pub answers: Vec<usize>,
    /// Clock value used to close the exploration phase; defaults to the
    /// last step's timestamp.
    pub finish_at_ms: Option<i64>,
}

impl ReplayScript {
    pub fn from_json(json: &str) -> Result<Self, ReplayError> {
        Ok(serde_json::from_str(json)?)
    }

    pub async fn load(path: impl AsRef<Path>) -> Result<Self, ReplayError> {
        let raw = tokio::fs::read_to_string(path).await?;
        Self::from_json(&raw)
    }

    fn finish_at(&self) -> i64 {
        self.finish_at_ms
            .or_else(|| self.steps.last().map(|s| s.at_ms))
            .unwrap_or(0)
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplayOutcome {
    pub session_id: String,
    pub result: ClassificationResult,
    pub features: EngagementFeatures,
    pub telemetry: SessionTelemetry,
}

pub fn apply(recorder: &mut EngagementRecorder, step: &ScriptStep) -> Result<(), ReplayError> {
    let now = step.at_ms;
    match &step.event {
        InteractionEvent::Activate { modality } => recorder.on_modality_activate(*modality, now),
        InteractionEvent::HoverStart { modality } => recorder.on_hover_start(*modality, now),
        InteractionEvent::HoverEnd { modality } => recorder.on_hover_end(*modality, now),
        InteractionEvent::VideoPlay => recorder.on_video_play(now),
        InteractionEvent::VideoPause => recorder.on_video_pause(now),
        InteractionEvent::VideoProgress { position, duration } => {
            recorder.on_video_progress(*position, *duration)
        }
        InteractionEvent::AudioPlay => recorder.on_audio_play(now),
        InteractionEvent::AudioPause => recorder.on_audio_pause(now),
        InteractionEvent::AudioTimeUpdate { position, duration } => {
            recorder.on_audio_time_update(*position, *duration)
        }
        InteractionEvent::Scroll { percent } => recorder.on_scroll(*percent),
        InteractionEvent::TextSelected { text } => {
            recorder.on_text_selected(text);
        }
        InteractionEvent::DragStart { label } => {
            parse_label(label)?;
            recorder.on_drag_attempt(now);
        }
        InteractionEvent::Drop { slot, label } => {
            let slot = Slot::from_id(slot).ok_or_else(|| ReplayError::UnknownSlot(slot.clone()))?;
            let outcome = recorder.on_drop(slot, parse_label(label)?, now);
            debug!(slot = slot.id(), ?outcome, "replayed drop");
        }
        InteractionEvent::ResetPuzzle => recorder.on_reset(),
    }
    Ok(())
}

fn parse_label(id: &str) -> Result<CycleLabel, ReplayError> {
    CycleLabel::from_id(id).ok_or_else(|| ReplayError::UnknownLabel(id.to_string()))
}

/// Replays `script` through a fresh session and classifies the answers.
pub async fn run(
    script: &ReplayScript,
    classifier: ClassificationClient,
    bus: Arc<EventBus>,
) -> Result<ReplayOutcome, ReplayError> {
    let bank = script.bank.bank();
    if script.answers.len() != bank.len() {
        return Err(ReplayError::AnswerCount {
            expected: bank.len(),
            got: script.answers.len(),
        });
    }

    let mut session = ExplorationSession::start(bank, classifier, bus, false).await;
    for step in &script.steps {
        apply(session.recorder_mut(), step)?;
    }

    let finish_at = script.finish_at();
    session.begin_questionnaire(finish_at).await;

    let mut result = None;
    for option in &script.answers {
        session.select_option(*option)?;
        result = session.advance(finish_at).await?;
    }
    let result = result.ok_or(ReplayError::NotSubmitted)?;

    Ok(ReplayOutcome {
        session_id: session.id().to_string(),
        features: session.features(),
        telemetry: session.telemetry().clone(),
        result,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_script_parses_tagged_steps() {
        let script = ReplayScript::from_json(
            r#"{
                "bank": "quick",
                "steps": [
                    {"atMs": 0, "type": "activate", "modality": "auditory"},
                    {"atMs": 10, "type": "audio_time_update", "position": 4.5, "duration": 60},
                    {"atMs": 20, "type": "drop", "slot": "step-2", "label": "Condensation"},
                    {"atMs": 30, "type": "reset_puzzle"}
                ],
                "answers": [1, 1, 2]
            }"#,
        )
        .unwrap();

        assert_eq!(script.bank, BankKind::Quick);
        assert_eq!(script.steps.len(), 4);
        assert_eq!(
            script.steps[0].event,
            InteractionEvent::Activate {
                modality: Modality::Auditory
            }
        );
        assert_eq!(script.finish_at(), 30);
    }

    #[test]
    fn test_apply_drives_recorder() {
        let mut recorder = EngagementRecorder::new();
        let steps = [
            ScriptStep {
                at_ms: 0,
                event: InteractionEvent::Activate {
                    modality: Modality::Reading,
                },
            },
            ScriptStep {
                at_ms: 5_000,
                event: InteractionEvent::Scroll { percent: 40.0 },
            },
            ScriptStep {
                at_ms: 6_000,
                event: InteractionEvent::Activate {
                    modality: Modality::Kinesthetic,
                },
            },
        ];
        for step in &steps {
            apply(&mut recorder, step).unwrap();
        }

        assert_eq!(recorder.engagement().reading.common.time_spent, 6);
        assert_eq!(recorder.engagement().reading.max_scroll_depth, 40.0);
        assert_eq!(recorder.active(), Some(Modality::Kinesthetic));
    }

    #[test]
    fn test_unknown_ids_are_reported() {
        let mut recorder = EngagementRecorder::new();
        let bad_slot = ScriptStep {
            at_ms: 0,
            event: InteractionEvent::Drop {
                slot: "step-9".to_string(),
                label: "Evaporation".to_string(),
            },
        };
        assert!(matches!(
            apply(&mut recorder, &bad_slot),
            Err(ReplayError::UnknownSlot(s)) if s == "step-9"
        ));

        let bad_label = ScriptStep {
            at_ms: 0,
            event: InteractionEvent::DragStart {
                label: "Sublimation".to_string(),
            },
        };
        assert!(matches!(
            apply(&mut recorder, &bad_label),
            Err(ReplayError::UnknownLabel(_))
        ));
        assert_eq!(recorder.engagement().kinesthetic.drag_attempts, 0);
    }
}
