//! # vark-algo - learning-style discovery core
//!
//! Pure Rust, I/O-free building blocks for the VARK discovery flow:
//!
//! - **Engagement Recorder** - turns content-interaction events into per-modality metrics
//! - **Session Telemetry** - engagement snapshot plus interaction-order metadata
//! - **Questionnaire Collector** - forced-choice battery with explicit category tags
//! - **Local Classifier** - deterministic majority vote over questionnaire answers
//!
//! ## Modules
//!
//! - [`types`] - Modality, score breakdowns, constants
//! - [`engagement`] - per-modality metric records
//! - [`telemetry`] - session-scoped telemetry record
//! - [`puzzle`] - water-cycle drag-and-drop puzzle state
//! - [`recorder`] - engagement recorder
//! - [`questionnaire`] - question banks and the collector state machine
//! - [`scoring`] - local fallback classifier
//! - [`features`] - derived engagement aggregates
//!
//! ## Example
//!
//! ```rust
//! use vark_algo::{EngagementRecorder, Modality, Questionnaire, QuestionBank, Advance};
//!
//! let mut recorder = EngagementRecorder::new();
//! recorder.on_modality_activate(Modality::Visual, 0);
//! recorder.on_modality_activate(Modality::Reading, 30_000);
//! recorder.flush_active(45_000);
//! assert_eq!(recorder.engagement().visual.common.time_spent, 30);
//!
//! let mut questionnaire = Questionnaire::new(QuestionBank::quick());
//! let response = loop {
//!     questionnaire.select_option(2).unwrap();
//!     if let Advance::Submitted(response) = questionnaire.advance().unwrap() {
//!         break response;
//!     }
//! };
//! assert_eq!(vark_algo::scoring::score(&response.answers), Modality::Reading);
//! ```

// ============================================================================
// Modules
// ============================================================================

pub mod engagement;
pub mod features;
pub mod puzzle;
pub mod questionnaire;
pub mod recorder;
pub mod scoring;
pub mod telemetry;
pub mod types;

// ============================================================================
// Re-exports
// ============================================================================

pub use types::*;

pub use engagement::{
    AuditoryMetrics, EngagementSnapshot, InteractionMetrics, KinestheticMetrics, ReadingMetrics,
    VisualMetrics,
};

pub use features::EngagementFeatures;

pub use puzzle::{CycleLabel, DragPuzzle, DropOutcome, Slot};

pub use questionnaire::{
    Advance, Question, QuestionBank, QuestionOption, Questionnaire, QuestionnaireError,
    QuestionnaireResponse, QuestionnaireState,
};

pub use recorder::EngagementRecorder;

pub use scoring::LocalClassification;

pub use telemetry::{InteractionEntry, SessionTelemetry};
