//! Session Telemetry
//!
//! The engagement snapshot plus interaction-order metadata for one
//! exploration session. Lives only as long as its owner; restarting a
//! session replaces it with a zeroed instance.

use serde::{Deserialize, Serialize};

use crate::engagement::EngagementSnapshot;
use crate::types::Modality;

/// One "became active" transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InteractionEntry {
    pub modality: Modality,
    pub timestamp_ms: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionTelemetry {
    pub engagement: EngagementSnapshot,
    pub first_interaction: Option<Modality>,
    pub interaction_sequence: Vec<InteractionEntry>,
}

impl SessionTelemetry {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_activation(&mut self, modality: Modality, timestamp_ms: i64) {
        if self.first_interaction.is_none() {
            self.first_interaction = Some(modality);
        }
        self.interaction_sequence.push(InteractionEntry {
            modality,
            timestamp_ms,
        });
    }

    /// Number of distinct modalities that have been activated at least once.
    pub fn distinct_modalities(&self) -> usize {
        Modality::ALL
            .iter()
            .filter(|m| self.engagement.common(**m).clicks > 0)
            .count()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
