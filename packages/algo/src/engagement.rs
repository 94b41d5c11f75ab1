//! Engagement Metrics
//!
//! Per-modality interaction counters. The serialized shape (camelCase keys,
//! whole-second durations) is the `engagement` object sent to the remote
//! classifier.

use serde::{Deserialize, Serialize};

use crate::types::Modality;

/// Counters every modality carries.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InteractionMetrics {
    /// Activation events on the content block
    pub clicks: u32,
    /// Dwell time while active (seconds)
    pub time_spent: u64,
    /// Pointer hover time, independent of the active clock (seconds)
    pub hover_time: u64,
    /// Re-entries after another modality became active
    pub revisits: u32,
    #[serde(skip)]
    time_spent_ms: u64,
    #[serde(skip)]
    hover_time_ms: u64,
}

impl InteractionMetrics {
    pub fn time_spent_ms(&self) -> u64 {
        self.time_spent_ms
    }

    pub fn hover_time_ms(&self) -> u64 {
        self.hover_time_ms
    }

    // whole seconds are assigned by the snapshot, see `EngagementSnapshot::add_time_spent_ms`
    fn add_raw_time_spent_ms(&mut self, ms: u64) {
        self.time_spent_ms = self.time_spent_ms.saturating_add(ms);
    }

    pub(crate) fn add_hover_ms(&mut self, ms: u64) {
        self.hover_time_ms = self.hover_time_ms.saturating_add(ms);
        self.hover_time = self.hover_time_ms / 1000;
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisualMetrics {
    #[serde(flatten)]
    pub common: InteractionMetrics,
    pub video_plays: u32,
    pub video_pauses: u32,
    /// Seconds of playback between play and pause
    pub video_time_watched: u64,
    /// High-water mark of playback progress, 0-100
    pub video_completion: f64,
    #[serde(skip)]
    pub(crate) video_watched_ms: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditoryMetrics {
    #[serde(flatten)]
    pub common: InteractionMetrics,
    pub audio_plays: u32,
    pub audio_pauses: u32,
    pub audio_time_listened: u64,
    /// High-water mark of playback progress, 0-100
    pub audio_completion: f64,
    pub seek_events: u32,
    #[serde(skip)]
    pub(crate) audio_listened_ms: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadingMetrics {
    #[serde(flatten)]
    pub common: InteractionMetrics,
    /// Latest scroll position, 0-100
    pub scroll_depth: f64,
    /// Deepest scroll position seen, 0-100
    pub max_scroll_depth: f64,
    pub text_selections: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KinestheticMetrics {
    #[serde(flatten)]
    pub common: InteractionMetrics,
    pub drag_attempts: u32,
    pub correct_drops: u32,
    pub incorrect_drops: u32,
    /// Seconds from first drag to first full completion
    pub task_completion_time: Option<u64>,
    pub first_attempt_success: Option<bool>,
    pub reset_clicks: u32,
}

/// Full engagement mapping, one entry per modality.
///
/// Dwell seconds are handed out from the session total rather than floored
/// per modality: the sum of `time_spent` always equals the floored sum of
/// the millisecond totals. The modality whose flush crosses a second
/// boundary receives that second.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngagementSnapshot {
    pub visual: VisualMetrics,
    pub auditory: AuditoryMetrics,
    pub reading: ReadingMetrics,
    pub kinesthetic: KinestheticMetrics,
    #[serde(skip)]
    credited_secs: u64,
}

impl EngagementSnapshot {
    pub fn common(&self, modality: Modality) -> &InteractionMetrics {
        match modality {
            Modality::Visual => &self.visual.common,
            Modality::Auditory => &self.auditory.common,
            Modality::Reading => &self.reading.common,
            Modality::Kinesthetic => &self.kinesthetic.common,
        }
    }

    pub fn common_mut(&mut self, modality: Modality) -> &mut InteractionMetrics {
        match modality {
            Modality::Visual => &mut self.visual.common,
            Modality::Auditory => &mut self.auditory.common,
            Modality::Reading => &mut self.reading.common,
            Modality::Kinesthetic => &mut self.kinesthetic.common,
        }
    }

    pub(crate) fn add_time_spent_ms(&mut self, modality: Modality, ms: u64) {
        self.common_mut(modality).add_raw_time_spent_ms(ms);
        let total_secs = self.total_time_spent_ms() / 1000;
        let carry = total_secs.saturating_sub(self.credited_secs);
        self.common_mut(modality).time_spent += carry;
        self.credited_secs = self.credited_secs.max(total_secs);
    }

    pub fn total_time_spent_ms(&self) -> u64 {
        Modality::ALL
            .iter()
            .map(|m| self.common(*m).time_spent_ms())
            .sum()
    }

    pub fn total_time_spent(&self) -> u64 {
        Modality::ALL.iter().map(|m| self.common(*m).time_spent).sum()
    }

    pub fn total_clicks(&self) -> u32 {
        Modality::ALL.iter().map(|m| self.common(*m).clicks).sum()
    }
}
