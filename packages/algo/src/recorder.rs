//! Engagement Recorder
//!
//! Translates raw content-interaction events into mutations of a
//! [`SessionTelemetry`]. Every handler writes straight into the owned
//! telemetry, so a read at any point sees current values.
//!
//! Timestamps are Unix milliseconds supplied by the caller. A timestamp
//! earlier than the clock it is compared against contributes zero time.
//!
//! Exactly one modality is active at a time (or none before the first
//! activation). Switching flushes elapsed time into the outgoing modality
//! before the incoming one's clock starts, so dwell time is never counted
//! twice.

use crate::engagement::EngagementSnapshot;
use crate::puzzle::{CycleLabel, DragPuzzle, DropOutcome, Slot};
use crate::telemetry::SessionTelemetry;
use crate::types::{Modality, MODALITY_COUNT, SEEK_THRESHOLD_SECS};

#[derive(Debug, Clone, Default)]
pub struct EngagementRecorder {
    telemetry: SessionTelemetry,
    active: Option<Modality>,
    active_since_ms: i64,
    hover_started_ms: [Option<i64>; MODALITY_COUNT],
    video_playing_since_ms: Option<i64>,
    audio_playing_since_ms: Option<i64>,
    last_audio_position: Option<f64>,
    puzzle: DragPuzzle,
    drag_started_ms: Option<i64>,
    puzzle_completed: bool,
    // incorrect drop or reset seen before the first completion
    puzzle_faulted: bool,
}

fn elapsed_ms(since_ms: i64, now_ms: i64) -> u64 {
    now_ms.saturating_sub(since_ms).max(0) as u64
}

fn completion_percent(position_secs: f64, duration_secs: f64) -> Option<f64> {
    if !position_secs.is_finite() || !duration_secs.is_finite() || duration_secs <= 0.0 {
        return None;
    }
    Some((position_secs / duration_secs * 100.0).clamp(0.0, 100.0))
}

impl EngagementRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn telemetry(&self) -> &SessionTelemetry {
        &self.telemetry
    }

    pub fn engagement(&self) -> &EngagementSnapshot {
        &self.telemetry.engagement
    }

    pub fn active(&self) -> Option<Modality> {
        self.active
    }

    pub fn puzzle(&self) -> &DragPuzzle {
        &self.puzzle
    }

    // ==================== Active modality ====================

    /// Activation of a content block (click/focus).
    ///
    /// Re-activating the already active modality flushes its running time and
    /// counts the click, but is not a revisit and is not appended to the
    /// interaction sequence.
    pub fn on_modality_activate(&mut self, modality: Modality, now_ms: i64) {
        let previous = self.active;
        self.flush_active(now_ms);

        let is_switch = previous != Some(modality);
        let metrics = self.telemetry.engagement.common_mut(modality);
        if is_switch && metrics.clicks > 0 {
            metrics.revisits += 1;
        }
        metrics.clicks += 1;

        self.active = Some(modality);
        self.active_since_ms = now_ms;

        if is_switch {
            self.telemetry.record_activation(modality, now_ms);
        }
    }

    /// Credits time since the last flush to the active modality without
    /// changing which modality is active. Calling it twice in a row adds
    /// nothing the second time.
    pub fn flush_active(&mut self, now_ms: i64) {
        if let Some(active) = self.active {
            let elapsed = elapsed_ms(self.active_since_ms, now_ms);
            self.telemetry.engagement.add_time_spent_ms(active, elapsed);
            self.active_since_ms = self.active_since_ms.max(now_ms);
        }
        self.flush_media(now_ms);
    }

    /// Leaves the exploration content: credits the active modality, any
    /// playing media and open hovers up to `now_ms`, then stops every clock.
    /// Later flushes add nothing until a modality is activated again.
    pub fn close(&mut self, now_ms: i64) {
        self.flush_active(now_ms);
        self.active = None;
        self.video_playing_since_ms = None;
        self.audio_playing_since_ms = None;
        for modality in Modality::ALL {
            self.on_hover_end(modality, now_ms);
        }
    }

    fn flush_media(&mut self, now_ms: i64) {
        if let Some(since) = self.video_playing_since_ms.as_mut() {
            let visual = &mut self.telemetry.engagement.visual;
            visual.video_watched_ms += elapsed_ms(*since, now_ms);
            visual.video_time_watched = visual.video_watched_ms / 1000;
            *since = (*since).max(now_ms);
        }
        if let Some(since) = self.audio_playing_since_ms.as_mut() {
            let auditory = &mut self.telemetry.engagement.auditory;
            auditory.audio_listened_ms += elapsed_ms(*since, now_ms);
            auditory.audio_time_listened = auditory.audio_listened_ms / 1000;
            *since = (*since).max(now_ms);
        }
    }

    // ==================== Hover ====================

    pub fn on_hover_start(&mut self, modality: Modality, now_ms: i64) {
        let slot = &mut self.hover_started_ms[modality.to_index() as usize];
        if slot.is_none() {
            *slot = Some(now_ms);
        }
    }

    pub fn on_hover_end(&mut self, modality: Modality, now_ms: i64) {
        if let Some(started) = self.hover_started_ms[modality.to_index() as usize].take() {
            self.telemetry
                .engagement
                .common_mut(modality)
                .add_hover_ms(elapsed_ms(started, now_ms));
        }
    }

    // ==================== Media ====================

    pub fn on_video_play(&mut self, now_ms: i64) {
        self.telemetry.engagement.visual.video_plays += 1;
        self.video_playing_since_ms.get_or_insert(now_ms);
    }

    pub fn on_video_pause(&mut self, now_ms: i64) {
        self.telemetry.engagement.visual.video_pauses += 1;
        self.flush_media(now_ms);
        self.video_playing_since_ms = None;
    }

    pub fn on_video_progress(&mut self, position_secs: f64, duration_secs: f64) {
        if let Some(percent) = completion_percent(position_secs, duration_secs) {
            let visual = &mut self.telemetry.engagement.visual;
            visual.video_completion = visual.video_completion.max(percent);
        }
    }

    pub fn on_audio_play(&mut self, now_ms: i64) {
        self.telemetry.engagement.auditory.audio_plays += 1;
        self.audio_playing_since_ms.get_or_insert(now_ms);
    }

    pub fn on_audio_pause(&mut self, now_ms: i64) {
        self.telemetry.engagement.auditory.audio_pauses += 1;
        self.flush_media(now_ms);
        self.audio_playing_since_ms = None;
    }

    /// Playback-position sample. A jump of more than two seconds from the
    /// previous sample, in either direction, is a seek.
    pub fn on_audio_time_update(&mut self, position_secs: f64, duration_secs: f64) {
        if !position_secs.is_finite() {
            return;
        }
        let auditory = &mut self.telemetry.engagement.auditory;
        if let Some(last) = self.last_audio_position {
            if (position_secs - last).abs() > SEEK_THRESHOLD_SECS {
                auditory.seek_events += 1;
            }
        }
        self.last_audio_position = Some(position_secs);

        if let Some(percent) = completion_percent(position_secs, duration_secs) {
            auditory.audio_completion = auditory.audio_completion.max(percent);
        }
    }

    // ==================== Reading ====================

    pub fn on_scroll(&mut self, percent: f64) {
        if !percent.is_finite() {
            return;
        }
        let percent = percent.clamp(0.0, 100.0);
        let reading = &mut self.telemetry.engagement.reading;
        reading.scroll_depth = percent;
        reading.max_scroll_depth = reading.max_scroll_depth.max(percent);
    }

    /// Returns whether the selection counted (blank selections do not).
    pub fn on_text_selected(&mut self, selection: &str) -> bool {
        if selection.trim().is_empty() {
            return false;
        }
        self.telemetry.engagement.reading.text_selections += 1;
        true
    }

    // ==================== Kinesthetic ====================

    pub fn on_drag_attempt(&mut self, now_ms: i64) {
        self.telemetry.engagement.kinesthetic.drag_attempts += 1;
        self.drag_started_ms.get_or_insert(now_ms);
    }

    pub fn on_drop(&mut self, slot: Slot, label: CycleLabel, now_ms: i64) -> DropOutcome {
        let outcome = self.puzzle.place(slot, label);
        let kinesthetic = &mut self.telemetry.engagement.kinesthetic;
        match outcome {
            DropOutcome::Rejected => return outcome,
            DropOutcome::Correct => kinesthetic.correct_drops += 1,
            DropOutcome::Incorrect => {
                kinesthetic.incorrect_drops += 1;
                if !self.puzzle_completed {
                    self.puzzle_faulted = true;
                }
            }
        }

        if !self.puzzle_completed && self.puzzle.is_complete() {
            self.puzzle_completed = true;
            let started = *self.drag_started_ms.get_or_insert(now_ms);
            kinesthetic.task_completion_time = Some(elapsed_ms(started, now_ms) / 1000);
            kinesthetic.first_attempt_success =
                Some(self.puzzle.all_correct() && !self.puzzle_faulted);
        }

        outcome
    }

    /// Clears slot placements. Counters and the completion clock are kept.
    pub fn on_reset(&mut self) {
        self.puzzle.clear();
        self.telemetry.engagement.kinesthetic.reset_clicks += 1;
        if !self.puzzle_completed {
            self.puzzle_faulted = true;
        }
    }

    // ==================== Lifecycle ====================

    /// Discards all recorded data and starts a fresh session.
    pub fn restart(&mut self) {
        *self = Self::new();
    }

    pub fn into_telemetry(self) -> SessionTelemetry {
        self.telemetry
    }
}
