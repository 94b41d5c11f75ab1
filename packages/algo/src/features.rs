//! Engagement Feature Summary
//!
//! Read-only aggregates over a finished session (totals, per-modality
//! ratios and weighted interaction scores, answer tally) shown next to a
//! classification result.

use serde::{Deserialize, Serialize};

use crate::engagement::EngagementSnapshot;
use crate::scoring::tally;
use crate::types::{LearningStyleScores, Modality, MODALITY_COUNT};

/// Aggregates derived from an engagement snapshot and questionnaire answers,
/// for display next to a classification result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngagementFeatures {
    pub total_clicks: u32,
    pub total_time: u64,
    pub total_hover: u64,
    pub total_revisits: u32,
    pub click_ratio: LearningStyleScores,
    pub time_ratio: LearningStyleScores,
    pub engagement_score: LearningStyleScores,
    pub answer_counts: [usize; MODALITY_COUNT],
    pub answer_consistency: f64,
}

impl EngagementFeatures {
    pub const DIM: usize = 14;

    pub fn from_session(engagement: &EngagementSnapshot, answers: &[u8]) -> Self {
        let total_clicks = engagement.total_clicks();
        let total_time = engagement.total_time_spent();
        let total_hover: u64 = Modality::ALL
            .iter()
            .map(|m| engagement.common(*m).hover_time)
            .sum();
        let total_revisits: u32 = Modality::ALL
            .iter()
            .map(|m| engagement.common(*m).revisits)
            .sum();

        let mut click_ratio = zero_scores();
        let mut time_ratio = zero_scores();
        for modality in Modality::ALL {
            let common = engagement.common(modality);
            *click_ratio.get_mut(modality) = common.clicks as f64 / (total_clicks as f64 + 1.0);
            *time_ratio.get_mut(modality) = common.time_spent as f64 / (total_time as f64 + 1.0);
        }

        let answer_counts = tally(answers);
        let answer_consistency = if answers.is_empty() {
            0.0
        } else {
            answer_counts.iter().copied().max().unwrap_or(0) as f64 / answers.len() as f64
        };

        Self {
            total_clicks,
            total_time,
            total_hover,
            total_revisits,
            click_ratio,
            time_ratio,
            engagement_score: engagement_scores(engagement),
            answer_counts,
            answer_consistency,
        }
    }

    /// Modality with the strongest content-interaction score; earlier
    /// modalities win ties.
    pub fn most_engaged(&self) -> Modality {
        self.engagement_score.dominant()
    }

    pub fn to_vec(&self) -> Vec<f64> {
        let mut out = Vec::with_capacity(Self::DIM);
        for modality in Modality::ALL {
            out.push(self.click_ratio.get(modality));
            out.push(self.time_ratio.get(modality));
            out.push(self.engagement_score.get(modality));
        }
        out.push(self.total_revisits as f64);
        out.push(self.answer_consistency);
        out
    }
}

fn zero_scores() -> LearningStyleScores {
    LearningStyleScores {
        visual: 0.0,
        auditory: 0.0,
        reading: 0.0,
        kinesthetic: 0.0,
    }
}

fn engagement_scores(engagement: &EngagementSnapshot) -> LearningStyleScores {
    let visual = &engagement.visual;
    let auditory = &engagement.auditory;
    let reading = &engagement.reading;
    let kinesthetic = &engagement.kinesthetic;
    let first_success = if kinesthetic.first_attempt_success == Some(true) {
        1.0
    } else {
        0.0
    };

    LearningStyleScores {
        visual: visual.video_plays as f64 * 2.0
            + visual.video_completion / 100.0 * 5.0
            + visual.video_pauses as f64 * 0.5,
        auditory: auditory.audio_plays as f64 * 2.0
            + auditory.audio_completion / 100.0 * 5.0
            + auditory.seek_events as f64 * 1.5
            + auditory.audio_pauses as f64 * 0.5,
        reading: reading.max_scroll_depth / 100.0 * 5.0 + reading.text_selections as f64 * 2.0,
        kinesthetic: kinesthetic.drag_attempts as f64 * 0.5
            + kinesthetic.correct_drops as f64 * 3.0
            - kinesthetic.incorrect_drops as f64 * 0.5
            + first_success * 5.0,
    }
}
