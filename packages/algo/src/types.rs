//! Common Types and Constants
//!
//! Shared data structures used across all algorithm modules.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ==================== Constants ====================

/// Playback-position jump (seconds) above which an audio sample counts as a seek
pub const SEEK_THRESHOLD_SECS: f64 = 2.0;

/// Confidence reported by the local fallback classifier
pub const FALLBACK_CONFIDENCE: f64 = 0.85;

/// Number of questions in the full questionnaire battery
pub const FULL_QUESTION_COUNT: usize = 10;

/// Number of modality categories
pub const MODALITY_COUNT: usize = 4;

// ==================== Modality ====================

/// One of the four VARK categories.
///
/// Enumeration order is significant: it is the category index used by
/// questionnaire answers and the tie-break order of the local classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Modality {
    Visual,
    Auditory,
    Reading,
    Kinesthetic,
}

impl Modality {
    pub const ALL: [Modality; MODALITY_COUNT] = [
        Modality::Visual,
        Modality::Auditory,
        Modality::Reading,
        Modality::Kinesthetic,
    ];

    pub fn from_index(index: u8) -> Option<Self> {
        Self::ALL.get(index as usize).copied()
    }

    pub fn to_index(self) -> u8 {
        match self {
            Modality::Visual => 0,
            Modality::Auditory => 1,
            Modality::Reading => 2,
            Modality::Kinesthetic => 3,
        }
    }

    /// Style name as shown to the user and returned by the remote classifier.
    pub fn style_name(self) -> &'static str {
        match self {
            Modality::Visual => "Visual",
            Modality::Auditory => "Auditory",
            Modality::Reading => "Reading",
            Modality::Kinesthetic => "Kinesthetic",
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            Modality::Visual => "visual",
            Modality::Auditory => "auditory",
            Modality::Reading => "reading",
            Modality::Kinesthetic => "kinesthetic",
        }
    }
}

impl fmt::Display for Modality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.style_name())
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown learning style: {0}")]
pub struct ParseModalityError(pub String);

/// Accepts both the engagement key ("visual") and the style name ("Visual").
/// "read-write" is an alias for reading.
impl FromStr for Modality {
    type Err = ParseModalityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "visual" => Ok(Modality::Visual),
            "auditory" => Ok(Modality::Auditory),
            "reading" | "read-write" | "reading/writing" => Ok(Modality::Reading),
            "kinesthetic" => Ok(Modality::Kinesthetic),
            _ => Err(ParseModalityError(s.to_string())),
        }
    }
}

// ==================== Scores ====================

/// Per-style probability breakdown.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LearningStyleScores {
    pub visual: f64,
    pub auditory: f64,
    pub reading: f64,
    pub kinesthetic: f64,
}

impl Default for LearningStyleScores {
    fn default() -> Self {
        Self {
            visual: 0.25,
            auditory: 0.25,
            reading: 0.25,
            kinesthetic: 0.25,
        }
    }
}

impl LearningStyleScores {
    /// Builds scores from a style-name keyed map such as the remote `all_scores`.
    /// Unknown keys are ignored and missing styles score zero.
    pub fn from_map(map: &BTreeMap<String, f64>) -> Self {
        let mut scores = Self {
            visual: 0.0,
            auditory: 0.0,
            reading: 0.0,
            kinesthetic: 0.0,
        };
        for (name, value) in map {
            if let Ok(modality) = name.parse::<Modality>() {
                *scores.get_mut(modality) = *value;
            }
        }
        scores
    }

    pub fn get(&self, modality: Modality) -> f64 {
        match modality {
            Modality::Visual => self.visual,
            Modality::Auditory => self.auditory,
            Modality::Reading => self.reading,
            Modality::Kinesthetic => self.kinesthetic,
        }
    }

    pub fn get_mut(&mut self, modality: Modality) -> &mut f64 {
        match modality {
            Modality::Visual => &mut self.visual,
            Modality::Auditory => &mut self.auditory,
            Modality::Reading => &mut self.reading,
            Modality::Kinesthetic => &mut self.kinesthetic,
        }
    }

    pub fn normalize(&mut self) {
        let total = self.visual + self.auditory + self.reading + self.kinesthetic;
        if total > 0.0 {
            self.visual /= total;
            self.auditory /= total;
            self.reading /= total;
            self.kinesthetic /= total;
        }
    }

    /// Highest-scoring style; earlier modalities win ties.
    pub fn dominant(&self) -> Modality {
        let mut best = Modality::Visual;
        for modality in Modality::ALL.iter().skip(1) {
            if self.get(*modality) > self.get(best) {
                best = *modality;
            }
        }
        best
    }
}
