//! Local Classifier
//!
//! Network-independent fallback: the dominant style is the category chosen
//! most often in the questionnaire. Ties go to the earliest category in
//! enumeration order (Visual, Auditory, Reading, Kinesthetic).

use serde::Serialize;

use crate::types::{Modality, MODALITY_COUNT};

/// Answers per category, indexed by category.
pub fn tally(answers: &[u8]) -> [usize; MODALITY_COUNT] {
    let mut counts = [0usize; MODALITY_COUNT];
    for answer in answers {
        if let Some(slot) = counts.get_mut(*answer as usize) {
            *slot += 1;
        }
    }
    counts
}

pub fn score(answers: &[u8]) -> Modality {
    let counts = tally(answers);
    let mut best = 0usize;
    for (i, count) in counts.iter().enumerate().skip(1) {
        if *count > counts[best] {
            best = i;
        }
    }
    Modality::ALL[best]
}

pub fn describe(style: Modality) -> &'static str {
    match style {
        Modality::Visual => "You learn best through visual aids such as diagrams, charts, videos, and spatial understanding. Visual learners often prefer to see information presented graphically and may think in pictures. To optimize your learning, use color-coding, mind maps, and visual cues when studying.",
        Modality::Auditory => "You learn best through listening and verbal communication. Auditory learners benefit from discussions, lectures, and talking through concepts. To enhance your learning, consider reading aloud, participating in group discussions, and using voice recordings for review.",
        Modality::Reading => "You learn best through written words and text-based input. Reading/writing learners excel when information is displayed as text and benefit from making lists, reading textbooks, and taking detailed notes. To maximize your learning, focus on text-based resources and writing summaries of information.",
        Modality::Kinesthetic => "You learn best through physical activities and hands-on experiences. Kinesthetic learners need to touch, move, and do in order to understand concepts fully. To improve your learning, incorporate movement into study sessions, use hands-on experiments, and take frequent breaks for physical activity.",
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocalClassification {
    pub style: Modality,
    pub description: &'static str,
    pub tally: [usize; MODALITY_COUNT],
}

pub fn classify_answers(answers: &[u8]) -> LocalClassification {
    let style = score(answers);
    LocalClassification {
        style,
        description: describe(style),
        tally: tally(answers),
    }
}
