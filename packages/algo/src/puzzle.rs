//! Water-cycle ordering puzzle used by the kinesthetic content block.
//!
//! Three labels are dragged into three ordered slots. Placement state only;
//! attempt counting and timing live in the recorder.

use serde::{Deserialize, Serialize};

pub const SLOT_COUNT: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Slot {
    #[serde(rename = "step-1")]
    Step1,
    #[serde(rename = "step-2")]
    Step2,
    #[serde(rename = "step-3")]
    Step3,
}

impl Slot {
    pub const ALL: [Slot; SLOT_COUNT] = [Slot::Step1, Slot::Step2, Slot::Step3];

    pub fn from_id(id: &str) -> Option<Self> {
        match id {
            "step-1" => Some(Slot::Step1),
            "step-2" => Some(Slot::Step2),
            "step-3" => Some(Slot::Step3),
            _ => None,
        }
    }

    pub fn id(self) -> &'static str {
        match self {
            Slot::Step1 => "step-1",
            Slot::Step2 => "step-2",
            Slot::Step3 => "step-3",
        }
    }

    fn position(self) -> usize {
        match self {
            Slot::Step1 => 0,
            Slot::Step2 => 1,
            Slot::Step3 => 2,
        }
    }

    /// Label that belongs in this slot.
    pub fn expected(self) -> CycleLabel {
        match self {
            Slot::Step1 => CycleLabel::Evaporation,
            Slot::Step2 => CycleLabel::Condensation,
            Slot::Step3 => CycleLabel::Precipitation,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CycleLabel {
    Evaporation,
    Condensation,
    Precipitation,
}

impl CycleLabel {
    pub const ALL: [CycleLabel; SLOT_COUNT] = [
        CycleLabel::Evaporation,
        CycleLabel::Condensation,
        CycleLabel::Precipitation,
    ];

    pub fn from_id(id: &str) -> Option<Self> {
        match id {
            "Evaporation" => Some(CycleLabel::Evaporation),
            "Condensation" => Some(CycleLabel::Condensation),
            "Precipitation" => Some(CycleLabel::Precipitation),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropOutcome {
    /// Label already sits in some slot; nothing changed
    Rejected,
    Correct,
    Incorrect,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DragPuzzle {
    slots: [Option<CycleLabel>; SLOT_COUNT],
}

impl DragPuzzle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Places `label` into `slot`, replacing any occupant.
    pub fn place(&mut self, slot: Slot, label: CycleLabel) -> DropOutcome {
        if self.is_placed(label) {
            return DropOutcome::Rejected;
        }
        self.slots[slot.position()] = Some(label);
        if slot.expected() == label {
            DropOutcome::Correct
        } else {
            DropOutcome::Incorrect
        }
    }

    pub fn is_placed(&self, label: CycleLabel) -> bool {
        self.slots.iter().any(|s| *s == Some(label))
    }

    pub fn occupant(&self, slot: Slot) -> Option<CycleLabel> {
        self.slots[slot.position()]
    }

    pub fn is_complete(&self) -> bool {
        self.slots.iter().all(Option::is_some)
    }

    pub fn all_correct(&self) -> bool {
        Slot::ALL
            .iter()
            .all(|slot| self.occupant(*slot) == Some(slot.expected()))
    }

    /// Labels not yet placed, in display order.
    pub fn available_labels(&self) -> Vec<CycleLabel> {
        CycleLabel::ALL
            .iter()
            .copied()
            .filter(|label| !self.is_placed(*label))
            .collect()
    }

    pub fn clear(&mut self) {
        self.slots = [None; SLOT_COUNT];
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_correct_order_completes() {
        let mut puzzle = DragPuzzle::new();
        assert_eq!(puzzle.place(Slot::Step1, CycleLabel::Evaporation), DropOutcome::Correct);
        assert_eq!(puzzle.place(Slot::Step2, CycleLabel::Condensation), DropOutcome::Correct);
        assert!(!puzzle.is_complete());
        assert_eq!(puzzle.place(Slot::Step3, CycleLabel::Precipitation), DropOutcome::Correct);
        assert!(puzzle.is_complete());
        assert!(puzzle.all_correct());
        assert!(puzzle.available_labels().is_empty());
    }

    #[test]
    fn test_placed_label_is_rejected_elsewhere() {
        let mut puzzle = DragPuzzle::new();
        puzzle.place(Slot::Step1, CycleLabel::Condensation);
        assert_eq!(
            puzzle.place(Slot::Step2, CycleLabel::Condensation),
            DropOutcome::Rejected
        );
        assert_eq!(puzzle.occupant(Slot::Step2), None);
    }

    #[test]
    fn test_occupied_slot_is_replaced() {
        let mut puzzle = DragPuzzle::new();
        assert_eq!(puzzle.place(Slot::Step1, CycleLabel::Condensation), DropOutcome::Incorrect);
        assert_eq!(puzzle.place(Slot::Step1, CycleLabel::Evaporation), DropOutcome::Correct);
        assert_eq!(puzzle.occupant(Slot::Step1), Some(CycleLabel::Evaporation));
        assert_eq!(
            puzzle.available_labels(),
            vec![CycleLabel::Condensation, CycleLabel::Precipitation]
        );
    }

    #[test]
    fn test_clear_empties_slots() {
        let mut puzzle = DragPuzzle::new();
        puzzle.place(Slot::Step3, CycleLabel::Precipitation);
        puzzle.clear();
        assert_eq!(puzzle.occupant(Slot::Step3), None);
        assert_eq!(puzzle.available_labels().len(), SLOT_COUNT);
    }

    #[test]
    fn test_ids_parse() {
        assert_eq!(Slot::from_id("step-2"), Some(Slot::Step2));
        assert_eq!(Slot::from_id("step-4"), None);
        assert_eq!(CycleLabel::from_id("Precipitation"), Some(CycleLabel::Precipitation));
        assert_eq!(CycleLabel::from_id("evaporation"), None);
        assert_eq!(Slot::Step3.id(), "step-3");
    }
}
