//! Questionnaire Collector
//!
//! Forced-choice question banks and the state machine that walks the user
//! through them. Every option is tagged with its category explicitly, so the
//! recorded answer never depends on the order options are displayed in.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::Modality;
use crate::types::Modality::{Auditory as A, Kinesthetic as K, Reading as R, Visual as V};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuestionOption {
    pub text: &'static str,
    pub category: Modality,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Question {
    pub id: u32,
    pub text: &'static str,
    pub options: [QuestionOption; 4],
}

const fn opt(text: &'static str, category: Modality) -> QuestionOption {
    QuestionOption { text, category }
}

static FULL_QUESTIONS: [Question; 10] = [
    Question {
        id: 1,
        text: "When studying for an exam, what method do you find most effective?",
        options: [
            opt("Drawing diagrams or watching videos", V),
            opt("Listening to recordings or discussing the material", A),
            opt("Writing summaries or reading notes", R),
            opt("Using hands-on practice or engaging in physical activities", K),
        ],
    },
    Question {
        id: 2,
        text: "When you need to remember a phone number or address, how do you do it?",
        options: [
            opt("I visualize the number", V),
            opt("I say it out loud", A),
            opt("I write it down or read it multiple times", R),
            opt("I repeat it while moving", K),
        ],
    },
    Question {
        id: 3,
        text: "If you were to learn how to assemble a piece of furniture, what would you do?",
        options: [
            opt("Look at the diagrams and pictures in the instruction manual", V),
            opt("Watch a video or listen to someone explain the process", A),
            opt("Read the step-by-step instructions", R),
            opt("Start putting it together right away and figure it out as you go", K),
        ],
    },
    Question {
        id: 4,
        text: "In a classroom setting, what type of teaching style helps you learn best?",
        options: [
            opt("Teachers who use visual aids like slides, charts, or videos", V),
            opt("Teachers who lecture and explain things out loud", A),
            opt("Teachers who provide detailed written notes and reading materials", R),
            opt("Teachers who include activities, experiments, or hands-on learning", K),
        ],
    },
    Question {
        id: 5,
        text: "How do you prefer to express your ideas and thoughts?",
        options: [
            opt("Through drawings, diagrams, or visual presentations", V),
            opt("Through speaking or discussions", A),
            opt("Through writing essays, reports, or detailed notes", R),
            opt("Through actions, demonstrations, or role-playing", K),
        ],
    },
    Question {
        id: 6,
        text: "When learning a new language, what method works best for you?",
        options: [
            opt("Using flashcards with pictures or watching videos", V),
            opt("Listening to the language through conversations or audio lessons", A),
            opt("Reading textbooks, articles, or writing out vocabulary", R),
            opt("Practicing speaking with gestures or engaging in interactive activities", K),
        ],
    },
    Question {
        id: 7,
        text: "How do you prefer to organize your work or study materials?",
        options: [
            opt("By color-coding, using visual organizers, or keeping visual reminders", V),
            opt("By discussing the organization with someone or explaining it out loud", A),
            opt("By making lists, writing out schedules, or taking detailed notes", R),
            opt("By arranging items physically or creating hands-on displays", K),
        ],
    },
    Question {
        id: 8,
        text: "What kind of environment helps you focus the best when working or studying?",
        options: [
            opt("A space with visual inspiration, like posters or visual organizers", V),
            opt("A space where you can listen to music or discussions without distractions", A),
            opt("A quiet space where you can read or write without interruptions", R),
            opt("A space where you can move around, stand, or engage in physical activities", K),
        ],
    },
    Question {
        id: 9,
        text: "When you need to remember a key point or quote from a book, how do you do it?",
        options: [
            opt("I visualize the page in my mind or remember the picture associated with the point", V),
            opt("I repeat the quote out loud or discuss it with someone else", A),
            opt("I write it down in my notes or underline it in the book", R),
            opt("I remember the context by associating the quote with an action or physical movement I made while reading", K),
        ],
    },
    Question {
        id: 10,
        text: "How do you prefer to solve a problem?",
        options: [
            opt("By visualizing the problem and solution in your head", V),
            opt("By talking through the problem with others or hearing different perspectives", A),
            opt("By writing out the problem and working through it step by step", R),
            opt("By trying different solutions through trial and error", K),
        ],
    },
];

static QUICK_QUESTIONS: [Question; 3] = [
    Question {
        id: 1,
        text: "When learning something new, I prefer to:",
        options: [
            opt("Watch a demonstration", V),
            opt("Listen to an explanation", A),
            opt("Read instructions", R),
            opt("Try it out myself", K),
        ],
    },
    Question {
        id: 2,
        text: "I remember things best when I:",
        options: [
            opt("See pictures and diagrams", V),
            opt("Hear them spoken", A),
            opt("Write them down", R),
            opt("Physically do them", K),
        ],
    },
    Question {
        id: 3,
        text: "When assembling furniture, I first:",
        options: [
            opt("Look at the diagrams", V),
            opt("Have someone explain it", A),
            opt("Read the manual carefully", R),
            opt("Jump right in and start building", K),
        ],
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuestionBank {
    questions: &'static [Question],
}

impl QuestionBank {
    /// The ten-question battery.
    pub fn full() -> Self {
        Self {
            questions: &FULL_QUESTIONS,
        }
    }

    /// The three-question quick assessment.
    pub fn quick() -> Self {
        Self {
            questions: &QUICK_QUESTIONS,
        }
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn question(&self, index: usize) -> Option<&'static Question> {
        self.questions.get(index)
    }

    pub fn category_of(&self, question_index: usize, option_index: usize) -> Option<Modality> {
        self.question(question_index)?
            .options
            .get(option_index)
            .map(|o| o.category)
    }
}

/// Ordered category indices (0-3), one per question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestionnaireResponse {
    pub answers: Vec<u8>,
}

impl QuestionnaireResponse {
    /// Builds a response from raw category indices, dropping any outside 0-3.
    pub fn from_indices(indices: impl IntoIterator<Item = u8>) -> Self {
        Self {
            answers: indices
                .into_iter()
                .filter(|i| Modality::from_index(*i).is_some())
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.answers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum QuestionnaireError {
    #[error("select an answer before continuing")]
    NoSelection,
    #[error("option {option} is out of range for question {question}")]
    OptionOutOfRange { question: usize, option: usize },
    #[error("questionnaire already submitted")]
    AlreadySubmitted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionnaireState {
    Presenting(usize),
    Submitted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advance {
    Next(usize),
    Submitted(QuestionnaireResponse),
}

#[derive(Debug, Clone)]
pub struct Questionnaire {
    bank: QuestionBank,
    state: QuestionnaireState,
    // option index chosen per question
    selections: Vec<Option<usize>>,
}

impl Questionnaire {
    pub fn new(bank: QuestionBank) -> Self {
        Self {
            bank,
            state: QuestionnaireState::Presenting(0),
            selections: vec![None; bank.len()],
        }
    }

    pub fn bank(&self) -> QuestionBank {
        self.bank
    }

    pub fn state(&self) -> QuestionnaireState {
        self.state
    }

    pub fn current_index(&self) -> Option<usize> {
        match self.state {
            QuestionnaireState::Presenting(i) => Some(i),
            QuestionnaireState::Submitted => None,
        }
    }

    pub fn current_question(&self) -> Option<&'static Question> {
        self.bank.question(self.current_index()?)
    }

    /// Option highlighted for the current question, restored from any
    /// earlier answer.
    pub fn current_selection(&self) -> Option<usize> {
        self.selections[self.current_index()?]
    }

    pub fn answered_count(&self) -> usize {
        self.selections.iter().filter(|s| s.is_some()).count()
    }

    pub fn progress_percent(&self) -> f64 {
        match self.state {
            QuestionnaireState::Presenting(i) => (i + 1) as f64 / self.bank.len() as f64 * 100.0,
            QuestionnaireState::Submitted => 100.0,
        }
    }

    pub fn select_option(&mut self, option_index: usize) -> Result<(), QuestionnaireError> {
        let index = self
            .current_index()
            .ok_or(QuestionnaireError::AlreadySubmitted)?;
        if self.bank.category_of(index, option_index).is_none() {
            return Err(QuestionnaireError::OptionOutOfRange {
                question: index,
                option: option_index,
            });
        }
        self.selections[index] = Some(option_index);
        Ok(())
    }

    pub fn advance(&mut self) -> Result<Advance, QuestionnaireError> {
        let index = self
            .current_index()
            .ok_or(QuestionnaireError::AlreadySubmitted)?;
        if self.selections[index].is_none() {
            return Err(QuestionnaireError::NoSelection);
        }

        if index + 1 < self.bank.len() {
            self.state = QuestionnaireState::Presenting(index + 1);
            return Ok(Advance::Next(index + 1));
        }

        let response = self.collect().ok_or(QuestionnaireError::NoSelection)?;
        self.state = QuestionnaireState::Submitted;
        Ok(Advance::Submitted(response))
    }

    /// Steps back one question. Returns false (and does nothing) on the
    /// first question or after submission.
    pub fn retreat(&mut self) -> bool {
        match self.state {
            QuestionnaireState::Presenting(i) if i > 0 => {
                self.state = QuestionnaireState::Presenting(i - 1);
                true
            }
            _ => false,
        }
    }

    /// Frozen answers, available once submitted.
    pub fn response(&self) -> Option<QuestionnaireResponse> {
        match self.state {
            QuestionnaireState::Submitted => self.collect(),
            QuestionnaireState::Presenting(_) => None,
        }
    }

    fn collect(&self) -> Option<QuestionnaireResponse> {
        let answers = self
            .selections
            .iter()
            .enumerate()
            .map(|(q, s)| {
                s.and_then(|o| self.bank.category_of(q, o))
                    .map(Modality::to_index)
            })
            .collect::<Option<Vec<u8>>>()?;
        Some(QuestionnaireResponse { answers })
    }

    pub fn reset(&mut self) {
        *self = Self::new(self.bank);
    }
}
