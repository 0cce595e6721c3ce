//! Question and answer data model.
//!
//! Two questionnaire shapes exist: the self assessment carries a parallel
//! value-tag array (one trait letter per option), the peer assessment is a
//! fixed two-option form with direct per-option values. Both feed the same
//! traversal engine through the [`Questionnaire`] trait.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// The eight-letter trait alphabet: four opposing dichotomies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TraitLetter {
    E,
    I,
    S,
    N,
    T,
    F,
    J,
    P,
}

impl TraitLetter {
    pub const ALL: [TraitLetter; 8] = [
        TraitLetter::E,
        TraitLetter::I,
        TraitLetter::S,
        TraitLetter::N,
        TraitLetter::T,
        TraitLetter::F,
        TraitLetter::J,
        TraitLetter::P,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TraitLetter::E => "E",
            TraitLetter::I => "I",
            TraitLetter::S => "S",
            TraitLetter::N => "N",
            TraitLetter::T => "T",
            TraitLetter::F => "F",
            TraitLetter::J => "J",
            TraitLetter::P => "P",
        }
    }

    /// The opposing pole of this letter's dichotomy.
    pub fn opposite(&self) -> TraitLetter {
        match self {
            TraitLetter::E => TraitLetter::I,
            TraitLetter::I => TraitLetter::E,
            TraitLetter::S => TraitLetter::N,
            TraitLetter::N => TraitLetter::S,
            TraitLetter::T => TraitLetter::F,
            TraitLetter::F => TraitLetter::T,
            TraitLetter::J => TraitLetter::P,
            TraitLetter::P => TraitLetter::J,
        }
    }
}

impl std::fmt::Display for TraitLetter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One answered question: at most one per question id in a ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Answer {
    pub question_id: u32,
    pub value: TraitLetter,
}

/// Self-assessment question. Immutable once loaded; `values`, when present,
/// must parallel `options` one-to-one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    pub id: u32,
    pub text: String,
    pub options: Vec<String>,
    #[serde(default)]
    pub values: Option<Vec<TraitLetter>>,
}

impl Question {
    /// Loaded-question precondition: at least two options, and a full value
    /// tag array. A questionnaire failing this never enters a traversal.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.options.len() < 2 {
            return Err(CoreError::Load(format!(
                "question {} has {} options, need at least 2",
                self.id,
                self.options.len()
            )));
        }
        match &self.values {
            Some(values) if values.len() == self.options.len() => Ok(()),
            Some(values) => Err(CoreError::Integrity {
                question_id: self.id,
                option: values.len(),
            }),
            None => Err(CoreError::Integrity {
                question_id: self.id,
                option: 0,
            }),
        }
    }
}

/// Peer-assessment question: two options carrying direct values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeerQuestion {
    pub id: u32,
    pub text: String,
    pub option_a: String,
    pub option_b: String,
    pub value_a: TraitLetter,
    pub value_b: TraitLetter,
}

/// The seam between the traversal engine and the two questionnaire shapes.
pub trait Questionnaire {
    fn id(&self) -> u32;
    fn option_count(&self) -> usize;
    /// Resolve the trait letter for an option. Fails loudly when the tag is
    /// missing rather than substituting one.
    fn value_of(&self, option: usize) -> Result<TraitLetter, CoreError>;
}

impl Questionnaire for Question {
    fn id(&self) -> u32 {
        self.id
    }

    fn option_count(&self) -> usize {
        self.options.len()
    }

    fn value_of(&self, option: usize) -> Result<TraitLetter, CoreError> {
        if option >= self.options.len() {
            return Err(CoreError::OptionOutOfRange {
                question_id: self.id,
                index: option,
            });
        }
        self.values
            .as_ref()
            .and_then(|values| values.get(option).copied())
            .ok_or(CoreError::Integrity {
                question_id: self.id,
                option,
            })
    }
}

impl Questionnaire for PeerQuestion {
    fn id(&self) -> u32 {
        self.id
    }

    fn option_count(&self) -> usize {
        2
    }

    fn value_of(&self, option: usize) -> Result<TraitLetter, CoreError> {
        match option {
            0 => Ok(self.value_a),
            1 => Ok(self.value_b),
            _ => Err(CoreError::OptionOutOfRange {
                question_id: self.id,
                index: option,
            }),
        }
    }
}
