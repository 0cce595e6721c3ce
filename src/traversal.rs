//! Traversal state machine: one respondent through an ordered question
//! sequence, with backtracking, answer overwrite, and a single in-flight
//! submission guard.
//!
//! The machine is synchronous and pure — the async submission itself lives
//! in `flow`. On the terminal question `advance` hands back a ledger
//! snapshot and parks the machine in `Submitting`; the coordinator then
//! reports the outcome via `submission_succeeded`/`submission_failed`.
//! Every input arriving while a submission is in flight is dropped, which
//! is what makes the completed traversal submit exactly once.

use crate::error::CoreError;
use crate::ledger::AnswerLedger;
use crate::question::{Answer, Questionnaire};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Active,
    Submitting,
    Completed,
}

/// Result of an `advance` call.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// Answer recorded, moved to the next question.
    Advanced { position: usize },
    /// Final answer recorded; snapshot ready for the one outbound
    /// submission. The machine is now `Submitting`.
    ReadyToSubmit { answers: Vec<Answer> },
    /// Input dropped: a submission is in flight or already done.
    Ignored,
}

/// Result of a `retreat` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Retreat {
    MovedTo(usize),
    /// History is empty — the caller navigates out to its start screen.
    ExitToStart,
    /// Dropped: submission in flight or already done.
    Ignored,
}

#[derive(Debug, Clone)]
pub struct Traversal<Q> {
    questions: Vec<Q>,
    position: usize,
    history: Vec<usize>,
    ledger: AnswerLedger,
    phase: Phase,
    report_id: Option<String>,
}

impl<Q: Questionnaire> Traversal<Q> {
    /// Questions are immutable once loaded; an empty list never becomes an
    /// active traversal.
    pub fn new(questions: Vec<Q>) -> Result<Self, CoreError> {
        if questions.is_empty() {
            return Err(CoreError::Load("empty questionnaire".into()));
        }
        Ok(Self {
            questions,
            position: 0,
            history: Vec::new(),
            ledger: AnswerLedger::new(),
            phase: Phase::Active,
            report_id: None,
        })
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn current(&self) -> &Q {
        &self.questions[self.position]
    }

    pub fn ledger(&self) -> &AnswerLedger {
        &self.ledger
    }

    /// Report identity, set once the submission succeeded (self variant).
    pub fn report_id(&self) -> Option<&str> {
        self.report_id.as_deref()
    }

    /// Fraction answered if the current question were answered: (pos+1)/len.
    pub fn progress(&self) -> f64 {
        (self.position + 1) as f64 / self.questions.len() as f64
    }

    /// Record the chosen option's value and move forward. On the last
    /// question this takes the ledger snapshot and enters `Submitting`
    /// instead of moving.
    pub fn advance(&mut self, option: usize) -> Result<Step, CoreError> {
        if self.phase != Phase::Active {
            return Ok(Step::Ignored);
        }
        let question = &self.questions[self.position];
        let value = question.value_of(option)?;
        self.ledger.record(question.id(), value);

        if self.position + 1 < self.questions.len() {
            self.history.push(self.position);
            self.position += 1;
            Ok(Step::Advanced {
                position: self.position,
            })
        } else {
            self.phase = Phase::Submitting;
            Ok(Step::ReadyToSubmit {
                answers: self.ledger.snapshot(),
            })
        }
    }

    /// Pop the history stack. The existing answer for the re-entered
    /// question stays until overwritten by a new `advance`.
    pub fn retreat(&mut self) -> Retreat {
        if self.phase != Phase::Active {
            return Retreat::Ignored;
        }
        match self.history.pop() {
            Some(previous) => {
                self.position = previous;
                Retreat::MovedTo(previous)
            }
            None => Retreat::ExitToStart,
        }
    }

    /// The outbound submission succeeded. `report_id` is the created report
    /// identity for the self variant, `None` for the peer acknowledgment.
    pub fn submission_succeeded(&mut self, report_id: Option<String>) {
        if self.phase == Phase::Submitting {
            self.phase = Phase::Completed;
            self.report_id = report_id;
        }
    }

    /// The outbound submission failed. Roll back to `Active` at the same
    /// last position with the ledger untouched — retry costs nothing.
    pub fn submission_failed(&mut self) {
        if self.phase == Phase::Submitting {
            self.phase = Phase::Active;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::question::{Question, TraitLetter};

    fn two_option(id: u32, a: TraitLetter, b: TraitLetter) -> Question {
        Question {
            id,
            text: format!("q{}", id),
            options: vec!["a".into(), "b".into()],
            values: Some(vec![a, b]),
        }
    }

    fn four_questions() -> Vec<Question> {
        vec![
            two_option(10, TraitLetter::E, TraitLetter::I),
            two_option(11, TraitLetter::S, TraitLetter::N),
            two_option(12, TraitLetter::T, TraitLetter::F),
            two_option(13, TraitLetter::J, TraitLetter::P),
        ]
    }

    #[test]
    fn empty_questionnaire_rejected() {
        let t = Traversal::<Question>::new(Vec::new());
        assert!(matches!(t, Err(CoreError::Load(_))));
    }

    #[test]
    fn advance_moves_forward_and_records() {
        let mut t = Traversal::new(four_questions()).unwrap();
        assert_eq!(t.position(), 0);
        let step = t.advance(0).unwrap();
        assert_eq!(step, Step::Advanced { position: 1 });
        assert_eq!(t.ledger().get(10), Some(TraitLetter::E));
        assert_eq!(t.phase(), Phase::Active);
    }

    #[test]
    fn progress_is_monotone_forward_and_back() {
        let mut t = Traversal::new(four_questions()).unwrap();
        let mut last = t.progress();
        for _ in 0..3 {
            t.advance(0).unwrap();
            assert!(t.progress() > last);
            last = t.progress();
        }
        t.retreat();
        assert!(t.progress() < last);
    }

    #[test]
    fn retreat_pops_history_and_keeps_answer() {
        let mut t = Traversal::new(four_questions()).unwrap();
        t.advance(0).unwrap();
        t.advance(1).unwrap();
        assert_eq!(t.position(), 2);
        assert_eq!(t.retreat(), Retreat::MovedTo(1));
        assert_eq!(t.retreat(), Retreat::MovedTo(0));
        // answers for re-entered questions survive until overwritten
        assert_eq!(t.ledger().get(10), Some(TraitLetter::E));
        assert_eq!(t.ledger().get(11), Some(TraitLetter::N));
        assert_eq!(t.retreat(), Retreat::ExitToStart);
        assert_eq!(t.position(), 0);
    }

    #[test]
    fn revisit_overwrites_without_duplicate() {
        let mut t = Traversal::new(four_questions()).unwrap();
        t.advance(0).unwrap();
        t.retreat();
        t.advance(1).unwrap();
        assert_eq!(t.ledger().len(), 1);
        assert_eq!(t.ledger().get(10), Some(TraitLetter::I));
    }

    #[test]
    fn last_question_enters_submitting_with_snapshot() {
        let mut t = Traversal::new(four_questions()).unwrap();
        for _ in 0..3 {
            t.advance(0).unwrap();
        }
        let step = t.advance(0).unwrap();
        match step {
            Step::ReadyToSubmit { answers } => {
                assert_eq!(answers.len(), 4);
                assert_eq!(
                    answers.iter().map(|a| a.value).collect::<Vec<_>>(),
                    vec![
                        TraitLetter::E,
                        TraitLetter::S,
                        TraitLetter::T,
                        TraitLetter::J
                    ]
                );
            }
            other => panic!("expected ReadyToSubmit, got {:?}", other),
        }
        assert_eq!(t.phase(), Phase::Submitting);
        assert_eq!(t.position(), 3);
    }

    #[test]
    fn inflight_guard_drops_reentrant_input() {
        let mut t = Traversal::new(four_questions()).unwrap();
        for _ in 0..4 {
            t.advance(0).unwrap();
        }
        assert_eq!(t.phase(), Phase::Submitting);
        // clicking the last question's options again while in flight
        assert_eq!(t.advance(0).unwrap(), Step::Ignored);
        assert_eq!(t.advance(1).unwrap(), Step::Ignored);
        assert_eq!(t.retreat(), Retreat::Ignored);
        assert_eq!(t.ledger().len(), 4);
    }

    #[test]
    fn failed_submission_rolls_back_to_active() {
        let mut t = Traversal::new(four_questions()).unwrap();
        for _ in 0..4 {
            t.advance(0).unwrap();
        }
        t.submission_failed();
        assert_eq!(t.phase(), Phase::Active);
        assert_eq!(t.position(), 3);
        assert_eq!(t.ledger().len(), 4);
        // answering the last question again resubmits
        assert!(matches!(
            t.advance(1).unwrap(),
            Step::ReadyToSubmit { .. }
        ));
        assert_eq!(t.ledger().get(13), Some(TraitLetter::P));
    }

    #[test]
    fn successful_submission_completes_with_report_id() {
        let mut t = Traversal::new(four_questions()).unwrap();
        for _ in 0..4 {
            t.advance(0).unwrap();
        }
        t.submission_succeeded(Some("r-0007".into()));
        assert_eq!(t.phase(), Phase::Completed);
        assert_eq!(t.report_id(), Some("r-0007"));
        // completed machines drop further input too
        assert_eq!(t.advance(0).unwrap(), Step::Ignored);
    }

    #[test]
    fn resolution_calls_outside_submitting_are_noops() {
        let mut t = Traversal::new(four_questions()).unwrap();
        t.submission_succeeded(Some("r-0001".into()));
        assert_eq!(t.phase(), Phase::Active);
        assert_eq!(t.report_id(), None);
        t.submission_failed();
        assert_eq!(t.phase(), Phase::Active);
    }

    #[test]
    fn integrity_failure_records_nothing() {
        let mut untagged = four_questions();
        untagged[0].values = None;
        let mut t = Traversal::new(untagged).unwrap();
        assert!(matches!(
            t.advance(0),
            Err(CoreError::Integrity { question_id: 10, .. })
        ));
        assert!(t.ledger().is_empty());
        assert_eq!(t.position(), 0);
        assert_eq!(t.phase(), Phase::Active);
    }
}
