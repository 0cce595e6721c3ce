//! Per-traversal answer store.
//!
//! One current answer per question id. Re-answering after a backtrack
//! replaces the old entry and moves it to the end, so snapshot order is
//! latest-write order, not question order.

use crate::question::{Answer, TraitLetter};

#[derive(Debug, Clone, Default)]
pub struct AnswerLedger {
    entries: Vec<Answer>,
}

impl AnswerLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace-or-append keyed by question id. O(n) over a questionnaire of
    /// fixed small cardinality.
    pub fn record(&mut self, question_id: u32, value: TraitLetter) {
        self.entries.retain(|a| a.question_id != question_id);
        self.entries.push(Answer { question_id, value });
    }

    pub fn get(&self, question_id: u32) -> Option<TraitLetter> {
        self.entries
            .iter()
            .find(|a| a.question_id == question_id)
            .map(|a| a.value)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Current answers in ledger-insertion order.
    pub fn snapshot(&self) -> Vec<Answer> {
        self.entries.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_appends_new_answers() {
        let mut ledger = AnswerLedger::new();
        ledger.record(1, TraitLetter::E);
        ledger.record(2, TraitLetter::S);
        assert_eq!(ledger.len(), 2);
        assert_eq!(ledger.get(1), Some(TraitLetter::E));
        assert_eq!(ledger.get(2), Some(TraitLetter::S));
    }

    #[test]
    fn record_replaces_without_duplicating() {
        let mut ledger = AnswerLedger::new();
        ledger.record(1, TraitLetter::E);
        ledger.record(1, TraitLetter::I);
        ledger.record(1, TraitLetter::E);
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.get(1), Some(TraitLetter::E));
    }

    #[test]
    fn snapshot_never_contains_duplicate_ids() {
        let mut ledger = AnswerLedger::new();
        for id in [1, 2, 3, 2, 1, 3, 1] {
            ledger.record(id, TraitLetter::T);
        }
        let snap = ledger.snapshot();
        let mut ids: Vec<u32> = snap.iter().map(|a| a.question_id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), snap.len());
    }

    #[test]
    fn rewrite_moves_entry_to_end() {
        let mut ledger = AnswerLedger::new();
        ledger.record(1, TraitLetter::E);
        ledger.record(2, TraitLetter::S);
        ledger.record(1, TraitLetter::I);
        let snap = ledger.snapshot();
        assert_eq!(snap[0].question_id, 2);
        assert_eq!(snap[1].question_id, 1);
        assert_eq!(snap[1].value, TraitLetter::I);
    }

    #[test]
    fn missing_id_reads_none() {
        let ledger = AnswerLedger::new();
        assert!(ledger.is_empty());
        assert_eq!(ledger.get(42), None);
    }
}
