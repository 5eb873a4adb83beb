//! Learning session management for spaced repetition practice.
//! Handles multi-round review of a selected session: cards answered
//! incorrectly are repeated in the next round until every card passes.

use super::clock::Clock;
use super::grade::Grade;
use super::review_record::VocabularyReviewRecord;
use super::sm2::{ReviewUpdate, SchedulerConfig, update_after_answer_with_config};
use tracing::debug;

pub struct LearningSession {
    pub cards: Vec<VocabularyReviewRecord>,
    pub current_round_cards: Vec<usize>,
    pub current_index: usize,
    pub show_definition: bool,
    pub round_number: usize,
    passed: Vec<bool>,
    config: SchedulerConfig,
}

impl LearningSession {
    /// Starts a session over cards returned by session selection.
    pub fn new(cards: Vec<VocabularyReviewRecord>) -> Self {
        Self::with_config(cards, SchedulerConfig::default())
    }

    pub fn with_config(cards: Vec<VocabularyReviewRecord>, config: SchedulerConfig) -> Self {
        let indices: Vec<usize> = (0..cards.len()).collect();
        let passed = vec![false; cards.len()];
        Self {
            cards,
            current_round_cards: indices,
            current_index: 0,
            show_definition: false,
            round_number: 1,
            passed,
            config,
        }
    }

    pub fn current_card(&self) -> Option<&VocabularyReviewRecord> {
        self.current_round_cards
            .get(self.current_index)
            .and_then(|&idx| self.cards.get(idx))
    }

    pub fn toggle_definition(&mut self) {
        self.show_definition = !self.show_definition;
    }

    pub fn next_card(&mut self) {
        if self.current_index + 1 < self.current_round_cards.len() {
            self.current_index += 1;
            self.show_definition = false;
        } else {
            self.start_next_round();
        }
    }

    /// Starts a new round with the cards that failed this one.
    /// If none failed, the current round stays and the session is complete.
    fn start_next_round(&mut self) {
        let failed: Vec<usize> = self
            .current_round_cards
            .iter()
            .copied()
            .filter(|&idx| !self.has_passed(idx))
            .collect();

        if !failed.is_empty() {
            debug!(round = self.round_number + 1, cards = failed.len(), "starting retry round");
            self.current_round_cards = failed;
            self.current_index = 0;
            self.show_definition = false;
            self.round_number += 1;
        }
    }

    /// Grades the current card, applies the scheduler to the in-memory record
    /// and returns the update so the caller can persist it.
    pub fn grade_current_card(&mut self, grade: Grade, clock: &impl Clock) -> Option<ReviewUpdate> {
        let idx = *self.current_round_cards.get(self.current_index)?;
        let card = self.cards.get_mut(idx)?;

        let update = update_after_answer_with_config(card, grade, clock, &self.config);
        update.apply_to(card);
        if self.passed.len() < self.cards.len() {
            self.passed.resize(self.cards.len(), false);
        }
        self.passed[idx] = update.was_correct;
        Some(update)
    }

    fn has_passed(&self, idx: usize) -> bool {
        self.passed.get(idx).copied().unwrap_or(false)
    }

    pub fn learned_count(&self) -> usize {
        self.current_round_cards
            .iter()
            .filter(|&&idx| self.has_passed(idx))
            .count()
    }

    pub fn total_count(&self) -> usize {
        self.current_round_cards.len()
    }

    pub fn remaining_count(&self) -> usize {
        self.total_count() - self.learned_count()
    }

    /// Returns true when the round is empty or every card in it passed.
    pub fn is_completed(&self) -> bool {
        self.current_round_cards.is_empty() || self.learned_count() == self.total_count()
    }

    pub fn phase_message(&self) -> String {
        if self.round_number == 1 {
            format!("Round {}: {} cards", self.round_number, self.total_count())
        } else {
            format!(
                "Round {} (Review): {} cards to retry",
                self.round_number,
                self.total_count()
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::clock::FixedClock;
    use chrono::NaiveDate;

    fn clock() -> FixedClock {
        FixedClock(NaiveDate::from_ymd_opt(2024, 4, 1).unwrap())
    }

    fn session() -> LearningSession {
        let today = clock().0;
        LearningSession::new(vec![
            VocabularyReviewRecord::new("kot", "cat", today),
            VocabularyReviewRecord::new("pies", "dog", today),
        ])
    }

    #[test]
    fn test_all_correct_completes_in_one_round() {
        let mut session = session();
        session.grade_current_card(Grade::Good, &clock());
        session.next_card();
        session.grade_current_card(Grade::Easy, &clock());
        session.next_card();

        assert!(session.is_completed());
        assert_eq!(session.round_number, 1);
        assert_eq!(session.cards[0].repetitions, 1);
        assert_eq!(session.cards[0].correct_count, 1);
    }

    #[test]
    fn test_failed_card_is_retried() {
        let mut session = session();
        session.grade_current_card(Grade::Good, &clock());
        session.next_card();
        let update = session.grade_current_card(Grade::Again, &clock()).unwrap();
        assert!(!update.was_correct);
        session.next_card();

        assert!(!session.is_completed());
        assert_eq!(session.round_number, 2);
        assert_eq!(session.total_count(), 1);
        assert_eq!(session.current_card().map(|c| c.term.as_str()), Some("pies"));
        assert_eq!(session.phase_message(), "Round 2 (Review): 1 cards to retry");

        session.grade_current_card(Grade::Hard, &clock());
        session.next_card();
        assert!(session.is_completed());
        assert_eq!(session.cards[1].incorrect_count, 1);
        assert_eq!(session.cards[1].correct_count, 1);
    }

    #[test]
    fn test_empty_session_is_complete() {
        let mut session = LearningSession::new(Vec::new());
        assert!(session.is_completed());
        assert!(session.current_card().is_none());
        assert!(session.grade_current_card(Grade::Good, &clock()).is_none());
        session.next_card();
        assert_eq!(session.remaining_count(), 0);
    }

    #[test]
    fn test_toggle_definition_resets_on_next_card() {
        let mut session = session();
        session.toggle_definition();
        assert!(session.show_definition);
        session.next_card();
        assert!(!session.show_definition);
    }

    #[test]
    fn test_cards_added_after_start_are_tracked() {
        let mut session = session();
        session
            .cards
            .push(VocabularyReviewRecord::new("mysz", "mouse", clock().0));
        session.current_round_cards.push(2);
        session.current_round_cards.push(7);

        assert_eq!(session.learned_count(), 0);
        assert_eq!(session.remaining_count(), 4);

        session.current_index = 2;
        let update = session.grade_current_card(Grade::Good, &clock()).unwrap();
        assert!(update.was_correct);
        assert_eq!(session.learned_count(), 1);

        session.current_index = 3;
        assert!(session.grade_current_card(Grade::Good, &clock()).is_none());
        session.next_card();
        assert_eq!(session.round_number, 2);
        assert_eq!(session.current_round_cards, vec![0, 1, 7]);
    }
}
