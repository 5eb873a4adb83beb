//! Scheduling state for one vocabulary card.
use super::sm2::SchedulerConfig;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VocabularyReviewRecord {
    pub term: String,
    pub definition: String,
    pub ease_factor: f64,
    pub interval: u32,
    pub repetitions: u32,
    pub next_review_date: NaiveDate,
    pub last_review_date: Option<NaiveDate>,
    pub is_suspended: bool,
    /// Classification from the most recent update. Not recomputed if `interval`
    /// is changed by other means.
    pub is_mastered: bool,
    pub correct_count: u32,
    pub incorrect_count: u32,
    pub created_at: NaiveDate,
}

impl VocabularyReviewRecord {
    /// Creates a record for a term seen for the first time, due immediately.
    pub fn new(term: impl Into<String>, definition: impl Into<String>, today: NaiveDate) -> Self {
        Self::with_config(term, definition, today, &SchedulerConfig::default())
    }

    pub fn with_config(
        term: impl Into<String>,
        definition: impl Into<String>,
        today: NaiveDate,
        config: &SchedulerConfig,
    ) -> Self {
        Self {
            term: term.into(),
            definition: definition.into(),
            ease_factor: config.initial_ease_factor,
            interval: 0,
            repetitions: 0,
            next_review_date: today,
            last_review_date: None,
            is_suspended: false,
            is_mastered: false,
            correct_count: 0,
            incorrect_count: 0,
            created_at: today,
        }
    }

    /// Never reviewed successfully since creation or the last lapse.
    pub fn is_new(&self) -> bool {
        self.repetitions == 0
    }

    /// A previously reviewed, non-suspended card whose review date has arrived.
    pub fn is_due(&self, today: NaiveDate) -> bool {
        !self.is_suspended && self.repetitions > 0 && self.next_review_date <= today
    }

    pub fn set_suspended(&mut self, suspended: bool) {
        self.is_suspended = suspended;
    }

    pub fn toggle_suspended(&mut self) {
        self.is_suspended = !self.is_suspended;
    }
}
