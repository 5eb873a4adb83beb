//! SM-2 (SuperMemo 2) spaced repetition algorithm implementation.
//!
//! The SM-2 algorithm calculates optimal review intervals based on recall quality:
//! - Each card has an easiness factor (EF) that adjusts based on performance
//! - Quality 0-2: repetitions reset and the card comes back the next day
//! - Quality 3-5: interval grows progressively (1 day → 6 days → EF multiplier)
//! - EF is adjusted after every review, failing ones included, and never drops below 1.3
//! - A card whose fresh interval reaches 21 days is classified as mastered
//!
//! Intervals after the second review are `round(prior_interval * EF)`, rounding half
//! away from zero (`f64::round`), so 15 days at EF 2.5 becomes 38 days.

use super::clock::Clock;
use super::grade::{Grade, Quality, map_quality};
use super::review_record::VocabularyReviewRecord;
use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const MIN_EASE_FACTOR: f64 = 1.3;
pub const DEFAULT_EASE_FACTOR: f64 = 2.5;
pub const MASTERY_THRESHOLD_DAYS: u32 = 21;

const FIRST_INTERVAL_DAYS: u32 = 1;
const SECOND_INTERVAL_DAYS: u32 = 6;
const LAPSE_INTERVAL_DAYS: u32 = 1;

/// Tunable scheduler constants. `Default` uses the standard SM-2 values.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SchedulerConfig {
    pub min_ease_factor: f64,
    pub initial_ease_factor: f64,
    pub mastery_threshold_days: u32,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            min_ease_factor: MIN_EASE_FACTOR,
            initial_ease_factor: DEFAULT_EASE_FACTOR,
            mastery_threshold_days: MASTERY_THRESHOLD_DAYS,
        }
    }
}

/// Unclamped change to the E-Factor for a given quality.
pub fn ease_delta(quality: Quality) -> f64 {
    let q = quality.value() as f64;
    0.1 - (5.0 - q) * (0.08 + (5.0 - q) * 0.02)
}

/// New E-Factor after an answer, floored at `min_ease_factor`.
pub fn next_ease_factor(current: f64, quality: Quality, min_ease_factor: f64) -> f64 {
    (current + ease_delta(quality)).max(min_ease_factor)
}

/// Days until the next review.
///
/// `prior_repetitions` is the count *before* this answer; it picks the
/// first/second/nth branch.
pub fn next_interval(
    prior_interval: u32,
    prior_repetitions: u32,
    new_ease_factor: f64,
    quality: Quality,
) -> u32 {
    if !quality.is_correct() {
        return LAPSE_INTERVAL_DAYS;
    }
    match prior_repetitions {
        0 => FIRST_INTERVAL_DAYS,
        1 => SECOND_INTERVAL_DAYS,
        _ => (prior_interval as f64 * new_ease_factor).round() as u32,
    }
}

/// Fields produced by grading a card, not yet written to the record.
#[derive(Clone, Debug, PartialEq)]
pub struct ReviewUpdate {
    pub ease_factor: f64,
    pub interval: u32,
    pub repetitions: u32,
    pub next_review_date: NaiveDate,
    pub last_review_date: NaiveDate,
    pub is_mastered: bool,
    pub is_suspended: bool,
    pub was_correct: bool,
}

impl ReviewUpdate {
    /// Commits the update, bumping the caller-owned correct/incorrect counters.
    pub fn apply_to(&self, record: &mut VocabularyReviewRecord) {
        record.ease_factor = self.ease_factor;
        record.interval = self.interval;
        record.repetitions = self.repetitions;
        record.next_review_date = self.next_review_date;
        record.last_review_date = Some(self.last_review_date);
        record.is_mastered = self.is_mastered;
        record.is_suspended = self.is_suspended;
        if self.was_correct {
            record.correct_count += 1;
        } else {
            record.incorrect_count += 1;
        }
    }
}

/// Grades a card with a UI grade using the default configuration.
pub fn update_after_answer(
    record: &VocabularyReviewRecord,
    grade: Grade,
    clock: &impl Clock,
) -> ReviewUpdate {
    update_after_answer_with_config(record, grade, clock, &SchedulerConfig::default())
}

pub fn update_after_answer_with_config(
    record: &VocabularyReviewRecord,
    grade: Grade,
    clock: &impl Clock,
    config: &SchedulerConfig,
) -> ReviewUpdate {
    apply_quality_with_config(record, map_quality(grade), clock, config)
}

/// Grades a card with a raw 0-5 quality using the default configuration.
pub fn apply_quality(
    record: &VocabularyReviewRecord,
    quality: Quality,
    clock: &impl Clock,
) -> ReviewUpdate {
    apply_quality_with_config(record, quality, clock, &SchedulerConfig::default())
}

pub fn apply_quality_with_config(
    record: &VocabularyReviewRecord,
    quality: Quality,
    clock: &impl Clock,
    config: &SchedulerConfig,
) -> ReviewUpdate {
    let update = compute_update(record, quality, clock, config);
    debug!(
        term = %record.term,
        quality = quality.value(),
        ease_factor = update.ease_factor,
        interval = update.interval,
        repetitions = update.repetitions,
        is_mastered = update.is_mastered,
        "scheduled review"
    );
    update
}

/// Same transition as `apply_quality_with_config` without logging, for projections.
pub(crate) fn compute_update(
    record: &VocabularyReviewRecord,
    quality: Quality,
    clock: &impl Clock,
    config: &SchedulerConfig,
) -> ReviewUpdate {
    let today = clock.today();
    let ease_factor = next_ease_factor(record.ease_factor, quality, config.min_ease_factor);

    // next_interval also handles failures; both checks stay.
    let (interval, repetitions) = if !quality.is_correct() {
        (LAPSE_INTERVAL_DAYS, 0)
    } else {
        (
            next_interval(record.interval, record.repetitions, ease_factor, quality),
            record.repetitions + 1,
        )
    };

    let next_review_date = today
        .checked_add_days(Days::new(u64::from(interval)))
        .unwrap_or(NaiveDate::MAX);
    let is_mastered = interval >= config.mastery_threshold_days;

    ReviewUpdate {
        ease_factor,
        interval,
        repetitions,
        next_review_date,
        last_review_date: today,
        is_mastered,
        is_suspended: record.is_suspended,
        was_correct: quality.is_correct(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::clock::FixedClock;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 10).unwrap()
    }

    fn record(ease_factor: f64, interval: u32, repetitions: u32) -> VocabularyReviewRecord {
        let mut record = VocabularyReviewRecord::new("hello", "cześć", today());
        record.ease_factor = ease_factor;
        record.interval = interval;
        record.repetitions = repetitions;
        record
    }

    fn q(value: u8) -> Quality {
        Quality::try_from(value).unwrap()
    }

    #[test]
    fn test_ease_worked_values() {
        assert!((next_ease_factor(2.5, q(5), MIN_EASE_FACTOR) - 2.6).abs() < 1e-9);
        assert!((next_ease_factor(2.5, q(4), MIN_EASE_FACTOR) - 2.5).abs() < 1e-9);
        assert!((next_ease_factor(2.5, q(3), MIN_EASE_FACTOR) - 2.36).abs() < 1e-9);
        assert!((next_ease_factor(2.5, q(1), MIN_EASE_FACTOR) - 1.96).abs() < 1e-9);
    }

    #[test]
    fn test_easy_adds_a_tenth() {
        assert_eq!(ease_delta(map_quality(Grade::Easy)), 0.1);
    }

    #[test]
    fn test_ease_floor_for_all_grades() {
        let clock = FixedClock(today());
        let mut ease = MIN_EASE_FACTOR;
        while ease <= 3.5 {
            for grade in Grade::ALL {
                let update = update_after_answer(&record(ease, 10, 3), grade, &clock);
                assert!(update.ease_factor >= MIN_EASE_FACTOR);
            }
            ease += 0.05;
        }
    }

    #[test]
    fn test_ease_floor_after_repeated_failures() {
        let clock = FixedClock(today());
        let mut card = record(2.5, 10, 5);
        for _ in 0..10 {
            update_after_answer(&card, Grade::Again, &clock).apply_to(&mut card);
        }
        assert_eq!(card.ease_factor, MIN_EASE_FACTOR);
    }

    #[test]
    fn test_interval_failure_ignores_history() {
        assert_eq!(next_interval(100, 7, 2.8, q(2)), 1);
        assert_eq!(next_interval(0, 0, 1.3, q(0)), 1);
    }

    #[test]
    fn test_interval_branches() {
        assert_eq!(next_interval(0, 0, 2.5, q(4)), 1);
        assert_eq!(next_interval(1, 1, 2.5, q(3)), 6);
        assert_eq!(next_interval(6, 2, 2.5, q(4)), 15);
    }

    #[test]
    fn test_interval_rounds_half_away_from_zero() {
        assert_eq!(next_interval(15, 3, 2.5, q(4)), 38);
        assert_eq!(next_interval(5, 3, 1.3, q(3)), 7); // 6.5
        assert_eq!(next_interval(10, 4, 1.34, q(3)), 13); // 13.4
    }

    #[test]
    fn test_scenario_first_review_good() {
        let update = update_after_answer(&record(2.5, 0, 0), Grade::Good, &FixedClock(today()));
        assert_eq!(update.ease_factor, 2.5);
        assert_eq!(update.repetitions, 1);
        assert_eq!(update.interval, 1);
        assert!(!update.is_mastered);
        assert!(update.was_correct);
    }

    #[test]
    fn test_scenario_first_review_easy() {
        let update = update_after_answer(&record(2.5, 0, 0), Grade::Easy, &FixedClock(today()));
        assert!((update.ease_factor - 2.6).abs() < 1e-9);
        assert_eq!(update.interval, 1);
        assert!(!update.is_mastered);
    }

    #[test]
    fn test_second_review_is_six_days() {
        for grade in [Grade::Hard, Grade::Good, Grade::Easy] {
            let update = update_after_answer(&record(2.5, 1, 1), grade, &FixedClock(today()));
            assert_eq!(update.interval, 6);
            assert_eq!(update.repetitions, 2);
        }
    }

    #[test]
    fn test_scenario_third_review_good() {
        let update = update_after_answer(&record(2.5, 6, 2), Grade::Good, &FixedClock(today()));
        assert_eq!(update.ease_factor, 2.5);
        assert_eq!(update.interval, 15);
        assert!(!update.is_mastered);
    }

    #[test]
    fn test_scenario_reaches_mastery() {
        let update = update_after_answer(&record(2.5, 15, 3), Grade::Good, &FixedClock(today()));
        assert_eq!(update.ease_factor, 2.5);
        assert_eq!(update.interval, 38);
        assert!(update.is_mastered);
        assert_eq!(update.next_review_date, NaiveDate::from_ymd_opt(2024, 6, 17).unwrap());
    }

    #[test]
    fn test_scenario_again_resets_progress() {
        let update = update_after_answer(&record(2.5, 38, 4), Grade::Again, &FixedClock(today()));
        assert_eq!(update.repetitions, 0);
        assert_eq!(update.interval, 1);
        assert!((update.ease_factor - 1.96).abs() < 1e-9);
        assert!(!update.is_mastered);
        assert!(!update.was_correct);

        let clamped = update_after_answer(&record(1.5, 38, 4), Grade::Again, &FixedClock(today()));
        assert_eq!(clamped.ease_factor, MIN_EASE_FACTOR);
    }

    #[test]
    fn test_mastery_threshold_is_inclusive_and_configurable() {
        let clock = FixedClock(today());
        // 10 * 2.1 = 21
        let update = update_after_answer(&record(2.1, 10, 3), Grade::Good, &clock);
        assert_eq!(update.interval, 21);
        assert!(update.is_mastered);

        let strict = SchedulerConfig {
            mastery_threshold_days: 30,
            ..SchedulerConfig::default()
        };
        let update = update_after_answer_with_config(&record(2.1, 10, 3), Grade::Good, &clock, &strict);
        assert!(!update.is_mastered);
    }

    #[test]
    fn test_dates_and_suspension_pass_through() {
        let mut card = record(2.5, 6, 2);
        card.is_suspended = true;
        let update = update_after_answer(&card, Grade::Hard, &FixedClock(today()));

        assert!(update.is_suspended);
        assert_eq!(update.last_review_date, today());
        assert_eq!(
            update.next_review_date,
            today().checked_add_days(Days::new(u64::from(update.interval))).unwrap()
        );
    }

    #[test]
    fn test_raw_quality_zero_and_two_fail() {
        let clock = FixedClock(today());
        for value in [0, 2] {
            let update = apply_quality(&record(2.5, 15, 3), q(value), &clock);
            assert_eq!(update.repetitions, 0);
            assert_eq!(update.interval, 1);
        }
    }

    #[test]
    fn test_apply_to_updates_counters() {
        let clock = FixedClock(today());
        let mut card = record(2.5, 0, 0);

        update_after_answer(&card, Grade::Good, &clock).apply_to(&mut card);
        update_after_answer(&card, Grade::Again, &clock).apply_to(&mut card);
        update_after_answer(&card, Grade::Hard, &clock).apply_to(&mut card);

        assert_eq!(card.correct_count, 2);
        assert_eq!(card.incorrect_count, 1);
        assert_eq!(card.repetitions, 1);
        assert_eq!(card.last_review_date, Some(today()));
    }
}
