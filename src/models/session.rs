//! Study session composition.
//!
//! A session is filled by a fixed pipeline of pools: the pools the caller asked
//! for first (due, then new), then the excluded pools as backfill while the session
//! is still short. The combined set is shuffled and cut to the session size.
//!
//! Due and new pools are disjoint: a card with zero repetitions is only ever
//! offered through the new pool, whatever its `next_review_date`.

use super::clock::Clock;
use super::review_record::VocabularyReviewRecord;
use crate::error::ReviewError;
use chrono::NaiveDate;
use rand::rngs::{StdRng, ThreadRng};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use tracing::{info, warn};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub session_size: usize,
    pub include_due: bool,
    pub include_new: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            session_size: 20,
            include_due: true,
            include_new: true,
        }
    }
}

/// Orders the selected cards before they are shown.
pub trait Shuffler {
    fn shuffle(&mut self, records: &mut [VocabularyReviewRecord]);
}

/// Uniform shuffle driven by any `rand` generator.
pub struct RandomShuffler<R = ThreadRng> {
    rng: R,
}

impl RandomShuffler<ThreadRng> {
    pub fn new() -> Self {
        Self {
            rng: rand::thread_rng(),
        }
    }
}

impl Default for RandomShuffler<ThreadRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomShuffler<StdRng> {
    /// Reproducible shuffle for replays.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl<R: Rng> Shuffler for RandomShuffler<R> {
    fn shuffle(&mut self, records: &mut [VocabularyReviewRecord]) {
        records.shuffle(&mut self.rng);
    }
}

/// Leaves the pipeline order untouched.
#[derive(Clone, Copy, Debug, Default)]
pub struct KeepOrder;

impl Shuffler for KeepOrder {
    fn shuffle(&mut self, _records: &mut [VocabularyReviewRecord]) {}
}

/// One source of session candidates, already in selection order.
pub trait SelectionStrategy {
    fn name(&self) -> &'static str;

    fn candidates<'a>(
        &self,
        pool: &'a [VocabularyReviewRecord],
        today: NaiveDate,
    ) -> Vec<&'a VocabularyReviewRecord>;
}

/// Reviewed cards whose date has arrived, most overdue first.
pub struct DuePool;

impl SelectionStrategy for DuePool {
    fn name(&self) -> &'static str {
        "due"
    }

    fn candidates<'a>(
        &self,
        pool: &'a [VocabularyReviewRecord],
        today: NaiveDate,
    ) -> Vec<&'a VocabularyReviewRecord> {
        let mut due: Vec<_> = pool.iter().filter(|r| r.is_due(today)).collect();
        due.sort_by_key(|r| r.next_review_date);
        due
    }
}

/// Never-answered cards, oldest first.
pub struct NewPool;

impl SelectionStrategy for NewPool {
    fn name(&self) -> &'static str {
        "new"
    }

    fn candidates<'a>(
        &self,
        pool: &'a [VocabularyReviewRecord],
        _today: NaiveDate,
    ) -> Vec<&'a VocabularyReviewRecord> {
        let mut fresh: Vec<_> = pool
            .iter()
            .filter(|r| !r.is_suspended && r.is_new())
            .collect();
        fresh.sort_by_key(|r| r.created_at);
        fresh
    }
}

/// Requested pools first, then the excluded ones as backfill.
pub fn selection_pipeline(config: &SessionConfig) -> Vec<Box<dyn SelectionStrategy>> {
    let mut stages: Vec<Box<dyn SelectionStrategy>> = Vec::new();
    if config.include_due {
        stages.push(Box::new(DuePool));
    }
    if config.include_new {
        stages.push(Box::new(NewPool));
    }
    if !config.include_due {
        stages.push(Box::new(DuePool));
    }
    if !config.include_new {
        stages.push(Box::new(NewPool));
    }
    stages
}

/// Builds a bounded, shuffled study session from a user's records.
pub fn select_session(
    pool: &[VocabularyReviewRecord],
    config: &SessionConfig,
    clock: &impl Clock,
    shuffler: &mut impl Shuffler,
) -> Result<Vec<VocabularyReviewRecord>, ReviewError> {
    let today = clock.today();
    let mut selected: Vec<VocabularyReviewRecord> = Vec::new();

    for stage in selection_pipeline(config) {
        let remaining = config.session_size.saturating_sub(selected.len());
        if remaining == 0 {
            break;
        }
        let before = selected.len();
        selected.extend(
            stage
                .candidates(pool, today)
                .into_iter()
                .take(remaining)
                .cloned(),
        );
        info!(
            pool = stage.name(),
            taken = selected.len() - before,
            "session stage"
        );
    }

    shuffler.shuffle(&mut selected);
    selected.truncate(config.session_size);

    if selected.is_empty() {
        warn!(pool_size = pool.len(), "no cards available for session");
        return Err(ReviewError::NoCardsAvailable);
    }
    Ok(selected)
}

/// Ranks an unbounded list: reviewed cards before new ones, most overdue first,
/// lower ease first on equal dates. New cards keep their input order.
pub fn prioritize(pool: &[VocabularyReviewRecord]) -> Vec<VocabularyReviewRecord> {
    let mut ranked = pool.to_vec();
    ranked.sort_by(|a, b| match (a.is_new(), b.is_new()) {
        (false, true) => Ordering::Less,
        (true, false) => Ordering::Greater,
        (true, true) => Ordering::Equal,
        (false, false) => a
            .next_review_date
            .cmp(&b.next_review_date)
            .then_with(|| a.ease_factor.total_cmp(&b.ease_factor)),
    });
    ranked
}
