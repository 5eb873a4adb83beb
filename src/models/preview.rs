//! "What if" projection of the next interval for every grade.
use super::clock::Clock;
use super::grade::{Grade, map_quality};
use super::review_record::VocabularyReviewRecord;
use super::sm2::{SchedulerConfig, compute_update};
use std::collections::BTreeMap;

/// Describes the interval each grade would produce, without touching the record.
pub fn preview_intervals(
    record: &VocabularyReviewRecord,
    clock: &impl Clock,
) -> BTreeMap<Grade, String> {
    preview_intervals_with_config(record, clock, &SchedulerConfig::default())
}

pub fn preview_intervals_with_config(
    record: &VocabularyReviewRecord,
    clock: &impl Clock,
    config: &SchedulerConfig,
) -> BTreeMap<Grade, String> {
    Grade::ALL
        .iter()
        .map(|&grade| {
            let update = compute_update(record, map_quality(grade), clock, config);
            (grade, describe_interval(update.interval))
        })
        .collect()
}

/// Human readable interval, e.g. "6 days", "2 weeks", "1 year".
pub fn describe_interval(days: u32) -> String {
    match days {
        0 => "New".to_string(),
        1 => "1 day".to_string(),
        2..=6 => format!("{days} days"),
        7..=29 => plural(rounded(days, 7.0), "week"),
        30..=364 => plural(rounded(days, 30.0), "month"),
        _ => plural(rounded(days, 365.0), "year"),
    }
}

fn rounded(days: u32, unit: f64) -> u32 {
    (days as f64 / unit).round() as u32
}

fn plural(count: u32, unit: &str) -> String {
    if count == 1 {
        format!("1 {unit}")
    } else {
        format!("{count} {unit}s")
    }
}
