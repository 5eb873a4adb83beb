//! User-facing grades and the 0-5 recall quality scale they map onto.
//!
//! The four buttons shown to the learner only reach qualities 1, 3, 4 and 5.
//! Qualities 0 and 2 exist on the underlying scale but no grade produces them.

use crate::error::ReviewError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lowest quality that counts as a successful recall.
pub const PASSING_QUALITY: u8 = 3;

/// Simplified grade offered by the review UI.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Grade {
    Again,
    Hard,
    Good,
    Easy,
}

impl Grade {
    pub const ALL: [Grade; 4] = [Grade::Again, Grade::Hard, Grade::Good, Grade::Easy];

    pub fn as_str(&self) -> &'static str {
        match self {
            Grade::Again => "again",
            Grade::Hard => "hard",
            Grade::Good => "good",
            Grade::Easy => "easy",
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parses free-form input such as `"good"` or the button number `"3"`.
impl FromStr for Grade {
    type Err = ReviewError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "again" | "1" => Ok(Grade::Again),
            "hard" | "2" => Ok(Grade::Hard),
            "good" | "3" => Ok(Grade::Good),
            "easy" | "4" => Ok(Grade::Easy),
            other => Err(ReviewError::InvalidQuality(other.to_string())),
        }
    }
}

/// Recall quality on the 0-5 scale (0 = complete blackout, 5 = perfect response).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Quality(u8);

impl Quality {
    pub const MAX: u8 = 5;

    pub fn value(self) -> u8 {
        self.0
    }

    /// Quality 3 and above is a correct answer.
    pub fn is_correct(self) -> bool {
        self.0 >= PASSING_QUALITY
    }
}

impl TryFrom<u8> for Quality {
    type Error = ReviewError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if value > Self::MAX {
            return Err(ReviewError::InvalidQuality(value.to_string()));
        }
        Ok(Quality(value))
    }
}

impl From<Quality> for u8 {
    fn from(q: Quality) -> Self {
        q.0
    }
}

impl From<Grade> for Quality {
    fn from(grade: Grade) -> Self {
        map_quality(grade)
    }
}

/// Maps a UI grade onto the algorithmic quality scale.
pub fn map_quality(grade: Grade) -> Quality {
    match grade {
        Grade::Again => Quality(1),
        Grade::Hard => Quality(3),
        Grade::Good => Quality(4),
        Grade::Easy => Quality(5),
    }
}
