pub mod clock;
pub mod grade;
pub mod learning_session;
pub mod preview;
pub mod review_record;
pub mod session;
pub mod sm2;

pub use clock::{Clock, FixedClock, SystemClock};
pub use grade::{Grade, Quality, map_quality};
pub use learning_session::LearningSession;
pub use preview::{describe_interval, preview_intervals};
pub use review_record::VocabularyReviewRecord;
pub use session::{KeepOrder, RandomShuffler, SessionConfig, Shuffler, prioritize, select_session};
pub use sm2::{
    DEFAULT_EASE_FACTOR, MASTERY_THRESHOLD_DAYS, MIN_EASE_FACTOR, ReviewUpdate, SchedulerConfig,
    apply_quality, update_after_answer,
};
