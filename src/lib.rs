pub mod database;
pub mod error;
pub mod export;
pub mod models;

pub use error::{ExportError, ReviewError, StorageError};
pub use models::{
    Clock, Grade, LearningSession, Quality, SchedulerConfig, SessionConfig, VocabularyReviewRecord,
    map_quality, preview_intervals, prioritize, select_session, update_after_answer,
};
