//! Core revision library used by the AutoRevise backend.
//!
//! Provides:
//! - SM-2 flashcard scheduling and the binary MCQ scheduler
//! - Study streak calculation
//! - Achievement catalog and rule evaluation
//! - Reward point values
//! - Shared types (Rating, ReviewState, AnswerOption, etc.)

pub mod achievements;
pub mod algorithm;
pub mod error;
pub mod rewards;
pub mod streak;
pub mod study_day;
pub mod types;

pub use achievements::{
    evaluate, Achievement, AchievementCategory, AchievementCounters, AchievementTrigger,
    Requirement, CATALOG,
};
pub use algorithm::{schedule, McqSchedule, McqScheduler, SchedulingResult, Sm2};
pub use error::{CoreError, Result};
pub use streak::current_streak;
pub use study_day::study_day;
pub use types::{AnswerOption, Difficulty, McqState, Rating, ReviewState, INITIAL_EASE, MINIMUM_EASE};
