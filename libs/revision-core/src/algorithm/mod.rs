//! Spaced repetition schedulers.
//!
//! Flashcards use the SM-2 quality variant in [`sm2`]. Multiple-choice
//! questions use the simpler binary scheduler in [`mcq`], which has no ease
//! factor and is kept separate on purpose.

pub mod mcq;
pub mod sm2;

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::types::{Rating, ReviewState};

pub use mcq::{McqSchedule, McqScheduler};
pub use sm2::Sm2;

/// Result of scheduling a flashcard after review.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SchedulingResult {
    pub interval_days: u32,
    /// Rounded to two decimals.
    pub ease_factor: f64,
    pub next_review_date: NaiveDate,
}

impl SchedulingResult {
    pub fn new_state(&self) -> ReviewState {
        ReviewState {
            interval_days: self.interval_days,
            ease_factor: self.ease_factor,
        }
    }
}

/// Schedule a flashcard with the default SM-2 parameters.
pub fn schedule(rating: Rating, interval_days: u32, ease_factor: f64, today: NaiveDate) -> SchedulingResult {
    let state = ReviewState {
        interval_days,
        ease_factor,
    };
    Sm2::default().schedule(&state, rating, today)
}

/// `today + days`, saturating at the last representable date.
pub(crate) fn add_days(today: NaiveDate, days: u32) -> NaiveDate {
    today
        .checked_add_days(Days::new(u64::from(days)))
        .unwrap_or(NaiveDate::MAX)
}
