//! Binary scheduler for multiple-choice questions.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::add_days;

/// Next review of a multiple-choice question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct McqSchedule {
    pub interval_days: u32,
    pub next_review_date: NaiveDate,
}

/// Correct answers push the question out by a fixed multiple of the number
/// of correct answers so far, capped at `max_interval_days`. Wrong answers
/// bring it back after `retry_interval_days`.
#[derive(Debug, Clone)]
pub struct McqScheduler {
    pub days_per_correct: u32,
    pub max_interval_days: u32,
    pub retry_interval_days: u32,
}

impl Default for McqScheduler {
    fn default() -> Self {
        Self {
            days_per_correct: 2,
            max_interval_days: 30,
            retry_interval_days: 1,
        }
    }
}

impl McqScheduler {
    /// `times_correct_after` counts the attempt being scheduled.
    pub fn schedule(&self, is_correct: bool, times_correct_after: u32, today: NaiveDate) -> McqSchedule {
        let interval_days = if is_correct {
            times_correct_after
                .saturating_mul(self.days_per_correct)
                .min(self.max_interval_days)
        } else {
            self.retry_interval_days
        };

        McqSchedule {
            interval_days,
            next_review_date: add_days(today, interval_days),
        }
    }
}
