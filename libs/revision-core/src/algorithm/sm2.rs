//! SM-2 spaced repetition algorithm.
//!
//! Ratings map onto the SuperMemo quality scale (forgot=0, hard=3, good=4,
//! easy=5). The ease update is the classic SM-2 formula; the only difference
//! between hard, good and easy is the quality value fed into it.

use chrono::NaiveDate;

use super::{add_days, SchedulingResult};
use crate::types::{Rating, ReviewState, INITIAL_EASE, MINIMUM_EASE};

/// SM-2 algorithm with configurable parameters.
#[derive(Debug, Clone)]
pub struct Sm2 {
    pub initial_ease: f64,
    pub minimum_ease: f64,
    /// Interval after a lapse and after the first successful review.
    pub first_interval: u32,
    /// Fixed jump after the second successful review.
    pub second_interval: u32,
    /// Longest interval ever scheduled; keeps the due date representable.
    pub maximum_interval: u32,
}

impl Default for Sm2 {
    fn default() -> Self {
        Self {
            initial_ease: INITIAL_EASE,
            minimum_ease: MINIMUM_EASE,
            first_interval: 1,
            second_interval: 6,
            maximum_interval: 36_500,
        }
    }
}

impl Sm2 {
    /// State used when no performance record exists yet.
    pub fn initial_state(&self) -> ReviewState {
        ReviewState {
            interval_days: 0,
            ease_factor: self.initial_ease,
        }
    }

    /// Calculate the next review state and due date.
    pub fn schedule(&self, state: &ReviewState, rating: Rating, today: NaiveDate) -> SchedulingResult {
        let (interval_days, ease_factor) =
            self.next_values(rating, state.interval_days, state.ease_factor);

        SchedulingResult {
            interval_days,
            ease_factor,
            next_review_date: add_days(today, interval_days),
        }
    }

    /// Returns `(new_interval, new_ease)` with the ease rounded for storage.
    pub fn next_values(&self, rating: Rating, interval_days: u32, ease_factor: f64) -> (u32, f64) {
        let quality = rating.quality();
        let new_ease = self.next_ease(quality, ease_factor);

        let new_interval = if quality < 3 {
            self.first_interval
        } else {
            match interval_days {
                0 => self.first_interval,
                1 => self.second_interval,
                // Uses the unrounded ease; ties go to the even day count.
                n => (f64::from(n) * new_ease)
                    .round_ties_even()
                    .min(f64::from(self.maximum_interval)) as u32,
            }
        };
        let new_interval = new_interval.min(self.maximum_interval);

        (new_interval, round_ease(new_ease))
    }

    fn next_ease(&self, quality: u8, ease_factor: f64) -> f64 {
        let miss = f64::from(5 - quality);
        let ease = ease_factor + (0.1 - miss * (0.08 + miss * 0.02));
        ease.max(self.minimum_ease)
    }
}

fn round_ease(ease: f64) -> f64 {
    (ease * 100.0).round() / 100.0
}
