//! Point values credited to the points ledger.

use crate::types::Rating;

/// Bonus for a newly earned achievement.
pub const ACHIEVEMENT_BONUS_POINTS: i64 = 100;

/// Reward for a correct multiple-choice answer.
pub const MCQ_CORRECT_POINTS: i64 = 5;

/// Points for reviewing a flashcard. Forgetting still earns something.
pub fn review_points(rating: Rating) -> i64 {
    match rating {
        Rating::Forgot => 5,
        Rating::Hard => 10,
        Rating::Good => 15,
        Rating::Easy => 20,
    }
}

pub fn mcq_points(is_correct: bool) -> i64 {
    if is_correct {
        MCQ_CORRECT_POINTS
    } else {
        0
    }
}
