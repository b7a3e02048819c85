//! Flashcard review and MCQ answer submission

use chrono::NaiveDate;
use revision_core::rewards::{mcq_points, review_points};
use revision_core::{AchievementTrigger, AnswerOption, McqScheduler, Rating, Sm2};
use uuid::Uuid;

use crate::db::Database;
use crate::error::{ApiError, Result};
use crate::models::{CheckMcqResponse, SubmitReviewResponse};
use crate::services::achievements;

/// Rate a card, persist the new schedule and credit points, then look for
/// newly earned study achievements.
pub async fn submit_review(
    db: &Database,
    user_id: Uuid,
    card_id: i64,
    rating: &str,
    today: NaiveDate,
) -> Result<SubmitReviewResponse> {
    let rating: Rating = rating.parse()?;

    let ownership = db
        .get_card_ownership(card_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Card not found".to_string()))?;

    if ownership.user_id != user_id {
        tracing::warn!(%user_id, card_id, "Review of another user's card denied");
        return Err(ApiError::Forbidden("Card belongs to another user".to_string()));
    }

    let sm2 = Sm2::default();
    let outcome = db
        .apply_card_review(user_id, card_id, today, review_points(rating), |state| {
            sm2.schedule(&state, rating, today)
        })
        .await?;

    tracing::info!(
        %user_id,
        card_id,
        %rating,
        interval_before = outcome.previous.interval_days,
        interval_after = outcome.result.interval_days,
        ease_after = outcome.result.ease_factor,
        "Card reviewed"
    );

    let new_achievements =
        achievements::check_after_event(db, user_id, AchievementTrigger::ReviewSubmitted, today).await;

    Ok(SubmitReviewResponse {
        next_review_date: outcome.result.next_review_date,
        interval: outcome.result.interval_days,
        ease_factor: outcome.result.ease_factor,
        points_earned: outcome.points_earned,
        new_achievements,
    })
}

/// Check an MCQ answer and reschedule the question for this user.
pub async fn answer_mcq(
    db: &Database,
    user_id: Uuid,
    mcq_id: i64,
    answer: &str,
    today: NaiveDate,
) -> Result<CheckMcqResponse> {
    let answer: AnswerOption = answer.parse()?;

    let mcq = db
        .get_mcq(mcq_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("MCQ not found".to_string()))?;

    let correct: AnswerOption = mcq
        .correct_option
        .parse()
        .map_err(|_| ApiError::Internal(format!("MCQ {} has a corrupt answer key", mcq.id)))?;

    let is_correct = answer == correct;
    let scheduler = McqScheduler::default();
    let outcome = db
        .apply_mcq_answer(user_id, mcq_id, is_correct, today, mcq_points(is_correct), |state| {
            scheduler.schedule(is_correct, state.times_correct, today)
        })
        .await?;

    tracing::info!(
        %user_id,
        mcq_id,
        is_correct,
        interval_days = outcome.interval_days,
        "MCQ answered"
    );

    Ok(CheckMcqResponse {
        correct: is_correct,
        correct_answer: correct.to_string(),
        explanation: mcq.explanation,
        points_earned: outcome.points_earned,
        next_review_date: outcome.next_review_date,
    })
}
