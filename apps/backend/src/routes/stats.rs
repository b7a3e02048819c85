//! Aggregate statistics endpoint

use axum::{extract::State, Extension, Json};

use crate::error::{ApiError, Result};
use crate::models::StatsResponse;
use crate::routes::auth::AuthenticatedUser;
use crate::AppState;

/// GET /api/stats
pub async fn get(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
) -> Result<Json<StatsResponse>> {
    let today = state.today();
    let db = &state.db;

    let user = db
        .get_user(auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    let total_decks = db.count_decks(auth.user_id).await?;
    let total_cards = db.count_cards(auth.user_id).await?;
    let (cards_due, cards_upcoming, new_cards) = db.count_review_states(auth.user_id, today).await?;
    let study_dates = db.get_study_dates(auth.user_id).await?;
    let cards_reviewed_today = db.get_cards_reviewed_on(auth.user_id, today).await?;

    Ok(Json(StatsResponse {
        total_decks,
        total_cards,
        cards_due,
        cards_upcoming,
        new_cards,
        current_streak: revision_core::current_streak(&study_dates, today),
        total_points: user.points,
        cards_reviewed_today,
    }))
}
