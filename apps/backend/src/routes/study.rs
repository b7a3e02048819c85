//! Study endpoints

use axum::{
    extract::{Query, State},
    Extension, Json,
};

use crate::error::Result;
use crate::models::*;
use crate::routes::auth::AuthenticatedUser;
use crate::routes::decks::owned_deck;
use crate::services::review;
use crate::AppState;

const DEFAULT_SESSION_SIZE: i64 = 20;
const MAX_SESSION_SIZE: i64 = 200;

/// GET /api/study/session
/// New cards first, then overdue cards by due date
pub async fn session(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Query(query): Query<StudySessionQuery>,
) -> Result<Json<StudySessionResponse>> {
    if let Some(deck_id) = query.deck_id {
        owned_deck(&state.db, auth.user_id, deck_id).await?;
    }

    let limit = query
        .limit
        .unwrap_or(DEFAULT_SESSION_SIZE)
        .clamp(1, MAX_SESSION_SIZE);

    let cards = state
        .db
        .get_due_cards(auth.user_id, query.deck_id, state.today(), limit)
        .await?;

    Ok(Json(StudySessionResponse {
        total: cards.len(),
        cards,
    }))
}

/// POST /api/study/review
pub async fn review(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Json(payload): Json<SubmitReviewRequest>,
) -> Result<Json<SubmitReviewResponse>> {
    let response = review::submit_review(
        &state.db,
        auth.user_id,
        payload.card_id,
        &payload.rating,
        state.today(),
    )
    .await?;

    Ok(Json(response))
}
