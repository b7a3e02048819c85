//! Deck endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use revision_core::AchievementTrigger;
use uuid::Uuid;

use crate::db::Database;
use crate::error::{ApiError, Result};
use crate::models::*;
use crate::routes::auth::AuthenticatedUser;
use crate::services::achievements;
use crate::AppState;

/// Load a deck and check that `user_id` owns it
pub(crate) async fn owned_deck(db: &Database, user_id: Uuid, deck_id: i64) -> Result<DbDeck> {
    let deck = db
        .get_deck(deck_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Deck not found".to_string()))?;

    if deck.user_id != user_id {
        tracing::warn!(%user_id, deck_id, "Access to another user's deck denied");
        return Err(ApiError::Forbidden("Deck belongs to another user".to_string()));
    }

    Ok(deck)
}

/// GET /api/decks
pub async fn list(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
) -> Result<Json<DeckListResponse>> {
    let decks = state.db.get_decks(auth.user_id, state.today()).await?;
    Ok(Json(DeckListResponse { decks }))
}

/// POST /api/decks
pub async fn create(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Json(payload): Json<CreateDeckRequest>,
) -> Result<(StatusCode, Json<DeckResponse>)> {
    let name = payload.name.trim();
    if name.is_empty() {
        return Err(ApiError::BadRequest("Deck name is required".to_string()));
    }
    let description = payload.description.as_deref().unwrap_or("").trim();

    let deck = state.db.create_deck(auth.user_id, name, description).await?;
    tracing::info!(user_id = %auth.user_id, deck_id = deck.id, "Deck created");

    let new_achievements = achievements::check_after_event(
        &state.db,
        auth.user_id,
        AchievementTrigger::DeckCreated,
        state.today(),
    )
    .await;

    Ok((
        StatusCode::CREATED,
        Json(DeckResponse {
            deck,
            new_achievements,
        }),
    ))
}

/// GET /api/decks/{id}
pub async fn get(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(deck_id): Path<i64>,
) -> Result<Json<DbDeck>> {
    let deck = owned_deck(&state.db, auth.user_id, deck_id).await?;
    Ok(Json(deck))
}

/// DELETE /api/decks/{id}
pub async fn delete(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(deck_id): Path<i64>,
) -> Result<Json<DeleteResponse>> {
    owned_deck(&state.db, auth.user_id, deck_id).await?;
    let deleted = state.db.delete_deck(deck_id).await?;
    tracing::info!(user_id = %auth.user_id, deck_id, "Deck deleted");
    Ok(Json(DeleteResponse { deleted }))
}
