//! Card endpoints

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
use crate::routes::decks::owned_deck;
use crate::services::achievements;
use crate::AppState;

async fn owned_card(db: &Database, user_id: Uuid, card_id: i64) -> Result<CardOwnership> {
    let ownership = db
        .get_card_ownership(card_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Card not found".to_string()))?;

    if ownership.user_id != user_id {
        tracing::warn!(%user_id, card_id, "Access to another user's card denied");
        return Err(ApiError::Forbidden("Card belongs to another user".to_string()));
    }

    Ok(ownership)
}

fn validate_card(card: &CreateCardRequest) -> Result<()> {
    if card.front.trim().is_empty() || card.back.trim().is_empty() {
        return Err(ApiError::BadRequest("Card front and back are required".to_string()));
    }
    Ok(())
}

/// GET /api/decks/{id}/cards
pub async fn list(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(deck_id): Path<i64>,
) -> Result<Json<CardListResponse>> {
    owned_deck(&state.db, auth.user_id, deck_id).await?;
    let cards = state.db.get_cards(auth.user_id, deck_id, state.today()).await?;
    Ok(Json(CardListResponse {
        total: cards.len(),
        cards,
    }))
}

/// POST /api/decks/{id}/cards
pub async fn create(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(deck_id): Path<i64>,
    Json(payload): Json<CreateCardRequest>,
) -> Result<(StatusCode, Json<CardResponse>)> {
    validate_card(&payload)?;
    owned_deck(&state.db, auth.user_id, deck_id).await?;

    let card = state
        .db
        .create_card(deck_id, payload.front.trim(), payload.back.trim())
        .await?;

    let new_achievements = achievements::check_after_event(
        &state.db,
        auth.user_id,
        AchievementTrigger::CardsAdded,
        state.today(),
    )
    .await;

    Ok((
        StatusCode::CREATED,
        Json(CardResponse {
            card,
            new_achievements,
        }),
    ))
}

/// POST /api/decks/{id}/cards/bulk
/// All cards are inserted or none are
pub async fn bulk_create(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(deck_id): Path<i64>,
    Json(payload): Json<BulkCreateCardsRequest>,
) -> Result<(StatusCode, Json<BulkCreateCardsResponse>)> {
    if payload.cards.is_empty() {
        return Err(ApiError::BadRequest("No cards provided".to_string()));
    }
    for (i, card) in payload.cards.iter().enumerate() {
        validate_card(card).map_err(|_| {
            ApiError::BadRequest(format!("Card {} is missing its front or back", i + 1))
        })?;
    }
    owned_deck(&state.db, auth.user_id, deck_id).await?;

    let cards = state.db.create_cards(deck_id, &payload.cards).await?;
    tracing::info!(user_id = %auth.user_id, deck_id, count = cards.len(), "Cards imported");

    let new_achievements = achievements::check_after_event(
        &state.db,
        auth.user_id,
        AchievementTrigger::CardsAdded,
        state.today(),
    )
    .await;

    Ok((
        StatusCode::CREATED,
        Json(BulkCreateCardsResponse {
            created: cards.len(),
            cards,
            new_achievements,
        }),
    ))
}

/// PUT /api/cards/{id}
pub async fn update(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(card_id): Path<i64>,
    Json(payload): Json<UpdateCardRequest>,
) -> Result<Json<DbCard>> {
    let front = payload.front.as_deref().map(str::trim);
    let back = payload.back.as_deref().map(str::trim);
    if front.is_some_and(str::is_empty) || back.is_some_and(str::is_empty) {
        return Err(ApiError::BadRequest("Card front and back cannot be empty".to_string()));
    }

    owned_card(&state.db, auth.user_id, card_id).await?;
    let card = state.db.update_card(card_id, front, back).await?;
    Ok(Json(card))
}

/// DELETE /api/cards/{id}
pub async fn delete(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(card_id): Path<i64>,
) -> Result<Json<DeleteResponse>> {
    owned_card(&state.db, auth.user_id, card_id).await?;
    let deleted = state.db.delete_card(card_id).await?;
    Ok(Json(DeleteResponse { deleted }))
}
