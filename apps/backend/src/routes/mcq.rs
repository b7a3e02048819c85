//! Multiple-choice question endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};

use crate::error::{ApiError, Result};
use crate::models::*;
use crate::routes::auth::AuthenticatedUser;
use crate::routes::decks::owned_deck;
use crate::services::review;
use crate::AppState;

fn required(field: &str, value: &str) -> Result<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ApiError::BadRequest(format!("{field} is required")));
    }
    Ok(value.to_string())
}

impl CreateMcqRequest {
    /// Trim and validate into an insertable question
    fn validate(self) -> Result<NewMcq> {
        let difficulty = match self.difficulty.as_deref() {
            Some(raw) => raw.parse::<Difficulty>()?,
            None => Difficulty::default(),
        };

        Ok(NewMcq {
            question_text: required("question_text", &self.question_text)?,
            options: [
                required("option_a", &self.option_a)?,
                required("option_b", &self.option_b)?,
                required("option_c", &self.option_c)?,
                required("option_d", &self.option_d)?,
            ],
            correct_option: self.correct_option.parse()?,
            explanation: self
                .explanation
                .map(|e| e.trim().to_string())
                .filter(|e| !e.is_empty()),
            difficulty,
        })
    }
}

/// GET /api/decks/{id}/mcqs
pub async fn list(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(deck_id): Path<i64>,
) -> Result<Json<McqListResponse>> {
    owned_deck(&state.db, auth.user_id, deck_id).await?;
    let mcqs = state.db.get_deck_mcqs(deck_id).await?;
    Ok(Json(McqListResponse {
        total: mcqs.len(),
        mcqs,
    }))
}

/// POST /api/decks/{id}/mcqs
pub async fn create(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(deck_id): Path<i64>,
    Json(payload): Json<CreateMcqRequest>,
) -> Result<(StatusCode, Json<McqView>)> {
    let mcq = payload.validate()?;
    owned_deck(&state.db, auth.user_id, deck_id).await?;

    let created = state.db.create_mcq(deck_id, auth.user_id, &mcq).await?;
    tracing::info!(user_id = %auth.user_id, deck_id, mcq_id = created.id, "MCQ created");

    Ok((StatusCode::CREATED, Json(created.to_view())))
}

/// POST /api/mcq/{id}/check
/// Open to every user
pub async fn check(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(mcq_id): Path<i64>,
    Json(payload): Json<CheckMcqRequest>,
) -> Result<Json<CheckMcqResponse>> {
    let response =
        review::answer_mcq(&state.db, auth.user_id, mcq_id, &payload.answer, state.today()).await?;
    Ok(Json(response))
}

/// GET /api/mcq/session
pub async fn session(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Query(query): Query<McqSessionQuery>,
) -> Result<Json<McqSessionResponse>> {
    if let Some(deck_id) = query.deck_id {
        owned_deck(&state.db, auth.user_id, deck_id).await?;
    }

    let limit = query.limit.unwrap_or(10).clamp(1, 100);
    let mcqs = state
        .db
        .get_due_mcqs(auth.user_id, query.deck_id, state.today(), limit)
        .await?;

    Ok(Json(McqSessionResponse {
        total: mcqs.len(),
        mcqs,
    }))
}

/// GET /api/mcq/stats
pub async fn stats(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
) -> Result<Json<McqStatsResponse>> {
    let stats = state.db.get_mcq_stats(auth.user_id, state.today()).await?;
    Ok(Json(stats))
}
