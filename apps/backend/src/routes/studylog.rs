//! Study log endpoints

use axum::{
    extract::{Query, State},
    Extension, Json,
};

use crate::error::{ApiError, Result};
use crate::models::*;
use crate::routes::auth::AuthenticatedUser;
use crate::AppState;

/// Largest count a single manual entry may add
const MAX_MANUAL_COUNT: i32 = 1000;

fn validate_manual_count(count: i32) -> Result<i32> {
    if !(1..=MAX_MANUAL_COUNT).contains(&count) {
        return Err(ApiError::BadRequest(format!(
            "cards_reviewed must be between 1 and {MAX_MANUAL_COUNT}"
        )));
    }
    Ok(count)
}

/// GET /api/studylog
pub async fn list(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Query(query): Query<StudyLogQuery>,
) -> Result<Json<StudyLogResponse>> {
    let limit = query.limit.unwrap_or(30).clamp(1, 366);
    let logs = state.db.get_study_log(auth.user_id, limit).await?;
    Ok(Json(StudyLogResponse { logs }))
}

/// POST /api/studylog
/// Adds a manual count to today's entry
pub async fn add(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Json(payload): Json<Option<AddStudyLogRequest>>,
) -> Result<Json<AddStudyLogResponse>> {
    let count = validate_manual_count(payload.and_then(|p| p.cards_reviewed).unwrap_or(1))?;

    let today = state.today();
    state.db.add_study_log(auth.user_id, today, count).await?;

    Ok(Json(AddStudyLogResponse {
        study_date: today,
        cards_reviewed_added: count,
    }))
}
