//! Achievement endpoints

use axum::{extract::State, Extension, Json};
use revision_core::AchievementTrigger;

use crate::error::Result;
use crate::models::{AchievementListResponse, CheckAchievementsResponse};
use crate::routes::auth::AuthenticatedUser;
use crate::services::achievements;
use crate::AppState;

/// GET /api/achievements
pub async fn list(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
) -> Result<Json<AchievementListResponse>> {
    let response = achievements::list_achievements(&state.db, auth.user_id).await?;
    Ok(Json(response))
}

/// POST /api/achievements/check
/// Evaluates the whole catalog
pub async fn check(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
) -> Result<Json<CheckAchievementsResponse>> {
    let new_achievements =
        achievements::check_achievements(&state.db, auth.user_id, AchievementTrigger::All, state.today())
            .await?;
    Ok(Json(CheckAchievementsResponse { new_achievements }))
}
