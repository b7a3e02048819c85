//! Achievement aggregation and awarding

use chrono::NaiveDate;
use revision_core::{evaluate, AchievementTrigger, CATALOG};
use revision_core::rewards::ACHIEVEMENT_BONUS_POINTS;
use uuid::Uuid;

use crate::db::Database;
use crate::error::Result;
use crate::models::{AchievementListResponse, AchievementStatus, AwardedAchievement};

/// Evaluate the rules covered by `trigger` and award anything newly earned.
///
/// Each award is an insert-if-absent that credits the bonus in the same
/// transaction, so concurrent checks grant an achievement at most once.
pub async fn check_achievements(
    db: &Database,
    user_id: Uuid,
    trigger: AchievementTrigger,
    today: NaiveDate,
) -> Result<Vec<AwardedAchievement>> {
    let counters = db.get_achievement_counters(user_id, trigger, today).await?;
    let held = db.get_held_achievements(user_id).await?;

    let mut awarded = Vec::new();
    for achievement in evaluate(&counters, &held, trigger) {
        let earned_at = db
            .award_achievement(user_id, achievement.name, ACHIEVEMENT_BONUS_POINTS)
            .await?;

        if let Some(earned_at) = earned_at {
            tracing::info!(%user_id, achievement = achievement.name, "Achievement earned");
            awarded.push(AwardedAchievement {
                name: achievement.name.to_string(),
                description: achievement.description.to_string(),
                bonus_points: ACHIEVEMENT_BONUS_POINTS,
                earned_at,
            });
        }
    }

    Ok(awarded)
}

/// Run the check that follows a committed write.
///
/// The write already happened, so a failure here is logged and reported as
/// "nothing new" rather than failing the request.
pub async fn check_after_event(
    db: &Database,
    user_id: Uuid,
    trigger: AchievementTrigger,
    today: NaiveDate,
) -> Vec<AwardedAchievement> {
    match check_achievements(db, user_id, trigger, today).await {
        Ok(awarded) => awarded,
        Err(e) => {
            tracing::error!(%user_id, ?trigger, "Achievement check failed: {}", e);
            Vec::new()
        }
    }
}

/// Full catalog with the user's earned status.
pub async fn list_achievements(db: &Database, user_id: Uuid) -> Result<AchievementListResponse> {
    let earned = db.get_user_achievements(user_id).await?;

    let achievements: Vec<AchievementStatus> = CATALOG
        .iter()
        .map(|a| {
            let earned_at = earned
                .iter()
                .find(|e| e.achievement_name == a.name)
                .map(|e| e.earned_at);
            AchievementStatus {
                name: a.name.to_string(),
                description: a.description.to_string(),
                category: a.category,
                earned: earned_at.is_some(),
                earned_at,
            }
        })
        .collect();

    let earned_count = achievements.iter().filter(|a| a.earned).count();

    Ok(AchievementListResponse {
        total: achievements.len(),
        earned: earned_count,
        achievements,
    })
}
