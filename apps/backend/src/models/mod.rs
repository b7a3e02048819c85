//! Database models and API types

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

// Re-export shared types from revision-core
pub use revision_core::types::{AnswerOption, Difficulty, McqState, Rating, ReviewState};
pub use revision_core::{AchievementCategory, SchedulingResult};

// === Database Entity Types ===

/// Registered user and points ledger
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    #[serde(skip_serializing)]
    pub token: String,
    pub display_name: Option<String>,
    pub points: i64,
    pub created_at: DateTime<Utc>,
    pub last_seen_at: DateTime<Utc>,
}

/// Deck stored in PostgreSQL
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbDeck {
    pub id: i64,
    pub user_id: Uuid,
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

/// Deck with card counts
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DeckSummary {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub card_count: i64,
    pub cards_due: i64,
}

/// Card stored in PostgreSQL
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbCard {
    pub id: i64,
    pub deck_id: i64,
    pub front: String,
    pub back: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Card with the requesting user's review state.
///
/// `status` is `new` (never reviewed), `due`, `learning` (interval under a
/// week) or `mastered`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DeckCard {
    pub id: i64,
    pub deck_id: i64,
    pub front: String,
    pub back: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub next_review_date: Option<NaiveDate>,
    pub interval_days: Option<i32>,
    pub ease_factor: Option<f64>,
    pub status: String,
}

/// Card id with the owner of its deck
#[derive(Debug, Clone, FromRow)]
pub struct CardOwnership {
    pub card_id: i64,
    pub deck_id: i64,
    pub user_id: Uuid,
}

/// Per-user review state of a card
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbCardPerformance {
    pub user_id: Uuid,
    pub card_id: i64,
    pub interval_days: i32,
    pub ease_factor: f64,
    pub next_review_date: NaiveDate,
    pub reviews_count: i32,
    pub last_reviewed_at: Option<DateTime<Utc>>,
}

impl DbCardPerformance {
    /// Convert to revision-core ReviewState
    pub fn to_review_state(&self) -> ReviewState {
        ReviewState {
            interval_days: self.interval_days.max(0) as u32,
            ease_factor: self.ease_factor,
        }
    }
}

/// Card due for study, with its review state if it has one
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DueCard {
    pub card_id: i64,
    pub deck_id: i64,
    pub deck_name: String,
    pub front: String,
    pub back: String,
    pub next_review_date: Option<NaiveDate>,
    pub interval_days: Option<i32>,
    pub ease_factor: Option<f64>,
}

/// Multiple-choice question including its answer
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbMcq {
    pub id: i64,
    pub deck_id: i64,
    pub question_text: String,
    pub option_a: String,
    pub option_b: String,
    pub option_c: String,
    pub option_d: String,
    pub correct_option: String,
    pub explanation: Option<String>,
    pub difficulty: String,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl DbMcq {
    /// Question as shown to students, without the answer
    pub fn to_view(&self) -> McqView {
        McqView {
            id: self.id,
            deck_id: self.deck_id,
            question_text: self.question_text.clone(),
            option_a: self.option_a.clone(),
            option_b: self.option_b.clone(),
            option_c: self.option_c.clone(),
            option_d: self.option_d.clone(),
            difficulty: self.difficulty.clone(),
            created_at: self.created_at,
        }
    }
}

/// Multiple-choice question without its answer
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct McqView {
    pub id: i64,
    pub deck_id: i64,
    pub question_text: String,
    pub option_a: String,
    pub option_b: String,
    pub option_c: String,
    pub option_d: String,
    pub difficulty: String,
    pub created_at: DateTime<Utc>,
}

/// Per-user attempt counters for an MCQ
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbMcqPerformance {
    pub user_id: Uuid,
    pub mcq_id: i64,
    pub times_attempted: i32,
    pub times_correct: i32,
    pub last_attempt_at: Option<DateTime<Utc>>,
    pub next_review_date: NaiveDate,
}

impl DbMcqPerformance {
    /// Convert to revision-core McqState
    pub fn to_core_state(&self) -> McqState {
        McqState {
            times_attempted: self.times_attempted.max(0) as u32,
            times_correct: self.times_correct.max(0) as u32,
        }
    }
}

/// MCQ due for study
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DueMcq {
    pub mcq_id: i64,
    pub deck_id: i64,
    pub deck_name: String,
    pub question_text: String,
    pub option_a: String,
    pub option_b: String,
    pub option_c: String,
    pub option_d: String,
    pub difficulty: String,
    pub next_review_date: Option<NaiveDate>,
    pub times_attempted: Option<i32>,
    pub times_correct: Option<i32>,
}

/// One study-log day
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct StudyLogRow {
    pub study_date: NaiveDate,
    pub cards_reviewed: i32,
}

/// Earned achievement record
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserAchievement {
    pub achievement_name: String,
    pub earned_at: DateTime<Utc>,
}

// === Transaction Outcomes ===

/// What a flashcard review changed
#[derive(Debug, Clone)]
pub struct ReviewOutcome {
    pub previous: ReviewState,
    pub result: SchedulingResult,
    pub points_earned: i64,
}

/// What an MCQ answer changed
#[derive(Debug, Clone)]
pub struct McqOutcome {
    pub state: McqState,
    pub interval_days: u32,
    pub next_review_date: NaiveDate,
    pub points_earned: i64,
}

// === API Request/Response Types ===

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub database: String,
}

// User types
#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterUserRequest {
    pub display_name: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterUserResponse {
    pub user_id: Uuid,
    pub token: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MeResponse {
    pub user_id: Uuid,
    pub display_name: Option<String>,
    pub points: i64,
    pub created_at: DateTime<Utc>,
}

// Achievement types
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AwardedAchievement {
    pub name: String,
    pub description: String,
    pub bonus_points: i64,
    pub earned_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AchievementStatus {
    pub name: String,
    pub description: String,
    pub category: AchievementCategory,
    pub earned: bool,
    pub earned_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AchievementListResponse {
    pub achievements: Vec<AchievementStatus>,
    pub total: usize,
    pub earned: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CheckAchievementsResponse {
    pub new_achievements: Vec<AwardedAchievement>,
}

// Deck types
#[derive(Debug, Serialize, Deserialize)]
pub struct CreateDeckRequest {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeckResponse {
    pub deck: DbDeck,
    pub new_achievements: Vec<AwardedAchievement>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeckListResponse {
    pub decks: Vec<DeckSummary>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub deleted: bool,
}

// Card types
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCardRequest {
    pub front: String,
    pub back: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BulkCreateCardsRequest {
    pub cards: Vec<CreateCardRequest>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateCardRequest {
    pub front: Option<String>,
    pub back: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CardResponse {
    pub card: DbCard,
    pub new_achievements: Vec<AwardedAchievement>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CardListResponse {
    pub cards: Vec<DeckCard>,
    pub total: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BulkCreateCardsResponse {
    pub created: usize,
    pub cards: Vec<DbCard>,
    pub new_achievements: Vec<AwardedAchievement>,
}

// Study types
#[derive(Debug, Serialize, Deserialize)]
pub struct StudySessionQuery {
    pub deck_id: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StudySessionResponse {
    pub cards: Vec<DueCard>,
    pub total: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SubmitReviewRequest {
    pub card_id: i64,
    pub rating: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SubmitReviewResponse {
    pub next_review_date: NaiveDate,
    pub interval: u32,
    pub ease_factor: f64,
    pub points_earned: i64,
    pub new_achievements: Vec<AwardedAchievement>,
}

// Study log types
#[derive(Debug, Serialize, Deserialize)]
pub struct StudyLogQuery {
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StudyLogResponse {
    pub logs: Vec<StudyLogRow>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AddStudyLogRequest {
    pub cards_reviewed: Option<i32>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AddStudyLogResponse {
    pub study_date: NaiveDate,
    pub cards_reviewed_added: i32,
}

// Stats types
#[derive(Debug, Serialize, Deserialize)]
pub struct StatsResponse {
    pub total_decks: i64,
    pub total_cards: i64,
    pub cards_due: i64,
    pub cards_upcoming: i64,
    pub new_cards: i64,
    pub current_streak: u32,
    pub total_points: i64,
    pub cards_reviewed_today: i32,
}

// MCQ types
#[derive(Debug, Serialize, Deserialize)]
pub struct CreateMcqRequest {
    pub question_text: String,
    pub option_a: String,
    pub option_b: String,
    pub option_c: String,
    pub option_d: String,
    pub correct_option: String,
    pub explanation: Option<String>,
    pub difficulty: Option<String>,
}

/// Validated MCQ ready for insertion
#[derive(Debug, Clone)]
pub struct NewMcq {
    pub question_text: String,
    pub options: [String; 4],
    pub correct_option: AnswerOption,
    pub explanation: Option<String>,
    pub difficulty: Difficulty,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct McqListResponse {
    pub mcqs: Vec<McqView>,
    pub total: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CheckMcqRequest {
    pub answer: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CheckMcqResponse {
    pub correct: bool,
    pub correct_answer: String,
    pub explanation: Option<String>,
    pub points_earned: i64,
    pub next_review_date: NaiveDate,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct McqSessionQuery {
    pub deck_id: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct McqSessionResponse {
    pub mcqs: Vec<DueMcq>,
    pub total: usize,
}

#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct McqStatsResponse {
    pub total_mcqs_attempted: i64,
    pub total_attempts: i64,
    pub total_correct: i64,
    pub avg_accuracy: f64,
    pub mcqs_due_today: i64,
}
