//! PostgreSQL database operations

use std::collections::HashSet;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use revision_core::{AchievementCategory, AchievementCounters, AchievementTrigger, McqSchedule, SchedulingResult};
use sqlx::{postgres::PgPoolOptions, PgPool};
use uuid::Uuid;

use crate::error::{ApiError, Result};
use crate::models::*;

/// Database wrapper with connection pool
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Connect to PostgreSQL and create connection pool
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;

        Ok(Self { pool })
    }

    /// Run database migrations
    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| ApiError::Migration(e.to_string()))?;
        Ok(())
    }

    /// Get the connection pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Check that the database answers
    pub async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    // === User Repository ===

    /// Create a new user with generated token
    pub async fn create_user(&self, display_name: Option<&str>) -> Result<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, token, display_name)
            VALUES ($1, $2, $3)
            RETURNING id, token, display_name, points, created_at, last_seen_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(Uuid::new_v4().to_string())
        .bind(display_name)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    /// Get user by token
    pub async fn get_user_by_token(&self, token: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, token, display_name, points, created_at, last_seen_at
            FROM users
            WHERE token = $1
            "#,
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Get user by ID
    pub async fn get_user(&self, user_id: Uuid) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, token, display_name, points, created_at, last_seen_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Update user last_seen_at timestamp
    pub async fn update_last_seen(&self, user_id: Uuid) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE users
            SET last_seen_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    // === Deck Repository ===

    /// Create a deck
    pub async fn create_deck(&self, user_id: Uuid, name: &str, description: &str) -> Result<DbDeck> {
        let deck = sqlx::query_as::<_, DbDeck>(
            r#"
            INSERT INTO decks (user_id, name, description)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, name, description, created_at
            "#,
        )
        .bind(user_id)
        .bind(name)
        .bind(description)
        .fetch_one(&self.pool)
        .await?;

        Ok(deck)
    }

    /// Get deck by ID
    pub async fn get_deck(&self, deck_id: i64) -> Result<Option<DbDeck>> {
        let deck = sqlx::query_as::<_, DbDeck>(
            r#"
            SELECT id, user_id, name, description, created_at
            FROM decks
            WHERE id = $1
            "#,
        )
        .bind(deck_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(deck)
    }

    /// Get all decks for a user with card and due counts
    pub async fn get_decks(&self, user_id: Uuid, today: NaiveDate) -> Result<Vec<DeckSummary>> {
        let decks = sqlx::query_as::<_, DeckSummary>(
            r#"
            SELECT
                d.id,
                d.name,
                d.description,
                d.created_at,
                COUNT(c.id) AS card_count,
                COUNT(CASE WHEN cp.next_review_date <= $2 THEN 1 END) AS cards_due
            FROM decks d
            LEFT JOIN cards c ON c.deck_id = d.id
            LEFT JOIN card_performance cp ON cp.card_id = c.id AND cp.user_id = $1
            WHERE d.user_id = $1
            GROUP BY d.id
            ORDER BY d.created_at DESC
            "#,
        )
        .bind(user_id)
        .bind(today)
        .fetch_all(&self.pool)
        .await?;

        Ok(decks)
    }

    /// Delete a deck; cards, MCQs and their performance rows cascade
    pub async fn delete_deck(&self, deck_id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM decks WHERE id = $1")
            .bind(deck_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    // === Card Repository ===

    /// Get all cards in a deck with the user's review state and status
    pub async fn get_cards(&self, user_id: Uuid, deck_id: i64, today: NaiveDate) -> Result<Vec<DeckCard>> {
        let cards = sqlx::query_as::<_, DeckCard>(
            r#"
            SELECT
                c.id, c.deck_id, c.front, c.back, c.created_at, c.updated_at,
                cp.next_review_date, cp.interval_days, cp.ease_factor,
                CASE
                    WHEN cp.next_review_date IS NULL THEN 'new'
                    WHEN cp.next_review_date <= $3 THEN 'due'
                    WHEN cp.interval_days < 7 THEN 'learning'
                    ELSE 'mastered'
                END AS status
            FROM cards c
            LEFT JOIN card_performance cp ON cp.card_id = c.id AND cp.user_id = $1
            WHERE c.deck_id = $2
            ORDER BY c.created_at, c.id
            "#,
        )
        .bind(user_id)
        .bind(deck_id)
        .bind(today)
        .fetch_all(&self.pool)
        .await?;

        Ok(cards)
    }

    /// Create a card
    pub async fn create_card(&self, deck_id: i64, front: &str, back: &str) -> Result<DbCard> {
        let card = sqlx::query_as::<_, DbCard>(
            r#"
            INSERT INTO cards (deck_id, front, back)
            VALUES ($1, $2, $3)
            RETURNING id, deck_id, front, back, created_at, updated_at
            "#,
        )
        .bind(deck_id)
        .bind(front)
        .bind(back)
        .fetch_one(&self.pool)
        .await?;

        Ok(card)
    }

    /// Create several cards in one transaction
    pub async fn create_cards(&self, deck_id: i64, cards: &[CreateCardRequest]) -> Result<Vec<DbCard>> {
        let mut tx = self.pool.begin().await?;
        let mut created = Vec::with_capacity(cards.len());

        for card in cards {
            let row = sqlx::query_as::<_, DbCard>(
                r#"
                INSERT INTO cards (deck_id, front, back)
                VALUES ($1, $2, $3)
                RETURNING id, deck_id, front, back, created_at, updated_at
                "#,
            )
            .bind(deck_id)
            .bind(card.front.trim())
            .bind(card.back.trim())
            .fetch_one(&mut *tx)
            .await?;
            created.push(row);
        }

        tx.commit().await?;
        Ok(created)
    }

    /// Get a card together with the owner of its deck
    pub async fn get_card_ownership(&self, card_id: i64) -> Result<Option<CardOwnership>> {
        let ownership = sqlx::query_as::<_, CardOwnership>(
            r#"
            SELECT c.id AS card_id, c.deck_id, d.user_id
            FROM cards c
            JOIN decks d ON c.deck_id = d.id
            WHERE c.id = $1
            "#,
        )
        .bind(card_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(ownership)
    }

    /// Update card text; missing fields are left unchanged
    pub async fn update_card(&self, card_id: i64, front: Option<&str>, back: Option<&str>) -> Result<DbCard> {
        let card = sqlx::query_as::<_, DbCard>(
            r#"
            UPDATE cards
            SET front = COALESCE($2, front),
                back = COALESCE($3, back),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, deck_id, front, back, created_at, updated_at
            "#,
        )
        .bind(card_id)
        .bind(front)
        .bind(back)
        .fetch_one(&self.pool)
        .await?;

        Ok(card)
    }

    /// Delete a card
    pub async fn delete_card(&self, card_id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM cards WHERE id = $1")
            .bind(card_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    // === Study Repository ===

    /// Get cards that are new or due, oldest due first
    pub async fn get_due_cards(
        &self,
        user_id: Uuid,
        deck_id: Option<i64>,
        today: NaiveDate,
        limit: i64,
    ) -> Result<Vec<DueCard>> {
        let cards = match deck_id {
            Some(deck_id) => {
                sqlx::query_as::<_, DueCard>(
                    r#"
                    SELECT c.id AS card_id, c.deck_id, d.name AS deck_name, c.front, c.back,
                           cp.next_review_date, cp.interval_days, cp.ease_factor
                    FROM cards c
                    JOIN decks d ON c.deck_id = d.id
                    LEFT JOIN card_performance cp ON cp.card_id = c.id AND cp.user_id = $1
                    WHERE d.user_id = $1 AND d.id = $2
                      AND (cp.next_review_date IS NULL OR cp.next_review_date <= $3)
                    ORDER BY cp.next_review_date ASC NULLS FIRST, c.created_at ASC
                    LIMIT $4
                    "#,
                )
                .bind(user_id)
                .bind(deck_id)
                .bind(today)
                .bind(limit)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, DueCard>(
                    r#"
                    SELECT c.id AS card_id, c.deck_id, d.name AS deck_name, c.front, c.back,
                           cp.next_review_date, cp.interval_days, cp.ease_factor
                    FROM cards c
                    JOIN decks d ON c.deck_id = d.id
                    LEFT JOIN card_performance cp ON cp.card_id = c.id AND cp.user_id = $1
                    WHERE d.user_id = $1
                      AND (cp.next_review_date IS NULL OR cp.next_review_date <= $2)
                    ORDER BY cp.next_review_date ASC NULLS FIRST, c.created_at ASC
                    LIMIT $3
                    "#,
                )
                .bind(user_id)
                .bind(today)
                .bind(limit)
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(cards)
    }

    /// Get the stored review state of a card
    pub async fn get_card_performance(&self, user_id: Uuid, card_id: i64) -> Result<Option<DbCardPerformance>> {
        let perf = sqlx::query_as::<_, DbCardPerformance>(
            r#"
            SELECT user_id, card_id, interval_days, ease_factor, next_review_date,
                   reviews_count, last_reviewed_at
            FROM card_performance
            WHERE user_id = $1 AND card_id = $2
            "#,
        )
        .bind(user_id)
        .bind(card_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(perf)
    }

    /// Apply a flashcard review atomically.
    ///
    /// The performance row is locked before `schedule` sees it, so concurrent
    /// reviews of the same card serialize. The record, the points ledger and
    /// today's study-log entry commit together; any failure surfaces as
    /// `ApiError::UpdateFailed`.
    pub async fn apply_card_review<F>(
        &self,
        user_id: Uuid,
        card_id: i64,
        today: NaiveDate,
        points: i64,
        schedule: F,
    ) -> Result<ReviewOutcome>
    where
        F: FnOnce(ReviewState) -> SchedulingResult,
    {
        self.apply_card_review_tx(user_id, card_id, today, points, schedule)
            .await
            .map_err(|e| ApiError::UpdateFailed(e.to_string()))
    }

    async fn apply_card_review_tx<F>(
        &self,
        user_id: Uuid,
        card_id: i64,
        today: NaiveDate,
        points: i64,
        schedule: F,
    ) -> std::result::Result<ReviewOutcome, sqlx::Error>
    where
        F: FnOnce(ReviewState) -> SchedulingResult,
    {
        let mut tx = self.pool.begin().await?;

        // Blocks on a concurrent first review of the same card until it commits
        sqlx::query(
            r#"
            INSERT INTO card_performance (user_id, card_id, next_review_date)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id, card_id) DO NOTHING
            "#,
        )
        .bind(user_id)
        .bind(card_id)
        .bind(today)
        .execute(&mut *tx)
        .await?;

        let current = sqlx::query_as::<_, DbCardPerformance>(
            r#"
            SELECT user_id, card_id, interval_days, ease_factor, next_review_date,
                   reviews_count, last_reviewed_at
            FROM card_performance
            WHERE user_id = $1 AND card_id = $2
            FOR UPDATE
            "#,
        )
        .bind(user_id)
        .bind(card_id)
        .fetch_one(&mut *tx)
        .await?;

        let previous = current.to_review_state();
        let result = schedule(previous);

        sqlx::query(
            r#"
            UPDATE card_performance
            SET interval_days = $3,
                ease_factor = $4,
                next_review_date = $5,
                reviews_count = reviews_count + 1,
                last_reviewed_at = NOW()
            WHERE user_id = $1 AND card_id = $2
            "#,
        )
        .bind(user_id)
        .bind(card_id)
        .bind(to_db_int(result.interval_days)?)
        .bind(result.ease_factor)
        .bind(result.next_review_date)
        .execute(&mut *tx)
        .await?;

        credit_points(&mut tx, user_id, points).await?;

        sqlx::query(
            r#"
            INSERT INTO study_log (user_id, study_date, cards_reviewed)
            VALUES ($1, $2, 1)
            ON CONFLICT (user_id, study_date) DO UPDATE SET
                cards_reviewed = study_log.cards_reviewed + 1
            "#,
        )
        .bind(user_id)
        .bind(today)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(ReviewOutcome {
            previous,
            result,
            points_earned: points,
        })
    }

    // === Study Log Repository ===

    /// Get recent study-log days, newest first
    pub async fn get_study_log(&self, user_id: Uuid, limit: i64) -> Result<Vec<StudyLogRow>> {
        let logs = sqlx::query_as::<_, StudyLogRow>(
            r#"
            SELECT study_date, cards_reviewed
            FROM study_log
            WHERE user_id = $1
            ORDER BY study_date DESC
            LIMIT $2
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(logs)
    }

    /// Add to a day's study count
    pub async fn add_study_log(&self, user_id: Uuid, study_date: NaiveDate, count: i32) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO study_log (user_id, study_date, cards_reviewed)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id, study_date) DO UPDATE SET
                cards_reviewed = LEAST(study_log.cards_reviewed::BIGINT + EXCLUDED.cards_reviewed, 2147483647)::INT
            "#,
        )
        .bind(user_id)
        .bind(study_date)
        .bind(count)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// All study dates for a user, newest first
    pub async fn get_study_dates(&self, user_id: Uuid) -> Result<Vec<NaiveDate>> {
        let dates = sqlx::query_scalar::<_, NaiveDate>(
            r#"
            SELECT study_date
            FROM study_log
            WHERE user_id = $1
            ORDER BY study_date DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(dates)
    }

    /// Cards reviewed on a given day
    pub async fn get_cards_reviewed_on(&self, user_id: Uuid, study_date: NaiveDate) -> Result<i32> {
        let count = sqlx::query_scalar::<_, i32>(
            r#"
            SELECT cards_reviewed
            FROM study_log
            WHERE user_id = $1 AND study_date = $2
            "#,
        )
        .bind(user_id)
        .bind(study_date)
        .fetch_optional(&self.pool)
        .await?;

        Ok(count.unwrap_or(0))
    }

    // === Stats Repository ===

    /// Number of decks a user owns
    pub async fn count_decks(&self, user_id: Uuid) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM decks WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Number of cards across a user's decks
    pub async fn count_cards(&self, user_id: Uuid) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM cards c
            JOIN decks d ON c.deck_id = d.id
            WHERE d.user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    /// Review counts relative to `today`: (due, due within 7 days, never reviewed)
    pub async fn count_review_states(&self, user_id: Uuid, today: NaiveDate) -> Result<(i64, i64, i64)> {
        let week_end = today + Duration::days(7);

        let (due, upcoming) = sqlx::query_as::<_, (i64, i64)>(
            r#"
            SELECT
                COUNT(CASE WHEN next_review_date <= $2 THEN 1 END) AS due,
                COUNT(CASE WHEN next_review_date > $2 AND next_review_date <= $3 THEN 1 END) AS upcoming
            FROM card_performance
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .bind(today)
        .bind(week_end)
        .fetch_one(&self.pool)
        .await?;

        let new_cards = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM cards c
            JOIN decks d ON c.deck_id = d.id
            LEFT JOIN card_performance cp ON cp.card_id = c.id AND cp.user_id = $1
            WHERE d.user_id = $1 AND cp.card_id IS NULL
            "#,
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok((due, upcoming, new_cards))
    }

    // === Achievement Repository ===

    /// Names of achievements a user already holds
    pub async fn get_held_achievements(&self, user_id: Uuid) -> Result<HashSet<String>> {
        let names = sqlx::query_scalar::<_, String>(
            "SELECT achievement_name FROM user_achievements WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(names.into_iter().collect())
    }

    /// Earned achievement records for a user
    pub async fn get_user_achievements(&self, user_id: Uuid) -> Result<Vec<UserAchievement>> {
        let earned = sqlx::query_as::<_, UserAchievement>(
            r#"
            SELECT achievement_name, earned_at
            FROM user_achievements
            WHERE user_id = $1
            ORDER BY earned_at
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(earned)
    }

    /// Aggregate the counters the trigger's rule categories look at.
    ///
    /// Counters outside those categories are left at zero.
    pub async fn get_achievement_counters(
        &self,
        user_id: Uuid,
        trigger: AchievementTrigger,
        today: NaiveDate,
    ) -> Result<AchievementCounters> {
        let mut counters = AchievementCounters::default();

        if trigger.covers(AchievementCategory::Decks) {
            counters.deck_count = self.count_decks(user_id).await?.max(0) as u64;
        }
        if trigger.covers(AchievementCategory::Cards) {
            counters.card_count = self.count_cards(user_id).await?.max(0) as u64;
        }
        if trigger.covers(AchievementCategory::Study) {
            let dates = self.get_study_dates(user_id).await?;
            counters.study_days = dates.len() as u64;
            counters.current_streak = revision_core::current_streak(&dates, today);
        }

        Ok(counters)
    }

    /// Award an achievement if the user does not hold it yet.
    ///
    /// Returns the award time when this call inserted the award; the bonus is
    /// credited in the same transaction. A duplicate is a no-op.
    pub async fn award_achievement(
        &self,
        user_id: Uuid,
        achievement_name: &str,
        bonus_points: i64,
    ) -> Result<Option<DateTime<Utc>>> {
        let mut tx = self.pool.begin().await?;

        let earned_at = sqlx::query_scalar::<_, DateTime<Utc>>(
            r#"
            INSERT INTO user_achievements (user_id, achievement_name)
            VALUES ($1, $2)
            ON CONFLICT (user_id, achievement_name) DO NOTHING
            RETURNING earned_at
            "#,
        )
        .bind(user_id)
        .bind(achievement_name)
        .fetch_optional(&mut *tx)
        .await?;

        if earned_at.is_some() {
            credit_points(&mut tx, user_id, bonus_points).await?;
        }

        tx.commit().await?;
        Ok(earned_at)
    }

    // === MCQ Repository ===

    /// Create a multiple-choice question
    pub async fn create_mcq(&self, deck_id: i64, created_by: Uuid, mcq: &NewMcq) -> Result<DbMcq> {
        let [option_a, option_b, option_c, option_d] = &mcq.options;
        let row = sqlx::query_as::<_, DbMcq>(
            r#"
            INSERT INTO mcq_questions (deck_id, question_text, option_a, option_b, option_c, option_d,
                                       correct_option, explanation, difficulty, created_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING id, deck_id, question_text, option_a, option_b, option_c, option_d,
                      correct_option, explanation, difficulty, created_by, created_at
            "#,
        )
        .bind(deck_id)
        .bind(&mcq.question_text)
        .bind(option_a)
        .bind(option_b)
        .bind(option_c)
        .bind(option_d)
        .bind(mcq.correct_option.as_str())
        .bind(&mcq.explanation)
        .bind(mcq.difficulty.as_str())
        .bind(created_by)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    /// Get an MCQ by ID, including its answer
    pub async fn get_mcq(&self, mcq_id: i64) -> Result<Option<DbMcq>> {
        let mcq = sqlx::query_as::<_, DbMcq>(
            r#"
            SELECT id, deck_id, question_text, option_a, option_b, option_c, option_d,
                   correct_option, explanation, difficulty, created_by, created_at
            FROM mcq_questions
            WHERE id = $1
            "#,
        )
        .bind(mcq_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(mcq)
    }

    /// Get the questions of a deck without answers
    pub async fn get_deck_mcqs(&self, deck_id: i64) -> Result<Vec<McqView>> {
        let mcqs = sqlx::query_as::<_, McqView>(
            r#"
            SELECT id, deck_id, question_text, option_a, option_b, option_c, option_d,
                   difficulty, created_at
            FROM mcq_questions
            WHERE deck_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(deck_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(mcqs)
    }

    /// Get MCQs that are new or due, oldest due first
    pub async fn get_due_mcqs(
        &self,
        user_id: Uuid,
        deck_id: Option<i64>,
        today: NaiveDate,
        limit: i64,
    ) -> Result<Vec<DueMcq>> {
        let mcqs = match deck_id {
            Some(deck_id) => {
                sqlx::query_as::<_, DueMcq>(
                    r#"
                    SELECT m.id AS mcq_id, m.deck_id, d.name AS deck_name, m.question_text,
                           m.option_a, m.option_b, m.option_c, m.option_d, m.difficulty,
                           p.next_review_date, p.times_attempted, p.times_correct
                    FROM mcq_questions m
                    JOIN decks d ON m.deck_id = d.id
                    LEFT JOIN mcq_performance p ON p.mcq_id = m.id AND p.user_id = $1
                    WHERE m.deck_id = $2
                      AND (p.next_review_date IS NULL OR p.next_review_date <= $3)
                    ORDER BY p.next_review_date ASC NULLS FIRST, m.created_at ASC
                    LIMIT $4
                    "#,
                )
                .bind(user_id)
                .bind(deck_id)
                .bind(today)
                .bind(limit)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, DueMcq>(
                    r#"
                    SELECT m.id AS mcq_id, m.deck_id, d.name AS deck_name, m.question_text,
                           m.option_a, m.option_b, m.option_c, m.option_d, m.difficulty,
                           p.next_review_date, p.times_attempted, p.times_correct
                    FROM mcq_questions m
                    JOIN decks d ON m.deck_id = d.id
                    LEFT JOIN mcq_performance p ON p.mcq_id = m.id AND p.user_id = $1
                    WHERE d.user_id = $1
                      AND (p.next_review_date IS NULL OR p.next_review_date <= $2)
                    ORDER BY p.next_review_date ASC NULLS FIRST, m.created_at ASC
                    LIMIT $3
                    "#,
                )
                .bind(user_id)
                .bind(today)
                .bind(limit)
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(mcqs)
    }

    /// Apply an MCQ answer atomically.
    ///
    /// `schedule` receives the counters after this attempt. Attempt counters
    /// and points commit together; failures surface as `UpdateFailed`.
    pub async fn apply_mcq_answer<F>(
        &self,
        user_id: Uuid,
        mcq_id: i64,
        is_correct: bool,
        today: NaiveDate,
        points: i64,
        schedule: F,
    ) -> Result<McqOutcome>
    where
        F: FnOnce(McqState) -> McqSchedule,
    {
        self.apply_mcq_answer_tx(user_id, mcq_id, is_correct, today, points, schedule)
            .await
            .map_err(|e| ApiError::UpdateFailed(e.to_string()))
    }

    async fn apply_mcq_answer_tx<F>(
        &self,
        user_id: Uuid,
        mcq_id: i64,
        is_correct: bool,
        today: NaiveDate,
        points: i64,
        schedule: F,
    ) -> std::result::Result<McqOutcome, sqlx::Error>
    where
        F: FnOnce(McqState) -> McqSchedule,
    {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO mcq_performance (user_id, mcq_id, next_review_date)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id, mcq_id) DO NOTHING
            "#,
        )
        .bind(user_id)
        .bind(mcq_id)
        .bind(today)
        .execute(&mut *tx)
        .await?;

        let current = sqlx::query_as::<_, DbMcqPerformance>(
            r#"
            SELECT user_id, mcq_id, times_attempted, times_correct, last_attempt_at, next_review_date
            FROM mcq_performance
            WHERE user_id = $1 AND mcq_id = $2
            FOR UPDATE
            "#,
        )
        .bind(user_id)
        .bind(mcq_id)
        .fetch_one(&mut *tx)
        .await?;

        let state = current.to_core_state().record_attempt(is_correct);
        let next = schedule(state);

        sqlx::query(
            r#"
            UPDATE mcq_performance
            SET times_attempted = $3,
                times_correct = $4,
                last_attempt_at = NOW(),
                next_review_date = $5
            WHERE user_id = $1 AND mcq_id = $2
            "#,
        )
        .bind(user_id)
        .bind(mcq_id)
        .bind(to_db_int(state.times_attempted)?)
        .bind(to_db_int(state.times_correct)?)
        .bind(next.next_review_date)
        .execute(&mut *tx)
        .await?;

        if points > 0 {
            credit_points(&mut tx, user_id, points).await?;
        }

        tx.commit().await?;

        Ok(McqOutcome {
            state,
            interval_days: next.interval_days,
            next_review_date: next.next_review_date,
            points_earned: points,
        })
    }

    /// MCQ accuracy statistics for a user
    pub async fn get_mcq_stats(&self, user_id: Uuid, today: NaiveDate) -> Result<McqStatsResponse> {
        let stats = sqlx::query_as::<_, McqStatsResponse>(
            r#"
            SELECT
                COUNT(*) FILTER (WHERE times_attempted > 0) AS total_mcqs_attempted,
                COALESCE(SUM(times_attempted), 0)::BIGINT AS total_attempts,
                COALESCE(SUM(times_correct), 0)::BIGINT AS total_correct,
                COALESCE(ROUND(AVG(times_correct::NUMERIC / NULLIF(times_attempted, 0) * 100), 2), 0)::FLOAT8
                    AS avg_accuracy,
                COUNT(*) FILTER (WHERE next_review_date <= $2) AS mcqs_due_today
            FROM mcq_performance
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .bind(today)
        .fetch_one(&self.pool)
        .await?;

        Ok(stats)
    }
}

/// Counter as an `INT` column value; out-of-range values fail the statement
fn to_db_int(value: u32) -> std::result::Result<i32, sqlx::Error> {
    i32::try_from(value).map_err(|e| sqlx::Error::Encode(Box::new(e)))
}

/// Add to a user's points inside an open transaction
async fn credit_points(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    user_id: Uuid,
    points: i64,
) -> std::result::Result<(), sqlx::Error> {
    sqlx::query("UPDATE users SET points = points + $1 WHERE id = $2")
        .bind(points)
        .bind(user_id)
        .execute(&mut **tx)
        .await?;
    Ok(())
}
