//! Common test utilities and fixtures for integration tests.
//!
//! # Requirements
//! Integration tests require a PostgreSQL database (set DATABASE_URL env var).

#![allow(dead_code)]

pub mod fixtures;

use std::sync::Arc;

use axum::http::{header::AUTHORIZATION, StatusCode};
use axum::Router;
use axum_test::TestServer;
use chrono::{Duration, NaiveDate};
use uuid::Uuid;

use autorevise_backend::config::Config;
use autorevise_backend::db::Database;
use autorevise_backend::{build_router, AppState};

/// Test context containing database connection and router.
///
/// Requires DATABASE_URL environment variable to be set.
pub struct TestContext {
    pub db: Arc<Database>,
    state: AppState,
    app: Router,
}

impl TestContext {
    /// Create a new test context.
    ///
    /// # Panics
    /// Panics if DATABASE_URL is not set or database connection fails.
    pub async fn new() -> Self {
        dotenvy::dotenv().ok();

        let database_url =
            std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for integration tests");
        let config = Config::from_lookup(|key| match key {
            "DATABASE_URL" => Some(database_url.clone()),
            _ => None,
        })
        .expect("Failed to build test config");

        let db = Database::connect(&config.database_url, config.max_connections)
            .await
            .expect("Failed to connect to test database");

        db.run_migrations()
            .await
            .expect("Failed to run migrations");

        let state = AppState::new(db, config);
        let app = build_router(state.clone());

        Self {
            db: state.db.clone(),
            state,
            app,
        }
    }

    /// Get the router for use with axum-test.
    pub fn router(&self) -> Router {
        self.app.clone()
    }

    /// Study day the server considers "today".
    pub fn today(&self) -> NaiveDate {
        self.state.today()
    }

    /// Create a test user and return its ID and token.
    pub async fn create_test_user(&self) -> (Uuid, String) {
        let user = self
            .db
            .create_user(Some("test user"))
            .await
            .expect("Failed to create test user");
        (user.id, user.token)
    }

    /// Format authorization header value.
    pub fn auth_header_value(token: &str) -> String {
        format!("Bearer {}", token)
    }

    /// Insert study-log rows for the given days before today.
    pub async fn seed_study_days(&self, user_id: Uuid, days_ago: &[i64]) {
        let today = self.today();
        for days in days_ago {
            self.db
                .add_study_log(user_id, today - Duration::days(*days), 1)
                .await
                .expect("Failed to seed study log");
        }
    }

    /// Current points balance of a user.
    pub async fn points(&self, user_id: Uuid) -> i64 {
        self.db
            .get_user(user_id)
            .await
            .expect("Failed to load user")
            .expect("User missing")
            .points
    }

    /// Clean up test data for a user.
    ///
    /// Decks, cards, performance rows, study log and awards cascade.
    pub async fn cleanup_user(&self, user_id: Uuid) {
        let _ = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(user_id)
            .execute(self.db.pool())
            .await;
    }
}

/// Create a deck through the API and return its ID.
pub async fn create_deck(server: &TestServer, token: &str) -> i64 {
    let response = server
        .post("/api/decks")
        .add_header(AUTHORIZATION, TestContext::auth_header_value(token))
        .json(&fixtures::create_deck_request("deck"))
        .await;
    response.assert_status(StatusCode::CREATED);
    let body: serde_json::Value = response.json();
    body["deck"]["id"].as_i64().expect("deck id")
}

/// Create a card through the API and return its ID.
pub async fn create_card(server: &TestServer, token: &str, deck_id: i64) -> i64 {
    let response = server
        .post(&format!("/api/decks/{deck_id}/cards"))
        .add_header(AUTHORIZATION, TestContext::auth_header_value(token))
        .json(&fixtures::create_card_request("Capital of France?", "Paris"))
        .await;
    response.assert_status(StatusCode::CREATED);
    let body: serde_json::Value = response.json();
    body["card"]["id"].as_i64().expect("card id")
}
