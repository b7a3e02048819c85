//! Study session and review API tests.
//!
//! These tests require a running PostgreSQL database.
//! Set DATABASE_URL before running.

mod common;

use axum::http::{header::AUTHORIZATION, StatusCode};
use axum_test::TestServer;
use chrono::{Duration, NaiveDate};
use pretty_assertions::assert_eq;

use autorevise_backend::services::review;
use common::{fixtures, TestContext};

fn date(value: &serde_json::Value) -> NaiveDate {
    value.as_str().unwrap().parse().unwrap()
}

/// Test study session is empty for a new user.
#[tokio::test]
#[ignore = "requires database"]
async fn test_study_session_empty() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router()).unwrap();
    let (user_id, token) = ctx.create_test_user().await;

    let response = server
        .get("/api/study/session")
        .add_header(AUTHORIZATION, TestContext::auth_header_value(&token))
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["total"], 0);

    ctx.cleanup_user(user_id).await;
}

/// New cards are due, reviewed cards leave the session.
#[tokio::test]
#[ignore = "requires database"]
async fn test_study_session_lists_new_cards() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router()).unwrap();
    let (user_id, token) = ctx.create_test_user().await;
    let deck_id = common::create_deck(&server, &token).await;
    let first = common::create_card(&server, &token, deck_id).await;
    common::create_card(&server, &token, deck_id).await;

    let response = server
        .get("/api/study/session")
        .add_query_param("deck_id", deck_id)
        .add_header(AUTHORIZATION, TestContext::auth_header_value(&token))
        .await;
    let body: serde_json::Value = response.json();
    assert_eq!(body["total"], 2);
    assert_eq!(body["cards"][0]["card_id"], first);
    assert!(body["cards"][0]["next_review_date"].is_null());

    server
        .post("/api/study/review")
        .add_header(AUTHORIZATION, TestContext::auth_header_value(&token))
        .json(&fixtures::review_request(first, "good"))
        .await
        .assert_status_ok();

    let response = server
        .get("/api/study/session")
        .add_header(AUTHORIZATION, TestContext::auth_header_value(&token))
        .await;
    let body: serde_json::Value = response.json();
    assert_eq!(body["total"], 1);
    assert_ne!(body["cards"][0]["card_id"], first);

    ctx.cleanup_user(user_id).await;
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_study_session_respects_limit() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router()).unwrap();
    let (user_id, token) = ctx.create_test_user().await;
    let deck_id = common::create_deck(&server, &token).await;
    server
        .post(&format!("/api/decks/{deck_id}/cards/bulk"))
        .add_header(AUTHORIZATION, TestContext::auth_header_value(&token))
        .json(&fixtures::bulk_cards_request(5))
        .await
        .assert_status(StatusCode::CREATED);

    let response = server
        .get("/api/study/session")
        .add_query_param("limit", 2)
        .add_header(AUTHORIZATION, TestContext::auth_header_value(&token))
        .await;

    let body: serde_json::Value = response.json();
    assert_eq!(body["total"], 2);

    ctx.cleanup_user(user_id).await;
}

/// good, good, good on a new card gives 1, 6, 15 days at ease 2.5.
#[tokio::test]
#[ignore = "requires database"]
async fn test_review_progression() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router()).unwrap();
    let (user_id, token) = ctx.create_test_user().await;
    let deck_id = common::create_deck(&server, &token).await;
    let card_id = common::create_card(&server, &token, deck_id).await;
    let today = ctx.today();

    let mut intervals = Vec::new();
    for _ in 0..3 {
        let response = server
            .post("/api/study/review")
            .add_header(AUTHORIZATION, TestContext::auth_header_value(&token))
            .json(&fixtures::review_request(card_id, "good"))
            .await;
        response.assert_status_ok();
        let body: serde_json::Value = response.json();
        assert_eq!(body["ease_factor"], 2.5);
        assert_eq!(body["points_earned"], 15);
        let interval = body["interval"].as_i64().unwrap();
        assert_eq!(date(&body["next_review_date"]), today + Duration::days(interval));
        intervals.push(interval);
    }
    assert_eq!(intervals, vec![1, 6, 15]);

    let perf = ctx
        .db
        .get_card_performance(user_id, card_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(perf.reviews_count, 3);
    assert_eq!(perf.interval_days, 15);

    ctx.cleanup_user(user_id).await;
}

/// forgot resets the interval and lowers the ease.
#[tokio::test]
#[ignore = "requires database"]
async fn test_review_forgot_resets_interval() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router()).unwrap();
    let (user_id, token) = ctx.create_test_user().await;
    let deck_id = common::create_deck(&server, &token).await;
    let card_id = common::create_card(&server, &token, deck_id).await;

    for rating in ["easy", "easy"] {
        server
            .post("/api/study/review")
            .add_header(AUTHORIZATION, TestContext::auth_header_value(&token))
            .json(&fixtures::review_request(card_id, rating))
            .await
            .assert_status_ok();
    }

    let response = server
        .post("/api/study/review")
        .add_header(AUTHORIZATION, TestContext::auth_header_value(&token))
        .json(&fixtures::review_request(card_id, "forgot"))
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["interval"], 1);
    // 2.5 -> 2.6 -> 2.7 -> 1.9
    assert_eq!(body["ease_factor"], 1.9);
    assert_eq!(body["points_earned"], 5);

    ctx.cleanup_user(user_id).await;
}

/// A review credits points, logs the day and earns Dedicated Learner.
#[tokio::test]
#[ignore = "requires database"]
async fn test_review_side_effects() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router()).unwrap();
    let (user_id, token) = ctx.create_test_user().await;
    let deck_id = common::create_deck(&server, &token).await;
    let card_id = common::create_card(&server, &token, deck_id).await;

    let response = server
        .post("/api/study/review")
        .add_header(AUTHORIZATION, TestContext::auth_header_value(&token))
        .json(&fixtures::review_request(card_id, "hard"))
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    let awards = body["new_achievements"].as_array().unwrap();
    assert_eq!(awards.len(), 1);
    assert_eq!(awards[0]["name"], "Dedicated Learner");

    // First Steps 100 + hard 10 + Dedicated Learner 100
    assert_eq!(ctx.points(user_id).await, 210);
    assert_eq!(ctx.db.get_cards_reviewed_on(user_id, ctx.today()).await.unwrap(), 1);

    let stats = server
        .get("/api/stats")
        .add_header(AUTHORIZATION, TestContext::auth_header_value(&token))
        .await;
    stats.assert_status_ok();
    let stats: serde_json::Value = stats.json();
    assert_eq!(stats["total_decks"], 1);
    assert_eq!(stats["total_cards"], 1);
    assert_eq!(stats["cards_upcoming"], 1);
    assert_eq!(stats["new_cards"], 0);
    assert_eq!(stats["current_streak"], 1);
    assert_eq!(stats["total_points"], 210);
    assert_eq!(stats["cards_reviewed_today"], 1);

    ctx.cleanup_user(user_id).await;
}

/// Six earlier days plus today complete a seven-day streak.
#[tokio::test]
#[ignore = "requires database"]
async fn test_review_completes_week_streak() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router()).unwrap();
    let (user_id, token) = ctx.create_test_user().await;
    let deck_id = common::create_deck(&server, &token).await;
    let card_id = common::create_card(&server, &token, deck_id).await;
    ctx.seed_study_days(user_id, &[1, 2, 3, 4, 5, 6]).await;

    let response = server
        .post("/api/study/review")
        .add_header(AUTHORIZATION, TestContext::auth_header_value(&token))
        .json(&fixtures::review_request(card_id, "good"))
        .await;

    let body: serde_json::Value = response.json();
    let names: Vec<&str> = body["new_achievements"]
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Dedicated Learner", "7-Day Streak"]);

    ctx.cleanup_user(user_id).await;
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_review_rejects_invalid_rating() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router()).unwrap();
    let (user_id, token) = ctx.create_test_user().await;
    let deck_id = common::create_deck(&server, &token).await;
    let card_id = common::create_card(&server, &token, deck_id).await;

    let response = server
        .post("/api/study/review")
        .add_header(AUTHORIZATION, TestContext::auth_header_value(&token))
        .json(&fixtures::review_request(card_id, "again"))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "validation_error");
    assert!(ctx.db.get_card_performance(user_id, card_id).await.unwrap().is_none());
    assert_eq!(ctx.points(user_id).await, 100);

    ctx.cleanup_user(user_id).await;
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_review_ownership() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router()).unwrap();
    let (owner_id, owner_token) = ctx.create_test_user().await;
    let (other_id, other_token) = ctx.create_test_user().await;
    let deck_id = common::create_deck(&server, &owner_token).await;
    let card_id = common::create_card(&server, &owner_token, deck_id).await;

    let response = server
        .post("/api/study/review")
        .add_header(AUTHORIZATION, TestContext::auth_header_value(&other_token))
        .json(&fixtures::review_request(card_id, "good"))
        .await;
    response.assert_status(StatusCode::FORBIDDEN);

    let response = server
        .post("/api/study/review")
        .add_header(AUTHORIZATION, TestContext::auth_header_value(&owner_token))
        .json(&fixtures::review_request(999_999_999, "good"))
        .await;
    response.assert_status(StatusCode::NOT_FOUND);

    ctx.cleanup_user(owner_id).await;
    ctx.cleanup_user(other_id).await;
}

/// Concurrent reviews of one card serialize; none are lost.
#[tokio::test]
#[ignore = "requires database"]
async fn test_concurrent_reviews_serialize() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router()).unwrap();
    let (user_id, token) = ctx.create_test_user().await;
    let deck_id = common::create_deck(&server, &token).await;
    let card_id = common::create_card(&server, &token, deck_id).await;
    let today = ctx.today();
    let db = ctx.db.as_ref();

    let (a, b, c) = tokio::join!(
        review::submit_review(db, user_id, card_id, "good", today),
        review::submit_review(db, user_id, card_id, "good", today),
        review::submit_review(db, user_id, card_id, "good", today),
    );
    let mut intervals = vec![
        a.unwrap().interval,
        b.unwrap().interval,
        c.unwrap().interval,
    ];
    intervals.sort_unstable();
    assert_eq!(intervals, vec![1, 6, 15]);

    let perf = db.get_card_performance(user_id, card_id).await.unwrap().unwrap();
    assert_eq!(perf.reviews_count, 3);
    assert_eq!(db.get_cards_reviewed_on(user_id, today).await.unwrap(), 3);
    // First Steps + 3 x good + Dedicated Learner once
    assert_eq!(ctx.points(user_id).await, 100 + 45 + 100);
    let held = db.get_held_achievements(user_id).await.unwrap();
    assert!(held.contains("Dedicated Learner"));

    ctx.cleanup_user(user_id).await;
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_study_log_manual_entry() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router()).unwrap();
    let (user_id, token) = ctx.create_test_user().await;

    let response = server
        .post("/api/studylog")
        .add_header(AUTHORIZATION, TestContext::auth_header_value(&token))
        .json(&serde_json::json!({ "cards_reviewed": 4 }))
        .await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["cards_reviewed_added"], 4);

    server
        .post("/api/studylog")
        .add_header(AUTHORIZATION, TestContext::auth_header_value(&token))
        .json(&serde_json::json!({ "cards_reviewed": 0 }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    server
        .post("/api/studylog")
        .add_header(AUTHORIZATION, TestContext::auth_header_value(&token))
        .json(&serde_json::json!({ "cards_reviewed": i32::MAX }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    ctx.seed_study_days(user_id, &[3]).await;

    let response = server
        .get("/api/studylog")
        .add_header(AUTHORIZATION, TestContext::auth_header_value(&token))
        .await;
    let body: serde_json::Value = response.json();
    let logs = body["logs"].as_array().unwrap();
    assert_eq!(logs.len(), 2);
    assert_eq!(date(&logs[0]["study_date"]), ctx.today());
    assert_eq!(logs[0]["cards_reviewed"], 4);

    ctx.cleanup_user(user_id).await;
}
