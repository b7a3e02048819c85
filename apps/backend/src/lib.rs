pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;

use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use chrono::{NaiveDate, Utc};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::db::Database;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(db: Database, config: Config) -> Self {
        Self {
            db: Arc::new(db),
            config: Arc::new(config),
        }
    }

    /// Current study day, honouring the configured reset hour
    pub fn today(&self) -> NaiveDate {
        revision_core::study_day(Utc::now(), self.config.daily_reset_hour)
    }
}

/// Build the application router
pub fn build_router(state: AppState) -> Router {
    // Build router with protected routes
    let protected_routes = Router::new()
        // User routes
        .route("/api/me", get(routes::users::me))
        // Deck routes
        .route("/api/decks", get(routes::decks::list).post(routes::decks::create))
        .route(
            "/api/decks/{id}",
            get(routes::decks::get).delete(routes::decks::delete),
        )
        // Card routes
        .route(
            "/api/decks/{id}/cards",
            get(routes::cards::list).post(routes::cards::create),
        )
        .route("/api/decks/{id}/cards/bulk", post(routes::cards::bulk_create))
        .route(
            "/api/cards/{id}",
            put(routes::cards::update).delete(routes::cards::delete),
        )
        // Study routes
        .route("/api/study/session", get(routes::study::session))
        .route("/api/study/review", post(routes::study::review))
        .route(
            "/api/studylog",
            get(routes::studylog::list).post(routes::studylog::add),
        )
        .route("/api/stats", get(routes::stats::get))
        // Achievement routes
        .route("/api/achievements", get(routes::achievements::list))
        .route("/api/achievements/check", post(routes::achievements::check))
        // MCQ routes
        .route(
            "/api/decks/{id}/mcqs",
            get(routes::mcq::list).post(routes::mcq::create),
        )
        .route("/api/mcq/{id}/check", post(routes::mcq::check))
        .route("/api/mcq/session", get(routes::mcq::session))
        .route("/api/mcq/stats", get(routes::mcq::stats))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            routes::auth::auth_middleware,
        ));

    // Build full router
    Router::new()
        .route("/health", get(routes::health::check))
        .route("/api/users/register", post(routes::users::register))
        .merge(protected_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

pub async fn run() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.log_filter))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Connecting to database...");
    let db = Database::connect(&config.database_url, config.max_connections).await?;

    tracing::info!("Running migrations...");
    db.run_migrations().await?;

    let addr = config.bind_addr();
    let app = build_router(AppState::new(db, config));

    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
