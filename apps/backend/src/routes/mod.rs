//! HTTP route handlers

pub mod achievements;
pub mod auth;
pub mod cards;
pub mod decks;
pub mod health;
pub mod mcq;
pub mod stats;
pub mod study;
pub mod studylog;
pub mod users;
