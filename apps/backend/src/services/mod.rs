//! Business logic shared by the route handlers.

pub mod achievements;
pub mod review;
