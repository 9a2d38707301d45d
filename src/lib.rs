use std::sync::Arc;

use helper::search_helpers::SearchStrategy;
use helper::verification_helpers::VerificationChallenge;
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;

pub type DbPool = Pool<SqliteConnectionManager>;

/// Per-deployment services shared by every request.
pub struct AppState {
    pub settings: crate::config::ReaderSettings,
    pub search: SearchStrategy,
    pub challenge: Option<Arc<dyn VerificationChallenge>>,
}

pub mod config;
pub mod helper;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod setup;

#[cfg(test)]
mod test_fixtures;
