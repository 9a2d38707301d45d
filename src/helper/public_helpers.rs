use crate::helper::search_helpers::BackendError;
use crate::models::db_operations::{categories_db_operations, languages_db_operations};
use crate::models::{Category, Language};
use crate::DbPool;
use r2d2::PooledConnection;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::Connection;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReaderError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
    #[error("R2D2 Pool error: {0}")]
    Pool(#[from] r2d2::Error),
    #[error("Search backend error: {0}")]
    Backend(#[from] BackendError),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Search is disabled")]
    SearchDisabled,
    #[error("Invalid search query: {0}")]
    InvalidQuery(String),
}

pub fn get_conn(pool: &DbPool) -> Result<PooledConnection<SqliteConnectionManager>, ReaderError> {
    pool.get().map_err(ReaderError::Pool)
}

/// Resolves a category slug within the site, failing with `NotFound` when no
/// translation of any of the site's categories carries it.
pub fn resolve_category(conn: &Connection, site_id: i64, slug: &str, lang_id: i64) -> Result<Category, ReaderError> {
    categories_db_operations::read_category_by_slug(conn, site_id, slug, lang_id)?
        .ok_or_else(|| ReaderError::NotFound(format!("category '{}'", slug)))
}

pub fn fetch_language_list(conn: &Connection) -> Result<Vec<Language>, ReaderError> {
    Ok(languages_db_operations::read_active_languages(conn)?)
}

/// The effective category of a `/`-delimited hierarchy path is its last
/// non-empty segment.
pub fn effective_category_slug(hierarchy: &str) -> Option<&str> {
    hierarchy.split('/').map(str::trim).filter(|s| !s.is_empty()).last()
}
