use blog_reader_backend::config::ReaderSettings;
use blog_reader_backend::helper::search_helpers::SearchStrategy;
use blog_reader_backend::helper::verification_helpers::{QuestionChallenge, VerificationChallenge};
use blog_reader_backend::setup::db_setup;
use blog_reader_backend::{AppState, DbPool};
use chrono::{Duration, Utc};
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{params, Connection};
use std::sync::Arc;

pub struct Seeded {
    pub ownership_post: i64,
    pub draft_post: i64,
    pub travel_post: i64,
}

/// A single-connection pool, so every request sees the same in-memory database.
pub fn memory_pool() -> DbPool {
    let pool = Pool::builder()
        .max_size(1)
        .build(SqliteConnectionManager::memory())
        .expect("in-memory pool");
    {
        let mut conn = pool.get().expect("pooled connection");
        db_setup::setup_blog_db(&mut conn).expect("schema setup");
    }
    pool
}

pub fn insert_post(conn: &Connection, days_ago: i64, is_published: bool, popularity: i64) -> i64 {
    let posted_at = (Utc::now() - Duration::days(days_ago)).timestamp();
    conn.execute(
        "INSERT INTO posts (posted_at, is_published, popularity) VALUES (?1, ?2, ?3)",
        params![posted_at, is_published, popularity],
    )
    .unwrap();
    conn.last_insert_rowid()
}

pub fn insert_translation(conn: &Connection, post_id: i64, lang_id: i64, slug: &str, title: &str, body: &str) {
    conn.execute(
        "INSERT INTO post_translations (post_id, lang_id, slug, title, post_body) VALUES (?1, ?2, ?3, ?4, ?5)",
        params![post_id, lang_id, slug, title, body],
    )
    .unwrap();
}

pub fn insert_category(
    conn: &Connection,
    site_id: i64,
    parent_id: Option<i64>,
    sort_order: i64,
    slug: &str,
    name: &str,
) -> i64 {
    conn.execute(
        "INSERT INTO categories (site_id, parent_id, sort_order) VALUES (?1, ?2, ?3)",
        params![site_id, parent_id, sort_order],
    )
    .unwrap();
    let id = conn.last_insert_rowid();
    conn.execute(
        "INSERT INTO category_translations (category_id, lang_id, slug, category_name) VALUES (?1, 1, ?2, ?3)",
        params![id, slug, name],
    )
    .unwrap();
    id
}

pub fn attach_post_to_category(conn: &Connection, post_id: i64, category_id: i64) {
    conn.execute(
        "INSERT INTO post_categories (post_id, category_id) VALUES (?1, ?2)",
        params![post_id, category_id],
    )
    .unwrap();
}

fn insert_comment(conn: &Connection, post_id: i64, user_id: Option<i64>, comment: &str, approved: bool) {
    conn.execute(
        "INSERT INTO comments (post_id, user_id, comment, approved, created_at) VALUES (?1, ?2, ?3, ?4, ?5)",
        params![post_id, user_id, comment, approved, Utc::now().timestamp()],
    )
    .unwrap();
}

/// English (id 1) and German (id 2), a small category tree and three posts.
pub fn seed(pool: &DbPool) -> Seeded {
    let conn = pool.get().unwrap();
    conn.execute_batch(
        "INSERT INTO languages (locale, name) VALUES ('en', 'English');
         INSERT INTO languages (locale, name) VALUES ('de', 'Deutsch');
         INSERT INTO users (name) VALUES ('alice');",
    )
    .unwrap();

    let tech = insert_category(&conn, 1, None, 0, "tech", "Tech");
    let rust = insert_category(&conn, 1, Some(tech), 0, "rust", "Rust");
    let travel = insert_category(&conn, 1, None, 1, "travel", "Travel");

    let ownership_post = insert_post(&conn, 1, true, 5);
    insert_translation(&conn, ownership_post, 1, "ownership", "Understanding ownership", "the borrow checker explained");
    insert_translation(&conn, ownership_post, 2, "besitz", "Besitz verstehen", "hello aus dem Borrow Checker");

    let draft_post = insert_post(&conn, 1, false, 100);
    insert_translation(&conn, draft_post, 1, "draft-post", "Unfinished borrow notes", "wip");

    let travel_post = insert_post(&conn, 2, true, 50);
    insert_translation(&conn, travel_post, 1, "travel-tips", "Travel tips", "packing light");

    attach_post_to_category(&conn, ownership_post, rust);
    attach_post_to_category(&conn, travel_post, travel);

    insert_comment(&conn, ownership_post, Some(1), "Great read", true);
    insert_comment(&conn, ownership_post, None, "buy cheap watches", false);
    insert_comment(&conn, ownership_post, None, "Thanks!", true);

    Seeded { ownership_post, draft_post, travel_post }
}

pub fn app_state(search_enabled: bool, with_challenge: bool) -> AppState {
    let challenge = if with_challenge {
        Some(Arc::new(QuestionChallenge::new("What colour is the sky?", "blue")) as Arc<dyn VerificationChallenge>)
    } else {
        None
    };
    AppState {
        settings: ReaderSettings {
            search_enabled,
            index_title: Some("Latest posts".to_string()),
            ..ReaderSettings::default()
        },
        search: SearchStrategy::Structured,
        challenge,
    }
}
