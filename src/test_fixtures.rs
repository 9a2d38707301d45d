//! In-memory blog databases for unit tests.

use crate::setup::db_setup;
use chrono::{DateTime, Duration, Utc};
use rusqlite::{params, Connection};

pub fn blog_db() -> Connection {
    let mut conn = Connection::open_in_memory().expect("in-memory database");
    db_setup::setup_blog_db(&mut conn).expect("schema setup");
    conn
}

pub fn days_ago(days: i64) -> DateTime<Utc> {
    Utc::now() - Duration::days(days)
}

pub fn insert_language(conn: &Connection, locale: &str, name: &str) -> i64 {
    conn.execute(
        "INSERT INTO languages (locale, name) VALUES (?1, ?2)",
        params![locale, name],
    )
    .expect("insert language");
    conn.last_insert_rowid()
}

pub fn insert_post(conn: &Connection, posted_at: DateTime<Utc>, is_published: bool, popularity: i64) -> i64 {
    conn.execute(
        "INSERT INTO posts (posted_at, is_published, popularity) VALUES (?1, ?2, ?3)",
        params![posted_at.timestamp(), is_published, popularity],
    )
    .expect("insert post");
    conn.last_insert_rowid()
}

pub fn insert_translation(
    conn: &Connection,
    post_id: i64,
    lang_id: i64,
    slug: &str,
    title: &str,
    body: &str,
) -> i64 {
    conn.execute(
        "INSERT INTO post_translations (post_id, lang_id, slug, title, subtitle, post_body)
         VALUES (?1, ?2, ?3, ?4, NULL, ?5)",
        params![post_id, lang_id, slug, title, body],
    )
    .expect("insert post translation");
    conn.last_insert_rowid()
}

pub fn set_subtitle(conn: &Connection, translation_id: i64, subtitle: &str) {
    conn.execute(
        "UPDATE post_translations SET subtitle = ?1 WHERE id = ?2",
        params![subtitle, translation_id],
    )
    .expect("set subtitle");
}

pub fn insert_category(conn: &Connection, site_id: i64, parent_id: Option<i64>, sort_order: i64) -> i64 {
    conn.execute(
        "INSERT INTO categories (site_id, parent_id, sort_order) VALUES (?1, ?2, ?3)",
        params![site_id, parent_id, sort_order],
    )
    .expect("insert category");
    conn.last_insert_rowid()
}

pub fn insert_category_translation(conn: &Connection, category_id: i64, lang_id: i64, slug: &str, name: &str) {
    conn.execute(
        "INSERT INTO category_translations (category_id, lang_id, slug, category_name)
         VALUES (?1, ?2, ?3, ?4)",
        params![category_id, lang_id, slug, name],
    )
    .expect("insert category translation");
}

pub fn attach_post_to_category(conn: &Connection, post_id: i64, category_id: i64) {
    conn.execute(
        "INSERT INTO post_categories (post_id, category_id) VALUES (?1, ?2)",
        params![post_id, category_id],
    )
    .expect("attach post to category");
}

pub fn insert_user(conn: &Connection, name: &str) -> i64 {
    conn.execute("INSERT INTO users (name) VALUES (?1)", [name])
        .expect("insert user");
    conn.last_insert_rowid()
}

pub fn insert_comment(
    conn: &Connection,
    post_id: i64,
    user_id: Option<i64>,
    comment: &str,
    approved: bool,
    created_at: DateTime<Utc>,
) -> i64 {
    conn.execute(
        "INSERT INTO comments (post_id, user_id, author_name, comment, approved, created_at)
         VALUES (?1, ?2, NULL, ?3, ?4, ?5)",
        params![post_id, user_id, comment, approved, created_at.timestamp()],
    )
    .expect("insert comment");
    conn.last_insert_rowid()
}
