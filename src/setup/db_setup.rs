use rusqlite::Connection;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SetupError {
    #[error("Rusqlite error: {0}")]
    Rusqlite(#[from] rusqlite::Error),
}

/// Creates every table the reader queries. Safe to run against an existing database.
pub fn setup_blog_db(conn: &mut Connection) -> Result<(), SetupError> {
    let tx = conn.transaction()?;

    println!("- Creating 'languages' table...");
    tx.execute(
        "CREATE TABLE IF NOT EXISTS languages (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            locale TEXT NOT NULL UNIQUE,
            name TEXT NOT NULL,
            active INTEGER NOT NULL DEFAULT 1
        )",
        [],
    )?;

    println!("- Creating 'users' table...");
    tx.execute(
        "CREATE TABLE IF NOT EXISTS users (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL
        )",
        [],
    )?;

    println!("- Creating 'posts' table...");
    tx.execute(
        "CREATE TABLE IF NOT EXISTS posts (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            posted_at INTEGER NOT NULL, -- unix seconds
            is_published INTEGER NOT NULL DEFAULT 1,
            popularity INTEGER NOT NULL DEFAULT 0
        )",
        [],
    )?;

    println!("- Creating 'post_translations' table...");
    tx.execute(
        "CREATE TABLE IF NOT EXISTS post_translations (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            post_id INTEGER NOT NULL,
            lang_id INTEGER NOT NULL,
            slug TEXT NOT NULL,
            title TEXT NOT NULL,
            subtitle TEXT,
            post_body TEXT NOT NULL DEFAULT '',
            UNIQUE (slug, lang_id),
            FOREIGN KEY (post_id) REFERENCES posts(id) ON DELETE CASCADE,
            FOREIGN KEY (lang_id) REFERENCES languages(id)
        )",
        [],
    )?;

    println!("- Creating 'categories' table...");
    tx.execute(
        "CREATE TABLE IF NOT EXISTS categories (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            site_id INTEGER NOT NULL,
            parent_id INTEGER,
            sort_order INTEGER NOT NULL DEFAULT 0,
            FOREIGN KEY (parent_id) REFERENCES categories(id) ON DELETE SET NULL
        )",
        [],
    )?;

    println!("- Creating 'category_translations' table...");
    tx.execute(
        "CREATE TABLE IF NOT EXISTS category_translations (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            category_id INTEGER NOT NULL,
            lang_id INTEGER NOT NULL,
            slug TEXT NOT NULL,
            category_name TEXT NOT NULL,
            UNIQUE (category_id, lang_id),
            FOREIGN KEY (category_id) REFERENCES categories(id) ON DELETE CASCADE,
            FOREIGN KEY (lang_id) REFERENCES languages(id)
        )",
        [],
    )?;

    println!("- Creating 'post_categories' table...");
    tx.execute(
        "CREATE TABLE IF NOT EXISTS post_categories (
            post_id INTEGER NOT NULL,
            category_id INTEGER NOT NULL,
            PRIMARY KEY (post_id, category_id),
            FOREIGN KEY (post_id) REFERENCES posts(id) ON DELETE CASCADE,
            FOREIGN KEY (category_id) REFERENCES categories(id) ON DELETE CASCADE
        )",
        [],
    )?;

    println!("- Creating 'comments' table...");
    tx.execute(
        "CREATE TABLE IF NOT EXISTS comments (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            post_id INTEGER NOT NULL,
            user_id INTEGER,
            author_name TEXT,
            comment TEXT NOT NULL,
            approved INTEGER NOT NULL DEFAULT 0,
            created_at INTEGER NOT NULL, -- unix seconds
            FOREIGN KEY (post_id) REFERENCES posts(id) ON DELETE CASCADE,
            FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE SET NULL
        )",
        [],
    )?;

    println!("- Creating indexes...");
    tx.execute_batch(
        "CREATE INDEX IF NOT EXISTS idx_post_translations_lang ON post_translations (lang_id, post_id);
         CREATE INDEX IF NOT EXISTS idx_posts_posted_at ON posts (posted_at);
         CREATE INDEX IF NOT EXISTS idx_categories_site ON categories (site_id, parent_id);
         CREATE INDEX IF NOT EXISTS idx_category_translations_slug ON category_translations (slug);
         CREATE INDEX IF NOT EXISTS idx_comments_post ON comments (post_id, approved);",
    )?;

    tx.commit()?;
    Ok(())
}
