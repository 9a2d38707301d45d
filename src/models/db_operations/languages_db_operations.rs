use crate::models::Language;
use rusqlite::{params, Connection, OptionalExtension, Result as RusqliteResult};

pub fn read_active_languages(conn: &Connection) -> RusqliteResult<Vec<Language>> {
    let mut stmt = conn.prepare("SELECT id, locale, name FROM languages WHERE active = 1 ORDER BY id")?;
    let rows = stmt.query_map([], |row| {
        Ok(Language {
            id: row.get(0)?,
            locale: row.get(1)?,
            name: row.get(2)?,
        })
    })?;
    rows.collect()
}

pub fn read_language_by_locale(conn: &Connection, locale: &str) -> RusqliteResult<Option<Language>> {
    conn.query_row(
        "SELECT id, locale, name FROM languages WHERE locale = ?1 AND active = 1",
        [locale],
        |row| {
            Ok(Language {
                id: row.get(0)?,
                locale: row.get(1)?,
                name: row.get(2)?,
            })
        },
    )
    .optional()
}

/// Registers a language; used by the setup CLI only.
pub fn create_language(conn: &Connection, locale: &str, name: &str) -> RusqliteResult<i64> {
    conn.execute(
        "INSERT INTO languages (locale, name) VALUES (?1, ?2)",
        params![locale, name],
    )?;
    Ok(conn.last_insert_rowid())
}
