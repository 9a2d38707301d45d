use crate::models::db_operations::timestamp_to_utc;
use crate::models::{Comment, CommentAuthor};
use rusqlite::{Connection, Result as RusqliteResult};

/// Approved comments of a post, each with its author when one is linked, in
/// insertion order.
pub fn read_approved_comments(conn: &Connection, post_id: i64) -> RusqliteResult<Vec<Comment>> {
    let mut stmt = conn.prepare(
        "SELECT c.id, c.post_id, c.author_name, c.comment, c.created_at, u.id, u.name
         FROM comments c
         LEFT JOIN users u ON u.id = c.user_id
         WHERE c.post_id = ?1 AND c.approved = 1
         ORDER BY c.id ASC",
    )?;
    let rows = stmt.query_map([post_id], |row| {
        let user_id: Option<i64> = row.get(5)?;
        let user_name: Option<String> = row.get(6)?;
        Ok(Comment {
            id: row.get(0)?,
            post_id: row.get(1)?,
            author_name: row.get(2)?,
            comment: row.get(3)?,
            created_at: timestamp_to_utc(4, row.get(4)?)?,
            user: user_id.zip(user_name).map(|(id, name)| CommentAuthor { id, name }),
        })
    })?;
    rows.collect()
}
