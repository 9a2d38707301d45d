use crate::models::db_operations::timestamp_to_utc;
use crate::models::{Post, PostTranslation, Visibility};
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection, OptionalExtension, Result as RusqliteResult, Row};

const TRANSLATION_COLUMNS: &str = "t.id, t.lang_id, t.slug, t.title, t.subtitle, t.post_body, \
     p.id, p.posted_at, p.is_published, p.popularity";

const TRANSLATION_SOURCE: &str = "post_translations t JOIN posts p ON p.id = t.post_id";

fn map_translation(row: &Row) -> RusqliteResult<PostTranslation> {
    Ok(PostTranslation {
        id: row.get(0)?,
        lang_id: row.get(1)?,
        slug: row.get(2)?,
        title: row.get(3)?,
        subtitle: row.get(4)?,
        post_body: Some(row.get(5)?),
        post: Post {
            id: row.get(6)?,
            posted_at: timestamp_to_utc(7, row.get(7)?)?,
            is_published: row.get(8)?,
            popularity: row.get(9)?,
        },
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostOrder {
    /// Newest `posted_at` first.
    Recent,
    /// Highest popularity first, recency breaks ties.
    Popular,
}

impl PostOrder {
    fn sql(self) -> &'static str {
        match self {
            PostOrder::Recent => "p.posted_at DESC, t.id DESC",
            PostOrder::Popular => "p.popularity DESC, p.posted_at DESC, t.id DESC",
        }
    }
}

/// Filters applied to post translations for listings and structured search.
#[derive(Debug, Clone)]
pub struct PostFilter<'a> {
    pub lang_id: i64,
    /// Posts filed only under another site's categories are excluded.
    /// Uncategorised posts belong to every site.
    pub site_id: i64,
    pub visibility: Visibility,
    pub category_id: Option<i64>,
    /// Case-insensitive substring matched against title, subtitle and body.
    pub keyword: Option<&'a str>,
}

impl PostFilter<'_> {
    fn where_clause(&self) -> (String, Vec<Value>) {
        let mut clauses = vec!["t.lang_id = ?".to_string()];
        let mut values = vec![Value::Integer(self.lang_id)];

        push_visibility(self.visibility, &mut clauses, &mut values);

        clauses.push(
            "(NOT EXISTS (SELECT 1 FROM post_categories pc WHERE pc.post_id = p.id) \
             OR EXISTS (SELECT 1 FROM post_categories pc JOIN categories c ON c.id = pc.category_id \
             WHERE pc.post_id = p.id AND c.site_id = ?))"
                .to_string(),
        );
        values.push(Value::Integer(self.site_id));

        if let Some(category_id) = self.category_id {
            clauses.push(
                "p.id IN (SELECT pc.post_id FROM post_categories pc WHERE pc.category_id = ?)".to_string(),
            );
            values.push(Value::Integer(category_id));
        }

        if let Some(keyword) = self.keyword {
            let pattern = format!("%{}%", escape_like(keyword));
            clauses.push(
                "(t.title LIKE ? ESCAPE '\\' OR t.subtitle LIKE ? ESCAPE '\\' OR t.post_body LIKE ? ESCAPE '\\')"
                    .to_string(),
            );
            for _ in 0..3 {
                values.push(Value::Text(pattern.clone()));
            }
        }

        (clauses.join(" AND "), values)
    }
}

fn push_visibility(visibility: Visibility, clauses: &mut Vec<String>, values: &mut Vec<Value>) {
    if let Visibility::Published { as_of } = visibility {
        clauses.push("p.is_published = 1".to_string());
        clauses.push("p.posted_at < ?".to_string());
        values.push(Value::Integer(as_of.timestamp()));
    }
}

/// Escapes LIKE wildcards so the keyword only ever matches literally.
fn escape_like(keyword: &str) -> String {
    let mut escaped = String::with_capacity(keyword.len());
    for c in keyword.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

pub fn count_post_translations(conn: &Connection, filter: &PostFilter) -> RusqliteResult<u64> {
    let (where_sql, values) = filter.where_clause();
    let sql = format!("SELECT COUNT(*) FROM {} WHERE {}", TRANSLATION_SOURCE, where_sql);
    let count: i64 = conn.query_row(&sql, params_from_iter(values.iter()), |row| row.get(0))?;
    Ok(u64::try_from(count).unwrap_or(0))
}

pub fn read_post_translations(
    conn: &Connection,
    filter: &PostFilter,
    order: PostOrder,
    limit: u32,
    offset: u64,
) -> RusqliteResult<Vec<PostTranslation>> {
    let (where_sql, mut values) = filter.where_clause();
    let sql = format!(
        "SELECT {} FROM {} WHERE {} ORDER BY {} LIMIT ? OFFSET ?",
        TRANSLATION_COLUMNS,
        TRANSLATION_SOURCE,
        where_sql,
        order.sql()
    );
    values.push(Value::Integer(i64::from(limit)));
    values.push(Value::Integer(i64::try_from(offset).unwrap_or(i64::MAX)));

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params_from_iter(values.iter()), map_translation)?;
    rows.collect()
}

pub fn read_post_translation_by_slug(
    conn: &Connection,
    slug: &str,
    lang_id: i64,
    visibility: Visibility,
) -> RusqliteResult<Option<PostTranslation>> {
    let mut clauses = vec!["t.slug = ?".to_string(), "t.lang_id = ?".to_string()];
    let mut values = vec![Value::Text(slug.to_string()), Value::Integer(lang_id)];
    push_visibility(visibility, &mut clauses, &mut values);

    let sql = format!(
        "SELECT {} FROM {} WHERE {} LIMIT 1",
        TRANSLATION_COLUMNS,
        TRANSLATION_SOURCE,
        clauses.join(" AND ")
    );
    conn.query_row(&sql, params_from_iter(values.iter()), map_translation)
        .optional()
}

/// Bound ids per statement when reading by id, well under SQLite's variable limit.
const ID_CHUNK_SIZE: usize = 500;

/// Loads the translations among `ids` that also pass `filter`. Order of the
/// result is unspecified.
pub fn read_post_translations_by_ids(
    conn: &Connection,
    filter: &PostFilter,
    ids: &[i64],
) -> RusqliteResult<Vec<PostTranslation>> {
    let (where_sql, filter_values) = filter.where_clause();
    let mut translations = Vec::new();

    for chunk in ids.chunks(ID_CHUNK_SIZE) {
        let placeholders = vec!["?"; chunk.len()].join(", ");
        let sql = format!(
            "SELECT {} FROM {} WHERE t.id IN ({}) AND {}",
            TRANSLATION_COLUMNS, TRANSLATION_SOURCE, placeholders, where_sql
        );
        let values = chunk
            .iter()
            .map(|id| Value::Integer(*id))
            .chain(filter_values.iter().cloned());

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(values), map_translation)?;
        for row in rows {
            translations.push(row?);
        }
    }
    Ok(translations)
}
