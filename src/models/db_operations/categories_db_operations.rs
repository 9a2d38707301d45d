use crate::models::{Category, CategoryNode};
use rusqlite::{params, Connection, OptionalExtension, Result as RusqliteResult};

/// Finds the category of `site_id` carrying `slug` in any language, preferring
/// the translation in `lang_id` when the slug exists in several.
pub fn read_category_by_slug(
    conn: &Connection,
    site_id: i64,
    slug: &str,
    lang_id: i64,
) -> RusqliteResult<Option<Category>> {
    conn.query_row(
        "SELECT c.id, c.site_id, c.parent_id, ct.slug, ct.category_name
         FROM category_translations ct
         JOIN categories c ON c.id = ct.category_id
         WHERE c.site_id = ?1 AND ct.slug = ?2
         ORDER BY (ct.lang_id = ?3) DESC, ct.id ASC
         LIMIT 1",
        params![site_id, slug, lang_id],
        |row| {
            Ok(Category {
                id: row.get(0)?,
                site_id: row.get(1)?,
                parent_id: row.get(2)?,
                slug: row.get(3)?,
                category_name: row.get(4)?,
            })
        },
    )
    .optional()
}

/// Every category of the site as an unlinked node, ordered by `(sort_order, id)`.
pub fn read_site_categories(conn: &Connection, site_id: i64, lang_id: i64) -> RusqliteResult<Vec<CategoryNode>> {
    let mut stmt = conn.prepare(
        "SELECT c.id, c.parent_id, c.sort_order, ct.slug, ct.category_name
         FROM categories c
         LEFT JOIN category_translations ct ON ct.category_id = c.id AND ct.lang_id = ?2
         WHERE c.site_id = ?1
         ORDER BY c.sort_order ASC, c.id ASC",
    )?;
    let rows = stmt.query_map(params![site_id, lang_id], |row| {
        Ok(CategoryNode {
            id: row.get(0)?,
            parent_id: row.get(1)?,
            sort_order: row.get(2)?,
            slug: row.get(3)?,
            category_name: row.get(4)?,
            children: Vec::new(),
            siblings: Vec::new(),
        })
    })?;
    rows.collect()
}
