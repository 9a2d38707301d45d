use crate::config::ReaderSettings;
use crate::helper::public_helpers::{self, ReaderError};
use crate::models::db_operations::posts_db_operations::{self, PostFilter, PostOrder};
use crate::models::{Page, PageRequest, PostTranslation, Visibility};
use rusqlite::Connection;

/// Lists the posts of one language, optionally restricted to a category.
///
/// With `only_popular` the listing is ranked by popularity instead of recency.
/// Fails with `NotFound` when `category_slug` does not resolve within the
/// configured site.
pub fn list_posts(
    conn: &Connection,
    settings: &ReaderSettings,
    visibility: Visibility,
    lang_id: i64,
    category_slug: Option<&str>,
    only_popular: bool,
    page: u32,
) -> Result<Page<PostTranslation>, ReaderError> {
    let category_id = match category_slug {
        Some(slug) => Some(public_helpers::resolve_category(conn, settings.site_id, slug, lang_id)?.id),
        None => None,
    };

    let filter = PostFilter {
        lang_id,
        site_id: settings.site_id,
        visibility,
        category_id,
        keyword: None,
    };
    let order = if only_popular { PostOrder::Popular } else { PostOrder::Recent };
    let request = PageRequest::new(page, settings.per_page);

    let total = posts_db_operations::count_post_translations(conn, &filter)?;
    let posts = posts_db_operations::read_post_translations(conn, &filter, order, request.limit(), request.offset())?;
    log::debug!(
        "Listed {} of {} posts (lang {}, category {:?}, popular {})",
        posts.len(),
        total,
        lang_id,
        category_slug,
        only_popular
    );

    Ok(Page::new(posts, total, request))
}

/// Sidebar helper: the first page of the popularity ranking.
pub fn fetch_popular_posts(
    conn: &Connection,
    settings: &ReaderSettings,
    visibility: Visibility,
    lang_id: i64,
) -> Result<Vec<PostTranslation>, ReaderError> {
    Ok(list_posts(conn, settings, visibility, lang_id, None, true, 1)?.items)
}
