use crate::config::{ReaderSettings, SearchStrategyKind};
use crate::helper::public_helpers::{self, ReaderError};
use crate::models::db_operations::posts_db_operations::{self, PostFilter, PostOrder};
use crate::models::{Page, PageRequest, PostTranslation, Visibility};
use rusqlite::Connection;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug)]
#[error("{message}")]
pub struct BackendError {
    pub message: String,
}

impl BackendError {
    pub fn new(message: impl Into<String>) -> Self {
        BackendError { message: message.into() }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FullTextQuery<'a> {
    pub keyword: &'a str,
    pub lang_id: i64,
}

/// One result of a full-text backend, referring to a post translation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchHit {
    pub translation_id: i64,
}

/// A full-text engine that ranks post translations for a keyword.
///
/// Hits must come back best match first.
pub trait FullTextBackend: Send + Sync {
    fn run(&self, query: &FullTextQuery<'_>) -> Result<Vec<SearchHit>, BackendError>;
}

#[derive(Clone)]
pub enum SearchStrategy {
    Structured,
    Delegated(Arc<dyn FullTextBackend>),
}

impl fmt::Debug for SearchStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchStrategy::Structured => f.write_str("Structured"),
            SearchStrategy::Delegated(_) => f.write_str("Delegated(..)"),
        }
    }
}

impl SearchStrategy {
    /// Picks the strategy named by the configuration. The delegated strategy
    /// needs a backend to be supplied by the embedding binary.
    pub fn from_kind(
        kind: SearchStrategyKind,
        backend: Option<Arc<dyn FullTextBackend>>,
    ) -> Result<Self, config::ConfigError> {
        match (kind, backend) {
            (SearchStrategyKind::Structured, _) => Ok(SearchStrategy::Structured),
            (SearchStrategyKind::Delegated, Some(backend)) => Ok(SearchStrategy::Delegated(backend)),
            (SearchStrategyKind::Delegated, None) => Err(config::ConfigError::Message(
                "FATAL: 'SEARCH_STRATEGY' is 'delegated' but no full-text backend is available.".to_string(),
            )),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SearchRequest<'a> {
    pub keyword: &'a str,
    pub lang_id: i64,
    pub category_slug: Option<&'a str>,
    pub page: u32,
}

/// Keyword search over post translations.
///
/// Fails with `SearchDisabled` whenever search is switched off, before looking
/// at the keyword.
pub fn search(
    conn: &Connection,
    settings: &ReaderSettings,
    strategy: &SearchStrategy,
    visibility: Visibility,
    request: SearchRequest<'_>,
) -> Result<Page<PostTranslation>, ReaderError> {
    if !settings.search_enabled {
        return Err(ReaderError::SearchDisabled);
    }

    let keyword = request.keyword.trim();
    if keyword.is_empty() {
        return Err(ReaderError::InvalidQuery("a non-empty keyword is required".to_string()));
    }
    let page = PageRequest::new(request.page, settings.per_page);

    match strategy {
        SearchStrategy::Structured => structured_search(conn, settings, visibility, keyword, &request, page),
        SearchStrategy::Delegated(backend) => {
            let filter = PostFilter {
                lang_id: request.lang_id,
                site_id: settings.site_id,
                visibility,
                category_id: None,
                keyword: None,
            };
            delegated_search(conn, backend.as_ref(), &filter, keyword, page)
        }
    }
}

fn structured_search(
    conn: &Connection,
    settings: &ReaderSettings,
    visibility: Visibility,
    keyword: &str,
    request: &SearchRequest<'_>,
    page: PageRequest,
) -> Result<Page<PostTranslation>, ReaderError> {
    let category_id = match request.category_slug {
        Some(slug) => Some(public_helpers::resolve_category(conn, settings.site_id, slug, request.lang_id)?.id),
        None => None,
    };

    let filter = PostFilter {
        lang_id: request.lang_id,
        site_id: settings.site_id,
        visibility,
        category_id,
        keyword: Some(keyword),
    };
    let total = posts_db_operations::count_post_translations(conn, &filter)?;
    let posts = posts_db_operations::read_post_translations(conn, &filter, PostOrder::Recent, page.limit(), page.offset())?;
    log::debug!("Structured search for '{}' matched {} posts", keyword, total);

    Ok(Page::new(posts, total, page))
}

fn delegated_search(
    conn: &Connection,
    backend: &dyn FullTextBackend,
    filter: &PostFilter<'_>,
    keyword: &str,
    page: PageRequest,
) -> Result<Page<PostTranslation>, ReaderError> {
    let hits = backend.run(&FullTextQuery { keyword, lang_id: filter.lang_id })?;
    let ids: Vec<i64> = hits.iter().map(|hit| hit.translation_id).collect();

    // Hits are re-checked against language, site and visibility.
    let mut visible: HashMap<i64, PostTranslation> =
        posts_db_operations::read_post_translations_by_ids(conn, filter, &ids)?
            .into_iter()
            .map(|translation| (translation.id, translation))
            .collect();

    // Backend rank order is kept; removing from the map also drops repeated hits.
    let ranked: Vec<PostTranslation> = ids.iter().filter_map(|id| visible.remove(id)).collect();
    let total = ranked.len() as u64;
    log::debug!(
        "Delegated search for '{}' returned {} hits, {} visible",
        keyword,
        hits.len(),
        total
    );

    let offset = usize::try_from(page.offset()).unwrap_or(usize::MAX);
    let items = ranked.into_iter().skip(offset).take(page.limit() as usize).collect();
    Ok(Page::new(items, total, page))
}
