use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct Language {
    pub id: i64,
    pub locale: String,
    pub name: String,
}

/// Language-independent part of a blog post.
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct Post {
    pub id: i64,
    pub posted_at: DateTime<Utc>,
    pub is_published: bool,
    pub popularity: i64,
}

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct PostTranslation {
    pub id: i64,
    pub lang_id: i64,
    pub slug: String,
    pub title: String,
    pub subtitle: Option<String>,
    /// `None` while the body is withheld behind the verification challenge.
    pub post_body: Option<String>,
    pub post: Post,
}

/// A category resolved from one of its translated slugs.
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct Category {
    pub id: i64,
    pub site_id: i64,
    pub parent_id: Option<i64>,
    pub slug: String,
    pub category_name: String,
}

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct CategoryLink {
    pub id: i64,
    pub slug: Option<String>,
    pub category_name: Option<String>,
}

/// One node of a site's category tree, ready for navigation rendering.
///
/// `slug` and `category_name` are `None` when the category has no translation
/// in the requested language.
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct CategoryNode {
    pub id: i64,
    pub parent_id: Option<i64>,
    pub sort_order: i64,
    pub slug: Option<String>,
    pub category_name: Option<String>,
    pub children: Vec<CategoryNode>,
    pub siblings: Vec<CategoryLink>,
}

impl From<&CategoryNode> for CategoryLink {
    fn from(node: &CategoryNode) -> Self {
        CategoryLink {
            id: node.id,
            slug: node.slug.clone(),
            category_name: node.category_name.clone(),
        }
    }
}

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct CommentAuthor {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct Comment {
    pub id: i64,
    pub post_id: i64,
    pub author_name: Option<String>,
    pub comment: String,
    pub created_at: DateTime<Utc>,
    pub user: Option<CommentAuthor>,
}

/// Which posts the current caller may read.
///
/// Readers only see published posts whose `posted_at` lies before `as_of`.
/// Callers holding management privileges see everything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Published { as_of: DateTime<Utc> },
    Manager,
}

impl Visibility {
    pub fn for_caller(can_manage: bool, now: DateTime<Utc>) -> Self {
        if can_manage {
            Visibility::Manager
        } else {
            Visibility::Published { as_of: now }
        }
    }
}

/// Offset/limit window over a listing. Page numbers start at 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub per_page: u32,
}

impl PageRequest {
    pub fn new(page: u32, per_page: u32) -> Self {
        PageRequest {
            page: page.max(1),
            per_page: per_page.max(1),
        }
    }

    pub fn limit(&self) -> u32 {
        self.per_page
    }

    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.per_page)
    }
}

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub current_page: u32,
    pub per_page: u32,
    pub last_page: u32,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: u64, request: PageRequest) -> Self {
        let per_page = u64::from(request.per_page);
        let last_page = total.div_ceil(per_page).max(1);
        Page {
            items,
            total,
            current_page: request.page,
            per_page: request.per_page,
            last_page: u32::try_from(last_page).unwrap_or(u32::MAX),
        }
    }
}

pub mod db_operations;
