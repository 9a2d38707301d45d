use crate::helper::category_helpers;
use crate::helper::form_helpers;
use crate::helper::post_listing_helpers;
use crate::helper::public_helpers::{self, ReaderError};
use crate::helper::search_helpers::{self, SearchRequest};
use crate::helper::single_post_helpers;
use crate::helper::verification_helpers::{ChallengePrompt, ChallengeRequest};
use crate::middleware::{self, RequestLanguage, Viewer, CHALLENGE_VERIFIED_KEY};
use crate::models::{CategoryNode, Comment, Language, Page, PostTranslation, Visibility};
use crate::{AppState, DbPool};
use actix_session::Session;
use actix_web::http::{header, StatusCode};
use actix_web::{web, HttpResponse, Responder, ResponseError};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

#[derive(Deserialize)]
pub struct PageQuery {
    page: Option<u32>,
}

#[derive(Deserialize)]
pub struct SearchQuery {
    s: Option<String>,
    category: Option<String>,
    page: Option<u32>,
}

#[derive(Serialize)]
struct IndexBundle<'a> {
    lang_list: Vec<Language>,
    locale: &'a str,
    lang_id: i64,
    categories: Vec<CategoryNode>,
    category_slug: Option<&'a str>,
    popular_posts: Vec<PostTranslation>,
    posts: Page<PostTranslation>,
    title: Option<&'a str>,
}

#[derive(Serialize)]
struct SearchBundle<'a> {
    lang_id: i64,
    locale: &'a str,
    categories: Vec<CategoryNode>,
    category_slug: Option<&'a str>,
    popular_posts: Vec<PostTranslation>,
    query: &'a str,
    result_count: u64,
    search_results: Page<PostTranslation>,
}

#[derive(Serialize)]
struct SinglePostBundle<'a> {
    post: PostTranslation,
    comments: Vec<Comment>,
    captcha: Option<ChallengePrompt>,
    category_slug: Option<&'a str>,
    categories: Vec<CategoryNode>,
    popular_posts: Vec<PostTranslation>,
    locale: &'a str,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl ResponseError for ReaderError {
    fn status_code(&self) -> StatusCode {
        match self {
            ReaderError::NotFound(_) => StatusCode::NOT_FOUND,
            ReaderError::SearchDisabled => StatusCode::FORBIDDEN,
            ReaderError::InvalidQuery(_) => StatusCode::BAD_REQUEST,
            ReaderError::Database(_) | ReaderError::Pool(_) | ReaderError::Backend(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            log::error!("Reader request failed: {}", self);
            return HttpResponse::build(status).finish();
        }
        log::debug!("Reader request rejected: {}", self);
        HttpResponse::build(status).json(ErrorBody { error: self.to_string() })
    }
}

/// `search` is a reserved slug: the search route is matched before `/{slug}`,
/// so a post slugged `search` cannot be opened.
pub fn config_reader(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/api").route("/is_server_active", web::get().to(is_server_active)))
        .service(
            web::scope("/{locale}/blog")
                .route("", web::get().to(index))
                .route("/search", web::get().to(search))
                .route("/category/{hierarchy:.*}", web::get().to(view_category))
                .route("/{slug}", web::get().to(view_single_post))
                .route("/{slug}/verify", web::post().to(verify_challenge)),
        );
}

async fn is_server_active() -> impl Responder {
    HttpResponse::Ok().body("active")
}

/// Category tree plus popular posts, shared by every reader page.
fn load_sidebar(
    conn: &Connection,
    state: &AppState,
    visibility: Visibility,
    lang_id: i64,
) -> Result<(Vec<CategoryNode>, Vec<PostTranslation>), ReaderError> {
    let mut categories = category_helpers::load_root_categories(conn, state.settings.site_id, lang_id)?;
    category_helpers::attach_siblings(&mut categories);
    let popular_posts = post_listing_helpers::fetch_popular_posts(conn, &state.settings, visibility, lang_id)?;
    Ok((categories, popular_posts))
}

fn render_index(
    pool: &DbPool,
    state: &AppState,
    language: &Language,
    viewer: Viewer,
    category_slug: Option<&str>,
    page: u32,
) -> Result<HttpResponse, ReaderError> {
    let conn = public_helpers::get_conn(pool)?;
    let visibility = viewer.visibility();

    let posts = post_listing_helpers::list_posts(
        &conn,
        &state.settings,
        visibility,
        language.id,
        category_slug,
        false,
        page,
    )?;
    let (categories, popular_posts) = load_sidebar(&conn, state, visibility, language.id)?;

    Ok(HttpResponse::Ok().json(IndexBundle {
        lang_list: public_helpers::fetch_language_list(&conn)?,
        locale: &language.locale,
        lang_id: language.id,
        categories,
        category_slug,
        popular_posts,
        posts,
        title: state.settings.index_title.as_deref(),
    }))
}

async fn index(
    pool: web::Data<DbPool>,
    state: web::Data<AppState>,
    RequestLanguage(language): RequestLanguage,
    viewer: Viewer,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse, ReaderError> {
    render_index(&pool, &state, &language, viewer, None, query.page.unwrap_or(1))
}

async fn view_category(
    path: web::Path<(String, String)>,
    pool: web::Data<DbPool>,
    state: web::Data<AppState>,
    RequestLanguage(language): RequestLanguage,
    viewer: Viewer,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse, ReaderError> {
    let (_locale, hierarchy) = path.into_inner();
    let category_slug = public_helpers::effective_category_slug(&hierarchy)
        .ok_or_else(|| ReaderError::NotFound(format!("category path '{}'", hierarchy)))?;
    render_index(&pool, &state, &language, viewer, Some(category_slug), query.page.unwrap_or(1))
}

async fn search(
    pool: web::Data<DbPool>,
    state: web::Data<AppState>,
    RequestLanguage(language): RequestLanguage,
    viewer: Viewer,
    query: web::Query<SearchQuery>,
) -> Result<HttpResponse, ReaderError> {
    let keyword = query.s.as_deref().unwrap_or("").trim();
    let category_slug = query.category.as_deref().map(str::trim).filter(|slug| !slug.is_empty());
    let conn = public_helpers::get_conn(&pool)?;
    let visibility = viewer.visibility();

    let search_results = search_helpers::search(
        &conn,
        &state.settings,
        &state.search,
        visibility,
        SearchRequest {
            keyword,
            lang_id: language.id,
            category_slug,
            page: query.page.unwrap_or(1),
        },
    )?;
    let (categories, popular_posts) = load_sidebar(&conn, &state, visibility, language.id)?;

    Ok(HttpResponse::Ok().json(SearchBundle {
        lang_id: language.id,
        locale: &language.locale,
        categories,
        category_slug,
        popular_posts,
        query: keyword,
        result_count: search_results.total,
        search_results,
    }))
}

async fn view_single_post(
    path: web::Path<(String, String)>,
    pool: web::Data<DbPool>,
    state: web::Data<AppState>,
    RequestLanguage(language): RequestLanguage,
    viewer: Viewer,
    session: Session,
) -> Result<HttpResponse, ReaderError> {
    let (_locale, slug) = path.into_inner();
    let conn = public_helpers::get_conn(&pool)?;
    let visibility = viewer.visibility();

    let challenge_request = ChallengeRequest {
        answer: None,
        already_verified: middleware::challenge_verified(&session),
    };
    let resolved = single_post_helpers::resolve(
        &conn,
        visibility,
        &slug,
        language.id,
        state.challenge.as_deref(),
        &challenge_request,
    )?;
    let (categories, popular_posts) = load_sidebar(&conn, &state, visibility, language.id)?;

    Ok(HttpResponse::Ok().json(SinglePostBundle {
        post: resolved.post,
        comments: resolved.comments,
        captcha: resolved.challenge,
        category_slug: None,
        categories,
        popular_posts,
        locale: &language.locale,
    }))
}

/// Checks a submitted challenge answer and remembers success in the session.
async fn verify_challenge(
    path: web::Path<(String, String)>,
    state: web::Data<AppState>,
    RequestLanguage(language): RequestLanguage,
    session: Session,
    form: web::Bytes,
) -> impl Responder {
    let (_locale, slug) = path.into_inner();
    let challenge = match state.challenge.as_deref() {
        Some(challenge) => challenge,
        None => return HttpResponse::NotFound().body("No verification challenge is configured."),
    };

    let parsed = match form_helpers::parse_form(&form) {
        Ok(p) => p,
        Err(response) => return response,
    };
    let request = ChallengeRequest {
        answer: form_helpers::form_field(&parsed, "captcha"),
        already_verified: false,
    };

    if !challenge.verify(&request) {
        return HttpResponse::UnprocessableEntity().json(ErrorBody {
            error: "Incorrect answer to the verification challenge.".to_string(),
        });
    }

    if let Err(e) = session.insert(CHALLENGE_VERIFIED_KEY, true) {
        log::error!("Failed to store challenge verification in session: {}", e);
        return HttpResponse::InternalServerError().finish();
    }

    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, format!("/{}/blog/{}", language.locale, slug)))
        .finish()
}
