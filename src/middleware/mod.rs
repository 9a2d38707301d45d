use crate::models::db_operations::languages_db_operations;
use crate::models::{Language, Visibility};
use crate::DbPool;
use actix_session::{Session, SessionExt};
use actix_web::{dev, web, FromRequest, HttpRequest};
use chrono::Utc;
use std::future::{ready, Ready};

/// Session roles allowed to read drafts and scheduled posts.
const MANAGER_ROLES: [&str; 2] = ["admin", "editor"];

/// Session key set once the caller passed the verification challenge.
pub const CHALLENGE_VERIFIED_KEY: &str = "challenge_verified";

/// The caller as seen by the reader. The role is written to the session by the
/// authentication system in front of this service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewer {
    pub can_manage: bool,
}

impl Viewer {
    pub fn visibility(&self) -> Visibility {
        Visibility::for_caller(self.can_manage, Utc::now())
    }
}

pub fn manager_guard(session: &Session) -> bool {
    session
        .get::<String>("role")
        .unwrap_or(None)
        .map_or(false, |role| MANAGER_ROLES.contains(&role.as_str()))
}

pub fn challenge_verified(session: &Session) -> bool {
    session.get::<bool>(CHALLENGE_VERIFIED_KEY).unwrap_or(None).unwrap_or(false)
}

impl FromRequest for Viewer {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut dev::Payload) -> Self::Future {
        let can_manage = manager_guard(&req.get_session());
        ready(Ok(Viewer { can_manage }))
    }
}

/// The active language named by the `{locale}` path segment.
#[derive(Debug, Clone)]
pub struct RequestLanguage(pub Language);

impl FromRequest for RequestLanguage {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut dev::Payload) -> Self::Future {
        ready(resolve_request_language(req))
    }
}

fn resolve_request_language(req: &HttpRequest) -> Result<RequestLanguage, actix_web::Error> {
    let locale = req
        .match_info()
        .get("locale")
        .ok_or_else(|| actix_web::error::ErrorNotFound("Missing locale."))?;

    let pool = req.app_data::<web::Data<DbPool>>().ok_or_else(|| {
        log::error!("Database pool is not registered as app data.");
        actix_web::error::ErrorInternalServerError("")
    })?;
    let conn = pool.get().map_err(|e| {
        log::error!("Failed to get DB connection while resolving locale '{}': {}", locale, e);
        actix_web::error::ErrorInternalServerError("")
    })?;

    match languages_db_operations::read_language_by_locale(&conn, locale) {
        Ok(Some(language)) => Ok(RequestLanguage(language)),
        Ok(None) => {
            log::debug!("Unknown locale requested: {}", locale);
            Err(actix_web::error::ErrorNotFound("Unknown locale."))
        }
        Err(e) => {
            log::error!("Failed to resolve locale '{}': {}", locale, e);
            Err(actix_web::error::ErrorInternalServerError(""))
        }
    }
}
