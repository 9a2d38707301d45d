use crate::helper::verification_helpers::QuestionChallenge;
use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub const DEFAULT_PER_PAGE: u32 = 10;

#[derive(Debug, Deserialize, Clone)]
pub struct WebConfig {
    pub host: String,
    pub port: u16,
}

/// How keyword search is answered for this deployment.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SearchStrategyKind {
    /// LIKE matching over post translations in the blog database.
    Structured,
    /// An external full-text backend ranks the results.
    Delegated,
}

impl FromStr for SearchStrategyKind {
    type Err = config::ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "structured" => Ok(SearchStrategyKind::Structured),
            "delegated" => Ok(SearchStrategyKind::Delegated),
            other => Err(config::ConfigError::Message(format!(
                "FATAL: 'SEARCH_STRATEGY' must be 'structured' or 'delegated', got '{}'.",
                other
            ))),
        }
    }
}

impl SearchStrategyKind {
    fn as_str(self) -> &'static str {
        match self {
            SearchStrategyKind::Structured => "structured",
            SearchStrategyKind::Delegated => "delegated",
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub web: WebConfig,
    pub database_path: String,
    pub allowed_origins: String,
    pub log_level: String,
    pub session_secret_key: String,
    pub use_secure_cookies: bool,
    pub site_id: i64,
    pub per_page: u32,
    pub search_enabled: bool,
    pub search_strategy: SearchStrategyKind,
    pub captcha_question: Option<String>,
    pub captcha_answer: Option<String>,
    pub index_title: Option<String>,
}

/// The part of the configuration the reader components consult on every request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReaderSettings {
    pub site_id: i64,
    pub per_page: u32,
    pub search_enabled: bool,
    pub index_title: Option<String>,
}

impl Default for ReaderSettings {
    fn default() -> Self {
        ReaderSettings {
            site_id: 1,
            per_page: DEFAULT_PER_PAGE,
            search_enabled: false,
            index_title: None,
        }
    }
}

fn required_var(name: &str) -> Result<String, config::ConfigError> {
    env::var(name).map_err(|_| {
        config::ConfigError::Message(format!(
            "FATAL: Environment variable '{}' is not set in your .env file.",
            name
        ))
    })
}

fn optional_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_var<T: FromStr>(name: &str, default: T) -> Result<T, config::ConfigError> {
    match optional_var(name) {
        Some(raw) => raw.parse::<T>().map_err(|_| {
            config::ConfigError::Message(format!("FATAL: '{}' has an invalid value ('{}').", name, raw))
        }),
        None => Ok(default),
    }
}

impl Config {
    pub fn from_env(env_path: &Path) -> Result<Self, config::ConfigError> {
        dotenvy::from_path(env_path).map_err(|e| {
            config::ConfigError::Message(format!(
                "FATAL: Failed to load .env file from '{}'. Error: {}",
                env_path.display(),
                e
            ))
        })?;

        let database_path = required_var("DATABASE_PATH")?;
        if Path::new(&database_path).is_relative() {
            return Err(config::ConfigError::Message(format!(
                "FATAL: The 'DATABASE_PATH' in your .env file is a relative path ('{}'). It MUST be an absolute path.",
                database_path
            )));
        }

        let session_secret_key = required_var("SESSION_SECRET_KEY")?;
        if session_secret_key.len() != 128 || !session_secret_key.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(config::ConfigError::Message(
                "FATAL: 'SESSION_SECRET_KEY' must be 128 hexadecimal characters long (64 bytes).".to_string(),
            ));
        }

        let allowed_origins = env::var("ALLOWED_ORIGINS").unwrap_or_default();
        let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let use_secure_cookies: bool = parse_var("USE_SECURE_COOKIES", false)?;
        let site_id: i64 = parse_var("SITE_ID", 1)?;
        let per_page: u32 = parse_var("PER_PAGE", DEFAULT_PER_PAGE)?;
        if per_page == 0 {
            return Err(config::ConfigError::Message(
                "FATAL: 'PER_PAGE' must be greater than zero.".to_string(),
            ));
        }
        let search_enabled: bool = parse_var("SEARCH_ENABLED", false)?;
        let search_strategy = match optional_var("SEARCH_STRATEGY") {
            Some(raw) => raw.parse::<SearchStrategyKind>()?,
            None => SearchStrategyKind::Structured,
        };

        let captcha_question = optional_var("CAPTCHA_QUESTION");
        let captcha_answer = optional_var("CAPTCHA_ANSWER");
        if captcha_question.is_some() != captcha_answer.is_some() {
            return Err(config::ConfigError::Message(
                "FATAL: 'CAPTCHA_QUESTION' and 'CAPTCHA_ANSWER' must be set together.".to_string(),
            ));
        }

        let mut builder = config::Config::builder()
            // Base settings (web host/port) live in the TOML file.
            .add_source(config::File::new("config/default.toml", config::FileFormat::Toml))
            .set_override("database_path", database_path)?
            .set_override("session_secret_key", session_secret_key)?
            .set_override("allowed_origins", allowed_origins)?
            .set_override("log_level", log_level)?
            .set_override("use_secure_cookies", use_secure_cookies)?
            .set_override("site_id", site_id)?
            .set_override("per_page", i64::from(per_page))?
            .set_override("search_enabled", search_enabled)?
            .set_override("search_strategy", search_strategy.as_str())?;

        if let (Some(question), Some(answer)) = (captcha_question, captcha_answer) {
            builder = builder
                .set_override("captcha_question", question)?
                .set_override("captcha_answer", answer)?;
        }
        if let Some(title) = optional_var("INDEX_TITLE") {
            builder = builder.set_override("index_title", title)?;
        }

        builder.build()?.try_deserialize()
    }

    /// Returns the full path to the blog database file inside its own folder.
    pub fn blog_db_path(&self) -> PathBuf {
        PathBuf::from(&self.database_path).join("blog").join("blog.db")
    }

    pub fn reader_settings(&self) -> ReaderSettings {
        ReaderSettings {
            site_id: self.site_id,
            per_page: self.per_page,
            search_enabled: self.search_enabled,
            index_title: self.index_title.clone(),
        }
    }

    /// The question/answer challenge, when one is configured.
    pub fn verification_challenge(&self) -> Option<QuestionChallenge> {
        match (&self.captcha_question, &self.captcha_answer) {
            (Some(question), Some(answer)) => Some(QuestionChallenge::new(question, answer)),
            _ => None,
        }
    }
}
