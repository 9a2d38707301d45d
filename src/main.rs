use actix_cors::Cors;
use actix_session::{storage::CookieSessionStore, SessionMiddleware};
use actix_web::http::header;
use actix_web::{cookie::Key, middleware::{DefaultHeaders, Logger}, web, App, HttpResponse, HttpServer, Responder};
use blog_reader_backend::{
    config::Config,
    helper::search_helpers::SearchStrategy,
    helper::verification_helpers::VerificationChallenge,
    routes,
    AppState,
};
use clap::Parser;
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::OpenFlags;
use std::path::PathBuf;
use std::sync::Arc;

/// A simple handler for the root URL.
async fn root_handler() -> impl Responder {
    HttpResponse::Ok().content_type("text/plain").body("OK")
}

#[derive(Parser, Debug)]
#[command(name = "blog_reader_server", author, version, about = "Starts the blog reader web server.")]
struct Cli {
    /// Path to the .env configuration file.
    #[arg(long, required = true, value_name = "FILE")]
    env_file: PathBuf,
}

fn build_cors(allowed_origins: &str) -> Cors {
    let cors = if allowed_origins.trim() == "*" {
        Cors::default().allow_any_origin()
    } else {
        allowed_origins
            .split(',')
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
    };
    cors.allowed_methods(vec!["GET", "POST"])
        .allowed_headers(vec![header::ACCEPT, header::CONTENT_TYPE])
        .supports_credentials()
        .max_age(3600)
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let cli = Cli::parse();

    let config = Config::from_env(&cli.env_file)
        .expect("FATAL: Failed to load or parse configuration.");

    env_logger::init_from_env(env_logger::Env::new().default_filter_or(&config.log_level));

    let db_path = config.blog_db_path();
    if !db_path.exists() {
        panic!(
            "FATAL: blog.db not found at '{}'. Run 'cargo run --bin setup_cli -- --env-file <path> db setup'",
            db_path.display()
        );
    }

    // The reader never writes, so every pooled connection is opened read-only.
    let manager = SqliteConnectionManager::file(&db_path)
        .with_flags(OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX | OpenFlags::SQLITE_OPEN_URI);
    let pool = Pool::builder()
        .build(manager)
        .expect("FATAL: Failed to create Rusqlite connection pool.");

    // This binary links no full-text engine; embedders pass their backend here.
    let search = SearchStrategy::from_kind(config.search_strategy, None)
        .expect("FATAL: Search strategy cannot be configured.");
    let challenge = config
        .verification_challenge()
        .map(|c| Arc::new(c) as Arc<dyn VerificationChallenge>);

    log::info!(
        "Reader settings: site {}, {} posts per page, search {} ({:?}), challenge {}",
        config.site_id,
        config.per_page,
        if config.search_enabled { "enabled" } else { "disabled" },
        search,
        if challenge.is_some() { "enabled" } else { "disabled" }
    );

    let app_state = web::Data::new(AppState {
        settings: config.reader_settings(),
        search,
        challenge,
    });

    let session_key_bytes = hex::decode(&config.session_secret_key)
        .expect("FATAL: SESSION_SECRET_KEY in .env is not a valid hex string.");
    let session_key = Key::try_from(session_key_bytes.as_slice())
        .expect("FATAL: The decoded SESSION_SECRET_KEY is not long enough (minimum 64 bytes required).");

    let server_address = format!("{}:{}", config.web.host, config.web.port);
    log::info!("Server starting at http://{}", server_address);

    let pool_data = web::Data::new(pool);

    HttpServer::new(move || {
        let session_mw = SessionMiddleware::builder(CookieSessionStore::default(), session_key.clone())
            .cookie_secure(config.use_secure_cookies)
            .cookie_http_only(true)
            .cookie_same_site(actix_web::cookie::SameSite::Lax)
            .build();

        App::new()
            .wrap(session_mw)
            .wrap(build_cors(&config.allowed_origins))
            .wrap(Logger::default())
            .wrap(
                DefaultHeaders::new()
                    .add(("X-Content-Type-Options", "nosniff"))
                    .add(("X-Frame-Options", "DENY")),
            )
            .app_data(pool_data.clone())
            .app_data(app_state.clone())
            .route("/", web::get().to(root_handler))
            .configure(routes::public::config_reader)
    })
    .bind(server_address)?
    .run()
    .await
}
