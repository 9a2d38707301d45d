mod common;

use actix_session::{storage::CookieSessionStore, Session, SessionMiddleware};
use actix_web::cookie::Key;
use actix_web::http::{header, StatusCode};
use actix_web::{test, web, App, HttpResponse};
use blog_reader_backend::{routes, AppState, DbPool};
use serde_json::Value;

async fn login_as_admin(session: Session) -> HttpResponse {
    session.insert("role", "admin").unwrap();
    HttpResponse::Ok().finish()
}

macro_rules! reader_app {
    ($pool:expr, $state:expr) => {
        test::init_service(
            App::new()
                .wrap(SessionMiddleware::new(CookieSessionStore::default(), Key::from(&[7u8; 64])))
                .app_data(web::Data::new($pool.clone()))
                .app_data(web::Data::new($state))
                .route("/test/login", web::post().to(login_as_admin))
                .configure(routes::public::config_reader),
        )
        .await
    };
}

fn setup(search_enabled: bool, with_challenge: bool) -> (DbPool, common::Seeded, AppState) {
    let pool = common::memory_pool();
    let seeded = common::seed(&pool);
    (pool, seeded, common::app_state(search_enabled, with_challenge))
}

fn slugs(page: &Value) -> Vec<String> {
    page["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["slug"].as_str().unwrap().to_string())
        .collect()
}

#[actix_web::test]
async fn server_liveness() {
    let (pool, _, state) = setup(false, false);
    let app = reader_app!(pool, state);
    let resp = test::call_service(&app, test::TestRequest::get().uri("/api/is_server_active").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn index_lists_visible_posts_with_sidebar() {
    let (pool, _, state) = setup(false, false);
    let app = reader_app!(pool, state);

    let body: Value = test::call_and_read_body_json(&app, test::TestRequest::get().uri("/en/blog").to_request()).await;

    assert_eq!(body["locale"], "en");
    assert_eq!(body["lang_id"], 1);
    assert_eq!(body["title"], "Latest posts");
    assert_eq!(body["lang_list"].as_array().unwrap().len(), 2);
    assert_eq!(slugs(&body["posts"]), vec!["ownership", "travel-tips"]);
    assert_eq!(body["posts"]["total"], 2);
    assert_eq!(
        body["popular_posts"]
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["slug"].as_str().unwrap())
            .collect::<Vec<_>>(),
        vec!["travel-tips", "ownership"]
    );

    let categories = body["categories"].as_array().unwrap();
    assert_eq!(categories.len(), 2);
    assert_eq!(categories[0]["slug"], "tech");
    assert_eq!(categories[0]["siblings"][0]["slug"], "travel");
    assert_eq!(categories[0]["children"][0]["slug"], "rust");
}

#[actix_web::test]
async fn unknown_locale_is_not_found() {
    let (pool, _, state) = setup(false, false);
    let app = reader_app!(pool, state);
    let resp = test::call_service(&app, test::TestRequest::get().uri("/xx/blog").to_request()).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn category_hierarchy_uses_last_segment() {
    let (pool, _, state) = setup(false, false);
    let app = reader_app!(pool, state);

    let body: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get().uri("/en/blog/category/tech/rust").to_request(),
    )
    .await;
    assert_eq!(body["category_slug"], "rust");
    assert_eq!(slugs(&body["posts"]), vec!["ownership"]);

    let resp = test::call_service(
        &app,
        test::TestRequest::get().uri("/en/blog/category/tech/golang").to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn search_is_refused_when_disabled() {
    let (pool, _, state) = setup(false, false);
    let app = reader_app!(pool, state);
    let resp = test::call_service(&app, test::TestRequest::get().uri("/en/blog/search?s=borrow").to_request()).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn search_matches_visible_posts_in_language() {
    let (pool, _, state) = setup(true, false);
    let app = reader_app!(pool, state);

    let body: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get().uri("/en/blog/search?s=BORROW").to_request(),
    )
    .await;
    assert_eq!(body["query"], "BORROW");
    assert_eq!(body["result_count"], 1);
    assert_eq!(slugs(&body["search_results"]), vec!["ownership"]);

    // "hello" only appears in the German body.
    let body: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get().uri("/en/blog/search?s=hello").to_request(),
    )
    .await;
    assert_eq!(body["result_count"], 0);

    let resp = test::call_service(&app, test::TestRequest::get().uri("/en/blog/search?s=%20").to_request()).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn single_post_with_approved_comments() {
    let (pool, seeded, state) = setup(false, false);
    let app = reader_app!(pool, state);

    let body: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get().uri("/en/blog/ownership").to_request(),
    )
    .await;
    assert_eq!(body["post"]["post"]["id"], seeded.ownership_post);
    assert_eq!(body["captcha"], Value::Null);
    let comments: Vec<&str> = body["comments"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["comment"].as_str().unwrap())
        .collect();
    assert_eq!(comments, vec!["Great read", "Thanks!"]);
    assert_eq!(body["comments"][0]["user"]["name"], "alice");

    for uri in ["/en/blog/draft-post", "/de/blog/ownership", "/en/blog/missing"] {
        let resp = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{}", uri);
    }
}

#[actix_web::test]
async fn managers_see_unpublished_posts() {
    let (pool, seeded, state) = setup(false, false);
    let app = reader_app!(pool, state);

    let login = test::call_service(&app, test::TestRequest::post().uri("/test/login").to_request()).await;
    let session_cookie = login.response().cookies().next().expect("session cookie").into_owned();

    let body: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get().uri("/en/blog/draft-post").cookie(session_cookie.clone()).to_request(),
    )
    .await;
    assert_eq!(body["post"]["post"]["id"], seeded.draft_post);

    let body: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get().uri("/en/blog").cookie(session_cookie).to_request(),
    )
    .await;
    assert_eq!(body["posts"]["total"], 3);
    assert_eq!(body["popular_posts"][0]["post"]["id"], seeded.draft_post);
    assert_eq!(body["popular_posts"][1]["post"]["id"], seeded.travel_post);
}

#[actix_web::test]
async fn challenge_is_shown_until_answered() {
    let (pool, _, state) = setup(false, true);
    let app = reader_app!(pool, state);

    let body: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get().uri("/en/blog/ownership").to_request(),
    )
    .await;
    assert_eq!(body["captcha"]["question"], "What colour is the sky?");
    assert_eq!(body["post"]["title"], "Understanding ownership");
    assert_eq!(body["post"]["post_body"], Value::Null);

    let wrong = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/en/blog/ownership/verify")
            .insert_header((header::CONTENT_TYPE, "application/x-www-form-urlencoded"))
            .set_payload("captcha=green")
            .to_request(),
    )
    .await;
    assert_eq!(wrong.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let right = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/en/blog/ownership/verify")
            .insert_header((header::CONTENT_TYPE, "application/x-www-form-urlencoded"))
            .set_payload("captcha=+Blue+")
            .to_request(),
    )
    .await;
    assert_eq!(right.status(), StatusCode::SEE_OTHER);
    assert_eq!(right.headers().get(header::LOCATION).unwrap(), "/en/blog/ownership");
    let session_cookie = right.response().cookies().next().expect("session cookie").into_owned();

    let body: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get().uri("/en/blog/ownership").cookie(session_cookie).to_request(),
    )
    .await;
    assert_eq!(body["captcha"], Value::Null);
    assert_eq!(body["post"]["post_body"], "the borrow checker explained");
}

#[actix_web::test]
async fn verify_without_challenge_is_not_found() {
    let (pool, _, state) = setup(false, false);
    let app = reader_app!(pool, state);
    let resp = test::call_service(
        &app,
        test::TestRequest::post().uri("/en/blog/ownership/verify").set_payload("captcha=blue").to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn search_stays_within_the_configured_site() {
    let (pool, _, state) = setup(true, false);
    {
        let conn = pool.get().unwrap();
        let elsewhere = common::insert_category(&conn, 2, None, 0, "elsewhere", "Elsewhere");
        let foreign = common::insert_post(&conn, 1, true, 0);
        common::insert_translation(&conn, foreign, 1, "foreign-borrowing", "Borrowing on site two", "body");
        common::attach_post_to_category(&conn, foreign, elsewhere);
    }
    let app = reader_app!(pool, state);

    let body: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get().uri("/en/blog/search?s=borrow").to_request(),
    )
    .await;
    assert_eq!(slugs(&body["search_results"]), vec!["ownership"]);

    let body: Value = test::call_and_read_body_json(&app, test::TestRequest::get().uri("/en/blog").to_request()).await;
    assert_eq!(body["posts"]["total"], 2);

    let resp = test::call_service(
        &app,
        test::TestRequest::get().uri("/en/blog/search?s=borrow&category=elsewhere").to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn search_can_be_narrowed_to_a_category() {
    let (pool, _, state) = setup(true, false);
    let app = reader_app!(pool, state);

    let body: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get().uri("/en/blog/search?s=t&category=travel").to_request(),
    )
    .await;
    assert_eq!(body["category_slug"], "travel");
    assert_eq!(slugs(&body["search_results"]), vec!["travel-tips"]);

    let body: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get().uri("/en/blog/search?s=borrow&category=travel").to_request(),
    )
    .await;
    assert_eq!(body["result_count"], 0);
}

#[actix_web::test]
async fn search_slug_is_reserved_for_the_search_route() {
    let (pool, _, state) = setup(false, false);
    {
        let conn = pool.get().unwrap();
        let post = common::insert_post(&conn, 1, true, 0);
        common::insert_translation(&conn, post, 1, "search", "A post called search", "body");
    }
    let app = reader_app!(pool, state);

    let resp = test::call_service(&app, test::TestRequest::get().uri("/en/blog/search").to_request()).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}
