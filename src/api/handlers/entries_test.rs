//! Integration tests for the entry routes.

use axum::{
    body::Body,
    http::{Request, StatusCode, header},
    response::Response,
};
use http_body_util::BodyExt;
use tower::ServiceExt;

use crate::api::pages::EMPTY_LISTING;
use crate::api::{AppState, flash, routes};
use crate::db::{Database, SqliteDatabase};

/// Create a test app with an in-memory database
async fn test_app() -> axum::Router {
    let db = SqliteDatabase::in_memory().await.unwrap();
    db.migrate().await.unwrap();
    let state = AppState::new(db, flash::signing_key("test secret"));
    routes::create_router(state)
}

fn form_request(uri: &str, pairs: &[(&str, &str)]) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(serde_urlencoded::to_string(pairs).unwrap()))
        .unwrap()
}

async fn send(app: &axum::Router, request: Request<Body>) -> Response {
    app.clone().oneshot(request).await.unwrap()
}

async fn get(app: &axum::Router, uri: &str) -> Response {
    send(app, Request::builder().uri(uri).body(Body::empty()).unwrap()).await
}

async fn body_text(response: Response) -> String {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(body.to_vec()).unwrap()
}

fn location(response: &Response) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .expect("Expected a Location header")
        .to_str()
        .unwrap()
}

/// The `flash=...` pair from a response, ready to send back as a Cookie header.
fn flash_cookie(response: &Response) -> String {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .map(|v| v.to_str().unwrap())
        .find(|v| v.starts_with("flash="))
        .and_then(|v| v.split(';').next())
        .expect("Expected a flash cookie")
        .to_string()
}

async fn get_with_cookie(app: &axum::Router, uri: &str, cookie: &str) -> Response {
    send(
        app,
        Request::builder()
            .uri(uri)
            .header(header::COOKIE, cookie)
            .body(Body::empty())
            .unwrap(),
    )
    .await
}

fn clears_flash_cookie(response: &Response) -> bool {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .map(|v| v.to_str().unwrap())
        .any(|v| v.starts_with("flash=") && v.contains("Max-Age=0"))
}

async fn add(app: &axum::Router, title: &str, text: &str, category: &str) -> Response {
    send(
        app,
        form_request(
            "/add",
            &[("title", title), ("text", text), ("category", category)],
        ),
    )
    .await
}

// =============================================================================
// GET /
// =============================================================================

#[tokio::test(flavor = "multi_thread")]
async fn empty_store_shows_no_entries_indicator() {
    let app = test_app().await;

    let response = get(&app, "/").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains(EMPTY_LISTING));
}

#[tokio::test(flavor = "multi_thread")]
async fn listing_lists_entries_and_categories() {
    let app = test_app().await;
    add(&app, "First", "one", "rust").await;
    add(&app, "Second", "two", "sqlite").await;

    let body = body_text(get(&app, "/").await).await;
    assert!(body.find("Second").unwrap() < body.find("First").unwrap());
    assert!(body.contains(r#"<option value="rust">rust</option>"#));
    assert!(body.contains(r#"<option value="sqlite">sqlite</option>"#));
}

#[tokio::test(flavor = "multi_thread")]
async fn unverifiable_flash_cookie_is_cleared() {
    let app = test_app().await;

    let response = get_with_cookie(&app, "/", "flash=garbage").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(clears_flash_cookie(&response));
    assert!(body_text(response).await.contains(EMPTY_LISTING));
}

// =============================================================================
// POST /add
// =============================================================================

#[tokio::test(flavor = "multi_thread")]
async fn add_escapes_title_and_keeps_text_markup() {
    let app = test_app().await;

    let response = add(
        &app,
        "<Hello>",
        "<strong>HTML</strong> allowed here",
        "A category",
    )
    .await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), "/");

    let body = body_text(get(&app, "/").await).await;
    assert!(!body.contains(EMPTY_LISTING));
    assert!(body.contains("&lt;Hello&gt;"));
    assert!(body.contains("<strong>HTML</strong> allowed here"));
    assert!(body.contains("A category"));
}

#[tokio::test(flavor = "multi_thread")]
async fn add_flash_is_shown_once() {
    let app = test_app().await;

    let response = add(&app, "Title", "Text", "Category").await;
    let cookie = flash_cookie(&response);

    let response = send(
        &app,
        Request::builder()
            .uri("/")
            .header(header::COOKIE, &cookie)
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let cleared = response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .any(|v| v.to_str().unwrap().contains("Max-Age=0"));
    assert!(cleared, "Listing should clear the flash cookie");
    assert!(body_text(response).await.contains("New entry was successfully posted"));

    let body = body_text(get(&app, "/").await).await;
    assert!(!body.contains("New entry was successfully posted"));
}

#[tokio::test(flavor = "multi_thread")]
async fn add_with_missing_field_is_bad_request() {
    let app = test_app().await;

    let response = send(
        &app,
        form_request("/add", &[("title", "No category"), ("text", "body")]),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_text(get(&app, "/").await).await;
    assert!(body.contains(EMPTY_LISTING));
}

#[tokio::test(flavor = "multi_thread")]
async fn add_accepts_empty_strings() {
    let app = test_app().await;

    let response = add(&app, "", "", "").await;
    assert_eq!(response.status(), StatusCode::FOUND);

    let body = body_text(get(&app, "/").await).await;
    assert!(!body.contains(EMPTY_LISTING));
}

// =============================================================================
// GET /filter
// =============================================================================

#[tokio::test(flavor = "multi_thread")]
async fn filter_shows_only_matching_category() {
    let app = test_app().await;
    add(&app, "<Hello>", "<strong>HTML</strong> allowed here", "A category").await;
    add(&app, "<Hello>", "<strong>HTML</strong> allowed here", "Another category").await;

    let response = get(&app, "/filter?filter=Another%20category").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_text(response).await;
    assert!(body.contains("Another category"));
    assert!(!body.contains("A category"));
    assert!(body.contains("Entries successfully filtered by category: Another category"));
}

#[tokio::test(flavor = "multi_thread")]
async fn filter_with_empty_category_redirects_to_listing() {
    let app = test_app().await;

    let response = get(&app, "/filter?filter=").await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), "/");
}

#[tokio::test(flavor = "multi_thread")]
async fn filter_without_parameter_is_bad_request() {
    let app = test_app().await;

    let response = get(&app, "/filter").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test(flavor = "multi_thread")]
async fn filter_is_case_sensitive() {
    let app = test_app().await;
    add(&app, "Upper", "x", "News").await;

    let body = body_text(get(&app, "/filter?filter=news").await).await;
    assert!(!body.contains("Upper"));
    assert!(body.contains(EMPTY_LISTING));
}

// =============================================================================
// POST /delete
// =============================================================================

#[tokio::test(flavor = "multi_thread")]
async fn delete_removes_entry() {
    let app = test_app().await;
    add(&app, "<Hello>", "<strong>HTML</strong> allowed here", "A category").await;

    let response = send(&app, form_request("/delete", &[("delete", "1")])).await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert!(flash_cookie(&response).starts_with("flash="));

    let body = body_text(get(&app, "/").await).await;
    assert!(body.contains(EMPTY_LISTING));
}

#[tokio::test(flavor = "multi_thread")]
async fn delete_flash_is_shown_once() {
    let app = test_app().await;
    add(&app, "Doomed", "x", "c").await;

    let response = send(&app, form_request("/delete", &[("delete", "1")])).await;
    let cookie = flash_cookie(&response);

    let response = get_with_cookie(&app, "/", &cookie).await;
    assert!(clears_flash_cookie(&response));
    let body = body_text(response).await;
    assert!(body.contains("Entry successfully deleted"));
    assert!(!body.contains("New entry was successfully posted"));

    let body = body_text(get(&app, "/").await).await;
    assert!(!body.contains("Entry successfully deleted"));
}

#[tokio::test(flavor = "multi_thread")]
async fn delete_returns_to_referring_page() {
    let app = test_app().await;
    add(&app, "Title", "Text", "A category").await;

    let mut request = form_request("/delete", &[("delete", "1")]);
    request.headers_mut().insert(
        header::REFERER,
        "http://localhost:5000/filter?filter=A+category".parse().unwrap(),
    );

    let response = send(&app, request).await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), "/filter?filter=A+category");
}

#[tokio::test(flavor = "multi_thread")]
async fn delete_without_referer_redirects_to_listing() {
    let app = test_app().await;

    let response = send(&app, form_request("/delete", &[("delete", "1")])).await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), "/");
}

#[tokio::test(flavor = "multi_thread")]
async fn delete_never_redirects_off_site() {
    let app = test_app().await;

    for referer in [
        "//evil.example/phish",
        "not a uri",
        "https://evil.example",
        "/\\evil.example/x",
        "http://localhost/\\evil.example",
    ] {
        let mut request = form_request("/delete", &[("delete", "1")]);
        request
            .headers_mut()
            .insert(header::REFERER, referer.parse().unwrap());

        let response = send(&app, request).await;
        let target = location(&response);
        assert_eq!(target, "/", "Referer {referer:?} produced {target:?}");
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn delete_unknown_id_is_a_no_op() {
    let app = test_app().await;
    add(&app, "Survivor", "x", "c").await;

    let response = send(&app, form_request("/delete", &[("delete", "42")])).await;
    assert_eq!(response.status(), StatusCode::FOUND);

    let body = body_text(get(&app, "/").await).await;
    assert!(body.contains("Survivor"));
}

#[tokio::test(flavor = "multi_thread")]
async fn delete_with_non_integer_id_is_bad_request() {
    let app = test_app().await;
    add(&app, "Survivor", "x", "c").await;

    let response = send(&app, form_request("/delete", &[("delete", "one")])).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_text(get(&app, "/").await).await;
    assert!(body.contains("Survivor"));
}

// =============================================================================
// POST /edit and /edit-success
// =============================================================================

#[tokio::test(flavor = "multi_thread")]
async fn edit_renders_prefilled_form() {
    let app = test_app().await;
    add(&app, "Test title", "Test text", "A category").await;

    let response = send(&app, form_request("/edit", &[("edit", "1")])).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_text(response).await;
    assert!(body.contains(r#"action="/edit-success""#));
    assert!(body.contains(r#"value="Test title""#));
    assert!(body.contains(r#"value="A category""#));
    assert!(body.contains("Test text</textarea>"));
}

#[tokio::test(flavor = "multi_thread")]
async fn edit_unknown_id_is_not_found() {
    let app = test_app().await;

    let response = send(&app, form_request("/edit", &[("edit", "7")])).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test(flavor = "multi_thread")]
async fn edit_with_non_integer_id_is_bad_request() {
    let app = test_app().await;

    let response = send(&app, form_request("/edit", &[("edit", "1.5")])).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test(flavor = "multi_thread")]
async fn edit_success_replaces_entry() {
    let app = test_app().await;
    add(&app, "Test title", "Test text", "A category").await;

    let response = send(
        &app,
        form_request(
            "/edit-success",
            &[
                ("title", "New title"),
                ("text", "New text"),
                ("category", "New category"),
                ("id", "1"),
            ],
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), "/");

    let body = body_text(get(&app, "/").await).await;
    assert!(!body.contains("Test title"));
    assert!(!body.contains("Test text"));
    assert!(!body.contains("A category"));
    assert!(body.contains("New title"));
    assert!(body.contains("New text"));
    assert!(body.contains("New category"));
}

#[tokio::test(flavor = "multi_thread")]
async fn edit_success_flash_is_shown_once() {
    let app = test_app().await;
    add(&app, "Test title", "Test text", "A category").await;

    let response = send(
        &app,
        form_request(
            "/edit-success",
            &[
                ("title", "New title"),
                ("text", "New text"),
                ("category", "A category"),
                ("id", "1"),
            ],
        ),
    )
    .await;
    let cookie = flash_cookie(&response);

    let response = get_with_cookie(&app, "/", &cookie).await;
    assert!(clears_flash_cookie(&response));
    assert!(body_text(response).await.contains("Entry was successfully edited"));

    let body = body_text(get(&app, "/").await).await;
    assert!(!body.contains("Entry was successfully edited"));
}

#[tokio::test(flavor = "multi_thread")]
async fn cancelled_edit_leaves_entry_untouched() {
    let app = test_app().await;
    add(&app, "Test title", "Test text", "A category").await;

    send(&app, form_request("/edit", &[("edit", "1")])).await;

    let body = body_text(get(&app, "/").await).await;
    assert!(body.contains("Test title"));
    assert!(body.contains("Test text"));
    assert!(body.contains("A category"));
}

#[tokio::test(flavor = "multi_thread")]
async fn edit_success_for_unknown_id_is_a_no_op() {
    let app = test_app().await;
    add(&app, "Original", "x", "c").await;

    let response = send(
        &app,
        form_request(
            "/edit-success",
            &[("title", "Ghost"), ("text", "x"), ("category", "c"), ("id", "99")],
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FOUND);

    let body = body_text(get(&app, "/").await).await;
    assert!(body.contains("Original"));
    assert!(!body.contains("Ghost"));
}

#[tokio::test(flavor = "multi_thread")]
async fn edit_success_without_id_is_bad_request() {
    let app = test_app().await;

    let response = send(
        &app,
        form_request(
            "/edit-success",
            &[("title", "t"), ("text", "x"), ("category", "c")],
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// =============================================================================
// GET /health
// =============================================================================

#[tokio::test(flavor = "multi_thread")]
async fn health_reports_ok() {
    let app = test_app().await;

    let response = get(&app, "/health").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(body["status"], "ok");
}
