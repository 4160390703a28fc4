use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use super::{build_router, AppState};
use crate::config::ServerConfig;
use crate::persistence::sqlite::{Database, SqliteTicketRepository};
use crate::persistence::{PersistenceError, TicketRepository};
use crate::tickets::{CreateInput, Ticket};

const BOUNDARY: &str = "lotto-test-boundary";

const VALID_JSON: &str =
    r#"{"game":"POWERBALL","draw_date":"2024-06-01","white":[1,2,3,4,5],"special":10}"#;

const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1A\n\x00\x00\x00\rIHDR";
const JPEG_HEADER: &[u8] = b"\xFF\xD8\xFF\xE0\x00\x10JFIF\x00";

struct TestApp {
    router: Router,
    upload_root: TempDir,
    _db: Option<Database>,
}

impl TestApp {
    fn photo_dir(&self) -> std::path::PathBuf {
        self.upload_root.path().join("ticket-photos")
    }
}

fn test_config(upload_root: &TempDir) -> ServerConfig {
    let mut config = ServerConfig::new("sqlite::memory:");
    config.upload_dir = upload_root.path().join("ticket-photos");
    config
}

async fn sqlite_app_with(configure: impl FnOnce(&mut ServerConfig)) -> TestApp {
    let db = Database::new_in_memory().await.unwrap();
    let upload_root = tempfile::tempdir().unwrap();
    let mut config = test_config(&upload_root);
    configure(&mut config);
    let repo = SqliteTicketRepository::new(db.pool().clone());
    TestApp {
        router: build_router(AppState::new(repo, &config)),
        upload_root,
        _db: Some(db),
    }
}

async fn sqlite_app() -> TestApp {
    sqlite_app_with(|_| {}).await
}

/// A store whose every call fails, for exercising the 500 paths.
struct FailingRepository;

impl TicketRepository for FailingRepository {
    async fn create(&self, _input: CreateInput) -> Result<Ticket, PersistenceError> {
        Err(PersistenceError::Database(sqlx::Error::PoolClosed))
    }

    async fn list_for_user(&self, _user_id: i64) -> Result<Vec<Ticket>, PersistenceError> {
        Err(PersistenceError::Database(sqlx::Error::PoolClosed))
    }
}

fn failing_app() -> TestApp {
    let upload_root = tempfile::tempdir().unwrap();
    let config = test_config(&upload_root);
    TestApp {
        router: build_router(AppState::new(FailingRepository, &config)),
        upload_root,
        _db: None,
    }
}

async fn send(app: &TestApp, req: Request<Body>) -> (StatusCode, String) {
    let resp = app.router.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, String::from_utf8_lossy(&bytes).into_owned())
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/tickets")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn post_form(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/tickets")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Build a multipart upload with an optional `game` field and an optional
/// `ticket` file part.
fn post_photo(game: Option<&str>, file: Option<(&str, &[u8])>) -> Request<Body> {
    let mut body = Vec::new();
    if let Some(game) = game {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"game\"\r\n\r\n{game}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some((filename, bytes)) = file {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"ticket\"; filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri("/api/tickets/photo")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

fn stored_photos(app: &TestApp) -> usize {
    std::fs::read_dir(app.photo_dir())
        .map(|entries| entries.count())
        .unwrap_or(0)
}

// ── health ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_healthz() {
    let app = sqlite_app().await;
    let (status, body) = send(&app, get("/healthz")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "ok");
}

// ── JSON API ───────────────────────────────────────────────────────────

#[tokio::test]
async fn test_json_create_echoes_fields() {
    let app = sqlite_app().await;
    let (status, body) = send(&app, post_json(VALID_JSON)).await;
    assert_eq!(status, StatusCode::CREATED);

    let json: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["game"], "POWERBALL");
    assert_eq!(json["draw_date"], "2024-06-01");
    assert_eq!(json["white"], serde_json::json!([1, 2, 3, 4, 5]));
    assert_eq!(json["special"], 10);
    assert_eq!(json["user_id"], 1);
    assert!(json["id"].as_i64().unwrap() > 0);
    let created_at = json["created_at"].as_str().unwrap();
    assert!(chrono::DateTime::parse_from_rfc3339(created_at).is_ok());
    assert!(json.get("multiplier").is_none());
}

#[tokio::test]
async fn test_json_create_with_optionals() {
    let app = sqlite_app().await;
    let body = r#"{"game":"MEGAMILLIONS","draw_date":"2024-06-04","white":[40,2,17,9,33],
        "special":12,"multiplier":3,"image_url":"photos/a.jpg"}"#;
    let (status, body) = send(&app, post_json(body)).await;
    assert_eq!(status, StatusCode::CREATED);

    let json: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["game"], "MEGAMILLIONS");
    assert_eq!(json["white"], serde_json::json!([40, 2, 17, 9, 33]));
    assert_eq!(json["multiplier"], 3);
    assert_eq!(json["image_url"], "photos/a.jpg");
}

#[tokio::test]
async fn test_json_validation_messages() {
    let app = sqlite_app().await;
    let cases = [
        ("{\"game\":", "invalid JSON"),
        (
            r#"{"game":"LOTTO","draw_date":"2024-06-01","white":[1,2,3,4,5],"special":10}"#,
            "invalid game",
        ),
        (
            r#"{"game":"powerball","draw_date":"2024-06-01","white":[1,2,3,4,5],"special":10}"#,
            "invalid game",
        ),
        (
            r#"{"game":"POWERBALL","draw_date":"2024-06-01","white":[1,2,3,4],"special":10}"#,
            "white must have 5 numbers",
        ),
        (
            r#"{"game":"POWERBALL","draw_date":"2024-13-01","white":[1,2,3,4,5],"special":10}"#,
            "invalid draw_date",
        ),
        (
            r#"{"game":"POWERBALL","draw_date":"2024-6-1","white":[1,2,3,4,5],"special":10}"#,
            "invalid draw_date",
        ),
        (
            r#"{"game":"POWERBALL","draw_date":" 2024-06-01","white":[1,2,3,4,5],"special":10}"#,
            "invalid draw_date",
        ),
        (
            r#"{"game":null,"draw_date":"2024-06-01","white":[1,2,3,4,5],"special":10}"#,
            "invalid game",
        ),
        (
            r#"{"game":"POWERBALL","draw_date":"2024-06-01","white":null,"special":10}"#,
            "white must have 5 numbers",
        ),
    ];
    for (request, expected) in cases {
        let (status, body) = send(&app, post_json(request)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "request: {request}");
        assert_eq!(body, expected, "request: {request}");
    }

    let (_, body) = send(&app, get("/api/tickets")).await;
    assert_eq!(body, "[]");
}

#[tokio::test]
async fn test_json_wrong_white_count_always_rejected() {
    let app = sqlite_app().await;
    for white in ["[]", "[1]", "[1,2,3,4,5,6]", "[1,2,3,4,5,6,7,8,9,10]"] {
        for draw_date in ["2024-06-01", "not-a-date"] {
            let body = format!(
                r#"{{"game":"POWERBALL","draw_date":"{draw_date}","white":{white},"special":10}}"#
            );
            let (status, _) = send(&app, post_json(&body)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "body: {body}");
        }
    }
}

#[tokio::test]
async fn test_json_storage_failure_is_generic_500() {
    let app = failing_app();
    let (status, body) = send(&app, post_json(VALID_JSON)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, "failed to create ticket");
    assert!(!body.contains("pool"));
}

#[tokio::test]
async fn test_list_empty() {
    let app = sqlite_app().await;
    let (status, body) = send(&app, get("/api/tickets")).await;
    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json, serde_json::json!([]));
}

#[tokio::test]
async fn test_list_orders_newest_draw_first() {
    let app = sqlite_app().await;
    let mut ids = Vec::new();
    for draw_date in ["2024-01-06", "2024-06-01", "2024-03-02", "2024-06-01"] {
        let body = format!(
            r#"{{"game":"POWERBALL","draw_date":"{draw_date}","white":[1,2,3,4,5],"special":10}}"#
        );
        let (status, body) = send(&app, post_json(&body)).await;
        assert_eq!(status, StatusCode::CREATED);
        let json: Value = serde_json::from_str(&body).unwrap();
        ids.push(json["id"].as_i64().unwrap());
    }

    let (status, body) = send(&app, get("/api/tickets")).await;
    assert_eq!(status, StatusCode::OK);
    let json: Vec<Value> = serde_json::from_str(&body).unwrap();
    let listed: Vec<i64> = json.iter().map(|t| t["id"].as_i64().unwrap()).collect();
    assert_eq!(listed, vec![ids[3], ids[1], ids[2], ids[0]]);
}

#[tokio::test]
async fn test_list_storage_failure() {
    let app = failing_app();
    let (status, body) = send(&app, get("/api/tickets")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, "failed to list tickets");
}

#[tokio::test]
async fn test_placeholder_user_id_is_configurable() {
    let app = sqlite_app_with(|config| config.placeholder_user_id = 42).await;
    let (status, body) = send(&app, post_json(VALID_JSON)).await;
    assert_eq!(status, StatusCode::CREATED);
    let json: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["user_id"], 42);

    let (_, body) = send(&app, get("/api/tickets")).await;
    let json: Vec<Value> = serde_json::from_str(&body).unwrap();
    assert_eq!(json.len(), 1);
}

// ── HTML form ──────────────────────────────────────────────────────────

const VALID_FORM: &str = "game=POWERBALL&draw_date=2024-06-01&white1=1&white2=2&white3=3&white4=4&white5=5&special=10";

#[tokio::test]
async fn test_show_form() {
    let app = sqlite_app().await;
    let (status, body) = send(&app, get("/tickets/new")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("<form"));
    assert!(body.contains(r#"action="/tickets""#));
}

#[tokio::test]
async fn test_form_create_success() {
    let app = sqlite_app().await;
    let (status, body) = send(&app, post_form(VALID_FORM)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Ticket saved."));

    let (_, body) = send(&app, get("/api/tickets")).await;
    let json: Vec<Value> = serde_json::from_str(&body).unwrap();
    assert_eq!(json.len(), 1);
    assert_eq!(json[0]["white"], serde_json::json!([1, 2, 3, 4, 5]));
    assert_eq!(json[0]["special"], 10);
}

#[tokio::test]
async fn test_form_errors_render_inline() {
    let app = sqlite_app().await;
    let cases = [
        (
            "game=POWERBALL&draw_date=&white1=1&white2=2&white3=3&white4=4&white5=5&special=10",
            "All fields are required.",
        ),
        (
            "game=POWERBALL&draw_date=2024-13-01&white1=1&white2=2&white3=3&white4=4&white5=5&special=10",
            "Invalid draw date.",
        ),
        (
            "game=POWERBALL&draw_date=2024-6-1&white1=1&white2=2&white3=3&white4=4&white5=5&special=10",
            "Invalid draw date.",
        ),
        (
            "game=POWERBALL&draw_date=2024-06-01&white1=1&white2=x&white3=3&white4=4&white5=5&special=10",
            "White ball numbers must be integers.",
        ),
        (
            "game=POWERBALL&draw_date=2024-06-01&white1=1&white2=2&white3=3&white4=4&white5=5&special=ten",
            "Special ball must be an integer.",
        ),
        (
            "game=KENO&draw_date=2024-06-01&white1=1&white2=2&white3=3&white4=4&white5=5&special=10",
            "Invalid game.",
        ),
    ];
    for (form, expected) in cases {
        let (status, body) = send(&app, post_form(form)).await;
        assert_eq!(status, StatusCode::OK, "form: {form}");
        assert!(body.contains(expected), "form: {form}");
        assert!(!body.contains("Ticket saved."), "form: {form}");
    }

    let (_, body) = send(&app, get("/api/tickets")).await;
    assert_eq!(body, "[]");
}

#[tokio::test]
async fn test_form_storage_failure_renders_error() {
    let app = failing_app();
    let (status, body) = send(&app, post_form(VALID_FORM)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Could not create ticket."));
}

#[tokio::test]
async fn test_form_wrong_content_type_renders_inline() {
    let app = sqlite_app().await;
    let req = Request::builder()
        .method("POST")
        .uri("/tickets")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(VALID_JSON))
        .unwrap();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("All fields are required."));

    let req = Request::builder()
        .method("POST")
        .uri("/tickets")
        .body(Body::from(VALID_FORM))
        .unwrap();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("All fields are required."));

    let (_, body) = send(&app, get("/api/tickets")).await;
    assert_eq!(body, "[]");
}

// ── photo upload ───────────────────────────────────────────────────────

#[tokio::test]
async fn test_photo_png_with_txt_name_accepted() {
    let app = sqlite_app().await;
    let (status, body) = send(
        &app,
        post_photo(Some("POWERBALL"), Some(("ticket.txt", PNG_BYTES))),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "body: {body}");

    let json: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["game"], "POWERBALL");
    assert_eq!(json["status"], "pending_ocr");
    let id = json["id"].as_str().unwrap();
    assert!(uuid::Uuid::parse_str(id).is_ok());

    let stored = app.photo_dir().join(format!("{id}.jpg"));
    assert_eq!(std::fs::read(stored).unwrap(), PNG_BYTES);
}

#[tokio::test]
async fn test_photo_jpeg_accepted() {
    let app = sqlite_app().await;
    let mut jpeg = JPEG_HEADER.to_vec();
    jpeg.resize(4096, 0xAB);
    let (status, _) = send(
        &app,
        post_photo(Some("MEGAMILLIONS"), Some(("scan.jpg", &jpeg))),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(stored_photos(&app), 1);
}

#[tokio::test]
async fn test_photo_over_limit_rejected() {
    let app = sqlite_app().await;
    let mut jpeg = JPEG_HEADER.to_vec();
    jpeg.resize((10 << 20) + 1, 0);
    let (status, body) = send(&app, post_photo(Some("POWERBALL"), Some(("big.jpg", &jpeg)))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, "file too large or invalid form");
    assert_eq!(stored_photos(&app), 0);
}

#[tokio::test]
async fn test_photo_validation_messages() {
    let app = sqlite_app().await;
    let gif: &[u8] = b"GIF89a\x01\x00\x01\x00";
    let cases: [(Option<&str>, Option<(&str, &[u8])>, &str); 5] = [
        (None, Some(("t.png", PNG_BYTES)), "game is required"),
        (Some(""), Some(("t.png", PNG_BYTES)), "game is required"),
        (Some("LOTTO"), Some(("t.png", PNG_BYTES)), "invalid game"),
        (Some("POWERBALL"), None, "ticket file is required"),
        (Some("POWERBALL"), Some(("t.gif", gif)), "only JPEG/PNG allowed"),
    ];
    for (game, file, expected) in cases {
        let (status, body) = send(&app, post_photo(game, file)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "expected {expected}");
        assert_eq!(body, expected);
    }
    assert_eq!(stored_photos(&app), 0);
}

#[tokio::test]
async fn test_photo_not_multipart() {
    let app = sqlite_app().await;
    let req = Request::builder()
        .method("POST")
        .uri("/api/tickets/photo")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{}"))
        .unwrap();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, "file too large or invalid form");
}

#[tokio::test]
async fn test_photo_write_failure_is_500() {
    let app = sqlite_app().await;
    // Occupy the upload directory path with a regular file.
    std::fs::write(app.photo_dir(), b"blocker").unwrap();
    let (status, body) = send(
        &app,
        post_photo(Some("POWERBALL"), Some(("t.png", PNG_BYTES))),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, "storage error");
}

#[tokio::test]
async fn test_photo_upload_writes_no_ticket() {
    let app = sqlite_app().await;
    let (status, _) = send(
        &app,
        post_photo(Some("POWERBALL"), Some(("t.png", PNG_BYTES))),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let (_, body) = send(&app, get("/api/tickets")).await;
    assert_eq!(body, "[]");
}
