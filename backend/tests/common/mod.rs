#![allow(dead_code)]
use std::{net::SocketAddr, path::PathBuf};

use axum::{
    body::Body,
    http::{Request, Response},
    Router,
};
use sqlx::{postgres::PgPoolOptions, PgPool};
use tempfile::TempDir;
use tower::ServiceExt;
use uuid::Uuid;

use roombook_backend::{api, auth, config::Config, AppState};

pub const JWT_SECRET: &str = "test-secret-that-is-at-least-32-chars-long!!";

fn test_config(database_url: &str, upload_dir: PathBuf) -> Config {
    Config {
        database_url: database_url.to_string(),
        jwt_secret: JWT_SECRET.to_string(),
        jwt_expiry_hours: 1,
        listen_addr: "127.0.0.1:0".into(),
        cors_origins: vec![],
        upload_dir,
        max_upload_bytes: 1024 * 1024,
        local_utc_offset_hours: 7,
    }
}

fn full_router(state: AppState) -> Router {
    api::router(state.clone()).merge(api::login_router(state))
}

/// Router backed by a pool that never connects. Good for anything that is
/// rejected before touching the database: a request that did reach the
/// database would come back as a 500.
pub fn offline_app() -> Router {
    let cfg = test_config("postgres://nobody@127.0.0.1:1/none", "unused-uploads".into());
    let pool = PgPoolOptions::new()
        .acquire_timeout(std::time::Duration::from_millis(200))
        .connect_lazy(&cfg.database_url)
        .expect("lazy pool");
    full_router(AppState::new(pool, &cfg).expect("state"))
}

pub async fn send(app: &Router, request: Request<Body>) -> Response<Body> {
    app.clone().oneshot(request).await.expect("infallible")
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    serde_json::from_slice(&bytes).expect("json body")
}

pub fn valid_token(username: &str) -> String {
    auth::create_token(username, JWT_SECRET, 1).expect("token")
}

/// A JWT that expired an hour ago, signed with the test secret.
pub fn create_expired_token(username: &str) -> String {
    use jsonwebtoken::{encode, EncodingKey, Header};

    let now = time::OffsetDateTime::now_utc();
    let claims = auth::Claims {
        sub: username.to_string(),
        exp: (now - time::Duration::hours(1)).unix_timestamp(),
        iat: (now - time::Duration::hours(2)).unix_timestamp(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(JWT_SECRET.as_bytes()),
    )
    .expect("Failed to create expired token")
}

/// A live server against `TEST_DATABASE_URL`.
pub struct TestApp {
    pub addr: SocketAddr,
    pub pool: PgPool,
    pub uploads: TempDir,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

/// Spin up a real Axum server on a random port. Returns `None` (and the
/// calling test passes vacuously) when `TEST_DATABASE_URL` is not set, since
/// these tests write and delete data and must not run against a shared
/// database by accident.
pub async fn setup_test_app() -> Option<TestApp> {
    let Ok(database_url) = std::env::var("TEST_DATABASE_URL") else {
        eprintln!("TEST_DATABASE_URL not set, skipping database test");
        return None;
    };

    let uploads = tempfile::tempdir().expect("upload dir");
    let cfg = test_config(&database_url, uploads.path().to_path_buf());

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .expect("Failed to connect to test database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    let state = AppState::new(pool.clone(), &cfg).expect("state");
    let app = full_router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind to random port");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    Some(TestApp { addr, pool, uploads })
}

/// Create an admin with an Argon2-hashed password. Returns (username, password).
pub async fn create_test_admin(pool: &PgPool) -> (String, String) {
    let username = format!("admin-{}", &Uuid::new_v4().to_string()[..8]);
    let password = "testpass123".to_string();
    let hash = auth::hash_password(&password).expect("Failed to hash password");

    sqlx::query("INSERT INTO users (id, username, password_hash) VALUES ($1, $2, $3)")
        .bind(Uuid::new_v4())
        .bind(&username)
        .bind(&hash)
        .execute(pool)
        .await
        .expect("Failed to create test user");

    (username, password)
}

pub async fn delete_test_admin(pool: &PgPool, username: &str) {
    let _ = sqlx::query("DELETE FROM users WHERE username = $1")
        .bind(username)
        .execute(pool)
        .await;
}

/// Log in via the HTTP API and return the JWT token.
pub async fn get_auth_token(app: &TestApp, username: &str, password: &str) -> String {
    let resp = http_client()
        .post(app.url("/login"))
        .json(&serde_json::json!({
            "username": username,
            "password": password,
        }))
        .send()
        .await
        .expect("Login request failed");

    assert_eq!(resp.status(), 200, "Login should return 200");

    let body: serde_json::Value = resp.json().await.expect("Failed to parse login response");
    body["token"]
        .as_str()
        .expect("Response should contain token")
        .to_string()
}

pub fn http_client() -> reqwest::Client {
    reqwest::Client::new()
}

/// Today's date in the service's +07:00 day, shifted by `days`, as YYYY-MM-DD.
pub fn local_date(days: i64) -> String {
    let today = time::OffsetDateTime::now_utc()
        .to_offset(time::UtcOffset::from_hms(7, 0, 0).unwrap())
        .date();
    (today + time::Duration::days(days)).to_string()
}

/// Current local wall-clock time as "HH:MM".
pub fn local_hhmm() -> String {
    let now = time::OffsetDateTime::now_utc()
        .to_offset(time::UtcOffset::from_hms(7, 0, 0).unwrap());
    format!("{:02}:{:02}", now.hour(), now.minute())
}
