pub mod audiences;
pub mod auth;
pub mod meetings;
pub mod rooms;
pub mod services;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::services::ServeDir;

use crate::{uploads::PUBLIC_PREFIX, AppState};

/// Every route except `/login`, which the binary mounts separately so it can
/// sit behind a rate limiter.
pub fn router(state: AppState) -> Router {
    let uploads = ServeDir::new(state.uploads.dir());
    let body_limit = DefaultBodyLimit::max(state.max_upload_bytes);

    Router::new()
        // Auth
        .route("/me", get(auth::me))
        // Audiences
        .route("/audiences", get(audiences::list).post(audiences::create))
        .route(
            "/audiences/:id",
            get(audiences::get_one).put(audiences::update).delete(audiences::delete),
        )
        // Meetings
        .route("/meetings", get(meetings::list_upcoming).post(meetings::create))
        .route("/meetings/all", get(meetings::list_all))
        .route(
            "/meetings/:id",
            get(meetings::get_one).put(meetings::update).delete(meetings::delete),
        )
        // Public lobby screens
        .route("/lobby-meetings", get(meetings::lobby))
        .route("/running-text", get(meetings::running_text))
        // Rooms
        .route("/rooms", get(rooms::list).post(rooms::create))
        .route(
            "/rooms/:id",
            get(rooms::get_one).put(rooms::update).delete(rooms::delete),
        )
        // Service catalog
        .route("/layanan", get(services::list).post(services::create))
        .route(
            "/layanan/:id",
            get(services::get_one).put(services::update).delete(services::delete),
        )
        .route("/layanan-pengujian/:id", get(services::public_detail))
        // Uploaded images
        .nest_service(PUBLIC_PREFIX, uploads)
        .layer(body_limit)
        .with_state(state)
}

pub fn login_router(state: AppState) -> Router {
    Router::new()
        .route("/login", post(auth::login))
        .with_state(state)
}
