pub mod agenda;
pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod uploads;

use std::time::Duration;

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};
use time::UtcOffset;

use crate::{config::Config, uploads::UploadStore};

/// Shared application state available to all handlers via axum's State extractor.
///
/// Built once at startup with [`AppState::connect`] and released with
/// [`AppState::close`] after the server stops accepting requests. Nothing in
/// here is mutated after construction.
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub jwt_secret: String,
    pub jwt_expiry_hours: u64,
    /// Civil offset that defines "today" for meeting listings.
    pub utc_offset: UtcOffset,
    pub uploads: UploadStore,
    pub max_upload_bytes: usize,
}

impl axum::extract::FromRef<AppState> for PgPool {
    fn from_ref(state: &AppState) -> Self {
        state.pool.clone()
    }
}

impl AppState {
    /// Connect the database pool, apply pending migrations and prepare the
    /// uploads directory.
    pub async fn connect(cfg: &Config) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(20)
            .acquire_timeout(Duration::from_secs(5))
            .connect(&cfg.database_url)
            .await
            .context("Failed to connect to the database")?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .context("Failed to run migrations")?;

        let state = Self::new(pool, cfg)?;
        state.uploads.ensure_dir().await?;
        Ok(state)
    }

    /// Assemble state around an existing pool. No I/O happens here.
    pub fn new(pool: PgPool, cfg: &Config) -> anyhow::Result<Self> {
        let utc_offset = UtcOffset::from_hms(cfg.local_utc_offset_hours, 0, 0)
            .context("Invalid local UTC offset")?;

        Ok(Self {
            pool,
            jwt_secret: cfg.jwt_secret.clone(),
            jwt_expiry_hours: cfg.jwt_expiry_hours,
            utc_offset,
            uploads: UploadStore::new(cfg.upload_dir.clone()),
            max_upload_bytes: cfg.max_upload_bytes,
        })
    }

    /// Wait for in-flight queries and close every pooled connection.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}
