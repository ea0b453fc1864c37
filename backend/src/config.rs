use std::path::PathBuf;

use anyhow::Context;

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub jwt_expiry_hours: u64,
    pub listen_addr: String,
    pub cors_origins: Vec<String>,
    pub upload_dir: PathBuf,
    pub max_upload_bytes: usize,
    /// Hours east of UTC used for the "today" boundary of meeting listings.
    pub local_utc_offset_hours: i8,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let jwt_secret = std::env::var("JWT_SECRET").context("JWT_SECRET must be set")?;
        if jwt_secret.len() < 32 {
            anyhow::bail!("JWT_SECRET must be at least 32 characters for security");
        }
        if jwt_secret.contains("change_me") {
            anyhow::bail!("JWT_SECRET contains placeholder value, set a real secret before running");
        }

        let local_utc_offset_hours: i8 = std::env::var("LOCAL_UTC_OFFSET_HOURS")
            .unwrap_or_else(|_| "7".into())
            .parse()
            .context("LOCAL_UTC_OFFSET_HOURS must be a whole number of hours")?;
        if !(-23..=23).contains(&local_utc_offset_hours) {
            anyhow::bail!("LOCAL_UTC_OFFSET_HOURS must be between -23 and 23");
        }

        Ok(Self {
            database_url: std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            jwt_secret,
            jwt_expiry_hours: std::env::var("JWT_EXPIRY_HOURS")
                .unwrap_or_else(|_| "1".into())
                .parse()
                .context("JWT_EXPIRY_HOURS must be a number")?,
            listen_addr: std::env::var("LISTEN_ADDR").unwrap_or_else(|_| "0.0.0.0:6000".into()),
            cors_origins: std::env::var("CORS_ORIGINS")
                .unwrap_or_else(|_| "http://localhost:5173".into())
                .split(',')
                .map(|s| s.trim().to_string())
                .collect(),
            upload_dir: std::env::var("UPLOAD_DIR")
                .unwrap_or_else(|_| "uploads".into())
                .into(),
            max_upload_bytes: std::env::var("MAX_UPLOAD_BYTES")
                .unwrap_or_else(|_| (5 * 1024 * 1024).to_string())
                .parse()
                .context("MAX_UPLOAD_BYTES must be a number")?,
            local_utc_offset_hours,
        })
    }
}
