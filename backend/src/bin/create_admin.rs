//! Create (or reset the password of) the admin account.
//!
//! ```text
//! DATABASE_URL=postgres://... ADMIN_USERNAME=admin ADMIN_PASSWORD=... create-admin
//! ```

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;
use uuid::Uuid;

use roombook_backend::auth::hash_password;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();

    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
    let username = std::env::var("ADMIN_USERNAME").unwrap_or_else(|_| "admin".into());
    let password = std::env::var("ADMIN_PASSWORD").context("ADMIN_PASSWORD must be set")?;
    if password.len() < 8 {
        anyhow::bail!("ADMIN_PASSWORD must be at least 8 characters");
    }

    let pool = PgPoolOptions::new()
        .max_connections(1)
        .connect(&database_url)
        .await
        .context("Failed to connect to the database")?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    let hash = hash_password(&password)?;

    let created: bool = sqlx::query_scalar(
        r#"
        INSERT INTO users (id, username, password_hash)
        VALUES ($1, $2, $3)
        ON CONFLICT (username) DO UPDATE SET password_hash = EXCLUDED.password_hash
        RETURNING (xmax = 0)
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(&username)
    .bind(&hash)
    .fetch_one(&pool)
    .await?;

    if created {
        tracing::info!("Admin user {} created", username);
    } else {
        tracing::info!("Password for existing user {} updated", username);
    }

    pool.close().await;
    Ok(())
}
