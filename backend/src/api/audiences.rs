use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::WithRejection;
use serde_json::{json, Value};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    auth::AuthUser,
    error::{AppError, Result},
    models::audience::{Audience, CreateAudienceRequest, UpdateAudienceRequest},
};

pub async fn list(State(pool): State<PgPool>, _auth: AuthUser) -> Result<Json<Vec<Audience>>> {
    let rows = sqlx::query_as::<_, Audience>(
        "SELECT id, name, created_at FROM audiences ORDER BY name",
    )
    .fetch_all(&pool)
    .await?;

    Ok(Json(rows))
}

pub async fn get_one(
    State(pool): State<PgPool>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Audience>> {
    let row = sqlx::query_as::<_, Audience>(
        "SELECT id, name, created_at FROM audiences WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(&pool)
    .await?
    .ok_or_else(|| AppError::not_found("Audience"))?;

    Ok(Json(row))
}

/// Duplicate names hit the UNIQUE constraint and come back as 400.
pub async fn create(
    State(pool): State<PgPool>,
    _auth: AuthUser,
    WithRejection(Json(mut req), _): WithRejection<Json<CreateAudienceRequest>, AppError>,
) -> Result<(StatusCode, Json<Audience>)> {
    use validator::Validate;
    req.name = req.name.trim().to_string();
    req.validate()?;

    let row = sqlx::query_as::<_, Audience>(
        "INSERT INTO audiences (id, name) VALUES ($1, $2) RETURNING id, name, created_at",
    )
    .bind(Uuid::new_v4())
    .bind(&req.name)
    .fetch_one(&pool)
    .await?;

    Ok((StatusCode::CREATED, Json(row)))
}

pub async fn update(
    State(pool): State<PgPool>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
    WithRejection(Json(mut req), _): WithRejection<Json<UpdateAudienceRequest>, AppError>,
) -> Result<Json<Audience>> {
    use validator::Validate;
    req.name = req.name.map(|n| n.trim().to_string());
    req.validate()?;

    let row = sqlx::query_as::<_, Audience>(
        r#"
        UPDATE audiences
        SET name = COALESCE($2, name)
        WHERE id = $1
        RETURNING id, name, created_at
        "#,
    )
    .bind(id)
    .bind(&req.name)
    .fetch_optional(&pool)
    .await?
    .ok_or_else(|| AppError::not_found("Audience"))?;

    Ok(Json(row))
}

pub async fn delete(
    State(pool): State<PgPool>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>> {
    sqlx::query_scalar::<_, Uuid>("DELETE FROM audiences WHERE id = $1 RETURNING id")
        .bind(id)
        .fetch_optional(&pool)
        .await?
        .ok_or_else(|| AppError::not_found("Audience"))?;

    Ok(Json(json!({ "message": "Audience deleted successfully" })))
}
