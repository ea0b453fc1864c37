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
    models::room::{CreateRoomRequest, Room, UpdateRoomRequest},
};

pub async fn list(State(pool): State<PgPool>, _auth: AuthUser) -> Result<Json<Vec<Room>>> {
    let rows = sqlx::query_as::<_, Room>(&format!(
        "SELECT {} FROM rooms ORDER BY name",
        Room::COLUMNS
    ))
    .fetch_all(&pool)
    .await?;

    Ok(Json(rows))
}

pub async fn get_one(
    State(pool): State<PgPool>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Room>> {
    let room = sqlx::query_as::<_, Room>(&format!(
        "SELECT {} FROM rooms WHERE id = $1",
        Room::COLUMNS
    ))
    .bind(id)
    .fetch_optional(&pool)
    .await?
    .ok_or_else(|| AppError::not_found("Room"))?;

    Ok(Json(room))
}

pub async fn create(
    State(pool): State<PgPool>,
    _auth: AuthUser,
    WithRejection(Json(req), _): WithRejection<Json<CreateRoomRequest>, AppError>,
) -> Result<(StatusCode, Json<Room>)> {
    use validator::Validate;
    req.validate()?;

    let room = sqlx::query_as::<_, Room>(&format!(
        "INSERT INTO rooms (id, name, capacity, location_type) VALUES ($1, $2, $3, $4) RETURNING {}",
        Room::COLUMNS
    ))
    .bind(Uuid::new_v4())
    .bind(&req.name)
    .bind(req.capacity)
    .bind(&req.location_type)
    .fetch_one(&pool)
    .await?;

    Ok((StatusCode::CREATED, Json(room)))
}

pub async fn update(
    State(pool): State<PgPool>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
    WithRejection(Json(req), _): WithRejection<Json<UpdateRoomRequest>, AppError>,
) -> Result<Json<Room>> {
    use validator::Validate;
    req.validate()?;

    let room = sqlx::query_as::<_, Room>(&format!(
        r#"
        UPDATE rooms
        SET name          = COALESCE($2, name),
            capacity      = COALESCE($3, capacity),
            location_type = COALESCE($4, location_type)
        WHERE id = $1
        RETURNING {}
        "#,
        Room::COLUMNS
    ))
    .bind(id)
    .bind(&req.name)
    .bind(req.capacity)
    .bind(&req.location_type)
    .fetch_optional(&pool)
    .await?
    .ok_or_else(|| AppError::not_found("Room"))?;

    Ok(Json(room))
}

pub async fn delete(
    State(pool): State<PgPool>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>> {
    sqlx::query_scalar::<_, Uuid>("DELETE FROM rooms WHERE id = $1 RETURNING id")
        .bind(id)
        .fetch_optional(&pool)
        .await?
        .ok_or_else(|| AppError::not_found("Room"))?;

    Ok(Json(json!({ "message": "Room deleted successfully" })))
}
