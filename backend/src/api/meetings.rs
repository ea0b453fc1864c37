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
    agenda::{self, LocalWindow},
    auth::AuthUser,
    error::{AppError, Result},
    models::meeting::{CreateMeetingRequest, Meeting, UpdateMeetingRequest},
    AppState,
};

// -- Time-windowed listings --

pub async fn list_upcoming(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> Result<Json<Vec<Meeting>>> {
    let window = LocalWindow::now(state.utc_offset);
    Ok(Json(agenda::upcoming(&state.pool, &window).await?))
}

/// Public: feeds the lobby display.
pub async fn lobby(State(state): State<AppState>) -> Result<Json<Vec<Meeting>>> {
    let window = LocalWindow::now(state.utc_offset);
    Ok(Json(agenda::lobby(&state.pool, &window).await?))
}

/// Public: feeds the lobby's scrolling ticker.
pub async fn running_text(State(state): State<AppState>) -> Result<Json<Vec<Meeting>>> {
    let window = LocalWindow::now(state.utc_offset);
    Ok(Json(agenda::running_text(&state.pool, &window).await?))
}

// -- CRUD --

pub async fn list_all(State(pool): State<PgPool>, _auth: AuthUser) -> Result<Json<Vec<Meeting>>> {
    let rows = sqlx::query_as::<_, Meeting>(&format!(
        r#"SELECT {} FROM meetings ORDER BY date, start_time COLLATE "C""#,
        Meeting::COLUMNS
    ))
    .fetch_all(&pool)
    .await?;

    Ok(Json(rows))
}

pub async fn get_one(
    State(pool): State<PgPool>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Meeting>> {
    let m = sqlx::query_as::<_, Meeting>(&format!(
        "SELECT {} FROM meetings WHERE id = $1",
        Meeting::COLUMNS
    ))
    .bind(id)
    .fetch_optional(&pool)
    .await?
    .ok_or_else(|| AppError::not_found("Meeting"))?;

    Ok(Json(m))
}

pub async fn create(
    State(pool): State<PgPool>,
    auth: AuthUser,
    WithRejection(Json(req), _): WithRejection<Json<CreateMeetingRequest>, AppError>,
) -> Result<(StatusCode, Json<Meeting>)> {
    use validator::Validate;
    req.validate()?;

    let m = sqlx::query_as::<_, Meeting>(&format!(
        r#"
        INSERT INTO meetings (id, title, date, location, audience, start_time, end_time, note)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING {}
        "#,
        Meeting::COLUMNS
    ))
    .bind(Uuid::new_v4())
    .bind(&req.title)
    .bind(req.date)
    .bind(&req.location)
    .bind(&req.audience)
    .bind(&req.start_time)
    .bind(&req.end_time)
    .bind(&req.note)
    .fetch_one(&pool)
    .await?;

    tracing::info!("{} created meeting {} on {}", auth.username, m.id, m.date);
    Ok((StatusCode::CREATED, Json(m)))
}

/// Absent fields keep their stored value; an explicit `"note": null` clears
/// the note.
pub async fn update(
    State(pool): State<PgPool>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
    WithRejection(Json(req), _): WithRejection<Json<UpdateMeetingRequest>, AppError>,
) -> Result<Json<Meeting>> {
    use validator::Validate;
    req.validate()?;

    let m = sqlx::query_as::<_, Meeting>(&format!(
        r#"
        UPDATE meetings
        SET title      = COALESCE($2, title),
            date       = COALESCE($3, date),
            location   = COALESCE($4, location),
            audience   = COALESCE($5, audience),
            start_time = COALESCE($6, start_time),
            end_time   = COALESCE($7, end_time),
            note       = CASE WHEN $8 THEN $9 ELSE note END,
            updated_at = now()
        WHERE id = $1
        RETURNING {}
        "#,
        Meeting::COLUMNS
    ))
    .bind(id)
    .bind(&req.title)
    .bind(req.date)
    .bind(&req.location)
    .bind(&req.audience)
    .bind(&req.start_time)
    .bind(&req.end_time)
    .bind(req.note.is_some())
    .bind(req.note.as_ref().and_then(|n| n.as_deref()))
    .fetch_optional(&pool)
    .await?
    .ok_or_else(|| AppError::not_found("Meeting"))?;

    Ok(Json(m))
}

pub async fn delete(
    State(pool): State<PgPool>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>> {
    sqlx::query_scalar::<_, Uuid>("DELETE FROM meetings WHERE id = $1 RETURNING id")
        .bind(id)
        .fetch_optional(&pool)
        .await?
        .ok_or_else(|| AppError::not_found("Meeting"))?;

    tracing::info!("{} deleted meeting {}", auth.username, id);
    Ok(Json(json!({ "message": "Meeting deleted successfully" })))
}
