use axum::{extract::State, Json};
use axum_extra::extract::WithRejection;

use crate::{
    auth::{create_token, verify_password, AuthUser},
    error::{AppError, Result},
    models::user::{LoginRequest, LoginResponse, Me, User},
    AppState,
};

pub async fn login(
    State(state): State<AppState>,
    WithRejection(Json(req), _): WithRejection<Json<LoginRequest>, AppError>,
) -> Result<Json<LoginResponse>> {
    use validator::Validate;
    req.validate()?;

    let user = sqlx::query_as::<_, User>(
        "SELECT id, username, password_hash, created_at FROM users WHERE username = $1",
    )
    .bind(&req.username)
    .fetch_optional(&state.pool)
    .await?
    .ok_or_else(|| {
        tracing::info!("Login attempt for unknown user {}", req.username);
        AppError::Unauthorized
    })?;

    verify_password(&req.password, &user.password_hash).map_err(|e| {
        tracing::info!("Wrong password for user {}", user.username);
        e
    })?;

    let token = create_token(&user.username, &state.jwt_secret, state.jwt_expiry_hours)
        .map_err(AppError::Internal)?;

    tracing::info!("User {} logged in", user.username);
    Ok(Json(LoginResponse { token }))
}

pub async fn me(auth: AuthUser) -> Json<Me> {
    Json(Me {
        username: auth.username,
    })
}
