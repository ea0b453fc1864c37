//! Service catalog ("layanan"). Every record owns one image in the uploads
//! directory; see [`crate::uploads`] for how the two are kept in step.

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::WithRejection;
use serde_json::{json, Value};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::{
    auth::AuthUser,
    error::{AppError, Result},
    models::service::{
        CreateServiceRequest, Service, ServiceFields, ServiceView, UpdateServiceRequest,
    },
    uploads::ImageUpload,
    AppState,
};

/// Multipart field carrying the image. `imageLayanan` is the legacy name.
const IMAGE_FIELDS: [&str; 2] = ["image", "imageLayanan"];

async fn read_form(mut multipart: Multipart) -> Result<(ServiceFields, Option<ImageUpload>)> {
    let mut fields = ServiceFields::default();
    let mut image = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();

        if IMAGE_FIELDS.contains(&name.as_str()) {
            let content_type = field.content_type().map(str::to_string);
            let has_file_name = field.file_name().is_some_and(|n| !n.is_empty());
            let data = field.bytes().await?;
            // Browsers send an empty part when no file was picked.
            if data.is_empty() && !has_file_name {
                continue;
            }
            image = Some(ImageUpload::new(content_type.as_deref(), data)?);
        } else {
            let value = field.text().await?;
            if !fields.set(&name, value) {
                tracing::debug!("Ignoring unknown form field {:?}", name);
            }
        }
    }

    Ok((fields, image))
}

async fn fetch(pool: &PgPool, id: Uuid) -> Result<ServiceView> {
    let row = sqlx::query_as::<_, Service>(&format!(
        "SELECT {} FROM services WHERE id = $1",
        Service::COLUMNS
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::not_found("Layanan"))?;

    Ok(row.into())
}

pub async fn list(State(pool): State<PgPool>, _auth: AuthUser) -> Result<Json<Vec<ServiceView>>> {
    let rows = sqlx::query_as::<_, Service>(&format!(
        "SELECT {} FROM services ORDER BY name",
        Service::COLUMNS
    ))
    .fetch_all(&pool)
    .await?;

    Ok(Json(rows.into_iter().map(ServiceView::from).collect()))
}

pub async fn get_one(
    State(pool): State<PgPool>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ServiceView>> {
    Ok(Json(fetch(&pool, id).await?))
}

/// Public: catalog detail page.
pub async fn public_detail(
    State(pool): State<PgPool>,
    Path(id): Path<Uuid>,
) -> Result<Json<ServiceView>> {
    Ok(Json(fetch(&pool, id).await?))
}

pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    WithRejection(multipart, _): WithRejection<Multipart, AppError>,
) -> Result<(StatusCode, Json<ServiceView>)> {
    let (fields, image) = read_form(multipart).await?;
    let req = CreateServiceRequest::from(fields);
    req.validate()?;
    let image = image.ok_or_else(|| AppError::BadRequest("Image is required.".into()))?;

    let staged = state.uploads.stage(&image).await?;

    let row = sqlx::query_as::<_, Service>(&format!(
        r#"
        INSERT INTO services (id, name, description, reference_standard, tariff, product, image_file)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING {}
        "#,
        Service::COLUMNS
    ))
    .bind(Uuid::new_v4())
    .bind(&req.name)
    .bind(&req.description)
    .bind(&req.reference_standard)
    .bind(&req.tariff)
    .bind(&req.product)
    .bind(staged.file_name())
    .fetch_one(&state.pool)
    .await?;

    staged.commit();
    tracing::info!("{} created layanan {}", auth.username, row.id);
    Ok((StatusCode::CREATED, Json(row.into())))
}

/// Partial update. A new image replaces the old one, and the old file is
/// removed only after the row points at the new one.
pub async fn update(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
    WithRejection(multipart, _): WithRejection<Multipart, AppError>,
) -> Result<Json<ServiceView>> {
    let (fields, image) = read_form(multipart).await?;
    let req = UpdateServiceRequest::from(fields);
    req.validate()?;

    let staged = match &image {
        Some(image) => Some(state.uploads.stage(image).await?),
        None => None,
    };

    let mut tx = state.pool.begin().await?;

    let previous_image = sqlx::query_scalar::<_, String>(
        "SELECT image_file FROM services WHERE id = $1 FOR UPDATE",
    )
    .bind(id)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or_else(|| AppError::not_found("Layanan"))?;

    let row = sqlx::query_as::<_, Service>(&format!(
        r#"
        UPDATE services
        SET name               = COALESCE($2, name),
            description        = COALESCE($3, description),
            reference_standard = COALESCE($4, reference_standard),
            tariff             = COALESCE($5, tariff),
            product            = COALESCE($6, product),
            image_file         = COALESCE($7, image_file),
            updated_at         = now()
        WHERE id = $1
        RETURNING {}
        "#,
        Service::COLUMNS
    ))
    .bind(id)
    .bind(&req.name)
    .bind(&req.description)
    .bind(&req.reference_standard)
    .bind(&req.tariff)
    .bind(&req.product)
    .bind(staged.as_ref().map(|s| s.file_name()))
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;

    if let Some(staged) = staged {
        staged.commit();
        state.uploads.remove(&previous_image).await;
    }

    Ok(Json(row.into()))
}

/// Deletes the record, then its image. A missing or undeletable image never
/// fails the request.
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>> {
    let image_file =
        sqlx::query_scalar::<_, String>("DELETE FROM services WHERE id = $1 RETURNING image_file")
            .bind(id)
            .fetch_optional(&state.pool)
            .await?
            .ok_or_else(|| AppError::not_found("Layanan"))?;

    state.uploads.remove(&image_file).await;

    tracing::info!("{} deleted layanan {}", auth.username, id);
    Ok(Json(json!({ "message": "Layanan deleted successfully" })))
}
