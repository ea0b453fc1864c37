use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;
use validator::Validate;

use super::common::validate_not_blank;

/// A named group meetings are held for. Names are unique.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Audience {
    pub id: Uuid,
    pub name: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct CreateAudienceRequest {
    #[validate(custom(function = "validate_not_blank"))]
    pub name: String,
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct UpdateAudienceRequest {
    #[validate(custom(function = "validate_not_blank"))]
    pub name: Option<String>,
}
