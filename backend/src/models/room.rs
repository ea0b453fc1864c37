use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;
use validator::Validate;

use super::common::validate_not_blank;

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Room {
    pub id: Uuid,
    pub name: String,
    pub capacity: i32,
    pub location_type: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl Room {
    pub const COLUMNS: &'static str = "id, name, capacity, location_type, created_at";
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct CreateRoomRequest {
    #[validate(custom(function = "validate_not_blank"))]
    pub name: String,
    #[validate(
        required(message = "capacity is required"),
        range(min = 1, message = "capacity must be a positive number")
    )]
    pub capacity: Option<i32>,
    #[validate(custom(function = "validate_not_blank"))]
    pub location_type: String,
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct UpdateRoomRequest {
    #[validate(custom(function = "validate_not_blank"))]
    pub name: Option<String>,
    #[validate(range(min = 1, message = "capacity must be a positive number"))]
    pub capacity: Option<i32>,
    #[validate(custom(function = "validate_not_blank"))]
    pub location_type: Option<String>,
}
