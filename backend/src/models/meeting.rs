use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};
use uuid::Uuid;
use validator::Validate;

use super::common::{
    deserialize_calendar_date, deserialize_present, validate_hhmm, validate_not_blank,
};

/// A booked meeting. `audience` and `location` are free-text labels, not
/// references to audience or room records.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Meeting {
    pub id: Uuid,
    pub title: String,
    pub date: Date,
    pub location: String,
    pub audience: String,
    pub start_time: String,
    pub end_time: String,
    pub note: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl Meeting {
    pub const COLUMNS: &'static str =
        "id, title, date, location, audience, start_time, end_time, note, created_at, updated_at";
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct CreateMeetingRequest {
    #[validate(custom(function = "validate_not_blank"))]
    pub title: String,
    #[serde(deserialize_with = "deserialize_calendar_date")]
    #[validate(required(message = "date is required"))]
    pub date: Option<Date>,
    #[validate(custom(function = "validate_not_blank"))]
    pub location: String,
    #[validate(custom(function = "validate_not_blank"))]
    pub audience: String,
    #[validate(custom(function = "validate_hhmm"))]
    pub start_time: String,
    #[validate(custom(function = "validate_hhmm"))]
    pub end_time: String,
    pub note: Option<String>,
}

/// Partial update; absent fields keep their stored value. `note` may also be
/// sent as `null` to clear it.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct UpdateMeetingRequest {
    #[validate(custom(function = "validate_not_blank"))]
    pub title: Option<String>,
    #[serde(deserialize_with = "deserialize_calendar_date")]
    pub date: Option<Date>,
    #[validate(custom(function = "validate_not_blank"))]
    pub location: Option<String>,
    #[validate(custom(function = "validate_not_blank"))]
    pub audience: Option<String>,
    #[validate(custom(function = "validate_hhmm"))]
    pub start_time: Option<String>,
    #[validate(custom(function = "validate_hhmm"))]
    pub end_time: Option<String>,
    #[serde(deserialize_with = "deserialize_present")]
    pub note: Option<Option<String>>,
}
