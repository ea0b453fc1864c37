use std::borrow::Cow;

use serde::{Deserialize, Deserializer};
use time::{
    format_description::well_known::Rfc3339, macros::format_description, Date, OffsetDateTime,
    Time, UtcOffset,
};
use validator::ValidationError;

/// Validator for `"HH:MM"` time-of-day fields (24h clock, zero padded).
///
/// Stored times are compared as strings by the lobby listings, so anything
/// that is not exactly five characters of this shape is rejected.
pub fn validate_hhmm(value: &str) -> Result<(), ValidationError> {
    let well_formed = value.len() == 5
        && Time::parse(value, format_description!("[hour]:[minute]")).is_ok();
    if well_formed {
        return Ok(());
    }
    let mut err = ValidationError::new("hhmm");
    err.message = Some(Cow::Borrowed("must be a time of day formatted as HH:MM"));
    Err(err)
}

/// Validator for required text: rejects empty and whitespace-only values.
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if !value.trim().is_empty() {
        return Ok(());
    }
    let mut err = ValidationError::new("blank");
    err.message = Some(Cow::Borrowed("must not be blank"));
    Err(err)
}

/// Parse a calendar day from either `YYYY-MM-DD` or a full RFC 3339
/// timestamp. Timestamps are reduced to their UTC calendar date.
pub fn parse_calendar_date(value: &str) -> Result<Date, String> {
    if let Ok(d) = Date::parse(value, format_description!("[year]-[month]-[day]")) {
        return Ok(d);
    }
    OffsetDateTime::parse(value, &Rfc3339)
        .map(|dt| dt.to_offset(UtcOffset::UTC).date())
        .map_err(|_| format!("invalid date `{}`, expected YYYY-MM-DD", value))
}

/// serde `deserialize_with` helper for optional calendar dates.
pub fn deserialize_calendar_date<'de, D>(deserializer: D) -> Result<Option<Date>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    raw.map(|s| parse_calendar_date(&s).map_err(serde::de::Error::custom))
        .transpose()
}

/// serde `deserialize_with` helper that tells an explicit `null` apart from
/// an absent field. Pair with `#[serde(default)]`: absent gives `None`,
/// `null` gives `Some(None)`.
pub fn deserialize_present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
