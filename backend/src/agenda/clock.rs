use time::{Date, OffsetDateTime, Time, UtcOffset};

/// "Today" as seen from a fixed civil offset.
///
/// The host clock is always read as UTC before the offset is applied, so a
/// server running in a non-UTC zone computes the same window as one in UTC.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalWindow {
    /// Midnight at the start of the local calendar day, in `offset`.
    pub day_start: OffsetDateTime,
    /// Local wall-clock time, `"HH:MM"`, zero padded.
    pub time_hhmm: String,
}

impl LocalWindow {
    pub fn now(offset: UtcOffset) -> Self {
        Self::at(OffsetDateTime::now_utc(), offset)
    }

    pub fn at(instant: OffsetDateTime, offset: UtcOffset) -> Self {
        let local = instant.to_offset(offset);
        Self {
            day_start: local.replace_time(Time::MIDNIGHT),
            time_hhmm: format!("{:02}:{:02}", local.hour(), local.minute()),
        }
    }

    /// The local calendar day; meetings dated on or after it are upcoming.
    pub fn today(&self) -> Date {
        self.day_start.date()
    }
}
