//! Time-windowed meeting listings.
//!
//! Three views share one predicate shape: meetings dated on or after the local
//! day, optionally restricted to those whose `end_time` is still ahead of the
//! local wall clock. Results are always ordered by date, then by the `"HH:MM"`
//! start time compared byte-wise.

mod clock;

pub use clock::LocalWindow;

use std::cmp::Ordering;

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use time::Date;

use crate::{error::Result, models::meeting::Meeting};

/// Most rows the lobby display and the running-text primary tier return.
pub const LOBBY_LIMIT: i64 = 4;

/// Rows the running-text fallback returns when nothing is in progress.
pub const NEXT_MEETING_LIMIT: i64 = 1;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeetingFilter {
    /// Inclusive lower bound on the meeting date.
    pub from_date: Date,
    /// When set, only meetings with `end_time` strictly greater than this.
    pub ends_after: Option<String>,
}

impl MeetingFilter {
    /// Every meeting from the local day onwards.
    pub fn upcoming(window: &LocalWindow) -> Self {
        Self {
            from_date: window.today(),
            ends_after: None,
        }
    }

    /// Meetings from the local day onwards whose end time is still ahead of
    /// the local clock. The end-time check applies to every date, not only
    /// to today.
    pub fn not_ended(window: &LocalWindow) -> Self {
        Self {
            from_date: window.today(),
            ends_after: Some(window.time_hhmm.clone()),
        }
    }

    pub fn matches(&self, meeting: &Meeting) -> bool {
        meeting.date >= self.from_date
            && self
                .ends_after
                .as_deref()
                .map_or(true, |now| meeting.end_time.as_str() > now)
    }
}

/// Listing order: date, then start time.
pub fn chronological(a: &Meeting, b: &Meeting) -> Ordering {
    a.date
        .cmp(&b.date)
        .then_with(|| a.start_time.as_bytes().cmp(b.start_time.as_bytes()))
}

/// Anything that can answer a filtered, ordered, optionally limited meeting
/// query.
#[async_trait]
pub trait MeetingSource: Sync {
    async fn find_meetings(
        &self,
        filter: &MeetingFilter,
        limit: Option<i64>,
    ) -> Result<Vec<Meeting>>;
}

#[async_trait]
impl MeetingSource for PgPool {
    async fn find_meetings(
        &self,
        filter: &MeetingFilter,
        limit: Option<i64>,
    ) -> Result<Vec<Meeting>> {
        let mut qb = QueryBuilder::<Postgres>::new(format!(
            "SELECT {} FROM meetings WHERE date >= ",
            Meeting::COLUMNS
        ));
        qb.push_bind(filter.from_date);

        if let Some(now) = &filter.ends_after {
            qb.push(r#" AND end_time COLLATE "C" > "#);
            qb.push_bind(now.clone());
        }

        qb.push(r#" ORDER BY date, start_time COLLATE "C""#);

        if let Some(limit) = limit {
            qb.push(" LIMIT ");
            qb.push_bind(limit);
        }

        let rows = qb.build_query_as::<Meeting>().fetch_all(self).await?;
        Ok(rows)
    }
}

/// All meetings dated today or later. Unbounded.
pub async fn upcoming<S>(source: &S, window: &LocalWindow) -> Result<Vec<Meeting>>
where
    S: MeetingSource + ?Sized,
{
    source
        .find_meetings(&MeetingFilter::upcoming(window), None)
        .await
}

/// The lobby screen: up to four meetings that have not ended yet.
pub async fn lobby<S>(source: &S, window: &LocalWindow) -> Result<Vec<Meeting>>
where
    S: MeetingSource + ?Sized,
{
    source
        .find_meetings(&MeetingFilter::not_ended(window), Some(LOBBY_LIMIT))
        .await
}

/// The running-text ticker: the lobby selection, or, only when that is empty,
/// the single next meeting regardless of its time of day.
pub async fn running_text<S>(source: &S, window: &LocalWindow) -> Result<Vec<Meeting>>
where
    S: MeetingSource + ?Sized,
{
    let current = lobby(source, window).await?;
    if !current.is_empty() {
        return Ok(current);
    }

    tracing::debug!(
        "No unfinished meetings from {}, falling back to the next one",
        window.today()
    );
    source
        .find_meetings(&MeetingFilter::upcoming(window), Some(NEXT_MEETING_LIMIT))
        .await
}
