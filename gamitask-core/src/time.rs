//! Time utilities: timezone-aware calendar days.
//!
//! Streaks and due dates work on calendar days, so "today" depends on an
//! IANA timezone rather than UTC.

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;

use crate::task::Task;

/// Project a UTC instant onto the calendar day of the given timezone.
pub fn local_date(now: DateTime<Utc>, tz: Tz) -> NaiveDate {
    now.with_timezone(&tz).date_naive()
}

/// A due date is a calendar date treated as end-of-day: a task becomes
/// overdue only once the local day is strictly past it. Completed tasks are
/// never overdue.
pub fn is_overdue(task: &Task, now: DateTime<Utc>, tz: Tz) -> bool {
    match task.due_date {
        Some(due) if !task.completed => local_date(now, tz) > due,
        _ => false,
    }
}

/// True when completing at `now` still counts as within the due date.
pub fn on_time(due: NaiveDate, now: DateTime<Utc>, tz: Tz) -> bool {
    local_date(now, tz) <= due
}
