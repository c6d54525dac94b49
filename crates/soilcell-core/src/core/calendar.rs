use super::models::phase::Phase;
use super::models::schedule::{WeekendPolicy, Weekday, WorkWeek};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CalendarError {
    #[error("weekly work pattern has no operating day")]
    NoOperatingDays,

    #[error("required operating days must be positive")]
    ZeroDuration,

    #[error("phase span exceeds {} calendar days", u32::MAX)]
    Overflow,
}

/// The calendar footprint of one phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarSpan {
    /// Calendar days from the start day up to and including the last operating day.
    pub calendar_days: u32,
    /// The weekday following the last calendar day, where the next phase starts.
    pub next_start: Weekday,
}

/// Calendar days needed to accumulate `required` operating days, starting on a Monday.
pub fn operating_days_to_complete(required: u32, week: &WorkWeek) -> Result<u32, CalendarError> {
    calendar_days_from(required, week, Weekday::Monday).map(|span| span.calendar_days)
}

/// Calendar days needed to accumulate `required` operating days, starting on `start`.
///
/// Whole weeks are skipped arithmetically; only the final partial week is walked day by day,
/// so the cost is constant in `required`.
pub fn calendar_days_from(
    required: u32,
    week: &WorkWeek,
    start: Weekday,
) -> Result<CalendarSpan, CalendarError> {
    if required == 0 {
        return Err(CalendarError::ZeroDuration);
    }
    let per_week = week.operating_days_per_week();
    if per_week == 0 {
        return Err(CalendarError::NoOperatingDays);
    }

    let full_weeks = (required - 1) / per_week;
    let mut remaining = required - full_weeks * per_week;
    let mut calendar_days = full_weeks.checked_mul(7).ok_or(CalendarError::Overflow)?;
    let mut day = start;

    while remaining > 0 {
        if week.is_operating(day) {
            remaining -= 1;
        }
        calendar_days = calendar_days.checked_add(1).ok_or(CalendarError::Overflow)?;
        day = day.next();
    }

    Ok(CalendarSpan {
        calendar_days,
        next_start: day,
    })
}

/// Whether `phase` progresses on `day` under the facility's weekend policy.
#[inline]
pub fn is_operating_day(policy: &WeekendPolicy, phase: Phase, day: Weekday) -> bool {
    policy.get(phase).is_operating(day)
}
