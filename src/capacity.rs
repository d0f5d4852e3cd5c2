//! Bay capacity arithmetic.
//!
//! The single place where hours are turned into days. Every drop, resize
//! and utilization figure goes through these functions.
//!
//! # Formulas
//!
//! | Quantity | Definition |
//! |----------|-----------|
//! | Daily capacity | `hours_per_person_per_week * staff_count / 5` |
//! | Days needed | `ceil(total_hours / daily_capacity)` |
//! | End date | `start + days_needed` calendar days |
//! | Utilization | booked hours / available weekday hours in a range |

use chrono::{Days, NaiveDate};
use thiserror::Error;

use crate::models::{Bay, BayId, DateRange, ScheduleEntry};

/// Working days per week used to spread weekly hours.
pub const WORKDAYS_PER_WEEK: f64 = 5.0;

/// Errors from capacity arithmetic.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CapacityError {
    #[error("bay {bay_id} has no daily capacity (staff {staff_count}, {hours_per_person} h/person/week)")]
    NoCapacity {
        bay_id: BayId,
        staff_count: u32,
        hours_per_person: f64,
    },

    #[error("invalid hour estimate: {0}")]
    InvalidHours(f64),

    #[error("end date out of calendar range ({days} days after {start})")]
    DateOverflow { start: NaiveDate, days: u64 },
}

/// Hours of work a bay absorbs per working day.
#[inline]
pub fn daily_capacity(bay: &Bay) -> f64 {
    bay.weekly_hours() / WORKDAYS_PER_WEEK
}

/// Whole days a bay needs to work through `total_hours`.
pub fn days_needed(total_hours: f64, bay: &Bay) -> Result<u64, CapacityError> {
    if !total_hours.is_finite() || total_hours < 0.0 {
        return Err(CapacityError::InvalidHours(total_hours));
    }
    let capacity = daily_capacity(bay);
    if !capacity.is_finite() || capacity <= 0.0 {
        return Err(CapacityError::NoCapacity {
            bay_id: bay.id,
            staff_count: bay.staff_count,
            hours_per_person: bay.hours_per_person_per_week,
        });
    }
    Ok((total_hours / capacity).ceil() as u64)
}

/// End date for `total_hours` of work starting on `start` in `bay`.
///
/// # Example
/// ```
/// use bay_schedule::capacity::end_date;
/// use bay_schedule::models::Bay;
/// use chrono::NaiveDate;
///
/// let bay = Bay::new(1, 1).with_staff(2).with_hours_per_person(40.0);
/// let monday = NaiveDate::from_ymd_opt(2026, 10, 12).unwrap();
/// let end = end_date(monday, 40.0, &bay).unwrap();
/// assert_eq!(end, NaiveDate::from_ymd_opt(2026, 10, 15).unwrap()); // Thursday
/// ```
pub fn end_date(start: NaiveDate, total_hours: f64, bay: &Bay) -> Result<NaiveDate, CapacityError> {
    let days = days_needed(total_hours, bay)?;
    start
        .checked_add_days(Days::new(days))
        .ok_or(CapacityError::DateOverflow { start, days })
}

/// Hours of an entry that fall inside `range`, spread evenly over its days.
pub fn hours_in_range(entry: &ScheduleEntry, range: &DateRange) -> f64 {
    if !entry.overlaps(range.start, range.end) {
        return 0.0;
    }
    let from = entry.start_date.max(range.start);
    let to = entry.end_date.min(range.end);
    let inside = ((to - from).num_days() + 1).max(1);
    entry.total_hours * inside as f64 / entry.span_days() as f64
}

/// Fraction of a bay's available hours booked within `range`.
///
/// Available hours are daily capacity times the weekdays in the range.
/// Returns 0.0 for a bay without capacity. Values above 1.0 mean the bay
/// is overbooked.
pub fn bay_utilization<'a, I>(bay: &Bay, entries: I, range: &DateRange) -> f64
where
    I: IntoIterator<Item = &'a ScheduleEntry>,
{
    let available = daily_capacity(bay) * range.weekdays() as f64;
    if available <= 0.0 {
        return 0.0;
    }
    let booked: f64 = entries
        .into_iter()
        .filter(|e| e.bay_id == bay.id)
        .map(|e| hours_in_range(e, range))
        .sum();
    booked / available
}
