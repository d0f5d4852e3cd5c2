//! Timeline models: visible date range, granularity, and time slots.
//!
//! A timeline is the ordered sequence of columns the grid draws bars
//! against. Slots are derived from the visible range on every render and
//! never persisted.
//!
//! # Time Model
//! Dates are calendar days (`NaiveDate`). Each slot covers the half-open
//! span `[date, end)`: it includes its first day and excludes the first day
//! of the next slot. Slots are contiguous, so every date between the first
//! slot's start and the last slot's end falls in exactly one slot.
//!
//! # Alignment
//! | Granularity | Slot starts on | Default width |
//! |-------------|----------------|---------------|
//! | Day | every day | 50 px |
//! | Week | Monday | 100 px |
//! | Month | 1st of month | 150 px |
//! | Quarter | 1st of Jan/Apr/Jul/Oct | 200 px |

use chrono::{Datelike, Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};

/// Timeline column granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Day,
    Week,
    Month,
    Quarter,
}

/// Pixel width of one slot per granularity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SlotWidths {
    pub day: f64,
    pub week: f64,
    pub month: f64,
    pub quarter: f64,
}

/// Inclusive range of visible dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    /// First visible day.
    pub start: NaiveDate,
    /// Last visible day (inclusive).
    pub end: NaiveDate,
}

/// One visual timeline column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSlot {
    /// First day covered by the slot.
    pub date: NaiveDate,
    /// First day of the next slot (exclusive end).
    pub end: NaiveDate,
    /// Column header text.
    pub label: String,
    /// Column width in pixels.
    pub width: f64,
}

/// The slot sequence for one visible range at one granularity.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Timeline {
    pub granularity: Granularity,
    pub slot_width: f64,
    pub slots: Vec<TimeSlot>,
}

impl Granularity {
    /// Aligns a date down to the start of the slot containing it.
    pub fn align(self, date: NaiveDate) -> NaiveDate {
        match self {
            Granularity::Day => date,
            Granularity::Week => {
                let back = u64::from(date.weekday().num_days_from_monday());
                date.checked_sub_days(Days::new(back)).unwrap_or(date)
            }
            Granularity::Month => date.with_day(1).unwrap_or(date),
            Granularity::Quarter => {
                let first_month = (date.month0() / 3) * 3 + 1;
                NaiveDate::from_ymd_opt(date.year(), first_month, 1).unwrap_or(date)
            }
        }
    }

    /// Start of the slot following the one that starts at `date`.
    ///
    /// Returns `None` at the end of the representable calendar.
    pub fn next(self, date: NaiveDate) -> Option<NaiveDate> {
        match self {
            Granularity::Day => date.checked_add_days(Days::new(1)),
            Granularity::Week => date.checked_add_days(Days::new(7)),
            Granularity::Month => date.checked_add_months(Months::new(1)),
            Granularity::Quarter => date.checked_add_months(Months::new(3)),
        }
    }

    /// Start of the slot preceding the one that starts at `date`.
    pub fn previous(self, date: NaiveDate) -> Option<NaiveDate> {
        match self {
            Granularity::Day => date.checked_sub_days(Days::new(1)),
            Granularity::Week => date.checked_sub_days(Days::new(7)),
            Granularity::Month => date.checked_sub_months(Months::new(1)),
            Granularity::Quarter => date.checked_sub_months(Months::new(3)),
        }
    }

    /// Column header for a slot starting at `date`.
    pub fn label(self, date: NaiveDate) -> String {
        match self {
            Granularity::Day => date.format("%a %d").to_string(),
            Granularity::Week => date.format("%b %d").to_string(),
            Granularity::Month => date.format("%b %Y").to_string(),
            Granularity::Quarter => format!("Q{} {}", date.month0() / 3 + 1, date.year()),
        }
    }
}

impl Default for SlotWidths {
    fn default() -> Self {
        Self {
            day: 50.0,
            week: 100.0,
            month: 150.0,
            quarter: 200.0,
        }
    }
}

impl SlotWidths {
    /// Width of one slot at the given granularity.
    #[inline]
    pub fn for_granularity(&self, granularity: Granularity) -> f64 {
        match granularity {
            Granularity::Day => self.day,
            Granularity::Week => self.week,
            Granularity::Month => self.month,
            Granularity::Quarter => self.quarter,
        }
    }
}

impl DateRange {
    /// Creates a range, swapping the bounds if given in reverse.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        if end < start {
            Self { start: end, end: start }
        } else {
            Self { start, end }
        }
    }

    /// Whether a date lies within the range (inclusive on both ends).
    #[inline]
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// Number of days in the range.
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    /// Number of Monday-to-Friday days in the range.
    pub fn weekdays(&self) -> i64 {
        self.start
            .iter_days()
            .take_while(|d| *d <= self.end)
            .filter(|d| d.weekday().num_days_from_monday() < 5)
            .count() as i64
    }

    /// Moves the range by `steps` slots of the given granularity.
    ///
    /// Negative steps move backward. Both bounds move by the same calendar
    /// step, so a month-aligned range stays month-aligned.
    pub fn shift(&self, granularity: Granularity, steps: i32) -> Self {
        let mut start = self.start;
        let mut end = self.end;
        for _ in 0..steps.unsigned_abs() {
            let moved = if steps > 0 {
                granularity.next(start).zip(granularity.next(end))
            } else {
                granularity.previous(start).zip(granularity.previous(end))
            };
            match moved {
                Some((s, e)) => {
                    start = s;
                    end = e;
                }
                None => break,
            }
        }
        Self { start, end }
    }

    /// A range of `slots` slots whose middle slot contains `date`.
    pub fn centered_on(date: NaiveDate, granularity: Granularity, slots: u32) -> Self {
        let slots = slots.max(1);
        let mut start = granularity.align(date);
        for _ in 0..slots / 2 {
            match granularity.previous(start) {
                Some(prev) => start = prev,
                None => break,
            }
        }
        let mut end_exclusive = start;
        for _ in 0..slots {
            match granularity.next(end_exclusive) {
                Some(next) => end_exclusive = next,
                None => break,
            }
        }
        let end = end_exclusive.pred_opt().unwrap_or(end_exclusive);
        Self::new(start, end)
    }
}

impl Timeline {
    /// Generates the slots covering `range` at `granularity`.
    ///
    /// The first slot starts at the aligned start of the range, so it may
    /// begin before `range.start`. The last slot is the one containing
    /// `range.end`.
    pub fn generate(range: DateRange, granularity: Granularity, widths: &SlotWidths) -> Self {
        let slot_width = widths.for_granularity(granularity);
        let mut slots = Vec::new();
        let mut cursor = granularity.align(range.start);

        while cursor <= range.end {
            let Some(end) = granularity.next(cursor) else {
                break;
            };
            slots.push(TimeSlot {
                date: cursor,
                end,
                label: granularity.label(cursor),
                width: slot_width,
            });
            cursor = end;
        }

        Self {
            granularity,
            slot_width,
            slots,
        }
    }

    /// Number of slots.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether the timeline has no slots.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Total pixel width of the timeline.
    pub fn total_width(&self) -> f64 {
        self.slots.len() as f64 * self.slot_width
    }

    /// Index of the slot containing `date`, clamped to the visible slots.
    ///
    /// Dates before the first slot map to 0, dates at or after the last
    /// slot's end map to the last index. Returns `None` only for an empty
    /// timeline.
    pub fn slot_index_for(&self, date: NaiveDate) -> Option<usize> {
        if self.slots.is_empty() {
            return None;
        }
        let after = self.slots.partition_point(|s| s.date <= date);
        Some(after.saturating_sub(1))
    }

    /// Whether `date` falls inside the slots without clamping.
    pub fn covers(&self, date: NaiveDate) -> bool {
        match (self.slots.first(), self.slots.last()) {
            (Some(first), Some(last)) => date >= first.date && date < last.end,
            _ => false,
        }
    }

    /// The slot under a horizontal pixel offset, clamped to the timeline.
    pub fn slot_at_x(&self, x: f64) -> Option<&TimeSlot> {
        if self.slots.is_empty() || self.slot_width <= 0.0 {
            return None;
        }
        let raw = (x / self.slot_width).floor();
        let index = if raw.is_nan() || raw < 0.0 {
            0
        } else {
            (raw as usize).min(self.slots.len() - 1)
        };
        self.slots.get(index)
    }
}
