//! Bay model.
//!
//! A bay is a manufacturing work cell. Its staffing level and weekly hours
//! per person define how many hours of work it absorbs per day, which turns
//! a project's hour estimate into a schedule length.
//!
//! Bays come from a read-only registry. The only locally mutable property
//! is the number of sub-rows the grid draws for the bay.

use serde::{Deserialize, Serialize};

use super::BayId;

/// Default number of sub-rows drawn for a bay.
pub const DEFAULT_ROW_COUNT: u32 = 20;

/// A manufacturing bay with its capacity descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bay {
    /// Unique bay identifier.
    pub id: BayId,
    /// Floor number shown in row headers.
    pub bay_number: i32,
    /// Human-readable name.
    #[serde(default)]
    pub name: String,
    /// Number of people staffed on the bay.
    #[serde(default)]
    pub staff_count: u32,
    /// Working hours per person per week.
    #[serde(default)]
    pub hours_per_person_per_week: f64,
    /// Number of equal-height sub-rows. `None` leaves it to the grid's
    /// configured default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row_count: Option<u32>,
}

impl Bay {
    /// Creates an unstaffed bay.
    pub fn new(id: BayId, bay_number: i32) -> Self {
        Self {
            id,
            bay_number,
            name: String::new(),
            staff_count: 0,
            hours_per_person_per_week: 0.0,
            row_count: None,
        }
    }

    /// Sets the bay name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the staffing level.
    pub fn with_staff(mut self, staff_count: u32) -> Self {
        self.staff_count = staff_count;
        self
    }

    /// Sets the weekly hours per person.
    pub fn with_hours_per_person(mut self, hours: f64) -> Self {
        self.hours_per_person_per_week = hours;
        self
    }

    /// Sets the number of sub-rows (at least one).
    pub fn with_rows(mut self, row_count: u32) -> Self {
        self.row_count = Some(row_count.max(1));
        self
    }

    /// Sub-row count, falling back to [`DEFAULT_ROW_COUNT`].
    #[inline]
    pub fn rows(&self) -> u32 {
        self.rows_or(DEFAULT_ROW_COUNT)
    }

    /// Sub-row count, falling back to `default` when the registry has none.
    #[inline]
    pub fn rows_or(&self, default: u32) -> u32 {
        self.row_count.unwrap_or(default).max(1)
    }

    /// Total staffed hours per week.
    #[inline]
    pub fn weekly_hours(&self) -> f64 {
        self.hours_per_person_per_week * f64::from(self.staff_count)
    }

    /// Row header text, e.g. `"Bay 3 - Final Assembly"`.
    pub fn display_name(&self) -> String {
        if self.name.is_empty() {
            format!("Bay {}", self.bay_number)
        } else {
            format!("Bay {} - {}", self.bay_number, self.name)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bay_builder() {
        let b = Bay::new(7, 3)
            .with_name("Final Assembly")
            .with_staff(2)
            .with_hours_per_person(40.0)
            .with_rows(4);

        assert_eq!(b.id, 7);
        assert_eq!(b.bay_number, 3);
        assert_eq!(b.staff_count, 2);
        assert_eq!(b.rows(), 4);
        assert!((b.weekly_hours() - 80.0).abs() < 1e-10);
        assert_eq!(b.display_name(), "Bay 3 - Final Assembly");
    }

    #[test]
    fn test_bay_defaults() {
        let b = Bay::new(1, 1);
        assert_eq!(b.row_count, None);
        assert_eq!(b.rows(), DEFAULT_ROW_COUNT);
        assert_eq!(b.display_name(), "Bay 1");
        assert_eq!(Bay::new(1, 1).with_rows(0).rows(), 1);
        assert_eq!(b.rows_or(8), 8);
        assert_eq!(Bay::new(1, 1).with_rows(3).rows_or(8), 3);
    }

    #[test]
    fn test_bay_deserialize_camel_case() {
        let json = r#"{"id":4,"bayNumber":2,"name":"Paint","staffCount":3,"hoursPerPersonPerWeek":32.5}"#;
        let b: Bay = serde_json::from_str(json).unwrap();
        assert_eq!(b.staff_count, 3);
        assert!((b.hours_per_person_per_week - 32.5).abs() < 1e-10);
        assert_eq!(b.row_count, None);
    }
}
