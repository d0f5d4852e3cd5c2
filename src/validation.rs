//! Integrity checks for board data.
//!
//! The grid never rejects data it is given: it draws what the store
//! returns. These checks report what is wrong so it can be logged or shown.
//! Detects:
//! - Duplicate IDs
//! - Entries referencing unknown bays or projects
//! - Entries that end before they start
//! - Negative or non-finite hour estimates
//! - Bays without capacity
//! - Entries on a row the bay does not have

use std::collections::HashSet;

use crate::capacity::daily_capacity;
use crate::models::{Bay, Project, ScheduleEntry};

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two records of the same type share an ID.
    DuplicateId,
    /// An entry references a bay that isn't in the registry.
    UnknownBay,
    /// An entry references a project that isn't in the registry.
    UnknownProject,
    /// An entry's end date is before its start date.
    InvertedDates,
    /// An hour estimate is negative or not a number.
    InvalidHours,
    /// A bay has no staffed hours.
    NoCapacity,
    /// An entry sits on a row beyond the bay's row count.
    RowOutOfRange,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates bays, projects and schedule entries together.
///
/// `default_row_count` is the row count assumed for bays whose registry
/// record carries none.
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_board(
    bays: &[Bay],
    projects: &[Project],
    entries: &[ScheduleEntry],
    default_row_count: u32,
) -> ValidationResult {
    let mut errors = Vec::new();

    let mut bay_ids = HashSet::new();
    for bay in bays {
        if !bay_ids.insert(bay.id) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate bay ID: {}", bay.id),
            ));
        }
        if daily_capacity(bay) <= 0.0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::NoCapacity,
                format!("Bay '{}' has no staffed hours", bay.display_name()),
            ));
        }
    }

    let mut project_ids = HashSet::new();
    for project in projects {
        if !project_ids.insert(project.id) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate project ID: {}", project.id),
            ));
        }
        if !project.total_hours.is_finite() || project.total_hours < 0.0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidHours,
                format!("Project {} has invalid hours {}", project.id, project.total_hours),
            ));
        }
    }

    let mut entry_ids = HashSet::new();
    for entry in entries {
        if !entry_ids.insert(entry.id) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate schedule entry ID: {}", entry.id),
            ));
        }

        match bays.iter().find(|b| b.id == entry.bay_id) {
            None => errors.push(ValidationError::new(
                ValidationErrorKind::UnknownBay,
                format!("Entry {} references unknown bay {}", entry.id, entry.bay_id),
            )),
            Some(bay) if entry.row >= bay.rows_or(default_row_count) => {
                errors.push(ValidationError::new(
                    ValidationErrorKind::RowOutOfRange,
                    format!(
                        "Entry {} is on row {} but bay {} has {} rows",
                        entry.id,
                        entry.row,
                        bay.id,
                        bay.rows_or(default_row_count)
                    ),
                ))
            }
            Some(_) => {}
        }

        if !project_ids.contains(&entry.project_id) {
            errors.push(ValidationError::new(
                ValidationErrorKind::UnknownProject,
                format!(
                    "Entry {} references unknown project {}",
                    entry.id, entry.project_id
                ),
            ));
        }

        if !entry.is_ordered() {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvertedDates,
                format!(
                    "Entry {} ends {} before it starts {}",
                    entry.id, entry.end_date, entry.start_date
                ),
            ));
        }

        if !entry.total_hours.is_finite() || entry.total_hours < 0.0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidHours,
                format!("Entry {} has invalid hours {}", entry.id, entry.total_hours),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
