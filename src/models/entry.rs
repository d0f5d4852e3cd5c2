//! Schedule entry model.
//!
//! A schedule entry assigns one project to one bay for a span of days.
//! Entries are owned by the Schedule Store; the grid keeps a snapshot and
//! re-derives all geometry from it.
//!
//! # Invariants
//! `start_date <= end_date` is expected but not enforced. Overlapping
//! entries within a bay are allowed; they stack in different sub-rows or
//! draw over each other.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{BayId, EntryId, Project, ProjectId};

/// Assignment of a project to a bay over a date range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleEntry {
    /// Store-assigned identifier.
    pub id: EntryId,
    /// Scheduled project.
    pub project_id: ProjectId,
    /// Bay the project occupies.
    pub bay_id: BayId,
    /// First scheduled day.
    pub start_date: NaiveDate,
    /// Last scheduled day.
    pub end_date: NaiveDate,
    /// Hours of work booked by this entry.
    #[serde(default)]
    pub total_hours: f64,
    /// Sub-row within the bay (0 = top).
    #[serde(default)]
    pub row: u32,
}

/// Snapshot of all schedule entries known to the grid.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    pub entries: Vec<ScheduleEntry>,
}

impl ScheduleEntry {
    /// Creates an entry on row 0.
    pub fn new(
        id: EntryId,
        project_id: ProjectId,
        bay_id: BayId,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Self {
        Self {
            id,
            project_id,
            bay_id,
            start_date,
            end_date,
            total_hours: 0.0,
            row: 0,
        }
    }

    /// Sets the booked hours.
    pub fn with_hours(mut self, total_hours: f64) -> Self {
        self.total_hours = total_hours;
        self
    }

    /// Sets the sub-row.
    pub fn with_row(mut self, row: u32) -> Self {
        self.row = row;
        self
    }

    /// Whether the dates are in order.
    #[inline]
    pub fn is_ordered(&self) -> bool {
        self.start_date <= self.end_date
    }

    /// Number of calendar days covered (at least 1).
    pub fn span_days(&self) -> i64 {
        ((self.end_date - self.start_date).num_days() + 1).max(1)
    }

    /// Whether the entry shares at least one day with `[from, to]`.
    pub fn overlaps(&self, from: NaiveDate, to: NaiveDate) -> bool {
        self.start_date <= to && from <= self.end_date
    }
}

impl Schedule {
    /// Creates an empty schedule.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps an entry list.
    pub fn from_entries(entries: Vec<ScheduleEntry>) -> Self {
        Self { entries }
    }

    /// Replaces the entry with the same ID, or appends it.
    pub fn upsert(&mut self, entry: ScheduleEntry) {
        match self.entries.iter_mut().find(|e| e.id == entry.id) {
            Some(existing) => *existing = entry,
            None => self.entries.push(entry),
        }
    }

    /// Removes an entry, returning it if present.
    pub fn remove(&mut self, id: EntryId) -> Option<ScheduleEntry> {
        let index = self.entries.iter().position(|e| e.id == id)?;
        Some(self.entries.remove(index))
    }

    /// Finds an entry by ID.
    pub fn entry(&self, id: EntryId) -> Option<&ScheduleEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Returns all entries in a bay.
    pub fn entries_for_bay(&self, bay_id: BayId) -> Vec<&ScheduleEntry> {
        self.entries.iter().filter(|e| e.bay_id == bay_id).collect()
    }

    /// Returns all entries in one sub-row of a bay.
    pub fn entries_in_row(&self, bay_id: BayId, row: u32) -> Vec<&ScheduleEntry> {
        self.entries
            .iter()
            .filter(|e| e.bay_id == bay_id && e.row == row)
            .collect()
    }

    /// Projects with no entry in any bay.
    pub fn unassigned_projects<'a>(&self, projects: &'a [Project]) -> Vec<&'a Project> {
        projects
            .iter()
            .filter(|p| self.entries.iter().all(|e| e.project_id != p.id))
            .collect()
    }

    /// Number of entries.
    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }
}
