//! Write payloads sent to the Schedule Store.
//!
//! Every change the grid makes (a drop, a resize, a row removal) is
//! expressed as one [`ScheduleMutation`]. Create and update payloads share
//! the same shape apart from the identifier.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{BayId, EntryId, ProjectId, ScheduleEntry};

/// Body of a create call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewScheduleEntry {
    pub project_id: ProjectId,
    pub bay_id: BayId,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub total_hours: f64,
    pub row: u32,
}

/// Body of an update call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleUpdate {
    pub id: EntryId,
    pub bay_id: BayId,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub total_hours: f64,
    pub row: u32,
}

/// A single write against the Schedule Store.
#[derive(Debug, Clone, PartialEq)]
pub enum ScheduleMutation {
    Create(NewScheduleEntry),
    Update(ScheduleUpdate),
    Delete { id: EntryId },
}

impl NewScheduleEntry {
    /// The entry this payload becomes once the store assigns `id`.
    pub fn into_entry(self, id: EntryId) -> ScheduleEntry {
        ScheduleEntry {
            id,
            project_id: self.project_id,
            bay_id: self.bay_id,
            start_date: self.start_date,
            end_date: self.end_date,
            total_hours: self.total_hours,
            row: self.row,
        }
    }
}

impl ScheduleUpdate {
    /// Update payload that keeps an entry where it is.
    pub fn from_entry(entry: &ScheduleEntry) -> Self {
        Self {
            id: entry.id,
            bay_id: entry.bay_id,
            start_date: entry.start_date,
            end_date: entry.end_date,
            total_hours: entry.total_hours,
            row: entry.row,
        }
    }

    /// Applies the update onto an existing entry.
    pub fn apply_to(&self, entry: &mut ScheduleEntry) {
        entry.bay_id = self.bay_id;
        entry.start_date = self.start_date;
        entry.end_date = self.end_date;
        entry.total_hours = self.total_hours;
        entry.row = self.row;
    }
}

impl ScheduleMutation {
    /// Short verb for logs and notifications.
    pub fn verb(&self) -> &'static str {
        match self {
            ScheduleMutation::Create(_) => "create",
            ScheduleMutation::Update(_) => "update",
            ScheduleMutation::Delete { .. } => "delete",
        }
    }

    /// Entry the mutation targets, if it already exists.
    pub fn entry_id(&self) -> Option<EntryId> {
        match self {
            ScheduleMutation::Create(_) => None,
            ScheduleMutation::Update(u) => Some(u.id),
            ScheduleMutation::Delete { id } => Some(*id),
        }
    }
}
