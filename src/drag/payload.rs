//! Drag payloads and drop targets.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{BayId, EntryId, Project, ProjectId, ScheduleEntry};

/// What is being dragged.
///
/// Serialized with a `type` tag (`"existing"` / `"new"`) so it can travel
/// through a platform drag transfer as JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase", rename_all_fields = "camelCase")]
pub enum DragPayload {
    /// A bar already on the grid.
    Existing {
        entry_id: EntryId,
        project_id: ProjectId,
        total_hours: f64,
    },
    /// An unassigned project card.
    New {
        project_id: ProjectId,
        total_hours: f64,
    },
}

/// The bay/date/row cell under the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DropTarget {
    pub bay_id: BayId,
    pub date: NaiveDate,
    pub row: u32,
}

impl DragPayload {
    /// Payload for dragging an existing bar.
    pub fn existing(entry: &ScheduleEntry) -> Self {
        DragPayload::Existing {
            entry_id: entry.id,
            project_id: entry.project_id,
            total_hours: entry.total_hours,
        }
    }

    /// Payload for dragging an unassigned project card.
    pub fn new_project(project: &Project) -> Self {
        DragPayload::New {
            project_id: project.id,
            total_hours: project.total_hours,
        }
    }

    pub fn project_id(&self) -> ProjectId {
        match self {
            DragPayload::Existing { project_id, .. } | DragPayload::New { project_id, .. } => {
                *project_id
            }
        }
    }

    pub fn total_hours(&self) -> f64 {
        match self {
            DragPayload::Existing { total_hours, .. } | DragPayload::New { total_hours, .. } => {
                *total_hours
            }
        }
    }

    /// Entry being moved, for an existing bar.
    pub fn entry_id(&self) -> Option<EntryId> {
        match self {
            DragPayload::Existing { entry_id, .. } => Some(*entry_id),
            DragPayload::New { .. } => None,
        }
    }

    /// Encodes the payload for a drag transfer.
    pub fn to_transfer(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Decodes a payload read back from a drag transfer.
    pub fn from_transfer(data: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(data)
    }
}

impl DropTarget {
    pub fn new(bay_id: BayId, date: NaiveDate, row: u32) -> Self {
        Self { bay_id, date, row }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transfer_format() {
        let p = DragPayload::Existing {
            entry_id: 4,
            project_id: 9,
            total_hours: 40.0,
        };
        let json: serde_json::Value = serde_json::from_str(&p.to_transfer().unwrap()).unwrap();
        assert_eq!(json["type"], "existing");
        assert_eq!(json["entryId"], 4);
        assert_eq!(json["projectId"], 9);

        let back = DragPayload::from_transfer(r#"{"type":"new","projectId":3,"totalHours":12.5}"#).unwrap();
        assert_eq!(
            back,
            DragPayload::New {
                project_id: 3,
                total_hours: 12.5
            }
        );
    }

    #[test]
    fn test_bad_transfer_is_error() {
        assert!(DragPayload::from_transfer(r#"{"type":"teleport"}"#).is_err());
        assert!(DragPayload::from_transfer("not json").is_err());
    }

    #[test]
    fn test_accessors() {
        let project = Project::new(3).with_hours(64.0);
        let p = DragPayload::new_project(&project);
        assert_eq!(p.project_id(), 3);
        assert!((p.total_hours() - 64.0).abs() < 1e-10);
        assert_eq!(p.entry_id(), None);
    }
}
