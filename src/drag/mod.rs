//! Drag-and-drop protocol for the bay grid.
//!
//! 1. Pointer-down on a bar or an unassigned project card begins a drag
//!    carrying a [`DragPayload`].
//! 2. Pointer-over a cell marks it as the [`DropTarget`]. Visual only.
//! 3. Pointer-release resolves the drop into a [`ScheduleMutation`]: the
//!    end date comes from the target bay's capacity, an existing bar turns
//!    into an update and a project card into a create.
//!
//! Resizing a bar by one of its edges is resolved here as well; it keeps
//! the booked hours and only moves the dragged edge.

mod payload;
mod session;

pub use payload::{DragPayload, DropTarget};
pub use session::{DragSession, DragState};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::capacity::{self, CapacityError};
use crate::models::{Bay, NewScheduleEntry, ScheduleEntry, ScheduleMutation, ScheduleUpdate};

/// Which edge of a bar is being dragged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResizeEdge {
    Start,
    End,
}

/// Turns a drop into the write to send.
///
/// `bay` must be the bay named by `target`; its capacity sets the end date.
pub fn resolve_drop(
    payload: &DragPayload,
    target: &DropTarget,
    bay: &Bay,
) -> Result<ScheduleMutation, CapacityError> {
    let total_hours = payload.total_hours();
    let end_date = capacity::end_date(target.date, total_hours, bay)?;

    let mutation = match payload {
        DragPayload::Existing { entry_id, .. } => ScheduleMutation::Update(ScheduleUpdate {
            id: *entry_id,
            bay_id: target.bay_id,
            start_date: target.date,
            end_date,
            total_hours,
            row: target.row,
        }),
        DragPayload::New { project_id, .. } => ScheduleMutation::Create(NewScheduleEntry {
            project_id: *project_id,
            bay_id: target.bay_id,
            start_date: target.date,
            end_date,
            total_hours,
            row: target.row,
        }),
    };
    Ok(mutation)
}

/// Moves one edge of a bar to `date`.
///
/// The opposite edge stays put; an edge dragged past it is stopped on the
/// same day, so the result never ends before it starts.
pub fn resolve_resize(entry: &ScheduleEntry, edge: ResizeEdge, date: NaiveDate) -> ScheduleUpdate {
    let mut update = ScheduleUpdate::from_entry(entry);
    match edge {
        ResizeEdge::Start => update.start_date = date.min(entry.end_date),
        ResizeEdge::End => update.end_date = date.max(entry.start_date),
    }
    update
}
