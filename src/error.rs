//! Grid-level error type.

use crate::capacity::CapacityError;
use crate::models::{BayId, EntryId, ProjectId};
use crate::rows::RowError;
use crate::store::StoreError;

/// Result type for grid operations.
pub type GridResult<T> = Result<T, GridError>;

/// Errors from grid operations.
#[derive(Debug, thiserror::Error)]
pub enum GridError {
    #[error("the schedule is in read-only mode")]
    ReadOnly,

    #[error("no drag in progress")]
    NotDragging,

    #[error("unknown bay: {0}")]
    UnknownBay(BayId),

    #[error("unknown schedule entry: {0}")]
    UnknownEntry(EntryId),

    #[error("unknown project: {0}")]
    UnknownProject(ProjectId),

    #[error("timeline has no slots")]
    EmptyTimeline,

    #[error(transparent)]
    Capacity(#[from] CapacityError),

    #[error(transparent)]
    Rows(#[from] RowError),

    #[error(transparent)]
    Store(#[from] StoreError),
}
