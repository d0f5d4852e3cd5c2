//! Pointer drag session.
//!
//! Tracks the single drag the user's pointer can hold at a time. Persisting
//! a drop is not part of the session: once `drop` hands back the payload
//! the session is idle again, so a new drag can start while the previous
//! write is still in flight.

use tracing::debug;

use super::{DragPayload, DropTarget};

/// Current pointer drag state.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging {
        payload: DragPayload,
        /// Highlighted cell, if the pointer is over one.
        over: Option<DropTarget>,
    },
}

/// Drag bookkeeping for one grid.
#[derive(Debug, Clone, Default)]
pub struct DragSession {
    state: DragState,
}

impl DragSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    /// Payload of the drag in progress.
    pub fn payload(&self) -> Option<&DragPayload> {
        match &self.state {
            DragState::Dragging { payload, .. } => Some(payload),
            DragState::Idle => None,
        }
    }

    /// Highlighted drop target.
    pub fn drop_target(&self) -> Option<DropTarget> {
        match &self.state {
            DragState::Dragging { over, .. } => *over,
            DragState::Idle => None,
        }
    }

    /// Starts a drag. A drag already in progress is abandoned.
    ///
    /// Returns the abandoned payload, if any.
    pub fn begin(&mut self, payload: DragPayload) -> Option<DragPayload> {
        debug!(?payload, "drag started");
        let previous = self.cancel();
        self.state = DragState::Dragging {
            payload,
            over: None,
        };
        previous
    }

    /// Marks `target` as the highlighted cell.
    ///
    /// Returns `true` if the highlight changed. Ignored when idle.
    pub fn over(&mut self, target: DropTarget) -> bool {
        match &mut self.state {
            DragState::Dragging { over, .. } if *over != Some(target) => {
                *over = Some(target);
                true
            }
            _ => false,
        }
    }

    /// Clears the highlight when the pointer leaves the grid.
    pub fn leave(&mut self) {
        if let DragState::Dragging { over, .. } = &mut self.state {
            *over = None;
        }
    }

    /// Ends the drag without a drop.
    pub fn cancel(&mut self) -> Option<DragPayload> {
        match std::mem::take(&mut self.state) {
            DragState::Dragging { payload, .. } => {
                debug!(?payload, "drag cancelled");
                Some(payload)
            }
            DragState::Idle => None,
        }
    }

    /// Ends the drag with a drop, handing back the payload.
    ///
    /// Returns `None` if no drag was in progress.
    pub fn drop(&mut self) -> Option<DragPayload> {
        match std::mem::take(&mut self.state) {
            DragState::Dragging { payload, .. } => Some(payload),
            DragState::Idle => None,
        }
    }
}
