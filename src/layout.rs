//! Bar layout: schedule entries to pixel rectangles.
//!
//! Layout is a pure function of the entries, the timeline, and the row
//! geometry. Nothing here fails: references that cannot be resolved are
//! clamped to the nearest visible slot or row so a bar never disappears
//! off-screen.
//!
//! # Horizontal
//! - `left = start_slot * slot_width`
//! - `width = max((end_slot - start_slot + 1) * slot_width, min_bar_width)`
//!
//! An end slot before the start slot collapses to a single slot.
//!
//! # Vertical
//! A bay cell of `cell_height` pixels is split into `row_count` equal
//! sub-rows; a bar on row `r` sits at `top = r * cell_height / row_count`.

use chrono::NaiveDate;
use serde::Serialize;
use tracing::warn;

use crate::models::{BayId, EntryId, ProjectId, ScheduleEntry, Timeline};

/// Minimum bar width so short entries stay visible and clickable.
pub const DEFAULT_MIN_BAR_WIDTH: f64 = 30.0;

/// Bar fill colors, picked by project.
pub const PALETTE: [&str; 10] = [
    "#2563eb", "#16a34a", "#d97706", "#dc2626", "#7c3aed", "#0891b2", "#db2777", "#65a30d",
    "#ea580c", "#4f46e5",
];

/// Vertical geometry of one bay cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RowGeometry {
    /// Pixel height of the whole bay cell.
    pub cell_height: f64,
    /// Number of equal sub-rows.
    pub row_count: u32,
}

/// Horizontal position of a bar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BarSpan {
    pub start_slot: usize,
    pub end_slot: usize,
    pub left: f64,
    pub width: f64,
    /// Whether either end was pulled into the visible slots.
    pub clamped: bool,
}

/// Visual state of a bar in the drag protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BarState {
    #[default]
    Idle,
    /// Pointer is down on the bar and its payload is attached.
    Dragging,
    /// Dropped; waiting for the store to confirm. Shows the new position.
    Dropped,
}

/// Everything a renderer needs to draw one bar.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BarLayout {
    /// `None` for a bar whose create call has not been confirmed.
    pub entry_id: Option<EntryId>,
    pub project_id: ProjectId,
    pub bay_id: BayId,
    pub row: u32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub left: f64,
    pub width: f64,
    pub top: f64,
    pub height: f64,
    pub color: &'static str,
    pub label: String,
    pub state: BarState,
}

impl RowGeometry {
    /// Creates a geometry with at least one row.
    pub fn new(cell_height: f64, row_count: u32) -> Self {
        Self {
            cell_height,
            row_count: row_count.max(1),
        }
    }

    /// Height of one sub-row.
    #[inline]
    pub fn row_height(&self) -> f64 {
        self.cell_height / f64::from(self.row_count.max(1))
    }

    /// Clamps a row index into `0..row_count`.
    #[inline]
    pub fn clamp_row(&self, row: u32) -> u32 {
        row.min(self.row_count.max(1) - 1)
    }

    /// Top offset of a sub-row (clamped).
    pub fn row_top(&self, row: u32) -> f64 {
        f64::from(self.clamp_row(row)) * self.row_height()
    }

    /// Sub-row under a vertical offset relative to the cell top.
    ///
    /// `floor(relative_y / (cell_height / row_count))`, clamped.
    pub fn row_at(&self, relative_y: f64) -> u32 {
        let row_height = self.row_height();
        if !(row_height > 0.0) || !(relative_y > 0.0) {
            return 0;
        }
        let raw = (relative_y / row_height).floor();
        if raw >= f64::from(self.row_count) {
            self.row_count - 1
        } else {
            raw as u32
        }
    }
}

/// Horizontal span for a date range on a timeline.
///
/// Returns `None` only for an empty timeline.
pub fn span_for(
    start: NaiveDate,
    end: NaiveDate,
    timeline: &Timeline,
    min_bar_width: f64,
) -> Option<BarSpan> {
    let start_slot = timeline.slot_index_for(start)?;
    let end_slot = timeline.slot_index_for(end)?.max(start_slot);
    let clamped = !timeline.covers(start) || !timeline.covers(end);

    let slots = (end_slot - start_slot + 1) as f64;
    Some(BarSpan {
        start_slot,
        end_slot,
        left: start_slot as f64 * timeline.slot_width,
        width: (slots * timeline.slot_width).max(min_bar_width),
        clamped,
    })
}

/// Palette color for a project.
pub fn color_for(project_id: ProjectId) -> &'static str {
    PALETTE[project_id.rem_euclid(PALETTE.len() as i64) as usize]
}

/// Lays out one bar.
///
/// `label` is supplied by the caller since project names live in the
/// registry, not on the entry.
pub fn layout_entry(
    entry: &ScheduleEntry,
    timeline: &Timeline,
    rows: RowGeometry,
    min_bar_width: f64,
    label: String,
) -> Option<BarLayout> {
    let span = span_for(entry.start_date, entry.end_date, timeline, min_bar_width)?;
    if span.clamped {
        warn!(
            entry_id = entry.id,
            start = %entry.start_date,
            end = %entry.end_date,
            "entry extends past visible range, clamped"
        );
    }
    if !entry.is_ordered() {
        warn!(entry_id = entry.id, "entry ends before it starts, drawn as one slot");
    }

    Some(BarLayout {
        entry_id: Some(entry.id),
        project_id: entry.project_id,
        bay_id: entry.bay_id,
        row: rows.clamp_row(entry.row),
        start_date: entry.start_date,
        end_date: entry.end_date,
        left: span.left,
        width: span.width,
        top: rows.row_top(entry.row),
        height: rows.row_height(),
        color: color_for(entry.project_id),
        label,
        state: BarState::Idle,
    })
}
