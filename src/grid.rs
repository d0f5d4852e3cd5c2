//! The bay schedule grid.
//!
//! Holds a snapshot of bays, projects and schedule entries, the visible
//! range, and the drag session, and turns them into a [`GridView`] a
//! renderer can draw without further arithmetic.
//!
//! # Writes
//!
//! A drop, resize or row removal is staged as a [`PendingWrite`]. The bar
//! immediately shows its new position (state `Dropped`). The write is sent
//! with [`persist`], which does not borrow the grid, so further drags can
//! start while it is in flight. [`BayScheduleGrid::settle`] applies the
//! outcome and returns the toast to show:
//!
//! - success: the stored entry replaces the snapshot copy, the bar goes idle
//! - failure: the bar keeps its optimistic position until the next
//!   [`BayScheduleGrid::refresh`] or [`BayScheduleGrid::load`], which
//!   replaces everything with store truth
//!
//! There is no retry, no rollback and no locking; the store is
//! last-write-wins.

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::HashMap;
use tracing::{debug, info, warn};

use crate::capacity::bay_utilization;
use crate::config::GridConfig;
use crate::drag::{self, DragPayload, DragSession, DropTarget, ResizeEdge};
use crate::error::{GridError, GridResult};
use crate::layout::{self, BarLayout, BarState, RowGeometry};
use crate::models::{
    Bay, BayId, DateRange, EntryId, Granularity, Project, ProjectId, Schedule, ScheduleEntry,
    ScheduleMutation, TimeSlot, Timeline,
};
use crate::notify::Notification;
use crate::rows::{self, RowDisposition, RowRemoval};
use crate::store::{ScheduleStore, StoreResult};
use crate::validation::validate_board;

/// Whether the user may edit the schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ViewMode {
    #[default]
    Edit,
    ReadOnly,
}

/// A staged write, not yet sent.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingWrite {
    pub ticket: u64,
    pub mutation: ScheduleMutation,
}

/// The store's answer to a [`PendingWrite`].
#[derive(Debug)]
pub struct WriteOutcome {
    pub ticket: u64,
    pub mutation: ScheduleMutation,
    pub result: StoreResult<Option<ScheduleEntry>>,
}

/// Next step after asking to remove a row.
#[derive(Debug, Clone, PartialEq)]
pub enum RowRemovalStep {
    /// The row is gone; persist these shifts.
    Removed(Vec<PendingWrite>),
    /// The row holds entries; call [`BayScheduleGrid::confirm_row_removal`].
    NeedsConfirmation { entries: Vec<EntryId> },
}

/// One bay row as drawn.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BayRowView {
    pub bay_id: BayId,
    pub label: String,
    pub row_count: u32,
    pub row_height: f64,
    /// Booked hours over available hours in the visible range.
    pub utilization: f64,
    pub bars: Vec<BarLayout>,
}

/// An unassigned project card, ready to be dragged.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectCard {
    pub project_id: ProjectId,
    pub label: String,
    pub total_hours: f64,
    pub color: &'static str,
}

/// Everything needed to draw the grid.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GridView {
    pub mode: ViewMode,
    pub granularity: Granularity,
    pub range: DateRange,
    pub slots: Vec<TimeSlot>,
    pub total_width: f64,
    pub cell_height: f64,
    pub bays: Vec<BayRowView>,
    /// Bars whose bay is not in the registry.
    pub orphaned: Vec<BarLayout>,
    pub drop_target: Option<DropTarget>,
    pub unassigned: Vec<ProjectCard>,
}

/// Sends a staged write to the store.
pub async fn persist<S>(store: &S, pending: PendingWrite) -> WriteOutcome
where
    S: ScheduleStore + ?Sized,
{
    let result = store.apply(&pending.mutation).await;
    WriteOutcome {
        ticket: pending.ticket,
        mutation: pending.mutation,
        result,
    }
}

/// Bay scheduling grid state.
#[derive(Debug)]
pub struct BayScheduleGrid {
    config: GridConfig,
    mode: ViewMode,
    range: DateRange,
    granularity: Granularity,
    bays: Vec<Bay>,
    projects: Vec<Project>,
    schedule: Schedule,
    row_overrides: HashMap<BayId, u32>,
    session: DragSession,
    placements: Vec<PendingWrite>,
    next_ticket: u64,
}

impl BayScheduleGrid {
    /// Creates an empty grid.
    pub fn new(config: GridConfig, range: DateRange, granularity: Granularity) -> Self {
        Self {
            config,
            mode: ViewMode::Edit,
            range,
            granularity,
            bays: Vec::new(),
            projects: Vec::new(),
            schedule: Schedule::new(),
            row_overrides: HashMap::new(),
            session: DragSession::new(),
            placements: Vec::new(),
            next_ticket: 1,
        }
    }

    /// Sets the view mode.
    pub fn with_mode(mut self, mode: ViewMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    /// Switches view mode. Entering read-only ends any drag.
    pub fn set_mode(&mut self, mode: ViewMode) {
        if mode == ViewMode::ReadOnly {
            self.session.cancel();
        }
        self.mode = mode;
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    pub fn range(&self) -> DateRange {
        self.range
    }

    pub fn granularity(&self) -> Granularity {
        self.granularity
    }

    pub fn bays(&self) -> &[Bay] {
        &self.bays
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    pub fn session(&self) -> &DragSession {
        &self.session
    }

    /// Staged writes whose bars still show an optimistic position.
    pub fn pending(&self) -> &[PendingWrite] {
        &self.placements
    }

    // ==================== Data ====================

    /// Replaces all data and drops every optimistic position.
    ///
    /// Rows appended or removed since the last load are forgotten; row
    /// counts come from the bay registry again.
    pub fn load(&mut self, bays: Vec<Bay>, projects: Vec<Project>, entries: Vec<ScheduleEntry>) {
        let default_rows = self.config.rows.default_row_count;
        if let Err(issues) = validate_board(&bays, &projects, &entries, default_rows) {
            for issue in &issues {
                warn!(kind = ?issue.kind, "{}", issue.message);
            }
        }
        info!(
            bays = bays.len(),
            projects = projects.len(),
            entries = entries.len(),
            "schedule data loaded"
        );
        self.bays = bays;
        self.projects = projects;
        self.schedule = Schedule::from_entries(entries);
        self.placements.clear();
        self.row_overrides.clear();
    }

    /// Re-reads everything from the store.
    ///
    /// Cached schedule reads are dropped first so the snapshot reflects the
    /// store as it is now. On error the current snapshot is kept.
    pub async fn refresh<S>(&mut self, store: &S) -> GridResult<()>
    where
        S: ScheduleStore + ?Sized,
    {
        store.invalidate_reads().await;
        let bays = store.list_bays().await?;
        let projects = store.list_projects().await?;
        let entries = store.list_schedules().await?;
        self.load(bays, projects, entries);
        Ok(())
    }

    fn bay(&self, bay_id: BayId) -> GridResult<&Bay> {
        self.bays
            .iter()
            .find(|b| b.id == bay_id)
            .ok_or(GridError::UnknownBay(bay_id))
    }

    fn project_label(&self, project_id: ProjectId) -> String {
        self.projects
            .iter()
            .find(|p| p.id == project_id)
            .map(Project::label)
            .unwrap_or_else(|| format!("Project {project_id}"))
    }

    // ==================== Timeline ====================

    pub fn set_range(&mut self, range: DateRange) {
        self.range = range;
    }

    pub fn set_granularity(&mut self, granularity: Granularity) {
        self.granularity = granularity;
    }

    /// Scrolls the visible range by whole slots.
    pub fn navigate(&mut self, steps: i32) {
        self.range = self.range.shift(self.granularity, steps);
    }

    /// Centers the visible range on `date`, showing `slots` columns.
    pub fn center_on(&mut self, date: NaiveDate, slots: u32) {
        self.range = DateRange::centered_on(date, self.granularity, slots);
    }

    /// Slots for the current range and granularity.
    pub fn timeline(&self) -> Timeline {
        Timeline::generate(
            self.range,
            self.granularity,
            &self.config.timeline.slot_widths(),
        )
    }

    // ==================== Rows ====================

    /// Number of sub-rows drawn for a bay.
    pub fn row_count(&self, bay_id: BayId) -> u32 {
        if let Some(count) = self.row_overrides.get(&bay_id) {
            return *count;
        }
        let default_rows = self.config.rows.default_row_count;
        self.bays
            .iter()
            .find(|b| b.id == bay_id)
            .map(|b| b.rows_or(default_rows))
            .unwrap_or(default_rows)
            .max(1)
    }

    /// Vertical geometry of a bay cell.
    pub fn geometry(&self, bay_id: BayId) -> RowGeometry {
        RowGeometry::new(self.config.rows.cell_height, self.row_count(bay_id))
    }

    /// Adds a sub-row at the bottom of a bay. Returns the new row count.
    pub fn append_row(&mut self, bay_id: BayId) -> GridResult<u32> {
        self.ensure_editable()?;
        self.bay(bay_id)?;
        let count = self.row_count(bay_id) + 1;
        self.row_overrides.insert(bay_id, count);
        debug!(bay_id, rows = count, "row appended");
        Ok(count)
    }

    /// Asks to remove a sub-row.
    ///
    /// An empty row is removed at once. A row holding entries is left in
    /// place until the removal is confirmed.
    pub fn remove_row(&mut self, bay_id: BayId, row: u32) -> GridResult<RowRemovalStep> {
        self.ensure_editable()?;
        self.bay(bay_id)?;
        let count = self.row_count(bay_id);
        let schedule = self.effective_schedule();

        match rows::plan_removal(&schedule, bay_id, row, count)? {
            RowRemoval::Ready { mutations } => {
                self.row_overrides.insert(bay_id, count - 1);
                debug!(bay_id, row, rows = count - 1, "row removed");
                Ok(RowRemovalStep::Removed(self.stage_all(mutations)))
            }
            RowRemoval::NeedsConfirmation { entries } => {
                debug!(bay_id, row, occupied = entries.len(), "row removal needs confirmation");
                Ok(RowRemovalStep::NeedsConfirmation { entries })
            }
        }
    }

    /// Removes a non-empty sub-row, relocating or deleting its entries.
    pub fn confirm_row_removal(
        &mut self,
        bay_id: BayId,
        row: u32,
        disposition: RowDisposition,
    ) -> GridResult<Vec<PendingWrite>> {
        self.ensure_editable()?;
        self.bay(bay_id)?;
        let count = self.row_count(bay_id);
        let schedule = self.effective_schedule();

        let mutations = rows::confirm_removal(&schedule, bay_id, row, count, disposition)?;
        self.row_overrides.insert(bay_id, count - 1);
        info!(bay_id, row, ?disposition, writes = mutations.len(), "row removal confirmed");
        Ok(self.stage_all(mutations))
    }

    // ==================== Drag & drop ====================

    fn ensure_editable(&self) -> GridResult<()> {
        match self.mode {
            ViewMode::Edit => Ok(()),
            ViewMode::ReadOnly => Err(GridError::ReadOnly),
        }
    }

    /// Pointer-down on an existing bar.
    pub fn begin_drag_entry(&mut self, entry_id: EntryId) -> GridResult<()> {
        self.ensure_editable()?;
        let schedule = self.effective_schedule();
        let entry = schedule
            .entry(entry_id)
            .ok_or(GridError::UnknownEntry(entry_id))?;
        self.session.begin(DragPayload::existing(entry));
        Ok(())
    }

    /// Pointer-down on an unassigned project card.
    pub fn begin_drag_project(&mut self, project_id: ProjectId) -> GridResult<()> {
        self.ensure_editable()?;
        let project = self
            .projects
            .iter()
            .find(|p| p.id == project_id)
            .ok_or(GridError::UnknownProject(project_id))?;
        self.session.begin(DragPayload::new_project(project));
        Ok(())
    }

    /// Starts a drag from a payload read off a platform drag transfer.
    pub fn begin_drag(&mut self, payload: DragPayload) -> GridResult<()> {
        self.ensure_editable()?;
        self.session.begin(payload);
        Ok(())
    }

    /// Pointer-over a cell. Highlight only; returns whether it changed.
    pub fn drag_over(&mut self, target: DropTarget) -> bool {
        self.session.over(target)
    }

    /// Pointer left the grid.
    pub fn drag_leave(&mut self) {
        self.session.leave();
    }

    /// Drag ended without a drop.
    pub fn cancel_drag(&mut self) -> Option<DragPayload> {
        self.session.cancel()
    }

    /// The cell under a pointer position inside a bay's row.
    ///
    /// `x` is relative to the timeline's left edge, `relative_y` to the top
    /// of the bay cell.
    pub fn target_at(&self, bay_id: BayId, x: f64, relative_y: f64) -> GridResult<DropTarget> {
        self.bay(bay_id)?;
        let timeline = self.timeline();
        let slot = timeline.slot_at_x(x).ok_or(GridError::EmptyTimeline)?;
        let row = self.geometry(bay_id).row_at(relative_y);
        Ok(DropTarget::new(bay_id, slot.date, row))
    }

    /// Pointer-release on a cell.
    ///
    /// Ends the drag, computes the end date from the target bay's capacity,
    /// and stages the resulting create or update.
    pub fn drop_on(&mut self, target: DropTarget) -> GridResult<PendingWrite> {
        self.ensure_editable()?;
        let payload = self.session.drop().ok_or(GridError::NotDragging)?;

        let geometry = self.geometry(target.bay_id);
        let target = DropTarget {
            row: geometry.clamp_row(target.row),
            ..target
        };
        let bay = self.bay(target.bay_id)?;
        let mutation = drag::resolve_drop(&payload, &target, bay)?;

        debug!(
            project_id = payload.project_id(),
            bay_id = target.bay_id,
            date = %target.date,
            row = target.row,
            kind = mutation.verb(),
            "drop resolved"
        );
        Ok(self.stage(mutation))
    }

    /// Drags one edge of a bar to the slot under `x`.
    ///
    /// The start edge snaps to the slot's first day, the end edge to its
    /// last day.
    pub fn resize(&mut self, entry_id: EntryId, edge: ResizeEdge, x: f64) -> GridResult<PendingWrite> {
        self.ensure_editable()?;
        let timeline = self.timeline();
        let slot = timeline.slot_at_x(x).ok_or(GridError::EmptyTimeline)?;
        let date = match edge {
            ResizeEdge::Start => slot.date,
            ResizeEdge::End => slot.end.pred_opt().unwrap_or(slot.date),
        };

        let schedule = self.effective_schedule();
        let entry = schedule
            .entry(entry_id)
            .ok_or(GridError::UnknownEntry(entry_id))?;
        let update = drag::resolve_resize(entry, edge, date);
        Ok(self.stage(ScheduleMutation::Update(update)))
    }

    // ==================== Writes ====================

    /// Stages a write and shows its result optimistically.
    pub fn stage(&mut self, mutation: ScheduleMutation) -> PendingWrite {
        let pending = PendingWrite {
            ticket: self.next_ticket,
            mutation,
        };
        self.next_ticket += 1;
        self.placements.push(pending.clone());
        pending
    }

    fn stage_all(&mut self, mutations: Vec<ScheduleMutation>) -> Vec<PendingWrite> {
        mutations.into_iter().map(|m| self.stage(m)).collect()
    }

    /// Applies a store answer and returns the toast to show.
    pub fn settle(&mut self, outcome: WriteOutcome) -> Notification {
        match outcome.result {
            Ok(stored) => {
                self.placements.retain(|p| p.ticket != outcome.ticket);
                match (&outcome.mutation, stored) {
                    (ScheduleMutation::Delete { id }, _) => {
                        self.schedule.remove(*id);
                    }
                    (_, Some(entry)) => self.schedule.upsert(entry),
                    (ScheduleMutation::Update(update), None) => {
                        if let Some(entry) =
                            self.schedule.entries.iter_mut().find(|e| e.id == update.id)
                        {
                            update.apply_to(entry);
                        }
                    }
                    (ScheduleMutation::Create(_), None) => {}
                }
                info!(
                    ticket = outcome.ticket,
                    kind = outcome.mutation.verb(),
                    entry_id = ?outcome.mutation.entry_id(),
                    "schedule write saved"
                );
                Notification::saved(&outcome.mutation)
            }
            Err(e) => {
                warn!(
                    ticket = outcome.ticket,
                    kind = outcome.mutation.verb(),
                    entry_id = ?outcome.mutation.entry_id(),
                    rejected = e.is_rejection(),
                    error = %e,
                    "schedule write failed"
                );
                Notification::failed(&outcome.mutation, &e)
            }
        }
    }

    /// Sends one staged write and settles it.
    pub async fn commit<S>(&mut self, store: &S, pending: PendingWrite) -> Notification
    where
        S: ScheduleStore + ?Sized,
    {
        let outcome = persist(store, pending).await;
        self.settle(outcome)
    }

    /// Sends staged writes in order and settles each.
    pub async fn commit_all<S>(&mut self, store: &S, pending: Vec<PendingWrite>) -> Vec<Notification>
    where
        S: ScheduleStore + ?Sized,
    {
        let mut notifications = Vec::with_capacity(pending.len());
        for write in pending {
            notifications.push(self.commit(store, write).await);
        }
        notifications
    }

    // ==================== Projection ====================

    /// Stored entries with every staged update and delete applied on top.
    ///
    /// Staged creates have no ID yet and are left out.
    fn effective_schedule(&self) -> Schedule {
        Schedule::from_entries(
            self.effective_bars()
                .into_iter()
                .filter(|(_, confirmed, _)| *confirmed)
                .map(|(entry, _, _)| entry)
                .collect(),
        )
    }

    /// Entries to draw, with whether each is confirmed and its bar state.
    fn effective_bars(&self) -> Vec<(ScheduleEntry, bool, BarState)> {
        let mut bars: Vec<(ScheduleEntry, bool, BarState)> = self
            .schedule
            .entries
            .iter()
            .map(|e| (e.clone(), true, BarState::Idle))
            .collect();

        for pending in &self.placements {
            match &pending.mutation {
                ScheduleMutation::Update(update) => {
                    if let Some((entry, _, state)) =
                        bars.iter_mut().find(|(e, confirmed, _)| *confirmed && e.id == update.id)
                    {
                        update.apply_to(entry);
                        *state = BarState::Dropped;
                    }
                }
                ScheduleMutation::Create(new_entry) => {
                    bars.push((new_entry.clone().into_entry(0), false, BarState::Dropped));
                }
                ScheduleMutation::Delete { id } => {
                    bars.retain(|(e, confirmed, _)| !(*confirmed && e.id == *id));
                }
            }
        }

        if let Some(dragged) = self.session.payload().and_then(DragPayload::entry_id) {
            for (entry, confirmed, state) in bars.iter_mut() {
                if *confirmed && entry.id == dragged && *state == BarState::Idle {
                    *state = BarState::Dragging;
                }
            }
        }
        bars
    }

    /// Projects unassigned to any bay, as drag sources.
    pub fn unassigned_projects(&self) -> Vec<ProjectCard> {
        // Staged creates count as scheduled
        let shown = Schedule::from_entries(
            self.effective_bars()
                .into_iter()
                .map(|(entry, _, _)| entry)
                .collect(),
        );
        shown
            .unassigned_projects(&self.projects)
            .into_iter()
            .map(|p| ProjectCard {
                project_id: p.id,
                label: p.label(),
                total_hours: p.total_hours,
                color: layout::color_for(p.id),
            })
            .collect()
    }

    /// Computes the full drawable projection.
    ///
    /// Pure with respect to the grid's state: calling it twice without
    /// changes in between yields identical views.
    pub fn render(&self) -> GridView {
        let timeline = self.timeline();
        let min_width = self.config.timeline.min_bar_width;
        let bars = self.effective_bars();
        let entries: Vec<ScheduleEntry> = bars.iter().map(|(e, _, _)| e.clone()).collect();

        let mut by_bay: HashMap<BayId, Vec<BarLayout>> = HashMap::new();
        let mut orphaned = Vec::new();

        for (entry, confirmed, state) in &bars {
            let known_bay = self.bays.iter().any(|b| b.id == entry.bay_id);
            let geometry = self.geometry(entry.bay_id);
            let label = self.project_label(entry.project_id);
            let Some(mut bar) = layout::layout_entry(entry, &timeline, geometry, min_width, label)
            else {
                continue;
            };
            if !confirmed {
                bar.entry_id = None;
            }
            bar.state = *state;

            if known_bay {
                by_bay.entry(entry.bay_id).or_default().push(bar);
            } else {
                warn!(entry_id = entry.id, bay_id = entry.bay_id, "entry references unknown bay");
                orphaned.push(bar);
            }
        }

        let bay_rows = self
            .bays
            .iter()
            .map(|bay| {
                let geometry = self.geometry(bay.id);
                BayRowView {
                    bay_id: bay.id,
                    label: bay.display_name(),
                    row_count: geometry.row_count,
                    row_height: geometry.row_height(),
                    utilization: bay_utilization(bay, &entries, &self.range),
                    bars: by_bay.remove(&bay.id).unwrap_or_default(),
                }
            })
            .collect::<Vec<_>>();

        debug!(
            slots = timeline.len(),
            bays = bay_rows.len(),
            orphaned = orphaned.len(),
            "grid rendered"
        );

        GridView {
            mode: self.mode,
            granularity: self.granularity,
            range: self.range,
            total_width: timeline.total_width(),
            slots: timeline.slots,
            cell_height: self.config.rows.cell_height,
            bays: bay_rows,
            orphaned,
            drop_target: self.session.drop_target(),
            unassigned: self.unassigned_projects(),
        }
    }
}
