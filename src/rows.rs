//! Multi-row bays.
//!
//! A bay cell is split into equal sub-rows so several entries can share a
//! date range. Rows can be appended or removed. Removing a row shifts every
//! row below it up by one; removing a row that still holds entries needs an
//! explicit decision about those entries first.

use thiserror::Error;

use crate::models::{BayId, EntryId, Schedule, ScheduleMutation, ScheduleUpdate};

/// Errors from row operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RowError {
    #[error("bay {bay_id} has no row {row} (rows: {row_count})")]
    OutOfRange {
        bay_id: BayId,
        row: u32,
        row_count: u32,
    },

    #[error("bay {0} must keep at least one row")]
    LastRow(BayId),
}

/// Result of asking to remove a row.
#[derive(Debug, Clone, PartialEq)]
pub enum RowRemoval {
    /// The row was empty. Carries the row shifts to persist.
    Ready { mutations: Vec<ScheduleMutation> },
    /// The row holds entries; confirm with a [`RowDisposition`].
    NeedsConfirmation { entries: Vec<EntryId> },
}

/// What to do with the entries of a row being removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowDisposition {
    /// Move them to another row (numbered before the removal).
    Relocate { to_row: u32 },
    /// Delete them from the schedule.
    Delete,
}

fn check_row(bay_id: BayId, row: u32, row_count: u32) -> Result<(), RowError> {
    if row >= row_count {
        return Err(RowError::OutOfRange {
            bay_id,
            row,
            row_count,
        });
    }
    if row_count <= 1 {
        return Err(RowError::LastRow(bay_id));
    }
    Ok(())
}

/// Updates moving every entry below `removed` up by one row.
fn shift_up(schedule: &Schedule, bay_id: BayId, removed: u32) -> Vec<ScheduleMutation> {
    schedule
        .entries_for_bay(bay_id)
        .into_iter()
        .filter(|e| e.row > removed)
        .map(|e| {
            let mut update = ScheduleUpdate::from_entry(e);
            update.row = e.row - 1;
            ScheduleMutation::Update(update)
        })
        .collect()
}

/// Plans removal of `row` from a bay with `row_count` rows.
pub fn plan_removal(
    schedule: &Schedule,
    bay_id: BayId,
    row: u32,
    row_count: u32,
) -> Result<RowRemoval, RowError> {
    check_row(bay_id, row, row_count)?;

    let occupants: Vec<EntryId> = schedule
        .entries_in_row(bay_id, row)
        .into_iter()
        .map(|e| e.id)
        .collect();

    if occupants.is_empty() {
        Ok(RowRemoval::Ready {
            mutations: shift_up(schedule, bay_id, row),
        })
    } else {
        Ok(RowRemoval::NeedsConfirmation { entries: occupants })
    }
}

/// Builds the writes for a confirmed removal of a non-empty row.
///
/// Relocated entries land on `to_row` as numbered after the removal.
pub fn confirm_removal(
    schedule: &Schedule,
    bay_id: BayId,
    row: u32,
    row_count: u32,
    disposition: RowDisposition,
) -> Result<Vec<ScheduleMutation>, RowError> {
    check_row(bay_id, row, row_count)?;

    let mut mutations = Vec::new();
    for entry in schedule.entries_in_row(bay_id, row) {
        match disposition {
            RowDisposition::Relocate { to_row } => {
                if to_row >= row_count || to_row == row {
                    return Err(RowError::OutOfRange {
                        bay_id,
                        row: to_row,
                        row_count,
                    });
                }
                let mut update = ScheduleUpdate::from_entry(entry);
                update.row = if to_row > row { to_row - 1 } else { to_row };
                mutations.push(ScheduleMutation::Update(update));
            }
            RowDisposition::Delete => mutations.push(ScheduleMutation::Delete { id: entry.id }),
        }
    }
    mutations.extend(shift_up(schedule, bay_id, row));
    Ok(mutations)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ScheduleEntry;
    use chrono::NaiveDate;

    fn board(entries: Vec<ScheduleEntry>) -> Schedule {
        Schedule::from_entries(entries)
    }

    fn entry(id: i64, bay_id: i64, row: u32) -> ScheduleEntry {
        let day = NaiveDate::from_ymd_opt(2026, 10, 12).unwrap();
        ScheduleEntry::new(id, id * 10, bay_id, day, day).with_row(row)
    }

    fn rows_of(mutations: &[ScheduleMutation]) -> Vec<(i64, u32)> {
        mutations
            .iter()
            .filter_map(|m| match m {
                ScheduleMutation::Update(u) => Some((u.id, u.row)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_remove_empty_row_shifts_below() {
        let entries = board(vec![entry(1, 1, 0), entry(2, 1, 3), entry(3, 2, 3)]);
        match plan_removal(&entries, 1, 2, 5).unwrap() {
            RowRemoval::Ready { mutations } => {
                assert_eq!(rows_of(&mutations), vec![(2, 2)]); // bay 2 untouched
            }
            other => panic!("expected ready, got {other:?}"),
        }
    }

    #[test]
    fn test_remove_occupied_row_needs_confirmation() {
        let entries = board(vec![entry(1, 1, 2), entry(2, 1, 2), entry(3, 1, 0)]);
        assert_eq!(
            plan_removal(&entries, 1, 2, 5).unwrap(),
            RowRemoval::NeedsConfirmation { entries: vec![1, 2] }
        );
    }

    #[test]
    fn test_confirm_relocate() {
        let entries = board(vec![entry(1, 1, 1), entry(2, 1, 3)]);
        // Move row 1's entries to row 3; row 3 becomes row 2 after removal
        let mutations =
            confirm_removal(&entries, 1, 1, 4, RowDisposition::Relocate { to_row: 3 }).unwrap();
        assert_eq!(rows_of(&mutations), vec![(1, 2), (2, 2)]);
    }

    #[test]
    fn test_confirm_relocate_upward() {
        let entries = board(vec![entry(1, 1, 3)]);
        let mutations =
            confirm_removal(&entries, 1, 3, 4, RowDisposition::Relocate { to_row: 0 }).unwrap();
        assert_eq!(rows_of(&mutations), vec![(1, 0)]);
    }

    #[test]
    fn test_confirm_delete() {
        let entries = board(vec![entry(1, 1, 0), entry(2, 1, 1)]);
        let mutations = confirm_removal(&entries, 1, 0, 3, RowDisposition::Delete).unwrap();
        assert_eq!(mutations[0], ScheduleMutation::Delete { id: 1 });
        assert_eq!(rows_of(&mutations), vec![(2, 0)]);
    }

    #[test]
    fn test_row_errors() {
        let entries = board(vec![entry(1, 1, 0)]);
        assert_eq!(
            plan_removal(&entries, 1, 5, 3),
            Err(RowError::OutOfRange {
                bay_id: 1,
                row: 5,
                row_count: 3
            })
        );
        assert_eq!(plan_removal(&entries, 1, 0, 1), Err(RowError::LastRow(1)));
        assert!(confirm_removal(&entries, 1, 0, 3, RowDisposition::Relocate { to_row: 0 }).is_err());
    }
}
