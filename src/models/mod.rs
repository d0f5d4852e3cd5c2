//! Bay scheduling domain models.
//!
//! Provides the data types the grid works with: the registries it reads
//! (bays, projects), the records it edits (schedule entries), the write
//! payloads it sends, and the derived timeline it draws against.
//!
//! # Ownership
//!
//! | Type | Owned by | Persisted |
//! |------|----------|-----------|
//! | Bay | Bay registry | yes (read-only here) |
//! | Project | Project registry | yes (read-only here) |
//! | ScheduleEntry | Schedule Store | yes |
//! | TimeSlot | grid | no, regenerated per render |

mod bay;
mod entry;
mod mutation;
mod project;
mod timeline;

pub use bay::{Bay, DEFAULT_ROW_COUNT};
pub use entry::{Schedule, ScheduleEntry};
pub use mutation::{NewScheduleEntry, ScheduleMutation, ScheduleUpdate};
pub use project::Project;
pub use timeline::{DateRange, Granularity, SlotWidths, TimeSlot, Timeline};

/// Schedule entry identifier assigned by the store.
pub type EntryId = i64;
/// Bay identifier.
pub type BayId = i64;
/// Project identifier.
pub type ProjectId = i64;
