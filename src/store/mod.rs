//! Schedule Store: where schedule entries live.
//!
//! The grid reads schedules, bays and projects and writes schedule entries
//! through the [`ScheduleStore`] trait. Two implementations are provided:
//!
//! - [`HttpScheduleStore`]: the REST endpoint, with a read cache keyed by
//!   endpoint path.
//! - [`MemoryScheduleStore`]: in-memory, for tests and local development.
//!
//! The store is treated as eventually consistent. Writes are last-write-wins
//! and nothing is locked while a request is in flight.

mod error;
mod http;
mod memory;

pub use error::{StoreError, StoreResult};
pub use http::{HttpScheduleStore, BAYS_PATH, PROJECTS_PATH, SCHEDULES_PATH};
pub use memory::MemoryScheduleStore;

use async_trait::async_trait;

use crate::models::{
    Bay, EntryId, NewScheduleEntry, Project, ScheduleEntry, ScheduleMutation, ScheduleUpdate,
};

/// Read/write access to schedule data.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` so writes can be issued from
/// spawned tasks.
#[async_trait]
pub trait ScheduleStore: Send + Sync {
    /// All schedule entries.
    async fn list_schedules(&self) -> StoreResult<Vec<ScheduleEntry>>;

    /// The bay registry.
    async fn list_bays(&self) -> StoreResult<Vec<Bay>>;

    /// The project registry.
    async fn list_projects(&self) -> StoreResult<Vec<Project>>;

    /// Creates an entry and returns it with its assigned ID.
    async fn create_schedule(&self, entry: &NewScheduleEntry) -> StoreResult<ScheduleEntry>;

    /// Moves or resizes an entry and returns the stored result.
    async fn update_schedule(&self, update: &ScheduleUpdate) -> StoreResult<ScheduleEntry>;

    /// Removes an entry.
    async fn delete_schedule(&self, id: EntryId) -> StoreResult<()>;

    /// Drops any cached schedule reads so the next list goes to the source.
    ///
    /// Stores without a cache have nothing to do.
    async fn invalidate_reads(&self) {}

    /// Issues one mutation.
    ///
    /// Returns the stored entry for creates and updates, `None` for deletes.
    async fn apply(&self, mutation: &ScheduleMutation) -> StoreResult<Option<ScheduleEntry>> {
        match mutation {
            ScheduleMutation::Create(entry) => self.create_schedule(entry).await.map(Some),
            ScheduleMutation::Update(update) => self.update_schedule(update).await.map(Some),
            ScheduleMutation::Delete { id } => self.delete_schedule(*id).await.map(|_| None),
        }
    }
}
