//! In-memory Schedule Store.
//!
//! Holds bays, projects and entries in memory for unit tests and local
//! development. Can be switched to unavailable to exercise the failure
//! path of writes.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use super::{ScheduleStore, StoreError, StoreResult};
use crate::models::{Bay, EntryId, NewScheduleEntry, Project, ScheduleEntry, ScheduleUpdate};

#[derive(Debug)]
struct MemoryData {
    bays: Vec<Bay>,
    projects: Vec<Project>,
    entries: Vec<ScheduleEntry>,
    next_id: EntryId,
}

impl Default for MemoryData {
    fn default() -> Self {
        Self {
            bays: Vec::new(),
            projects: Vec::new(),
            entries: Vec::new(),
            next_id: 1,
        }
    }
}

/// In-memory store. Clones share the same data.
#[derive(Debug, Clone, Default)]
pub struct MemoryScheduleStore {
    data: Arc<RwLock<MemoryData>>,
    unavailable: Arc<AtomicBool>,
}

impl MemoryScheduleStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store seeded with registry data and entries.
    ///
    /// New IDs continue after the highest seeded entry ID.
    pub fn with_data(bays: Vec<Bay>, projects: Vec<Project>, entries: Vec<ScheduleEntry>) -> Self {
        let next_id = entries.iter().map(|e| e.id).max().unwrap_or(0) + 1;
        Self {
            data: Arc::new(RwLock::new(MemoryData {
                bays,
                projects,
                entries,
                next_id,
            })),
            unavailable: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Makes every call fail with [`StoreError::Unavailable`] while set.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Current entries, without going through the trait.
    pub async fn snapshot(&self) -> Vec<ScheduleEntry> {
        self.data.read().await.entries.clone()
    }

    fn check_available(&self) -> StoreResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            Err(StoreError::Unavailable("memory store switched off".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl ScheduleStore for MemoryScheduleStore {
    async fn list_schedules(&self) -> StoreResult<Vec<ScheduleEntry>> {
        self.check_available()?;
        Ok(self.data.read().await.entries.clone())
    }

    async fn list_bays(&self) -> StoreResult<Vec<Bay>> {
        self.check_available()?;
        Ok(self.data.read().await.bays.clone())
    }

    async fn list_projects(&self) -> StoreResult<Vec<Project>> {
        self.check_available()?;
        Ok(self.data.read().await.projects.clone())
    }

    async fn create_schedule(&self, entry: &NewScheduleEntry) -> StoreResult<ScheduleEntry> {
        self.check_available()?;
        let mut data = self.data.write().await;
        let id = data.next_id;
        data.next_id += 1;
        let stored = entry.clone().into_entry(id);
        data.entries.push(stored.clone());
        Ok(stored)
    }

    async fn update_schedule(&self, update: &ScheduleUpdate) -> StoreResult<ScheduleEntry> {
        self.check_available()?;
        let mut data = self.data.write().await;
        let entry = data
            .entries
            .iter_mut()
            .find(|e| e.id == update.id)
            .ok_or(StoreError::NotFound(update.id))?;
        update.apply_to(entry);
        Ok(entry.clone())
    }

    async fn delete_schedule(&self, id: EntryId) -> StoreResult<()> {
        self.check_available()?;
        let mut data = self.data.write().await;
        let before = data.entries.len();
        data.entries.retain(|e| e.id != id);
        if data.entries.len() == before {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ScheduleMutation;
    use chrono::NaiveDate;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn seeded() -> MemoryScheduleStore {
        MemoryScheduleStore::with_data(
            vec![Bay::new(1, 1).with_staff(2).with_hours_per_person(40.0)],
            vec![Project::new(10), Project::new(11)],
            vec![ScheduleEntry::new(5, 10, 1, d(2026, 10, 12), d(2026, 10, 15)).with_hours(40.0)],
        )
    }

    #[tokio::test]
    async fn test_create_assigns_next_id() {
        let store = seeded();
        let created = store
            .create_schedule(&NewScheduleEntry {
                project_id: 11,
                bay_id: 1,
                start_date: d(2026, 10, 19),
                end_date: d(2026, 10, 20),
                total_hours: 16.0,
                row: 1,
            })
            .await
            .unwrap();
        assert_eq!(created.id, 6);
        assert_eq!(store.list_schedules().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_update_and_delete_through_apply() {
        let store = seeded();
        let mut update = ScheduleUpdate::from_entry(&store.snapshot().await[0]);
        update.row = 3;

        let stored = store.apply(&ScheduleMutation::Update(update)).await.unwrap();
        assert_eq!(stored.map(|e| e.row), Some(3));

        assert!(store.apply(&ScheduleMutation::Delete { id: 5 }).await.unwrap().is_none());
        assert!(store.snapshot().await.is_empty());
    }

    #[tokio::test]
    async fn test_missing_entry_is_not_found() {
        let store = seeded();
        assert!(matches!(store.delete_schedule(99).await, Err(StoreError::NotFound(99))));

        let mut update = ScheduleUpdate::from_entry(&store.snapshot().await[0]);
        update.id = 42;
        assert!(matches!(store.update_schedule(&update).await, Err(StoreError::NotFound(42))));
    }

    #[tokio::test]
    async fn test_unavailable() {
        let store = seeded();
        store.set_unavailable(true);
        assert!(matches!(store.list_bays().await, Err(StoreError::Unavailable(_))));
        store.set_unavailable(false);
        assert_eq!(store.list_bays().await.unwrap().len(), 1);
    }
}
