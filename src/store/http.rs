//! REST client for the Schedule Store.
//!
//! Reads go through a cache keyed by endpoint path, the way the dashboard's
//! request helper caches queries. A write drops the cached schedule list so
//! the next refresh sees server truth, whether the write succeeded or not.
//! A grid refresh drops it as well. The bay and project registries stay
//! cached until [`HttpScheduleStore::invalidate_all`].

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, info};

use super::{ScheduleStore, StoreError, StoreResult};
use crate::config::StoreSettings;
use crate::models::{Bay, EntryId, NewScheduleEntry, Project, ScheduleEntry, ScheduleUpdate};

pub const SCHEDULES_PATH: &str = "/api/manufacturing-schedules";
pub const BAYS_PATH: &str = "/api/manufacturing-bays";
pub const PROJECTS_PATH: &str = "/api/projects";

/// HTTP-backed store.
#[derive(Debug)]
pub struct HttpScheduleStore {
    client: reqwest::Client,
    base_url: String,
    cache: RwLock<HashMap<String, serde_json::Value>>,
}

impl HttpScheduleStore {
    /// Creates a client for `base_url` with reqwest's default timeouts.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    /// Creates a client around an existing `reqwest::Client`.
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client,
            base_url,
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Creates a client from the `[store]` config section.
    pub fn from_settings(settings: &StoreSettings) -> StoreResult<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = settings.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build()?;
        Ok(Self::with_client(client, settings.base_url.clone()))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Drops one cached read.
    pub async fn invalidate(&self, path: &str) {
        self.cache.write().await.remove(path);
    }

    /// Drops every cached read.
    pub async fn invalidate_all(&self) {
        self.cache.write().await.clear();
    }

    /// Whether a read for `path` is currently cached.
    pub async fn is_cached(&self, path: &str) -> bool {
        self.cache.read().await.contains_key(path)
    }

    async fn get_cached<T: DeserializeOwned>(&self, path: &str) -> StoreResult<T> {
        if let Some(value) = self.cache.read().await.get(path) {
            debug!(path, "cache hit");
            return Ok(serde_json::from_value(value.clone())?);
        }

        let response = self.client.get(self.url(path)).send().await?;
        let response = check_status(response, "GET", path)?;
        let value: serde_json::Value = response.json().await?;
        let decoded = serde_json::from_value(value.clone())?;

        self.cache.write().await.insert(path.to_string(), value);
        Ok(decoded)
    }

    async fn send_json<B: Serialize + Sync>(
        &self,
        method: reqwest::Method,
        verb: &'static str,
        path: &str,
        body: &B,
    ) -> StoreResult<ScheduleEntry> {
        let result = self.request_entry(method, verb, path, body).await;
        // Schedule reads are stale after any write attempt
        self.invalidate(SCHEDULES_PATH).await;
        result
    }

    async fn request_entry<B: Serialize + Sync>(
        &self,
        method: reqwest::Method,
        verb: &'static str,
        path: &str,
        body: &B,
    ) -> StoreResult<ScheduleEntry> {
        let response = self
            .client
            .request(method, self.url(path))
            .json(body)
            .send()
            .await?;
        let response = check_status(response, verb, path)?;
        Ok(response.json::<ScheduleEntry>().await?)
    }
}

fn check_status(
    response: reqwest::Response,
    method: &'static str,
    path: &str,
) -> StoreResult<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(StoreError::Status {
            method,
            path: path.to_string(),
            status: status.as_u16(),
        })
    }
}

#[async_trait]
impl ScheduleStore for HttpScheduleStore {
    async fn list_schedules(&self) -> StoreResult<Vec<ScheduleEntry>> {
        self.get_cached(SCHEDULES_PATH).await
    }

    async fn list_bays(&self) -> StoreResult<Vec<Bay>> {
        self.get_cached(BAYS_PATH).await
    }

    async fn list_projects(&self) -> StoreResult<Vec<Project>> {
        self.get_cached(PROJECTS_PATH).await
    }

    async fn create_schedule(&self, entry: &NewScheduleEntry) -> StoreResult<ScheduleEntry> {
        let created = self
            .send_json(reqwest::Method::POST, "POST", SCHEDULES_PATH, entry)
            .await?;
        info!(entry_id = created.id, project_id = created.project_id, "schedule created");
        Ok(created)
    }

    async fn update_schedule(&self, update: &ScheduleUpdate) -> StoreResult<ScheduleEntry> {
        let path = format!("{}/{}", SCHEDULES_PATH, update.id);
        match self
            .send_json(reqwest::Method::PUT, "PUT", &path, update)
            .await
        {
            Err(StoreError::Status { status: 404, .. }) => Err(StoreError::NotFound(update.id)),
            other => other,
        }
    }

    async fn delete_schedule(&self, id: EntryId) -> StoreResult<()> {
        let path = format!("{}/{}", SCHEDULES_PATH, id);
        let result = match self.client.delete(self.url(&path)).send().await {
            Ok(response) => check_status(response, "DELETE", &path).map(|_| ()),
            Err(e) => Err(e.into()),
        };
        self.invalidate(SCHEDULES_PATH).await;
        match result {
            Err(StoreError::Status { status: 404, .. }) => Err(StoreError::NotFound(id)),
            other => other,
        }
    }

    async fn invalidate_reads(&self) {
        debug!(path = SCHEDULES_PATH, "schedule cache dropped");
        self.invalidate(SCHEDULES_PATH).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash() {
        let store = HttpScheduleStore::new("http://localhost:5000/");
        assert_eq!(store.base_url(), "http://localhost:5000");
        assert_eq!(
            store.url(SCHEDULES_PATH),
            "http://localhost:5000/api/manufacturing-schedules"
        );
    }

    #[test]
    fn test_from_settings() {
        let settings = StoreSettings {
            base_url: "http://example.test".to_string(),
            timeout_secs: Some(5),
        };
        let store = HttpScheduleStore::from_settings(&settings).unwrap();
        assert_eq!(store.base_url(), "http://example.test");
    }

    #[tokio::test]
    async fn test_invalidate() {
        let store = HttpScheduleStore::new("http://example.test");
        store
            .cache
            .write()
            .await
            .insert(BAYS_PATH.to_string(), serde_json::json!([]));
        assert!(store.is_cached(BAYS_PATH).await);

        let bays = store.list_bays().await.unwrap();
        assert!(bays.is_empty());

        store.invalidate_all().await;
        assert!(!store.is_cached(BAYS_PATH).await);
    }

    #[tokio::test]
    async fn test_invalidate_reads_keeps_registries() {
        let store = HttpScheduleStore::new("http://example.test");
        {
            let mut cache = store.cache.write().await;
            cache.insert(SCHEDULES_PATH.to_string(), serde_json::json!([]));
            cache.insert(BAYS_PATH.to_string(), serde_json::json!([]));
        }

        store.invalidate_reads().await;
        assert!(!store.is_cached(SCHEDULES_PATH).await);
        assert!(store.is_cached(BAYS_PATH).await);
    }

    #[tokio::test]
    async fn test_failed_write_drops_schedule_cache() {
        // Nothing listens on port 9 locally
        let store = HttpScheduleStore::new("http://127.0.0.1:9");
        store
            .cache
            .write()
            .await
            .insert(SCHEDULES_PATH.to_string(), serde_json::json!([]));

        assert!(store.delete_schedule(1).await.is_err());
        assert!(!store.is_cached(SCHEDULES_PATH).await);
    }

    #[test]
    fn test_rejection_classification() {
        let err = StoreError::Status {
            method: "PUT",
            path: SCHEDULES_PATH.to_string(),
            status: 422,
        };
        assert!(err.is_rejection());
        assert!(!StoreError::Unavailable("down".into()).is_rejection());
    }
}
