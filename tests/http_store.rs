//! HTTP store tests against a local axum server.
//!
//! The server mimics the dashboard's REST endpoints closely enough to check
//! paths, verbs, status handling, and the read cache.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, put};
use axum::{Json, Router};
use chrono::NaiveDate;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::RwLock;

use bay_schedule::config::GridConfig;
use bay_schedule::grid::{BayScheduleGrid, ViewMode};
use bay_schedule::models::{
    Bay, DateRange, Granularity, NewScheduleEntry, Project, ScheduleEntry, ScheduleUpdate,
};
use bay_schedule::store::{
    HttpScheduleStore, ScheduleStore, StoreError, BAYS_PATH, SCHEDULES_PATH,
};

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

#[derive(Default)]
struct FakeServer {
    bays: Vec<Bay>,
    projects: Vec<Project>,
    entries: Vec<ScheduleEntry>,
    next_id: i64,
    schedule_reads: usize,
    reject_writes: bool,
}

type Shared = Arc<RwLock<FakeServer>>;

async fn list_schedules(State(state): State<Shared>) -> Json<Vec<ScheduleEntry>> {
    let mut server = state.write().await;
    server.schedule_reads += 1;
    Json(server.entries.clone())
}

async fn list_bays(State(state): State<Shared>) -> Json<Vec<Bay>> {
    Json(state.read().await.bays.clone())
}

async fn list_projects(State(state): State<Shared>) -> Json<Vec<Project>> {
    Json(state.read().await.projects.clone())
}

async fn create_schedule(
    State(state): State<Shared>,
    Json(body): Json<NewScheduleEntry>,
) -> Result<(StatusCode, Json<ScheduleEntry>), StatusCode> {
    let mut server = state.write().await;
    if server.reject_writes {
        return Err(StatusCode::UNPROCESSABLE_ENTITY);
    }
    let id = server.next_id;
    server.next_id += 1;
    let entry = body.into_entry(id);
    server.entries.push(entry.clone());
    Ok((StatusCode::CREATED, Json(entry)))
}

async fn update_schedule(
    State(state): State<Shared>,
    Path(id): Path<i64>,
    Json(body): Json<ScheduleUpdate>,
) -> Result<Json<ScheduleEntry>, StatusCode> {
    let mut server = state.write().await;
    if server.reject_writes {
        return Err(StatusCode::UNPROCESSABLE_ENTITY);
    }
    let entry = server
        .entries
        .iter_mut()
        .find(|e| e.id == id)
        .ok_or(StatusCode::NOT_FOUND)?;
    body.apply_to(entry);
    Ok(Json(entry.clone()))
}

async fn delete_schedule(State(state): State<Shared>, Path(id): Path<i64>) -> StatusCode {
    let mut server = state.write().await;
    let before = server.entries.len();
    server.entries.retain(|e| e.id != id);
    if server.entries.len() == before {
        StatusCode::NOT_FOUND
    } else {
        StatusCode::NO_CONTENT
    }
}

fn build_router(state: Shared) -> Router {
    Router::new()
        .route(
            "/api/manufacturing-schedules",
            get(list_schedules).post(create_schedule),
        )
        .route(
            "/api/manufacturing-schedules/{id}",
            put(update_schedule).delete(delete_schedule),
        )
        .route("/api/manufacturing-bays", get(list_bays))
        .route("/api/projects", get(list_projects))
        .with_state(state)
}

async fn start_server() -> (String, Shared) {
    let state = Arc::new(RwLock::new(FakeServer {
        bays: vec![
            Bay::new(1, 1).with_name("Assembly").with_staff(2).with_hours_per_person(40.0),
            Bay::new(2, 2).with_staff(1).with_hours_per_person(40.0).with_rows(3),
        ],
        projects: vec![
            Project::new(10).with_number("P-10").with_hours(40.0),
            Project::new(11).with_number("P-11").with_hours(16.0),
        ],
        entries: vec![
            ScheduleEntry::new(1, 10, 1, d(2026, 10, 12), d(2026, 10, 15)).with_hours(40.0),
        ],
        next_id: 2,
        ..FakeServer::default()
    }));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = build_router(state.clone());
    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            eprintln!("test server error: {}", e);
        }
    });

    (format!("http://{}", addr), state)
}

#[tokio::test]
async fn test_reads_are_cached_per_path() {
    let (url, state) = start_server().await;
    let store = HttpScheduleStore::new(url);

    let first = store.list_schedules().await.unwrap();
    let second = store.list_schedules().await.unwrap();
    assert_eq!(first, second);
    assert_eq!(state.read().await.schedule_reads, 1);
    assert!(store.is_cached(SCHEDULES_PATH).await);

    let bays = store.list_bays().await.unwrap();
    assert_eq!(bays.len(), 2);
    assert_eq!(bays[1].rows(), 3);
    assert!(store.is_cached(BAYS_PATH).await);
}

#[tokio::test]
async fn test_create_invalidates_schedule_cache() {
    let (url, state) = start_server().await;
    let store = HttpScheduleStore::new(url);
    store.list_schedules().await.unwrap();
    store.list_bays().await.unwrap();

    let created = store
        .create_schedule(&NewScheduleEntry {
            project_id: 11,
            bay_id: 2,
            start_date: d(2026, 10, 19),
            end_date: d(2026, 10, 21),
            total_hours: 16.0,
            row: 1,
        })
        .await
        .unwrap();
    assert_eq!(created.id, 2);
    assert_eq!(created.row, 1);

    assert!(!store.is_cached(SCHEDULES_PATH).await);
    assert!(store.is_cached(BAYS_PATH).await);

    let entries = store.list_schedules().await.unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(state.read().await.schedule_reads, 2);
}

#[tokio::test]
async fn test_update_and_delete() {
    let (url, state) = start_server().await;
    let store = HttpScheduleStore::new(url);

    let entry = store.list_schedules().await.unwrap().remove(0);
    let mut update = ScheduleUpdate::from_entry(&entry);
    update.bay_id = 2;
    update.start_date = d(2026, 10, 26);
    update.end_date = d(2026, 10, 31);

    let stored = store.update_schedule(&update).await.unwrap();
    assert_eq!(stored.bay_id, 2);
    assert_eq!(state.read().await.entries[0].start_date, d(2026, 10, 26));

    store.delete_schedule(1).await.unwrap();
    assert!(state.read().await.entries.is_empty());
}

#[tokio::test]
async fn test_missing_entry_maps_to_not_found() {
    let (url, _state) = start_server().await;
    let store = HttpScheduleStore::new(url);

    let update = ScheduleUpdate::from_entry(&ScheduleEntry::new(
        99,
        10,
        1,
        d(2026, 10, 12),
        d(2026, 10, 12),
    ));
    let err = store.update_schedule(&update).await.unwrap_err();
    assert!(matches!(err, StoreError::NotFound(99)));

    let err = store.delete_schedule(99).await.unwrap_err();
    assert!(matches!(err, StoreError::NotFound(99)));
}

#[tokio::test]
async fn test_rejected_write_is_status_error() {
    let (url, state) = start_server().await;
    state.write().await.reject_writes = true;
    let store = HttpScheduleStore::new(url);

    let err = store
        .create_schedule(&NewScheduleEntry {
            project_id: 11,
            bay_id: 1,
            start_date: d(2026, 10, 12),
            end_date: d(2026, 10, 13),
            total_hours: 16.0,
            row: 0,
        })
        .await
        .unwrap_err();
    match &err {
        StoreError::Status { method, status, .. } => {
            assert_eq!(*method, "POST");
            assert_eq!(*status, 422);
        }
        other => panic!("expected status error, got {other:?}"),
    }
    assert!(err.is_rejection());
}

#[tokio::test]
async fn test_unreachable_server() {
    // Nothing listens on port 9 locally
    let store = HttpScheduleStore::new("http://127.0.0.1:9");
    let err = store.list_bays().await.unwrap_err();
    assert!(matches!(err, StoreError::Http(_)));
    assert!(!err.is_rejection());
}

#[tokio::test]
async fn test_grid_round_trip_over_http() {
    let (url, state) = start_server().await;
    let store = HttpScheduleStore::new(url);

    let range = DateRange::new(d(2026, 10, 12), d(2026, 11, 8));
    let mut grid = BayScheduleGrid::new(GridConfig::default(), range, Granularity::Week);
    grid.refresh(&store).await.unwrap();
    assert_eq!(grid.render().unassigned.len(), 1);

    grid.begin_drag_project(11).unwrap();
    let target = grid.target_at(2, 150.0, 10.0).unwrap();
    assert_eq!(target.date, d(2026, 10, 19));
    let pending = grid.drop_on(target).unwrap();

    let note = grid.commit(&store, pending).await;
    assert!(!note.is_error(), "{note:?}");
    assert_eq!(state.read().await.entries.len(), 2);

    // 16 h at 8 h/day
    let created = state.read().await.entries[1].clone();
    assert_eq!(created.end_date, d(2026, 10, 21));

    grid.refresh(&store).await.unwrap();
    let view = grid.render();
    assert!(view.unassigned.is_empty());
    assert_eq!(view.bays[1].bars.len(), 1);
    assert_eq!(view.bays[1].bars[0].entry_id, Some(2));

    grid.set_mode(ViewMode::ReadOnly);
    assert!(grid.begin_drag_entry(2).is_err());
}

#[tokio::test]
async fn test_refresh_after_failed_write_shows_server_state() {
    let (url, state) = start_server().await;
    let store = HttpScheduleStore::new(url);

    let range = DateRange::new(d(2026, 10, 12), d(2026, 11, 8));
    let mut grid = BayScheduleGrid::new(GridConfig::default(), range, Granularity::Week);
    grid.refresh(&store).await.unwrap();

    // Another client removes the entry behind our back
    state.write().await.entries.clear();

    grid.begin_drag_entry(1).unwrap();
    let target = grid.target_at(2, 0.0, 0.0).unwrap();
    let pending = grid.drop_on(target).unwrap();
    let note = grid.commit(&store, pending).await;
    assert!(note.is_error());
    assert_eq!(note.title, "Failed to update schedule");
    assert!(!store.is_cached(SCHEDULES_PATH).await);

    grid.refresh(&store).await.unwrap();
    let view = grid.render();
    assert!(view.bays.iter().all(|b| b.bars.is_empty()));
    assert!(grid.pending().is_empty());
    assert_eq!(state.read().await.schedule_reads, 2);
}

#[tokio::test]
async fn test_refresh_picks_up_changes_from_other_clients() {
    let (url, state) = start_server().await;
    let store = HttpScheduleStore::new(url);

    let range = DateRange::new(d(2026, 10, 12), d(2026, 11, 8));
    let mut grid = BayScheduleGrid::new(GridConfig::default(), range, Granularity::Week);
    grid.refresh(&store).await.unwrap();
    assert_eq!(grid.schedule().entry_count(), 1);

    state.write().await.entries.push(
        ScheduleEntry::new(7, 11, 2, d(2026, 10, 19), d(2026, 10, 21)).with_hours(16.0),
    );

    grid.refresh(&store).await.unwrap();
    assert_eq!(grid.schedule().entry_count(), 2);
    assert_eq!(grid.render().bays[1].bars[0].entry_id, Some(7));
    assert_eq!(state.read().await.schedule_reads, 2);
}
