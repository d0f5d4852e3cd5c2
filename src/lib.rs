//! Manufacturing bay schedule grid.
//!
//! Projects are placed onto manufacturing bays along a calendar timeline.
//! A project's hour estimate and the bay's staffing decide how many days
//! it occupies; the grid turns schedule entries into positioned bars and
//! drag gestures into create/update writes against a schedule store.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Bay`, `Project`, `ScheduleEntry`,
//!   `Schedule`, mutations, and the `Timeline` of slots
//! - **`capacity`**: Daily capacity, end dates, and bay utilization
//! - **`layout`**: Bar geometry from dates, slots and sub-rows
//! - **`drag`**: Drag payloads, the drag session, and drop/resize resolution
//! - **`rows`**: Adding and removing bay sub-rows
//! - **`store`**: The `ScheduleStore` trait with HTTP and in-memory backends
//! - **`grid`**: `BayScheduleGrid`, tying the above together
//! - **`config`**: TOML configuration
//! - **`validation`**: Integrity checks on loaded data
//! - **`notify`**: Toasts reported after writes settle
//!
//! # Example
//!
//! ```
//! use bay_schedule::config::GridConfig;
//! use bay_schedule::grid::BayScheduleGrid;
//! use bay_schedule::models::{Bay, DateRange, Granularity, Project};
//! use chrono::NaiveDate;
//!
//! let monday = NaiveDate::from_ymd_opt(2026, 10, 12).unwrap();
//! let range = DateRange::new(monday, NaiveDate::from_ymd_opt(2026, 11, 8).unwrap());
//! let mut grid = BayScheduleGrid::new(GridConfig::default(), range, Granularity::Week);
//! grid.load(
//!     vec![Bay::new(1, 1).with_staff(1).with_hours_per_person(40.0)],
//!     vec![Project::new(7).with_hours(40.0)],
//!     Vec::new(),
//! );
//!
//! grid.begin_drag_project(7).unwrap();
//! let target = grid.target_at(1, 0.0, 0.0).unwrap();
//! let pending = grid.drop_on(target).unwrap();
//! assert_eq!(pending.mutation.verb(), "create");
//! assert_eq!(grid.render().bays[0].bars.len(), 1);
//! ```

pub mod capacity;
pub mod config;
pub mod drag;
pub mod error;
pub mod grid;
pub mod layout;
pub mod models;
pub mod notify;
pub mod rows;
pub mod store;
pub mod validation;

pub use error::{GridError, GridResult};
pub use grid::{BayScheduleGrid, GridView, PendingWrite, ViewMode, WriteOutcome};
