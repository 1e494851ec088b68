//! Hearth - personal command center
//!
//! REST endpoints and a WebSocket broadcast channel over four flat
//! JSON-backed collections (tasks, calendar events, cron-job records,
//! reminders), plus a read-only memory-file browser, a storage-usage report,
//! a team/agent document, a masked configuration document, and a
//! pass-through proxy to an external trading service.
//!
//! ## Services
//!
//! - **Store**: injectable storage port over named JSON documents
//! - **Repositories**: create/read/update/delete/filter per entity kind
//! - **Bus**: typed change events fanned out to realtime subscribers
//! - **Views**: on-demand filters (status, date range, today, upcoming)
//! - **Server**: hyper http1 routing plus the WebSocket feed

pub mod bus;
pub mod config;
pub mod memory_files;
pub mod model;
pub mod repo;
pub mod report;
pub mod routes;
pub mod server;
pub mod store;
pub mod trading;
pub mod types;
pub mod views;

pub use config::Args;
pub use server::{run, AppState};
pub use types::{HearthError, Result};
