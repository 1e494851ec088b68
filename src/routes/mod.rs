//! HTTP routes for Hearth

pub mod cron;
pub mod events;
pub mod health;
pub mod helpers;
pub mod memory;
pub mod reminders;
pub mod settings;
pub mod storage;
pub mod tasks;
pub mod team;
pub mod trading;

pub use health::{health_check, version_info};
pub use helpers::{not_found, preflight_response};
