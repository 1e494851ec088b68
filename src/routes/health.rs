//! Health and version endpoints
//!
//! - `GET /health` - liveness plus collection counts and subscriber count
//! - `GET /version` - build information for deployment verification

use std::sync::Arc;

use bytes::Bytes;
use http_body_util::Full;
use hyper::{Response, StatusCode};
use serde::Serialize;

use super::helpers::json_response;
use crate::model::now_iso;
use crate::server::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    /// Service is running; storage trouble shows up in the counts being null.
    pub healthy: bool,
    pub service: &'static str,
    pub version: &'static str,
    pub timestamp: String,
    /// Seconds since process start
    pub uptime: u64,
    /// Currently connected realtime subscribers
    pub subscribers: usize,
    pub collections: CollectionCounts,
}

/// Entity counts per collection; null when the document failed to load.
#[derive(Serialize)]
pub struct CollectionCounts {
    pub tasks: Option<usize>,
    pub events: Option<usize>,
    pub jobs: Option<usize>,
    pub reminders: Option<usize>,
}

pub async fn health_check(state: Arc<AppState>) -> Response<Full<Bytes>> {
    let collections = CollectionCounts {
        tasks: state.tasks.list().await.ok().map(|v| v.len()),
        events: state.events.list().await.ok().map(|v| v.len()),
        jobs: state.cron.list().await.ok().map(|v| v.len()),
        reminders: state.reminders.list().await.ok().map(|v| v.len()),
    };

    let response = HealthResponse {
        healthy: true,
        service: "hearth",
        version: env!("CARGO_PKG_VERSION"),
        timestamp: now_iso(),
        uptime: state.started_at.elapsed().as_secs(),
        subscribers: state.bus.subscriber_count(),
        collections,
    };

    json_response(StatusCode::OK, &response)
}

/// Version information for deployment verification
#[derive(Serialize)]
pub struct VersionResponse {
    pub version: &'static str,
    pub commit: &'static str,
    pub build_time: &'static str,
    pub service: &'static str,
}

pub fn version_info() -> Response<Full<Bytes>> {
    let response = VersionResponse {
        version: env!("CARGO_PKG_VERSION"),
        commit: option_env!("GIT_COMMIT_SHORT").unwrap_or("unknown"),
        build_time: option_env!("BUILD_TIMESTAMP").unwrap_or("unknown"),
        service: "hearth",
    };

    json_response(StatusCode::OK, &response)
}
