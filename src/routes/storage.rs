//! Storage report route
//!
//! `GET /api/storage` - best-effort disk usage diagnostics for the
//! workspace: totals, status tier, and the ten largest entries.

use std::sync::Arc;

use bytes::Bytes;
use http_body_util::Full;
use hyper::{Response, StatusCode};

use super::helpers::{error_response, json_response};
use crate::report::storage_report;
use crate::server::AppState;

pub async fn handle(state: Arc<AppState>) -> Response<Full<Bytes>> {
    match storage_report(&state.args.workspace_dir) {
        Ok(report) => json_response(StatusCode::OK, &report),
        Err(e) => error_response(e),
    }
}
