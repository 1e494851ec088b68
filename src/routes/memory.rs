//! Memory-file browser routes (read-only)
//!
//! - `GET /api/memory` - `{files, count}`
//! - `GET /api/memory/search?q=` - linear substring scan, `{query, matches, count}`
//! - `GET /api/memory/{name}` - `{name, content}`

use std::sync::Arc;

use bytes::Bytes;
use http_body_util::Full;
use hyper::{Response, StatusCode};

use super::helpers::{error_response, json_response, query_param};
use crate::server::AppState;

pub async fn handle(
    state: Arc<AppState>,
    path: &str,
    query: Option<&str>,
) -> Response<Full<Bytes>> {
    let rest = path.strip_prefix("/api/memory").unwrap_or("");

    match rest {
        "" => match state.memory.list() {
            Ok(files) => {
                let count = files.len();
                json_response(
                    StatusCode::OK,
                    &serde_json::json!({ "files": files, "count": count }),
                )
            }
            Err(e) => error_response(e),
        },
        "/search" => {
            let q = query_param(query, "q").unwrap_or_default();
            match state.memory.search(&q) {
                Ok(matches) => {
                    let count = matches.len();
                    json_response(
                        StatusCode::OK,
                        &serde_json::json!({ "query": q, "matches": matches, "count": count }),
                    )
                }
                Err(e) => error_response(e),
            }
        }
        rest => {
            let name = rest.trim_start_matches('/');
            match state.memory.read(name) {
                Ok(content) => json_response(
                    StatusCode::OK,
                    &serde_json::json!({ "name": name, "content": content }),
                ),
                Err(e) => error_response(e),
            }
        }
    }
}
