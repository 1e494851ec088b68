//! Trading proxy routes
//!
//! Forwards `/api/trading/*` and `/api/auth/*` verbatim to the external
//! trading service, carrying the `Authorization` header and JSON body
//! through. Upstream failures come back as 200 + `{error}` (the original
//! surface contract, preserved).

use std::sync::Arc;

use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::{Method, Request, Response};
use serde_json::Value;

use super::helpers::{error_response, json_response};
use crate::server::AppState;
use crate::types::HearthError;

pub async fn handle(
    state: Arc<AppState>,
    req: Request<Incoming>,
    path: &str,
) -> Response<Full<Bytes>> {
    let method = req.method().clone();
    let authorization = req
        .headers()
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string());
    let path_and_query = match req.uri().query() {
        Some(query) => format!("{}?{}", path, query),
        None => path.to_string(),
    };

    let body = if method == Method::GET {
        None
    } else {
        match read_optional_body(req).await {
            Ok(body) => body,
            Err(e) => return error_response(e),
        }
    };

    let proxied = state
        .trading
        .forward(&method, &path_and_query, authorization.as_deref(), body)
        .await;
    json_response(proxied.status, &proxied.body)
}

async fn read_optional_body(
    req: Request<Incoming>,
) -> crate::types::Result<Option<Value>> {
    let bytes = req
        .collect()
        .await
        .map_err(|e| HearthError::BadRequest(format!("Failed to read request body: {}", e)))?
        .to_bytes();

    if bytes.is_empty() {
        return Ok(None);
    }
    serde_json::from_slice(&bytes)
        .map(Some)
        .map_err(|e| HearthError::BadRequest(format!("Invalid JSON: {}", e)))
}
