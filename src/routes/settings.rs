//! Configuration routes
//!
//! - `GET /api/config` - settings with `apiKeys` masked
//! - `PATCH /api/config` - merge trading/security/apiKeys, respond masked
//!
//! The unredacted keys never leave the repository.

use std::sync::Arc;

use bytes::Bytes;
use http_body_util::Full;
use hyper::body::Incoming;
use hyper::{Method, Request, Response, StatusCode};

use super::helpers::{error_response, json_response, not_found, read_json_body};
use crate::model::SettingsPatch;
use crate::server::AppState;

pub async fn handle(
    state: Arc<AppState>,
    req: Request<Incoming>,
    path: &str,
) -> Response<Full<Bytes>> {
    let method = req.method().clone();
    match method {
        Method::GET => match state.settings.masked().await {
            Ok(settings) => json_response(StatusCode::OK, &settings),
            Err(e) => error_response(e),
        },
        Method::PATCH => {
            let patch: SettingsPatch = match read_json_body(req).await {
                Ok(patch) => patch,
                Err(e) => return error_response(e),
            };
            match state.settings.update(patch).await {
                Ok(settings) => json_response(StatusCode::OK, &settings),
                Err(e) => error_response(e),
            }
        }
        _ => not_found(path),
    }
}
