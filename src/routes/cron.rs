//! Cron job routes
//!
//! - `GET /api/cron` - full document
//! - `GET|PATCH|DELETE /api/cron/{id}`, `POST /api/cron`
//! - `POST /api/cron/{id}/run` - book an externally-reported execution

use std::sync::Arc;

use bytes::Bytes;
use http_body_util::Full;
use hyper::body::Incoming;
use hyper::{Method, Request, Response, StatusCode};

use super::helpers::{
    error_response, id_and_action, json_response, message_entity, not_found, read_json_body,
};
use crate::model::{CronPatch, NewCronJob};
use crate::server::AppState;

pub async fn handle(
    state: Arc<AppState>,
    req: Request<Incoming>,
    path: &str,
) -> Response<Full<Bytes>> {
    let method = req.method().clone();
    let rest = path.strip_prefix("/api/cron").unwrap_or("").to_string();

    match (method, rest.as_str()) {
        (Method::GET, "") => match state.cron.document().await {
            Ok(document) => json_response(StatusCode::OK, &document),
            Err(e) => error_response(e),
        },
        (Method::POST, "") => create(state, req).await,
        (method, rest) => match id_and_action(rest) {
            Some((id, None)) => match method {
                Method::GET => match state.cron.get(id).await {
                    Ok(job) => json_response(StatusCode::OK, &job),
                    Err(e) => error_response(e),
                },
                Method::PATCH => update(state, req, id).await,
                Method::DELETE => match state.cron.delete(id).await {
                    Ok(job) => message_entity("Cron job deleted", "job", &job),
                    Err(e) => error_response(e),
                },
                _ => not_found(path),
            },
            Some((id, Some("run"))) if method == Method::POST => {
                match state.cron.record_run(id).await {
                    Ok(job) => message_entity("Run recorded", "job", &job),
                    Err(e) => error_response(e),
                }
            }
            _ => not_found(path),
        },
    }
}

async fn create(state: Arc<AppState>, req: Request<Incoming>) -> Response<Full<Bytes>> {
    let input: NewCronJob = match read_json_body(req).await {
        Ok(input) => input,
        Err(e) => return error_response(e),
    };
    match state.cron.create(input).await {
        Ok(job) => json_response(StatusCode::CREATED, &job),
        Err(e) => error_response(e),
    }
}

async fn update(
    state: Arc<AppState>,
    req: Request<Incoming>,
    id: &str,
) -> Response<Full<Bytes>> {
    let patch: CronPatch = match read_json_body(req).await {
        Ok(patch) => patch,
        Err(e) => return error_response(e),
    };
    match state.cron.update(id, patch).await {
        Ok(job) => json_response(StatusCode::OK, &job),
        Err(e) => error_response(e),
    }
}
