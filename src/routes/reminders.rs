//! Reminder routes
//!
//! - `GET /api/reminders` - full document; `?from=`/`?to=` switch to the
//!   inclusive range view `{reminders, count}`
//! - `GET /api/reminders/upcoming?limit=N` - next N pending (default 10)
//! - `GET|PATCH|DELETE /api/reminders/{id}`, `POST /api/reminders`
//! - `POST /api/reminders/{id}/complete` - one-way completion

use std::sync::Arc;

use bytes::Bytes;
use http_body_util::Full;
use hyper::body::Incoming;
use hyper::{Method, Request, Response, StatusCode};

use super::helpers::{
    error_response, id_and_action, json_response, message_entity, not_found, query_param,
    read_json_body,
};
use crate::model::{NewReminder, ReminderPatch};
use crate::server::AppState;
use crate::views::DEFAULT_UPCOMING_LIMIT;

pub async fn handle(
    state: Arc<AppState>,
    req: Request<Incoming>,
    path: &str,
) -> Response<Full<Bytes>> {
    let method = req.method().clone();
    let query = req.uri().query().map(|q| q.to_string());
    let rest = path.strip_prefix("/api/reminders").unwrap_or("").to_string();

    match (method, rest.as_str()) {
        (Method::GET, "") => list(state, query.as_deref()).await,
        (Method::POST, "") => create(state, req).await,
        (Method::GET, "/upcoming") => {
            let limit = query_param(query.as_deref(), "limit")
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_UPCOMING_LIMIT);
            collection_view(state.reminders.upcoming(limit).await)
        }
        (method, rest) => match id_and_action(rest) {
            Some((id, None)) => match method {
                Method::GET => match state.reminders.get(id).await {
                    Ok(reminder) => json_response(StatusCode::OK, &reminder),
                    Err(e) => error_response(e),
                },
                Method::PATCH => update(state, req, id).await,
                Method::DELETE => match state.reminders.delete(id).await {
                    Ok(reminder) => message_entity("Reminder deleted", "reminder", &reminder),
                    Err(e) => error_response(e),
                },
                _ => not_found(path),
            },
            Some((id, Some("complete"))) if method == Method::POST => {
                match state.reminders.complete(id).await {
                    Ok(reminder) => message_entity("Reminder completed", "reminder", &reminder),
                    Err(e) => error_response(e),
                }
            }
            _ => not_found(path),
        },
    }
}

async fn list(state: Arc<AppState>, query: Option<&str>) -> Response<Full<Bytes>> {
    let from = query_param(query, "from");
    let to = query_param(query, "to");

    if from.is_none() && to.is_none() {
        return match state.reminders.document().await {
            Ok(document) => json_response(StatusCode::OK, &document),
            Err(e) => error_response(e),
        };
    }

    collection_view(
        state
            .reminders
            .in_range(from.as_deref(), to.as_deref())
            .await,
    )
}

fn collection_view(
    result: crate::types::Result<Vec<crate::model::Reminder>>,
) -> Response<Full<Bytes>> {
    match result {
        Ok(reminders) => {
            let count = reminders.len();
            json_response(
                StatusCode::OK,
                &serde_json::json!({ "reminders": reminders, "count": count }),
            )
        }
        Err(e) => error_response(e),
    }
}

async fn create(state: Arc<AppState>, req: Request<Incoming>) -> Response<Full<Bytes>> {
    let input: NewReminder = match read_json_body(req).await {
        Ok(input) => input,
        Err(e) => return error_response(e),
    };
    match state.reminders.create(input).await {
        Ok(reminder) => json_response(StatusCode::CREATED, &reminder),
        Err(e) => error_response(e),
    }
}

async fn update(
    state: Arc<AppState>,
    req: Request<Incoming>,
    id: &str,
) -> Response<Full<Bytes>> {
    let patch: ReminderPatch = match read_json_body(req).await {
        Ok(patch) => patch,
        Err(e) => return error_response(e),
    };
    match state.reminders.update(id, patch).await {
        Ok(reminder) => json_response(StatusCode::OK, &reminder),
        Err(e) => error_response(e),
    }
}
