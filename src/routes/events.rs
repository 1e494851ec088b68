//! Calendar event routes
//!
//! - `GET /api/events` - full document; `?from=`/`?to=` switch to the
//!   inclusive range view `{events, count}`
//! - `GET /api/events/today` - events starting today (UTC)
//! - `GET /api/events/upcoming?limit=N` - next N by start time (default 10)
//! - `GET|PATCH|DELETE /api/events/{id}`, `POST /api/events`

use std::sync::Arc;

use bytes::Bytes;
use http_body_util::Full;
use hyper::body::Incoming;
use hyper::{Method, Request, Response, StatusCode};

use super::helpers::{
    error_response, id_and_action, json_response, message_entity, not_found, query_param,
    read_json_body,
};
use crate::model::{EventPatch, NewEvent};
use crate::server::AppState;
use crate::views::DEFAULT_UPCOMING_LIMIT;

pub async fn handle(
    state: Arc<AppState>,
    req: Request<Incoming>,
    path: &str,
) -> Response<Full<Bytes>> {
    let method = req.method().clone();
    let query = req.uri().query().map(|q| q.to_string());
    let rest = path.strip_prefix("/api/events").unwrap_or("").to_string();

    match (method, rest.as_str()) {
        (Method::GET, "") => list(state, query.as_deref()).await,
        (Method::POST, "") => create(state, req).await,
        (Method::GET, "/today") => collection_view(state.events.today().await),
        (Method::GET, "/upcoming") => {
            let limit = query_param(query.as_deref(), "limit")
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_UPCOMING_LIMIT);
            collection_view(state.events.upcoming(limit).await)
        }
        (method, rest) => {
            let Some((id, None)) = id_and_action(rest) else {
                return not_found(path);
            };
            match method {
                Method::GET => match state.events.get(id).await {
                    Ok(event) => json_response(StatusCode::OK, &event),
                    Err(e) => error_response(e),
                },
                Method::PATCH => update(state, req, id).await,
                Method::DELETE => match state.events.delete(id).await {
                    Ok(event) => message_entity("Event deleted", "event", &event),
                    Err(e) => error_response(e),
                },
                _ => not_found(path),
            }
        }
    }
}

async fn list(state: Arc<AppState>, query: Option<&str>) -> Response<Full<Bytes>> {
    let from = query_param(query, "from");
    let to = query_param(query, "to");

    if from.is_none() && to.is_none() {
        return match state.events.document().await {
            Ok(document) => json_response(StatusCode::OK, &document),
            Err(e) => error_response(e),
        };
    }

    collection_view(state.events.in_range(from.as_deref(), to.as_deref()).await)
}

fn collection_view(
    result: crate::types::Result<Vec<crate::model::CalendarEvent>>,
) -> Response<Full<Bytes>> {
    match result {
        Ok(events) => {
            let count = events.len();
            json_response(
                StatusCode::OK,
                &serde_json::json!({ "events": events, "count": count }),
            )
        }
        Err(e) => error_response(e),
    }
}

async fn create(state: Arc<AppState>, req: Request<Incoming>) -> Response<Full<Bytes>> {
    let input: NewEvent = match read_json_body(req).await {
        Ok(input) => input,
        Err(e) => return error_response(e),
    };
    match state.events.create(input).await {
        Ok(event) => json_response(StatusCode::CREATED, &event),
        Err(e) => error_response(e),
    }
}

async fn update(
    state: Arc<AppState>,
    req: Request<Incoming>,
    id: &str,
) -> Response<Full<Bytes>> {
    let patch: EventPatch = match read_json_body(req).await {
        Ok(patch) => patch,
        Err(e) => return error_response(e),
    };
    match state.events.update(id, patch).await {
        Ok(event) => json_response(StatusCode::OK, &event),
        Err(e) => error_response(e),
    }
}
