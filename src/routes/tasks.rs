//! Task routes
//!
//! - `GET /api/tasks` - full document; `?status=`/`?assignee=` switch to a
//!   filtered `{tasks, count}` view
//! - `GET /api/tasks/{id}` - 200 or 404
//! - `POST /api/tasks` - 201 created entity, 400 on missing title
//! - `PATCH /api/tasks/{id}` - allow-listed update
//! - `DELETE /api/tasks/{id}` - 200 `{message, task}`

use std::sync::Arc;

use bytes::Bytes;
use http_body_util::Full;
use hyper::body::Incoming;
use hyper::{Method, Request, Response, StatusCode};

use super::helpers::{
    error_response, id_and_action, json_response, message_entity, not_found, query_param,
    read_json_body,
};
use crate::model::{NewTask, TaskPatch};
use crate::server::AppState;

pub async fn handle(
    state: Arc<AppState>,
    req: Request<Incoming>,
    path: &str,
) -> Response<Full<Bytes>> {
    let method = req.method().clone();
    let query = req.uri().query().map(|q| q.to_string());
    let rest = path.strip_prefix("/api/tasks").unwrap_or("").to_string();

    match (method, rest.as_str()) {
        (Method::GET, "") => list(state, query.as_deref()).await,
        (Method::POST, "") => create(state, req).await,
        (method, rest) => {
            let Some((id, None)) = id_and_action(rest) else {
                return not_found(path);
            };
            match method {
                Method::GET => match state.tasks.get(id).await {
                    Ok(task) => json_response(StatusCode::OK, &task),
                    Err(e) => error_response(e),
                },
                Method::PATCH => update(state, req, id).await,
                Method::DELETE => match state.tasks.delete(id).await {
                    Ok(task) => message_entity("Task deleted", "task", &task),
                    Err(e) => error_response(e),
                },
                _ => not_found(path),
            }
        }
    }
}

async fn list(state: Arc<AppState>, query: Option<&str>) -> Response<Full<Bytes>> {
    let status = query_param(query, "status");
    let assignee = query_param(query, "assignee");

    if status.is_none() && assignee.is_none() {
        return match state.tasks.document().await {
            Ok(document) => json_response(StatusCode::OK, &document),
            Err(e) => error_response(e),
        };
    }

    match state
        .tasks
        .filtered(status.as_deref(), assignee.as_deref())
        .await
    {
        Ok(tasks) => {
            let count = tasks.len();
            json_response(
                StatusCode::OK,
                &serde_json::json!({ "tasks": tasks, "count": count }),
            )
        }
        Err(e) => error_response(e),
    }
}

async fn create(state: Arc<AppState>, req: Request<Incoming>) -> Response<Full<Bytes>> {
    let input: NewTask = match read_json_body(req).await {
        Ok(input) => input,
        Err(e) => return error_response(e),
    };
    match state.tasks.create(input).await {
        Ok(task) => json_response(StatusCode::CREATED, &task),
        Err(e) => error_response(e),
    }
}

async fn update(
    state: Arc<AppState>,
    req: Request<Incoming>,
    id: &str,
) -> Response<Full<Bytes>> {
    let patch: TaskPatch = match read_json_body(req).await {
        Ok(patch) => patch,
        Err(e) => return error_response(e),
    };
    match state.tasks.update(id, patch).await {
        Ok(task) => json_response(StatusCode::OK, &task),
        Err(e) => error_response(e),
    }
}
