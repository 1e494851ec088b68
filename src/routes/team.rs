//! Team and agent routes
//!
//! - `GET /api/team` - full team document (agents, roles, squads)
//! - `GET /api/agents` - `{agents, count}`
//! - `POST /api/agents` - 201 created agent, 400 on missing name
//! - `GET /api/agents/{id}`
//! - `POST /api/agents/{id}/spawn` / `POST /api/agents/{id}/dismiss`

use std::sync::Arc;

use bytes::Bytes;
use http_body_util::Full;
use hyper::body::Incoming;
use hyper::{Method, Request, Response, StatusCode};

use super::helpers::{
    error_response, id_and_action, json_response, message_entity, not_found, read_json_body,
};
use crate::model::NewAgent;
use crate::server::AppState;

pub async fn handle_team(state: Arc<AppState>) -> Response<Full<Bytes>> {
    match state.team.document().await {
        Ok(document) => json_response(StatusCode::OK, &document),
        Err(e) => error_response(e),
    }
}

pub async fn handle_agents(
    state: Arc<AppState>,
    req: Request<Incoming>,
    path: &str,
) -> Response<Full<Bytes>> {
    let method = req.method().clone();
    let rest = path.strip_prefix("/api/agents").unwrap_or("").to_string();

    match (method, rest.as_str()) {
        (Method::GET, "") => match state.team.agents().await {
            Ok(agents) => {
                let count = agents.len();
                json_response(
                    StatusCode::OK,
                    &serde_json::json!({ "agents": agents, "count": count }),
                )
            }
            Err(e) => error_response(e),
        },
        (Method::POST, "") => {
            let input: NewAgent = match read_json_body(req).await {
                Ok(input) => input,
                Err(e) => return error_response(e),
            };
            match state.team.create_agent(input).await {
                Ok(agent) => json_response(StatusCode::CREATED, &agent),
                Err(e) => error_response(e),
            }
        }
        (method, rest) => match id_and_action(rest) {
            Some((id, None)) if method == Method::GET => match state.team.get_agent(id).await {
                Ok(agent) => json_response(StatusCode::OK, &agent),
                Err(e) => error_response(e),
            },
            Some((id, Some("spawn"))) if method == Method::POST => {
                match state.team.spawn(id).await {
                    Ok(agent) => message_entity("Agent spawned", "agent", &agent),
                    Err(e) => error_response(e),
                }
            }
            Some((id, Some("dismiss"))) if method == Method::POST => {
                match state.team.dismiss(id).await {
                    Ok(agent) => message_entity("Agent dismissed", "agent", &agent),
                    Err(e) => error_response(e),
                }
            }
            _ => not_found(path),
        },
    }
}
