//! Shared response and body helpers for route handlers

use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::{Request, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::types::{HearthError, Result};

/// JSON response with permissive CORS, matching every endpoint's contract.
pub fn json_response(status: StatusCode, body: &impl Serialize) -> Response<Full<Bytes>> {
    let body = serde_json::to_string(body)
        .unwrap_or_else(|_| r#"{"error":"Serialization failed"}"#.to_string());

    Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .header("Access-Control-Allow-Origin", "*")
        .body(Full::new(Bytes::from(body)))
        .unwrap()
}

/// `{error}` body with the status the error maps to.
pub fn error_response(err: HearthError) -> Response<Full<Bytes>> {
    json_response(err.status_code(), &serde_json::json!({ "error": err.to_string() }))
}

/// `{message, <key>: entity}` body for deletes and side-effect POSTs.
pub fn message_entity(
    message: &str,
    key: &str,
    entity: &impl Serialize,
) -> Response<Full<Bytes>> {
    let mut map = serde_json::Map::new();
    map.insert("message".to_string(), Value::String(message.to_string()));
    map.insert(
        key.to_string(),
        serde_json::to_value(entity).unwrap_or(Value::Null),
    );
    json_response(StatusCode::OK, &Value::Object(map))
}

/// Not-found fallback for unroutable paths.
pub fn not_found(path: &str) -> Response<Full<Bytes>> {
    json_response(
        StatusCode::NOT_FOUND,
        &serde_json::json!({ "error": "Not Found", "path": path }),
    )
}

/// CORS preflight response
pub fn preflight_response() -> Response<Full<Bytes>> {
    Response::builder()
        .status(StatusCode::OK)
        .header("Access-Control-Allow-Origin", "*")
        .header("Access-Control-Allow-Headers", "*")
        .header("Access-Control-Allow-Methods", "GET, POST, PATCH, DELETE, OPTIONS")
        .body(Full::new(Bytes::new()))
        .unwrap()
}

/// Collect and parse a JSON request body. An empty body parses as `{}` so
/// bodyless side-effect POSTs work with all-optional inputs.
pub async fn read_json_body<T: DeserializeOwned>(req: Request<Incoming>) -> Result<T> {
    let bytes = req
        .collect()
        .await
        .map_err(|e| HearthError::BadRequest(format!("Failed to read request body: {}", e)))?
        .to_bytes();

    let bytes = if bytes.is_empty() {
        Bytes::from_static(b"{}")
    } else {
        bytes
    };

    serde_json::from_slice(&bytes)
        .map_err(|e| HearthError::BadRequest(format!("Invalid JSON: {}", e)))
}

/// First value for `key` in a raw query string.
pub fn query_param(query: Option<&str>, key: &str) -> Option<String> {
    let query = query?;
    query.split('&').find_map(|pair| {
        let (k, v) = pair.split_once('=')?;
        (k == key).then(|| v.to_string())
    })
}

/// Split a path remainder of the form `/{id}` or `/{id}/{action}`.
pub fn id_and_action(rest: &str) -> Option<(&str, Option<&str>)> {
    let rest = rest.strip_prefix('/')?;
    if rest.is_empty() {
        return None;
    }
    match rest.split_once('/') {
        None => Some((rest, None)),
        Some((id, action)) if !id.is_empty() && !action.is_empty() && !action.contains('/') => {
            Some((id, Some(action)))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_param_picks_first_match() {
        assert_eq!(
            query_param(Some("status=todo&assignee=ada"), "assignee").as_deref(),
            Some("ada")
        );
        assert_eq!(query_param(Some("status=todo"), "missing"), None);
        assert_eq!(query_param(None, "status"), None);
    }

    #[test]
    fn test_id_and_action_parsing() {
        assert_eq!(id_and_action("/task_1"), Some(("task_1", None)));
        assert_eq!(id_and_action("/cron_1/run"), Some(("cron_1", Some("run"))));
        assert_eq!(id_and_action("/"), None);
        assert_eq!(id_and_action("/a/b/c"), None);
        assert_eq!(id_and_action("no-slash"), None);
    }

    #[test]
    fn test_message_entity_shape() {
        let response = message_entity("Task deleted", "task", &serde_json::json!({"id": "t1"}));
        assert_eq!(response.status(), StatusCode::OK);
    }
}
