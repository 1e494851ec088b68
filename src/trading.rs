//! Trading service proxy
//!
//! Pure pass-through to the external trading service; no logic lives here.
//! Upstream connection failures keep the original surface contract: the
//! caller still gets a 200 whose body carries an `error` field.

use hyper::StatusCode;
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::types::{HearthError, Result};

pub struct TradingClient {
    base_url: String,
    client: reqwest::Client,
}

/// Outcome of a proxied call: status to relay plus the JSON body.
pub struct ProxyResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TradingClient {
    pub fn new(base_url: &str, timeout_ms: u64) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_millis(timeout_ms))
            .build()
            .map_err(|e| HearthError::Config(format!("HTTP client error: {}", e)))?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    /// Forward a request verbatim, carrying the `Authorization` header and
    /// JSON body through. Never returns an error: upstream failures collapse
    /// into the 200 + `error` envelope.
    pub async fn forward(
        &self,
        method: &hyper::Method,
        path_and_query: &str,
        authorization: Option<&str>,
        body: Option<Value>,
    ) -> ProxyResponse {
        let url = format!("{}{}", self.base_url, path_and_query);
        debug!(method = %method, url = %url, "Forwarding to trading service");

        let method = reqwest::Method::from_bytes(method.as_str().as_bytes())
            .unwrap_or(reqwest::Method::GET);
        let mut builder = self.client.request(method, &url);
        if let Some(auth) = authorization {
            builder = builder.header("Authorization", auth);
        }
        if let Some(body) = body {
            builder = builder.json(&body);
        }

        let response = match builder.send().await {
            Ok(response) => response,
            Err(e) => {
                warn!(url = %url, error = %e, "Trading service unreachable");
                return unavailable(format!("Trading service unavailable: {}", e));
            }
        };

        let status =
            StatusCode::from_u16(response.status().as_u16()).unwrap_or(StatusCode::OK);
        match response.json::<Value>().await {
            Ok(body) => ProxyResponse { status, body },
            Err(e) => {
                warn!(url = %url, error = %e, "Invalid trading service response");
                unavailable(format!("Invalid trading service response: {}", e))
            }
        }
    }
}

fn unavailable(message: String) -> ProxyResponse {
    ProxyResponse {
        status: StatusCode::OK,
        body: json!({ "error": message }),
    }
}
