//! Realtime WebSocket feed
//!
//! ## Protocol
//!
//! Connect: `ws://localhost:3456/ws`
//!
//! On connect the server pushes one `INIT` message with a snapshot of all
//! four collections. Afterwards every successful mutation is broadcast as
//! `{"type": <EVENT_TYPE>, <entityKey>: <entity-or-id>}` to all open
//! connections - no filtering, no acknowledgment, no queuing for
//! disconnected clients.
//!
//! Client → server: `{"type": "ping"}` is answered with a pong; everything
//! else is ignored.

use std::sync::Arc;

use bytes::Bytes;
use futures_util::{SinkExt, StreamExt};
use http_body_util::Full;
use hyper::body::Incoming;
use hyper::{Request, Response, StatusCode};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tracing::{debug, error, info, warn};

use crate::model::now_iso;
use crate::server::AppState;
use crate::types::Result;

/// WebSocket type after upgrade
type HyperWebSocket =
    hyper_tungstenite::WebSocketStream<hyper_util::rt::TokioIo<hyper::upgrade::Upgraded>>;

/// One-time catch-up snapshot sent to every new connection.
#[derive(Debug, Serialize)]
pub struct InitMessage {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub tasks: Vec<crate::model::Task>,
    pub events: Vec<crate::model::CalendarEvent>,
    pub jobs: Vec<crate::model::CronJob>,
    pub reminders: Vec<crate::model::Reminder>,
    pub timestamp: String,
}

/// Message received from client
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ClientMessage {
    /// Keep-alive ping
    Ping,
}

/// Handle WebSocket upgrade for the realtime feed
pub async fn handle_upgrade(
    state: Arc<AppState>,
    req: Request<Incoming>,
) -> Response<Full<Bytes>> {
    if !hyper_tungstenite::is_upgrade_request(&req) {
        return Response::builder()
            .status(StatusCode::BAD_REQUEST)
            .header("Content-Type", "application/json")
            .body(Full::new(Bytes::from(
                r#"{"error": "WebSocket upgrade required for /ws"}"#,
            )))
            .unwrap();
    }

    let (response, websocket) = match hyper_tungstenite::upgrade(req, None) {
        Ok((resp, ws)) => (resp, ws),
        Err(e) => {
            error!("WebSocket upgrade failed: {}", e);
            return Response::builder()
                .status(StatusCode::INTERNAL_SERVER_ERROR)
                .body(Full::new(Bytes::from("WebSocket upgrade failed")))
                .unwrap();
        }
    };

    tokio::spawn(async move {
        match websocket.await {
            Ok(ws) => {
                if let Err(e) = handle_connection(state, ws).await {
                    warn!("Realtime WebSocket error: {}", e);
                }
            }
            Err(e) => {
                error!("WebSocket connection failed: {}", e);
            }
        }
    });

    // Return the upgrade response with a compatible body type
    let (parts, _body) = response.into_parts();
    Response::from_parts(parts, Full::new(Bytes::new()))
}

/// Handle an individual realtime connection
async fn handle_connection(
    state: Arc<AppState>,
    ws: HyperWebSocket,
) -> std::result::Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let (mut sender, mut receiver) = ws.split();

    info!("Realtime client connected");

    // Subscribe before snapshotting so a mutation landing in between is not
    // lost to this connection.
    let mut rx = state.bus.subscribe();

    let snapshot = snapshot(&state).await?;
    sender
        .send(WsMessage::Text(serde_json::to_string(&snapshot)?))
        .await?;

    loop {
        tokio::select! {
            // Broadcast event from the bus
            event = rx.recv() => {
                match event {
                    Ok(event) => {
                        let json = serde_json::to_string(&event)?;
                        if sender.send(WsMessage::Text(json)).await.is_err() {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                    // A lagged subscriber just misses events; no replay.
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!(skipped, "Realtime subscriber lagged");
                        continue;
                    }
                }
            }

            // Message from client
            msg = receiver.next() => {
                match msg {
                    Some(Ok(WsMessage::Text(text))) => {
                        if let Ok(ClientMessage::Ping) = serde_json::from_str::<ClientMessage>(&text) {
                            let pong = serde_json::json!({"type": "pong", "timestamp": now_iso()});
                            let _ = sender.send(WsMessage::Text(pong.to_string())).await;
                        } else {
                            debug!("Ignoring client message: {}", text);
                        }
                    }
                    Some(Ok(WsMessage::Close(_))) => {
                        info!("Realtime client disconnected");
                        break;
                    }
                    Some(Ok(WsMessage::Ping(data))) => {
                        let _ = sender.send(WsMessage::Pong(data)).await;
                    }
                    Some(Err(e)) => {
                        warn!("WebSocket error: {}", e);
                        break;
                    }
                    None => break,
                    _ => {}
                }
            }
        }
    }

    info!("Realtime connection closed");
    Ok(())
}

/// Snapshot of all four collections for the INIT message.
async fn snapshot(state: &AppState) -> Result<InitMessage> {
    Ok(InitMessage {
        kind: "INIT",
        tasks: state.tasks.list().await?,
        events: state.events.list().await?,
        jobs: state.cron.list().await?,
        reminders: state.reminders.list().await?,
        timestamp: now_iso(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Args;
    use crate::model::NewTask;
    use crate::store::MemoryStore;

    #[tokio::test]
    async fn test_init_snapshot_covers_all_four_collections() {
        let state =
            AppState::with_store(Args::test_defaults(), Arc::new(MemoryStore::new())).unwrap();

        state
            .tasks
            .create(NewTask {
                title: Some("Build UI".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();

        let value = serde_json::to_value(snapshot(&state).await.unwrap()).unwrap();
        assert_eq!(value["type"], "INIT");
        assert_eq!(value["tasks"].as_array().unwrap().len(), 1);
        assert!(value["events"].as_array().unwrap().is_empty());
        assert!(value["jobs"].as_array().unwrap().is_empty());
        assert!(value["reminders"].as_array().unwrap().is_empty());
        assert!(value["timestamp"].is_string());
    }
}
