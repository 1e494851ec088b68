//! HTTP server implementation
//!
//! Uses hyper http1 with TokioIo for async handling; every request is
//! matched against `(method, path)` and dispatched to the route modules.

use std::sync::Arc;
use std::time::Instant;

use bytes::Bytes;
use http_body_util::Full;
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Method, Request, Response};
use hyper_util::rt::TokioIo;
use tokio::net::TcpListener;
use tracing::{error, info};

use crate::bus::EventBus;
use crate::config::Args;
use crate::memory_files::MemoryBrowser;
use crate::repo::{
    CronRepository, EventRepository, ReminderRepository, SettingsRepository, TaskRepository,
    TeamRepository,
};
use crate::routes;
use crate::server::websocket;
use crate::store::{CollectionStore, FileStore};
use crate::trading::TradingClient;
use crate::types::Result;

/// Shared application state
pub struct AppState {
    pub args: Args,
    pub tasks: TaskRepository,
    pub events: EventRepository,
    pub cron: CronRepository,
    pub reminders: ReminderRepository,
    pub team: TeamRepository,
    pub settings: SettingsRepository,
    pub bus: EventBus,
    pub memory: MemoryBrowser,
    pub trading: TradingClient,
    pub started_at: Instant,
}

impl AppState {
    /// Production state: file-backed store under the data directory.
    pub fn new(args: Args) -> Result<Self> {
        let store: Arc<dyn CollectionStore> = Arc::new(FileStore::open(&args.data_dir)?);
        Self::with_store(args, store)
    }

    /// Bind to any storage port; tests use the in-memory store.
    pub fn with_store(args: Args, store: Arc<dyn CollectionStore>) -> Result<Self> {
        let bus = EventBus::new();
        let memory = MemoryBrowser::new(&args.memory_dir);
        let trading = TradingClient::new(&args.trading_url, args.trading_timeout_ms)?;

        Ok(Self {
            tasks: TaskRepository::new(Arc::clone(&store), bus.clone()),
            events: EventRepository::new(Arc::clone(&store), bus.clone()),
            cron: CronRepository::new(Arc::clone(&store), bus.clone()),
            reminders: ReminderRepository::new(Arc::clone(&store), bus.clone()),
            team: TeamRepository::new(Arc::clone(&store), bus.clone()),
            settings: SettingsRepository::new(store, bus.clone()),
            bus,
            memory,
            trading,
            started_at: Instant::now(),
            args,
        })
    }
}

/// Start the HTTP server
pub async fn run(state: Arc<AppState>) -> Result<()> {
    let listener = TcpListener::bind(state.args.listen).await?;

    info!("Hearth listening on {}", state.args.listen);
    info!("Data directory: {}", state.args.data_dir.display());
    info!("Realtime feed at /ws");

    loop {
        match listener.accept().await {
            Ok((stream, addr)) => {
                let state = Arc::clone(&state);
                tokio::spawn(async move {
                    let io = TokioIo::new(stream);

                    let service = service_fn(move |req| {
                        let state = Arc::clone(&state);
                        async move { handle_request(state, req).await }
                    });

                    if let Err(err) = http1::Builder::new()
                        .serve_connection(io, service)
                        .with_upgrades()
                        .await
                    {
                        error!("Error serving connection from {}: {:?}", addr, err);
                    }
                });
            }
            Err(e) => {
                error!("Error accepting connection: {:?}", e);
            }
        }
    }
}

/// Route incoming HTTP requests
async fn handle_request(
    state: Arc<AppState>,
    req: Request<Incoming>,
) -> std::result::Result<Response<Full<Bytes>>, hyper::Error> {
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    info!("{} {}", method, path);

    let response = match (method, path.as_str()) {
        // CORS preflight
        (Method::OPTIONS, _) => routes::preflight_response(),

        // Service endpoints
        (Method::GET, "/health") | (Method::GET, "/healthz") => {
            routes::health_check(Arc::clone(&state)).await
        }
        (Method::GET, "/version") => routes::version_info(),

        // Realtime feed
        (Method::GET, "/ws") => websocket::handle_upgrade(state, req).await,

        // The four collections
        (_, p) if p.starts_with("/api/tasks") => {
            routes::tasks::handle(Arc::clone(&state), req, p).await
        }
        (_, p) if p.starts_with("/api/events") => {
            routes::events::handle(Arc::clone(&state), req, p).await
        }
        (_, p) if p.starts_with("/api/cron") => {
            routes::cron::handle(Arc::clone(&state), req, p).await
        }
        (_, p) if p.starts_with("/api/reminders") => {
            routes::reminders::handle(Arc::clone(&state), req, p).await
        }

        // Team and agents
        (Method::GET, "/api/team") => routes::team::handle_team(Arc::clone(&state)).await,
        (_, p) if p.starts_with("/api/agents") => {
            routes::team::handle_agents(Arc::clone(&state), req, p).await
        }

        // Masked configuration document
        (_, "/api/config") => routes::settings::handle(Arc::clone(&state), req, "/api/config").await,

        // Read-only memory browser
        (Method::GET, p) if p.starts_with("/api/memory") => {
            let query = req.uri().query().map(|q| q.to_string());
            routes::memory::handle(Arc::clone(&state), p, query.as_deref()).await
        }

        // Storage usage report
        (Method::GET, "/api/storage") => routes::storage::handle(Arc::clone(&state)).await,

        // Trading service pass-through
        (_, p) if p.starts_with("/api/trading") || p.starts_with("/api/auth") => {
            routes::trading::handle(Arc::clone(&state), req, p).await
        }

        // Not found
        _ => routes::not_found(&path),
    };

    Ok(response)
}
