//! Axum HTTP routes for the directory listing API.

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tower_http::services::ServeDir;
use tracing::{info, warn};

use crate::config::{Locale, ServerConfig};
use crate::error::AppError;
use crate::model::formatted::{FormattedEntry, Labels};
use crate::model::sort::SortSpec;
use crate::service::listing::{Listing, ListingService};
use crate::stats::reporter::{StatsReport, StatsReporter};

/// Shared application state
pub struct AppState {
    pub listing: ListingService,
    pub reporter: StatsReporter,
    pub locale: Locale,
}

// ─── Wire types ──────────────────────────────────────────────────

/// Query string of `GET /nodes`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NodesQuery {
    #[serde(default)]
    pub path: String,

    #[serde(default, rename = "sortField")]
    pub sort_field: String,

    #[serde(default, rename = "sortOrder")]
    pub sort_order: String,
}

/// Entries on success, a localised "no data" string on failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NodesPayload {
    Entries(Vec<FormattedEntry>),
    Message(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodesResponse {
    #[serde(rename = "serverIsSucceed")]
    pub is_succeed: bool,

    #[serde(rename = "serverErrorText")]
    pub error_text: String,

    pub nodes: NodesPayload,

    /// Seconds spent handling the request
    #[serde(rename = "loadTime")]
    pub load_time: f64,
}

impl NodesResponse {
    fn success(nodes: Vec<FormattedEntry>, elapsed: Duration) -> Self {
        Self {
            is_succeed: true,
            error_text: String::new(),
            nodes: NodesPayload::Entries(nodes),
            load_time: elapsed.as_secs_f64(),
        }
    }

    fn failure(error: &AppError, labels: Labels, elapsed: Duration) -> Self {
        Self {
            is_succeed: false,
            error_text: format!("{}: {error}", labels.server_error),
            nodes: NodesPayload::Message(labels.no_data.to_string()),
            load_time: elapsed.as_secs_f64(),
        }
    }
}

// ─── Route builder ───────────────────────────────────────────────

pub fn build_router(state: Arc<AppState>, static_dir: &Path) -> Router {
    let assets = ServeDir::new(static_dir);

    Router::new()
        .route("/nodes", get(get_nodes))
        .route("/health", get(health))
        .nest_service("/dist", assets.clone())
        .fallback_service(assets)
        .with_state(state)
}

// ─── Handlers ────────────────────────────────────────────────────

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn get_nodes(
    State(state): State<Arc<AppState>>,
    Query(query): Query<NodesQuery>,
) -> Json<NodesResponse> {
    let started: Instant = Instant::now();

    match list_nodes(&state.listing, &query).await {
        Ok(listing) => {
            let nodes: Vec<FormattedEntry> = listing.formatted(state.locale);
            let elapsed: Duration = started.elapsed();

            state
                .reporter
                .spawn_report(StatsReport::new(listing.total_size, elapsed, &listing.root));

            Json(NodesResponse::success(nodes, elapsed))
        }

        Err(e) => {
            warn!(
                marker = "NODES_REQUEST",
                operation_type = "nodes_failure",
                path = %query.path,
                fatal = e.is_fatal(),
                error = %e,
                "Listing request failed"
            );

            Json(NodesResponse::failure(
                &e,
                Labels::for_locale(state.locale),
                started.elapsed(),
            ))
        }
    }
}

async fn list_nodes(service: &ListingService, query: &NodesQuery) -> Result<Listing, AppError> {
    let spec: SortSpec = SortSpec::from_params(&query.sort_field, &query.sort_order)?;

    service.list(&query.path, spec).await
}

// ─── Server startup ──────────────────────────────────────────────

/// Binds `host:port`. Hostnames are resolved; IPv6 literals may be bracketed.
pub async fn bind_listener(cfg: &ServerConfig) -> Result<TcpListener, AppError> {
    let host: &str = cfg.host.trim();
    let host: &str = host
        .strip_prefix('[')
        .and_then(|h| h.strip_suffix(']'))
        .unwrap_or(host);

    TcpListener::bind((host, cfg.port)).await.map_err(|e| {
        AppError::Other(format!("Failed to bind {}:{}: {e}", cfg.host, cfg.port))
    })
}

/// Bind and serve until Ctrl-C.
pub async fn serve(cfg: &ServerConfig, state: Arc<AppState>) -> Result<(), AppError> {
    let router: Router = build_router(state, &cfg.static_dir);
    let listener: TcpListener = bind_listener(cfg).await?;
    let addr: SocketAddr = listener.local_addr()?;

    info!(
        %addr,
        static_dir = %cfg.static_dir.display(),
        version = env!("CARGO_PKG_VERSION"),
        "file-explorer listening"
    );

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for Ctrl-C; serving until killed");
        std::future::pending::<()>().await;
    }

    info!("Ctrl-C received; shutting down gracefully");
}
