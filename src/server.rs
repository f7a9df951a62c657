//! HTTP surface: axum router, handlers and server bootstrap.
//!
//! | Method | Path                     | Query       | Handler              |
//! |--------|--------------------------|-------------|----------------------|
//! | GET    | `/`                      |             | service info + stats |
//! | GET    | `/mcp/components`        | `q?`        | component summaries  |
//! | GET    | `/mcp/component/{name}`  | `section?`  | record or section    |
//! | GET    | `/mcp/tokens`            | `q?`        | design tokens        |
//! | GET    | `/mcp/search`            | `q`         | components + tokens  |
//!
//! Every handler pulls the dataset from the shared [`DatasetStore`], which
//! reads the file on the first request only.

use std::any::Any;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    extract::{
        rejection::{PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::Uri,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::Value;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::ServerConfig;
use crate::data::DatasetStore;
use crate::error::ApiError;
use crate::query::{self, SearchResponse, ServiceInfo, TokensResponse};

// ─── Shared state ───────────────────────────────────────────────────────────

/// State shared by every handler. The dataset is read-only once loaded.
pub struct AppState {
    pub store: DatasetStore,
}

pub type SharedState = Arc<AppState>;

/// Query string as raw pairs, in request order.
///
/// A parameter only has a value when it appears exactly once; a repeated
/// parameter carries a list, not a string, and reads as absent.
#[derive(Debug, Default, Deserialize)]
#[serde(transparent)]
pub struct QueryPairs(Vec<(String, String)>);

impl QueryPairs {
    pub fn single(&self, name: &str) -> Option<&str> {
        let mut values = self
            .0
            .iter()
            .filter(|(key, _)| key == name)
            .map(|(_, value)| value.as_str());
        match (values.next(), values.next()) {
            (Some(value), None) => Some(value),
            _ => None,
        }
    }
}

// ─── Server bootstrap ──────────────────────────────────────────────────────

/// Build the router over a dataset store.
pub fn router(store: DatasetStore) -> Router {
    let state: SharedState = Arc::new(AppState { store });

    Router::new()
        .route("/", get(info_handler))
        .route("/mcp/components", get(components_handler))
        .route("/mcp/component/{name}", get(component_handler))
        .route("/mcp/tokens", get(tokens_handler))
        .route("/mcp/search", get(search_handler))
        .fallback(fallback_handler)
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Bind the listener and serve until the process exits.
pub async fn start_server(config: ServerConfig) -> Result<()> {
    let app = router(DatasetStore::new(&config.data_path));

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    let base = format!("http://{}:{}", config.display_host(), config.port);
    info!("PrimeVue MCP running on {}", base);
    info!("API documentation: {}/", base);
    info!("Search: {}/mcp/search?q=button", base);
    info!(
        path = %config.data_path.display(),
        "dataset will be loaded on first request"
    );

    axum::serve(listener, app).await?;

    Ok(())
}

// ─── Handlers ───────────────────────────────────────────────────────────────

async fn info_handler(State(state): State<SharedState>) -> Result<Json<ServiceInfo>, ApiError> {
    let dataset = state.store.get().await?;
    Ok(Json(query::service_info(&dataset)))
}

async fn components_handler(
    State(state): State<SharedState>,
    params: Result<Query<QueryPairs>, QueryRejection>,
) -> Result<Json<Vec<query::ComponentSummary>>, ApiError> {
    let Query(params) = params?;
    let dataset = state.store.get().await?;
    Ok(Json(query::list_components(&dataset, params.single("q"))))
}

async fn component_handler(
    State(state): State<SharedState>,
    name: Result<Path<String>, PathRejection>,
    params: Result<Query<QueryPairs>, QueryRejection>,
) -> Result<Json<Value>, ApiError> {
    let Path(name) = name?;
    let Query(params) = params?;
    let dataset = state.store.get().await?;
    query::get_component(&dataset, &name, params.single("section")).map(Json)
}

async fn tokens_handler(
    State(state): State<SharedState>,
    params: Result<Query<QueryPairs>, QueryRejection>,
) -> Result<Json<TokensResponse>, ApiError> {
    let Query(params) = params?;
    let dataset = state.store.get().await?;
    Ok(Json(query::tokens(&dataset, params.single("q"))))
}

async fn search_handler(
    State(state): State<SharedState>,
    params: Result<Query<QueryPairs>, QueryRejection>,
) -> Result<Json<SearchResponse>, ApiError> {
    let Query(params) = params?;
    let dataset = state.store.get().await?;
    query::search(&dataset, params.single("q")).map(Json)
}

async fn fallback_handler(uri: Uri) -> ApiError {
    ApiError::UnknownRoute(uri.path().to_string())
}

/// Turn a handler panic into the generic 500 body.
fn handle_panic(payload: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };
    ApiError::Internal(detail).into_response()
}
