//! HTTP server setup and dispatch.
//!
//! # Responsibilities
//! - Create the Axum router with a catch-all handler
//! - Wire up middleware (tracing, timeout, body limit, request ID)
//! - Dispatch requests through the pattern route table
//! - Intercept the CSV import path ahead of routing
//!
//! # Design Decisions
//! - Axum only provides the transport; method/path resolution happens in
//!   the crate's own route table so template semantics (declaration
//!   order, parameter capture) stay under our control
//! - The import endpoint is matched before body materialization so its
//!   body can stream
//! - No matching route answers 404 with an empty body

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    extract::{Request, State},
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::ServerConfig;
use crate::http::request;
use crate::import::CsvImporter;
use crate::routing::{RouteMatch, RouteTable, TemplateError};
use crate::store::Datastore;
use crate::tasks::{self, handlers, TaskRoute};

/// Application state injected into the dispatch handler.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<Datastore>,
    pub routes: Arc<RouteTable<TaskRoute>>,
    pub import_max_in_flight: usize,
}

/// HTTP server for the task API.
pub struct HttpServer {
    router: Router,
    config: ServerConfig,
}

impl HttpServer {
    /// Create a new HTTP server. Fails if a route template is malformed;
    /// that is a configuration error and surfaces before the listener
    /// starts.
    pub fn new(config: ServerConfig, store: Arc<Datastore>) -> Result<Self, TemplateError> {
        let routes = Arc::new(tasks::routes()?);
        let state = AppState {
            store,
            routes,
            import_max_in_flight: config.import.max_in_flight,
        };

        let router = Self::build_router(&config, state);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &ServerConfig, state: AppState) -> Router {
        Router::new()
            .route("/{*path}", any(dispatch))
            .route("/", any(dispatch))
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                    .layer(TraceLayer::new_for_http())
                    .layer(PropagateRequestIdLayer::x_request_id())
                    .layer(RequestBodyLimitLayer::new(config.listener.max_body_bytes))
                    .layer(TimeoutLayer::new(Duration::from_secs(
                        config.timeouts.request_secs,
                    ))),
            )
    }

    /// Run the server until the shutdown signal fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }
}

/// Catch-all handler: resolve the route table and invoke the matching
/// task handler.
async fn dispatch(State(state): State<AppState>, req: Request<Body>) -> Response {
    let method = req.method().clone();
    let target = req
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| req.uri().path().to_string());

    // Intercepted ahead of the route table so the body streams instead of
    // being materialized as JSON.
    if method == Method::POST && target == "/tasks/import-csv" {
        let importer = CsvImporter::new(state.store.clone(), state.import_max_in_flight);
        return importer.run(req.into_body());
    }

    let Some((route, matched)) = state.routes.lookup(&method, &target) else {
        return StatusCode::NOT_FOUND.into_response();
    };
    let route = *route;

    let body = request::materialize_json(req.into_body()).await;
    let query = matched
        .query
        .as_deref()
        .map(request::decode_query)
        .unwrap_or_default();

    match route {
        TaskRoute::List => handlers::list_tasks(&state.store, &query).await,
        TaskRoute::Create => handlers::create_task(&state.store, &body).await,
        TaskRoute::Update => {
            handlers::update_task(&state.store, param(&matched, "id"), &body).await
        }
        TaskRoute::Delete => handlers::delete_task(&state.store, param(&matched, "id")).await,
        TaskRoute::Complete => handlers::complete_task(&state.store, param(&matched, "id")).await,
    }
}

fn param<'a>(matched: &'a RouteMatch, name: &str) -> &'a str {
    matched.params.get(name).map(String::as_str).unwrap_or("")
}
