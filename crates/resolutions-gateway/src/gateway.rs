//! Main Gateway implementation
//!
//! Routes the resolutions REST API onto the core handler.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::{header, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use resolutions_core::handler::IS_DONE_INVALID;
use resolutions_core::{
    CreateResolution, ListFilter, Resolution, ResolutionError, ResolutionHandler, ResolutionId,
    ResolutionList, ResolutionStore, UpdateResolution, RESOURCE_PATH,
};
use serde_json::Value;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::GatewayConfig;
use crate::error::ApiError;
use crate::{GatewayError, Result};

/// Detail reported when the path id is not an integer
pub const ID_NOT_INTEGER: &str = "id must be an integer";

/// Gateway state shared across handlers
#[derive(Debug, Clone)]
pub struct GatewayState {
    pub config: GatewayConfig,
    pub handler: ResolutionHandler,
    pub shutdown_tx: watch::Sender<bool>,
}

impl GatewayState {
    pub fn new(config: GatewayConfig, handler: ResolutionHandler) -> Self {
        let (shutdown_tx, _) = watch::channel(false);

        Self {
            config,
            handler,
            shutdown_tx,
        }
    }
}

/// Main Gateway
#[derive(Debug, Clone)]
pub struct Gateway {
    state: Arc<GatewayState>,
}

impl Gateway {
    /// Create a gateway over a fresh, empty store
    pub fn new(config: GatewayConfig) -> Self {
        Self::with_handler(config, ResolutionHandler::new(ResolutionStore::shared()))
    }

    /// Create a gateway over an existing handler
    pub fn with_handler(config: GatewayConfig, handler: ResolutionHandler) -> Self {
        Self {
            state: Arc::new(GatewayState::new(config, handler)),
        }
    }

    /// Create a gateway with default configuration
    pub fn default_config() -> Self {
        Self::new(GatewayConfig::default())
    }

    /// Get gateway state
    pub fn state(&self) -> Arc<GatewayState> {
        self.state.clone()
    }

    /// Build the Axum router
    pub fn build_router(&self) -> Router {
        let item_path = format!("{}/:id", RESOURCE_PATH);

        let mut router = Router::new()
            .route("/health", get(Self::handle_health))
            .route("/status", get(Self::handle_status))
            .route(
                RESOURCE_PATH,
                get(Self::handle_list).post(Self::handle_create),
            )
            .route(
                &item_path,
                get(Self::handle_get)
                    .put(Self::handle_update)
                    .delete(Self::handle_delete),
            )
            .with_state(self.state.clone());

        if self.state.config.request_tracing {
            router = router.layer(TraceLayer::new_for_http());
        }
        if self.state.config.cors {
            router = router.layer(CorsLayer::permissive());
        }

        router
    }

    /// Bind the configured address and serve until shutdown
    pub async fn start(&self) -> Result<()> {
        let addr = self.state.config.socket_addr()?;
        let listener = TcpListener::bind(addr).await?;

        self.start_on(listener).await
    }

    /// Serve on an already bound listener until shutdown
    pub async fn start_on(&self, listener: TcpListener) -> Result<()> {
        let shutdown_rx = self.state.shutdown_tx.subscribe();
        let router = self.build_router();

        tracing::info!("Resolutions gateway listening on {}", listener.local_addr()?);

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal(shutdown_rx))
            .await
            .map_err(|e| GatewayError::Internal(e.to_string()))?;

        tracing::info!("Gateway stopped");
        Ok(())
    }

    /// Shutdown the gateway
    pub fn shutdown(&self) {
        self.state.shutdown_tx.send_replace(true);
        tracing::info!("Gateway shutdown initiated");
    }

    // HTTP handlers

    async fn handle_health() -> impl IntoResponse {
        Json(serde_json::json!({
            "status": "healthy",
            "version": crate::VERSION
        }))
    }

    async fn handle_status(State(state): State<Arc<GatewayState>>) -> impl IntoResponse {
        Json(serde_json::json!({
            "version": crate::VERSION,
            "resolutions": state.handler.count(),
        }))
    }

    async fn handle_list(
        State(state): State<Arc<GatewayState>>,
        query: std::result::Result<Query<Vec<(String, String)>>, QueryRejection>,
    ) -> std::result::Result<Json<ResolutionList>, ApiError> {
        let Query(pairs) = query.map_err(|e| {
            tracing::warn!("Rejected list query: {}", e);
            ResolutionError::validation(IS_DONE_INVALID)
        })?;
        let filter = ListFilter::from_pairs(pairs);

        Ok(Json(state.handler.list(&filter)?))
    }

    async fn handle_get(
        State(state): State<Arc<GatewayState>>,
        id: std::result::Result<Path<ResolutionId>, PathRejection>,
    ) -> std::result::Result<Json<Resolution>, ApiError> {
        let id = path_id(id)?;
        Ok(Json(state.handler.get(id)?))
    }

    async fn handle_create(
        State(state): State<Arc<GatewayState>>,
        body: std::result::Result<Json<CreateResolution>, JsonRejection>,
    ) -> std::result::Result<impl IntoResponse, ApiError> {
        let request = body_or_default(body);
        let created = state.handler.create(request)?;

        Ok((
            StatusCode::CREATED,
            [(header::LOCATION, created.location)],
            Json(created.resolution),
        ))
    }

    async fn handle_update(
        State(state): State<Arc<GatewayState>>,
        id: std::result::Result<Path<ResolutionId>, PathRejection>,
        body: std::result::Result<Json<Value>, JsonRejection>,
    ) -> std::result::Result<Json<Resolution>, ApiError> {
        let id = path_id(id)?;
        let request = update_request(body)?;

        Ok(Json(state.handler.update(id, request)?))
    }

    async fn handle_delete(
        State(state): State<Arc<GatewayState>>,
        id: std::result::Result<Path<ResolutionId>, PathRejection>,
    ) -> std::result::Result<StatusCode, ApiError> {
        let id = path_id(id)?;
        state.handler.delete(id)?;

        Ok(StatusCode::NO_CONTENT)
    }
}

fn path_id(
    id: std::result::Result<Path<ResolutionId>, PathRejection>,
) -> std::result::Result<ResolutionId, ResolutionError> {
    match id {
        Ok(Path(id)) => Ok(id),
        Err(e) => {
            tracing::warn!("Rejected path id: {}", e);
            Err(ResolutionError::validation(ID_NOT_INTEGER))
        }
    }
}

/// An unreadable create body counts as an empty one; the handler then
/// reports the missing title.
fn body_or_default<T: Default>(body: std::result::Result<Json<T>, JsonRejection>) -> T {
    match body {
        Ok(Json(body)) => body,
        Err(e) => {
            tracing::warn!("Rejected request body: {}", e);
            T::default()
        }
    }
}

/// Read an update body field by field so one mistyped field does not
/// hide the others. A non-boolean `isDone` is rejected outright; an id
/// or title of the wrong type counts as missing.
fn update_request(
    body: std::result::Result<Json<Value>, JsonRejection>,
) -> std::result::Result<UpdateResolution, ResolutionError> {
    let fields = match body {
        Ok(Json(Value::Object(fields))) => fields,
        Ok(Json(other)) => {
            tracing::warn!("Rejected update body: expected an object, got {}", other);
            return Ok(UpdateResolution::default());
        }
        Err(e) => {
            tracing::warn!("Rejected update body: {}", e);
            return Ok(UpdateResolution::default());
        }
    };

    let is_done = match fields.get("isDone") {
        None => false,
        Some(Value::Bool(flag)) => *flag,
        Some(other) => {
            tracing::warn!("Rejected isDone in update body: {}", other);
            return Err(ResolutionError::validation(IS_DONE_INVALID));
        }
    };

    Ok(UpdateResolution {
        id: fields.get("id").and_then(Value::as_i64),
        title: fields.get("title").and_then(Value::as_str).map(str::to_string),
        is_done,
    })
}

async fn shutdown_signal(mut shutdown_rx: watch::Receiver<bool>) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    let requested = async {
        let _ = shutdown_rx.wait_for(|stopped| *stopped).await;
    };

    tokio::select! {
        () = ctrl_c => tracing::info!("Received Ctrl+C, shutting down"),
        () = terminate => tracing::info!("Received SIGTERM, shutting down"),
        () = requested => tracing::info!("Shutdown requested"),
    }
}
