// ABOUTME: HTTP server assembly and lifecycle
// ABOUTME: Builds the axum router with its middleware stack and serves it until shutdown
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Vitals API Contributors

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{middleware, Router};
use tokio::net::TcpListener;
use tracing::{error, info};

use crate::errors::{AppError, AppResult};
use crate::middleware::{
    propagate_request_id_layer, request_timeout, set_request_id_layer, setup_cors, trace_layer,
};
use crate::models::MetricKind;
use crate::routes::{HealthRoutes, MetricRoutes};
use crate::resources::ServerResources;

/// Build the complete application router
///
/// Layers run outermost first: request id assignment, tracing, request id
/// propagation, CORS, then the request deadline.
pub fn build_router(resources: &Arc<ServerResources>) -> Router {
    let http = &resources.config.http;

    Router::new()
        .merge(HealthRoutes::routes(Arc::clone(resources)))
        .merge(MetricRoutes::routes(Arc::clone(resources)))
        .layer(middleware::from_fn_with_state(
            http.request_timeout(),
            request_timeout,
        ))
        .layer(setup_cors(http))
        .layer(propagate_request_id_layer())
        .layer(trace_layer())
        .layer(set_request_id_layer())
}

/// Bind the configured port and serve until Ctrl+C or SIGTERM
///
/// # Errors
///
/// Returns an error if the port cannot be bound or the server fails
pub async fn serve(resources: Arc<ServerResources>) -> AppResult<()> {
    let port = resources.config.http.port;
    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    log_endpoints(port);
    info!("HTTP server listening on http://{addr}");

    axum::serve(listener, build_router(&resources))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::internal(format!("HTTP server error: {e}")))?;

    info!("HTTP server stopped");
    Ok(())
}

fn log_endpoints(port: u16) {
    info!("=== Available API Endpoints ===");
    info!("   Health:  GET http://127.0.0.1:{port}/health");
    info!("   Ready:   GET http://127.0.0.1:{port}/ready");
    for kind in MetricKind::ALL {
        let segment = kind.path_segment();
        info!("   {segment}: GET http://127.0.0.1:{port}/{segment}/{{list|id/{{token}}|date/{{YYYY-MM-DD}}}}");
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {e}");
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
                error!("Failed to listen for SIGTERM: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received Ctrl+C, shutting down"),
        () = terminate => info!("Received SIGTERM, shutting down"),
    }
}
