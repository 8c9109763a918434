//! # HTTP Servers
//!
//! [`ApiServer`] serves the resource API, [`BridgeServer`] serves the
//! WebSocket bridge. Both share the origin policy, request tracing and
//! graceful shutdown on ctrl-c or SIGTERM.

use std::future::Future;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::bridge::{bridge_routes, BridgeState};
use crate::observability::{Event, MetricsRegistry};
use crate::rest_api::{api_routes, ApiState};

use super::config::ServerConfig;
use super::observability_routes::{health_routes, observability_routes};
use super::origin::{apply_origin_policy, OriginPolicy};

/// Resource API server
pub struct ApiServer {
    config: ServerConfig,
    state: Arc<ApiState>,
    metrics: Arc<MetricsRegistry>,
}

impl ApiServer {
    pub fn new(config: ServerConfig, state: Arc<ApiState>, metrics: Arc<MetricsRegistry>) -> Self {
        Self {
            config,
            state,
            metrics,
        }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Build the full router
    pub fn router(&self) -> Router {
        let routes = api_routes(Arc::clone(&self.state)).merge(health_routes());

        apply_origin_policy(
            routes,
            OriginPolicy::new(&self.config.cors_origins),
            Arc::clone(&self.metrics),
        )
        .layer(TraceLayer::new_for_http())
    }

    /// Bind the configured address and serve until a shutdown signal
    pub async fn run(self) -> std::io::Result<()> {
        let listener = TcpListener::bind(self.config.api_addr()).await?;
        self.serve(listener).await
    }

    /// Serve on an already bound listener until a shutdown signal
    pub async fn serve(self, listener: TcpListener) -> std::io::Result<()> {
        self.serve_with_shutdown(listener, shutdown_signal()).await
    }

    pub async fn serve_with_shutdown<F>(self, listener: TcpListener, signal: F) -> std::io::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = listener.local_addr()?;
        info!(event = %Event::ApiServing, %addr, "resource API listening");

        axum::serve(listener, self.router())
            .with_graceful_shutdown(signal)
            .await?;

        info!(event = %Event::ShutdownComplete, server = "api", "resource API stopped");
        Ok(())
    }
}

/// WebSocket bridge server
pub struct BridgeServer {
    config: ServerConfig,
    state: Arc<BridgeState>,
}

impl BridgeServer {
    pub fn new(config: ServerConfig, state: Arc<BridgeState>) -> Self {
        Self { config, state }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Build the full router
    pub fn router(&self) -> Router {
        let metrics = Arc::clone(&self.state.metrics);
        let routes = bridge_routes(Arc::clone(&self.state))
            .merge(observability_routes(Arc::clone(&metrics)));

        apply_origin_policy(routes, OriginPolicy::new(&self.config.cors_origins), metrics)
            .layer(TraceLayer::new_for_http())
    }

    /// Bind the configured address and serve until a shutdown signal
    pub async fn run(self) -> std::io::Result<()> {
        let listener = TcpListener::bind(self.config.bridge_addr()).await?;
        self.serve(listener).await
    }

    /// Serve on an already bound listener until a shutdown signal
    pub async fn serve(self, listener: TcpListener) -> std::io::Result<()> {
        self.serve_with_shutdown(listener, shutdown_signal()).await
    }

    pub async fn serve_with_shutdown<F>(self, listener: TcpListener, signal: F) -> std::io::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = listener.local_addr()?;
        info!(event = %Event::BridgeServing, %addr, "bridge listening");

        axum::serve(listener, self.router())
            .with_graceful_shutdown(signal)
            .await?;

        info!(event = %Event::ShutdownComplete, server = "bridge", "bridge stopped");
        Ok(())
    }
}

/// Resolve on ctrl-c or SIGTERM
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!(error = %err, "unable to install ctrl+c handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                error!(error = %err, "unable to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!(event = %Event::ShutdownStart, "shutdown signal received");
}
