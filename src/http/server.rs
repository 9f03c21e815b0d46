//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the proxy endpoints and the static site
//! - Wire up middleware (tracing, request ID, response timeout)
//! - Accept connections and hand them to the connection layer
//! - Drain open connections on shutdown

use std::io;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::Request,
    routing::any,
    Router,
};
use thiserror::Error;
use tokio::sync::broadcast;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::ServiceConfig;
use crate::http::assets::{site_handler, Site};
use crate::http::proxy::proxy_handler;
use crate::net::connection::{serve_connection, ConnectionTracker};
use crate::net::listener::{Listener, ListenerError};
use crate::node::{NodeClient, NodeError};
use crate::routing::RouteTable;

/// Pause after an accept error that is not specific to one connection.
const ACCEPT_ERROR_BACKOFF: Duration = Duration::from_secs(1);

/// Errors that stop the server.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error(transparent)]
    Node(#[from] NodeError),

    #[error(transparent)]
    Listener(#[from] ListenerError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub node: NodeClient,
    pub routes: Arc<RouteTable>,
    /// `None` in api-only mode.
    pub site: Option<Arc<Site>>,
}

/// HTTP server for the explorer.
pub struct HttpServer {
    router: Router,
    config: ServiceConfig,
}

impl HttpServer {
    /// Create a new HTTP server serving `routes` with the given configuration.
    pub fn new(config: ServiceConfig, routes: RouteTable) -> Result<Self, ServerError> {
        let node = NodeClient::new(&config.upstream)?;

        for endpoint in routes.endpoints() {
            tracing::info!(
                path = %endpoint.external_path,
                node_path = %endpoint.upstream_path,
                args = ?endpoint.forwarded_params,
                "Endpoint proxied to node"
            );
        }

        let site = if config.site.api_only {
            tracing::info!("Running in api-only mode");
            None
        } else {
            tracing::info!(dist_dir = %config.site.dist_dir.display(), "Serving static content");
            Some(Arc::new(Site::new(&config.site.dist_dir)))
        };

        let state = AppState {
            node,
            routes: Arc::new(routes),
            site,
        };

        let router = Self::build_router(&config, state);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &ServiceConfig, state: AppState) -> Router {
        let mut router = Router::new();
        for endpoint in state.routes.endpoints() {
            router = router.route(&endpoint.external_path, any(proxy_handler));
        }
        if state.site.is_some() {
            router = router.fallback(site_handler);
        }

        router
            .with_state(state)
            .layer(TimeoutLayer::new(config.server.write))
            .layer(TraceLayer::new_for_http().make_span_with(|request: &Request| {
                let request_id = request
                    .headers()
                    .get("x-request-id")
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or("unknown");
                tracing::info_span!(
                    "request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = %request_id,
                )
            }))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    /// The assembled router, for driving requests without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server, accepting connections on the given listener until
    /// `shutdown` fires.
    pub async fn run(
        self,
        listener: Listener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), ServerError> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "Running skycoin explorer on http://{}", addr);

        let tracker = ConnectionTracker::new();

        loop {
            tokio::select! {
                accepted = listener.accept() => {
                    let (stream, peer_addr, permit) = match accepted {
                        Ok(conn) => conn,
                        Err(ListenerError::Accept(e)) => {
                            tracing::warn!(error = %e, "Failed to accept connection");
                            let delay = accept_retry_delay(&e);
                            if !delay.is_zero() {
                                tokio::time::sleep(delay).await;
                            }
                            continue;
                        }
                        Err(e) => return Err(e.into()),
                    };

                    let app = self.router.clone();
                    let timeouts = self.config.server.clone();
                    let guard = tracker.track();
                    let conn_shutdown = shutdown.resubscribe();

                    tokio::spawn(async move {
                        let _permit = permit;
                        serve_connection(stream, peer_addr, app, timeouts, guard, conn_shutdown).await;
                    });
                }
                _ = shutdown.recv() => {
                    tracing::info!("Shutdown signal received, no longer accepting connections");
                    break;
                }
            }
        }

        let grace = self.config.server.shutdown_grace;
        if tokio::time::timeout(grace, tracker.wait_for_drain()).await.is_err() {
            tracing::warn!(
                open_connections = tracker.active_count(),
                "Shutdown grace period elapsed with connections still open"
            );
        }

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }
}

/// How long to wait before accepting again. Errors tied to a single peer
/// retry at once; anything else (e.g. running out of file descriptors)
/// fails again immediately, so back off instead of spinning.
fn accept_retry_delay(error: &io::Error) -> Duration {
    match error.kind() {
        io::ErrorKind::ConnectionRefused
        | io::ErrorKind::ConnectionAborted
        | io::ErrorKind::ConnectionReset => Duration::ZERO,
        _ => ACCEPT_ERROR_BACKOFF,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_peer_errors_retry_immediately() {
        for kind in [
            io::ErrorKind::ConnectionAborted,
            io::ErrorKind::ConnectionReset,
            io::ErrorKind::ConnectionRefused,
        ] {
            assert_eq!(accept_retry_delay(&io::Error::from(kind)), Duration::ZERO);
        }
    }

    #[test]
    fn test_resource_exhaustion_backs_off() {
        let emfile = io::Error::other("Too many open files (os error 24)");
        assert_eq!(accept_retry_delay(&emfile), ACCEPT_ERROR_BACKOFF);

        let denied = io::Error::from(io::ErrorKind::PermissionDenied);
        assert_eq!(accept_retry_delay(&denied), ACCEPT_ERROR_BACKOFF);
    }
}
