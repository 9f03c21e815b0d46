//! Per-connection serving and lifecycle tracking.
//!
//! # Responsibilities
//! - Drive one TCP connection through hyper (HTTP/1.1 and HTTP/2)
//! - Enforce the header read timeout, the write timeout and the keep-alive
//!   idle timeout
//! - Finish in-flight responses before closing on shutdown
//! - Track open connections so shutdown can wait for them

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use axum::Router;
use hyper::{body::Incoming, Request};
use hyper_util::{
    rt::{TokioExecutor, TokioIo, TokioTimer},
    server::conn::auto,
};
use tokio::net::TcpStream;
use tokio::sync::{broadcast, watch};
use tokio::time::{Duration, Instant};
use tower::ServiceExt;

use crate::config::ServerTimeouts;
use crate::net::deadline::WriteDeadline;

/// Global atomic counter for connection IDs.
/// Using relaxed ordering is sufficient since we only need uniqueness, not synchronization.
static CONNECTION_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Unique identifier for a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(u64);

impl ConnectionId {
    /// Generate a new unique connection ID.
    pub fn new() -> Self {
        Self(CONNECTION_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

/// Tracks active connections for graceful shutdown.
#[derive(Debug, Clone)]
pub struct ConnectionTracker {
    active_count: Arc<AtomicU64>,
}

impl ConnectionTracker {
    pub fn new() -> Self {
        Self {
            active_count: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Record a new active connection. Returns a guard that decrements on drop.
    pub fn track(&self) -> ConnectionGuard {
        self.active_count.fetch_add(1, Ordering::SeqCst);
        ConnectionGuard {
            active_count: Arc::clone(&self.active_count),
            id: ConnectionId::new(),
        }
    }

    /// Get current active connection count.
    pub fn active_count(&self) -> u64 {
        self.active_count.load(Ordering::SeqCst)
    }

    /// Wait until all connections are closed. Callers bound this with a timeout.
    pub async fn wait_for_drain(&self) {
        while self.active_count.load(Ordering::SeqCst) > 0 {
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
    }
}

impl Default for ConnectionTracker {
    fn default() -> Self {
        Self::new()
    }
}

/// Guard that tracks a connection's lifetime.
/// Decrements active count when dropped.
#[derive(Debug)]
pub struct ConnectionGuard {
    active_count: Arc<AtomicU64>,
    id: ConnectionId,
}

impl ConnectionGuard {
    pub fn id(&self) -> ConnectionId {
        self.id
    }
}

impl Drop for ConnectionGuard {
    fn drop(&mut self) {
        self.active_count.fetch_sub(1, Ordering::SeqCst);
        tracing::trace!(connection_id = %self.id, "Connection closed");
    }
}

/// Last request activity on a connection.
#[derive(Debug, Clone)]
struct IdleTimer {
    last_activity: Arc<watch::Sender<Instant>>,
    limit: Duration,
}

impl IdleTimer {
    fn new(limit: Duration) -> Self {
        let (tx, _) = watch::channel(Instant::now());
        Self {
            last_activity: Arc::new(tx),
            limit,
        }
    }

    fn touch(&self) {
        self.last_activity.send_replace(Instant::now());
    }

    /// Resolves once no activity was recorded for `limit`.
    async fn expired(&self) {
        loop {
            let deadline = *self.last_activity.borrow() + self.limit;
            tokio::time::sleep_until(deadline).await;
            if *self.last_activity.borrow() + self.limit <= Instant::now() {
                return;
            }
        }
    }
}

/// Serve one accepted connection until it closes.
///
/// An idle timeout or a shutdown signal asks hyper to close the connection
/// after the in-flight response. A client that stops reading for longer than
/// the write timeout has its connection dropped mid-response.
pub async fn serve_connection(
    stream: TcpStream,
    peer_addr: SocketAddr,
    app: Router,
    timeouts: ServerTimeouts,
    guard: ConnectionGuard,
    mut shutdown: broadcast::Receiver<()>,
) {
    let idle = IdleTimer::new(timeouts.idle);

    let service = {
        let idle = idle.clone();
        hyper::service::service_fn(move |request: Request<Incoming>| {
            let app = app.clone();
            let idle = idle.clone();
            idle.touch();
            async move {
                let response = app.oneshot(request).await;
                idle.touch();
                response
            }
        })
    };

    let mut builder = auto::Builder::new(TokioExecutor::new());
    builder
        .http1()
        .timer(TokioTimer::new())
        .header_read_timeout(timeouts.read);

    let io = TokioIo::new(WriteDeadline::new(stream, timeouts.write));
    let conn = builder.serve_connection(io, service);
    tokio::pin!(conn);

    let mut closing = false;
    loop {
        tokio::select! {
            result = conn.as_mut() => {
                if let Err(e) = result {
                    tracing::debug!(connection_id = %guard.id(), peer_addr = %peer_addr, error = %e, "Connection ended with error");
                }
                break;
            }
            _ = idle.expired(), if !closing => {
                tracing::debug!(connection_id = %guard.id(), peer_addr = %peer_addr, "Closing idle connection");
                closing = true;
                conn.as_mut().graceful_shutdown();
            }
            _ = shutdown.recv(), if !closing => {
                closing = true;
                conn.as_mut().graceful_shutdown();
            }
        }
    }
}
