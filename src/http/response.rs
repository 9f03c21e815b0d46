//! Relaying node responses to the caller.
//!
//! # Responsibilities
//! - Stream the node body to the caller byte-for-byte
//! - Answer 500 if the body fails before anything was sent
//! - Log partial failures and client disconnects with the byte count
//!
//! # Design Decisions
//! - The node status and headers are not propagated; success is always 200
//! - The first chunk is awaited before the response head goes out, so a
//!   failure at that point can still become an error response
//! - Once bytes are out, a failure aborts the body and the connection closes

use std::pin::Pin;
use std::task::{ready, Context, Poll};

use axum::{
    body::{Body, Bytes},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use futures_util::stream::{BoxStream, Stream, StreamExt};

/// Body of the 500 answered when the node cannot be reached.
pub const NODE_REQUEST_FAILED: &str = "Request to node failed";

/// Body of the 500 answered when the node body fails before any byte was sent.
pub const NODE_RELAY_FAILED: &str = "Copying response from node to client failed";

/// Relay a node response. Status and headers of the node are dropped.
pub async fn relay(upstream: reqwest::Response, node_url: String) -> Response {
    relay_stream(upstream.bytes_stream().boxed(), node_url).await
}

/// Relay any byte stream as the response body.
pub async fn relay_stream<E>(mut stream: BoxStream<'static, Result<Bytes, E>>, node_url: String) -> Response
where
    E: std::error::Error + Send + Sync + 'static,
{
    let first = match stream.next().await {
        Some(Ok(chunk)) => chunk,
        Some(Err(e)) => {
            tracing::error!(
                node_url = %node_url,
                bytes_written = 0,
                error = %e,
                "Copying response from node to client failed"
            );
            return (StatusCode::INTERNAL_SERVER_ERROR, NODE_RELAY_FAILED).into_response();
        }
        None => return Response::new(Body::empty()),
    };

    Response::new(Body::from_stream(RelayBody::new(first, stream, node_url)))
}

/// Body stream that counts relayed bytes.
struct RelayBody<E> {
    pending: Option<Bytes>,
    inner: BoxStream<'static, Result<Bytes, E>>,
    node_url: String,
    bytes_written: u64,
    finished: bool,
}

impl<E> RelayBody<E> {
    fn new(first: Bytes, inner: BoxStream<'static, Result<Bytes, E>>, node_url: String) -> Self {
        Self {
            pending: Some(first),
            inner,
            node_url,
            bytes_written: 0,
            finished: false,
        }
    }
}

impl<E: std::fmt::Display> Stream for RelayBody<E> {
    type Item = Result<Bytes, E>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();

        if let Some(chunk) = this.pending.take() {
            this.bytes_written += chunk.len() as u64;
            return Poll::Ready(Some(Ok(chunk)));
        }

        match ready!(this.inner.poll_next_unpin(cx)) {
            Some(Ok(chunk)) => {
                this.bytes_written += chunk.len() as u64;
                Poll::Ready(Some(Ok(chunk)))
            }
            Some(Err(e)) => {
                this.finished = true;
                tracing::error!(
                    node_url = %this.node_url,
                    bytes_written = this.bytes_written,
                    error = %e,
                    "Copying response from node to client failed after bytes were written"
                );
                Poll::Ready(Some(Err(e)))
            }
            None => {
                this.finished = true;
                tracing::debug!(
                    node_url = %this.node_url,
                    bytes_written = this.bytes_written,
                    "Node response relayed"
                );
                Poll::Ready(None)
            }
        }
    }
}

impl<E> Drop for RelayBody<E> {
    fn drop(&mut self) {
        if !self.finished {
            tracing::warn!(
                node_url = %self.node_url,
                bytes_written = self.bytes_written,
                "Client went away before the node response was fully relayed"
            );
        }
    }
}
