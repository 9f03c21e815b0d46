//! Generic proxy handler shared by every endpoint in the route table.

use axum::{
    extract::State,
    http::{StatusCode, Uri},
    response::{IntoResponse, Response},
};

use crate::http::response::{relay, NODE_REQUEST_FAILED};
use crate::http::server::AppState;

/// Forward the request to the node endpoint registered for its path.
///
/// Any inbound method is accepted; the node always gets a GET.
pub async fn proxy_handler(State(state): State<AppState>, uri: Uri) -> Response {
    let Some(endpoint) = state.routes.lookup(uri.path()) else {
        tracing::warn!(path = %uri.path(), "No proxy endpoint matched");
        return StatusCode::NOT_FOUND.into_response();
    };

    let node_url = state.node.url_for(endpoint, uri.query());

    tracing::info!(
        request = %uri,
        node_url = %node_url,
        timeout = ?state.node.timeout(),
        "Proxying request to node"
    );

    match state.node.get(&node_url).await {
        Ok(upstream) => relay(upstream, node_url).await,
        Err(e) => {
            tracing::error!(node_url = %node_url, error = %e, "Request to node failed");
            (StatusCode::INTERNAL_SERVER_ERROR, NODE_REQUEST_FAILED).into_response()
        }
    }
}
