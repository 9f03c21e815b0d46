//! Static site serving: built assets, the app shell and legacy redirects.

use std::path::Path;

use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use tower::ServiceExt;
use tower_http::services::{ServeDir, ServeFile};

use crate::http::server::AppState;
use crate::routing::{SiteAction, SiteRoutes};

/// File served for every client-routed path.
pub const APP_SHELL: &str = "index.html";

/// Static site services, built once at startup.
#[derive(Debug, Clone)]
pub struct Site {
    routes: SiteRoutes,
    assets: ServeDir,
    app_shell: ServeFile,
}

impl Site {
    /// Serve the app built into `dist_dir`.
    ///
    /// A missing directory is not an error; requests then get 404.
    pub fn new(dist_dir: &Path) -> Self {
        Self {
            routes: SiteRoutes::default(),
            assets: ServeDir::new(dist_dir),
            app_shell: ServeFile::new(dist_dir.join(APP_SHELL)),
        }
    }
}

/// Fallback handler for every path that is not a proxy endpoint.
pub async fn site_handler(State(state): State<AppState>, request: Request) -> Response {
    let Some(site) = state.site.as_deref() else {
        return StatusCode::NOT_FOUND.into_response();
    };

    match site.routes.resolve(request.uri().path()) {
        SiteAction::Redirect(location) => moved_permanently(&location),
        SiteAction::AppShell => site.app_shell.clone().oneshot(request).await.into_response(),
        SiteAction::Assets => site.assets.clone().oneshot(request).await.into_response(),
    }
}

fn moved_permanently(location: &str) -> Response {
    match HeaderValue::from_str(location) {
        Ok(location) => (StatusCode::MOVED_PERMANENTLY, [(header::LOCATION, location)]).into_response(),
        Err(e) => {
            tracing::warn!(location = %location, error = %e, "Unrepresentable redirect location");
            StatusCode::BAD_REQUEST.into_response()
        }
    }
}
