//! Static site routes: assets, the app shell and legacy redirects.
//!
//! The web app resolves its own routes under `/app/`, so every path there
//! gets `index.html`. Older links used top-level `/block/`, `/transaction/`
//! and `/address/` paths and a `/blocks` listing; those are permanently
//! redirected into the app namespace.

use crate::routing::matcher::PathPattern;

/// Client-routed namespace served by the app shell.
pub const APP_PREFIX: &str = "/app/";

/// Legacy resource prefixes moved under [`APP_PREFIX`].
const LEGACY_RESOURCES: [(&str, &str, &str); 3] = [
    ("/block", "/block/", "/app/block/"),
    ("/transaction", "/transaction/", "/app/transaction/"),
    ("/address", "/address/", "/app/address/"),
];

/// What a site rule does with a matching request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SiteRule {
    Assets,
    AppShell,
    MovedTo(&'static str),
    RewritePrefix(&'static str),
}

/// Resolved action for a request path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SiteAction {
    /// Serve from the static asset directory.
    Assets,
    /// Serve the app's `index.html`.
    AppShell,
    /// Answer with 301 Moved Permanently to this location.
    Redirect(String),
}

/// Declarative table of non-API routes.
#[derive(Debug, Clone)]
pub struct SiteRoutes {
    rules: Vec<(PathPattern, SiteRule)>,
}

impl SiteRoutes {
    /// Resolve `path` against the most specific matching rule.
    pub fn resolve(&self, path: &str) -> SiteAction {
        let best = self
            .rules
            .iter()
            .filter(|(pattern, _)| pattern.matches(path))
            .max_by_key(|(pattern, _)| pattern.specificity());

        let Some((pattern, rule)) = best else {
            return SiteAction::Assets;
        };

        match rule {
            SiteRule::Assets => SiteAction::Assets,
            SiteRule::AppShell => SiteAction::AppShell,
            SiteRule::MovedTo(location) => SiteAction::Redirect((*location).to_string()),
            SiteRule::RewritePrefix(target) => {
                let rest = pattern.remainder(path).unwrap_or_default();
                SiteAction::Redirect(format!("{target}{rest}"))
            }
        }
    }
}

impl Default for SiteRoutes {
    fn default() -> Self {
        let mut rules = vec![
            (PathPattern::Prefix("/"), SiteRule::Assets),
            (PathPattern::Prefix(APP_PREFIX), SiteRule::AppShell),
            (PathPattern::Exact("/app"), SiteRule::MovedTo(APP_PREFIX)),
            // "/" used to redirect to the block listing, so old links point here
            (PathPattern::Exact("/blocks"), SiteRule::MovedTo("/")),
        ];
        for (bare, prefix, target) in LEGACY_RESOURCES {
            rules.push((PathPattern::Prefix(prefix), SiteRule::RewritePrefix(target)));
            rules.push((PathPattern::Exact(bare), SiteRule::MovedTo(prefix)));
        }
        Self { rules }
    }
}
