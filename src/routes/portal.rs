use crate::{AppState, handlers};
use axum::{Router, routing::get};

/// Portal Router Module
///
/// The page routes matched by the access-control middleware: `/`, `/admin/*` and
/// `/collectors/*`. The caller (`create_router`) wraps this router in the
/// `access_control` layer, so every request here has already been through the
/// role-based redirect table before a handler runs.
///
/// The two prefixes are nested sub-routers with their own fallbacks: an unregistered
/// path under `/admin` or `/collectors` still traverses the decision table (wrong
/// roles get redirected away), and only a correctly-roled session ever sees the 404.
pub fn portal_routes() -> Router<AppState> {
    Router::new()
        // GET /
        // Root dispatch. The middleware always redirects this path based on role
        // (admin/collector dashboard, or login); the handler is an unreachable
        // fallback that mirrors the anonymous decision.
        .route("/", get(handlers::root))
        .nest("/admin", admin_pages())
        .nest("/collectors", collector_pages())
}

fn admin_pages() -> Router<AppState> {
    Router::new()
        // GET /admin/dashboard
        // Admin landing page. Non-admin sessions are laterally redirected to the
        // collector dashboard before reaching it.
        .route("/dashboard", get(handlers::admin_dashboard))
        // Keeps the whole /admin prefix inside the matcher scope.
        .fallback(handlers::page_not_found)
}

fn collector_pages() -> Router<AppState> {
    Router::new()
        // GET /collectors/dashboard
        // Collector landing page. Non-collector sessions are redirected to the
        // admin dashboard before reaching it.
        .route("/dashboard", get(handlers::collector_dashboard))
        // Keeps the whole /collectors prefix inside the matcher scope.
        .fallback(handlers::page_not_found)
}
