use crate::{AppState, handlers};
use axum::{Router, routing::get};

/// Public Router Module
///
/// Defines endpoints that are **unauthenticated** and accessible to any client.
/// Deliberately outside the access-control matcher: the login page is where the
/// middleware sends anonymous traffic, so gating it would create a redirect loop.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        // GET /health
        // A simple, unauthenticated endpoint used for monitoring and load balancer checks.
        // Returns "ok" immediately to verify the service is running and responsive.
        .route("/health", get(|| async { "ok" }))
        // GET /login
        // The login navigation target. Credential issuance itself is handled by the
        // external token provider; this is only the destination of the redirects.
        .route("/login", get(handlers::login_page))
}
