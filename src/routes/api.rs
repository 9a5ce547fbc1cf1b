use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{delete, get},
};

/// API Router Module
///
/// The JSON surface, nested under `/api` by the caller. This router carries **no**
/// middleware layer: it is outside the access-control matcher, and every handler
/// performs its own session and role check before any repository call. That check is
/// mandatory, not redundant — a handler must never trust upstream middleware alone.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // GET /api/admin/pending-deposits
        // The admin review queue: deposits with status=pending, newest deposit first.
        .route(
            "/admin/pending-deposits",
            get(handlers::get_pending_deposits),
        )
        // GET /api/admin/stats
        // Aggregate counters for the admin dashboard.
        .route("/admin/stats", get(handlers::get_portal_stats))
        // DELETE /api/customer-assignments/{id}
        // Soft-deletes an assignment (flips is_active, preserves the row).
        .route(
            "/customer-assignments/{id}",
            delete(handlers::remove_customer_assignment),
        )
        // GET /api/collectors/me/deposits
        // The authenticated collector's own deposit history.
        .route("/collectors/me/deposits", get(handlers::get_my_deposits))
}
