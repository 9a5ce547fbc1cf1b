/// Router Module Index
///
/// Organizes the application's routing logic into security-segregated modules.
/// Access control is applied explicitly at the module level (via Axum layers),
/// preventing accidental exposure of protected endpoints.

/// Routes accessible to all users (health check, login target). These live outside
/// the access-control matcher; redirecting an anonymous user *to* login must not
/// loop back through the middleware.
pub mod public;

/// The page routes the access-control middleware gates: the root dispatcher and the
/// two role-scoped dashboards.
pub mod portal;

/// The JSON API surface under `/api`. Outside the middleware matcher: every handler
/// re-checks the session and role itself before touching the repository.
pub mod api;
