use axum::{
    extract::Request,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

use crate::auth::{Role, Session};

// Navigation targets the middleware redirects to. The dashboards sit inside the
// role-prefixed route classes, so a correctly-roled user landing on them passes
// straight through and no redirect loop is possible.
pub const LOGIN_PATH: &str = "/login";
pub const ADMIN_DASHBOARD_PATH: &str = "/admin/dashboard";
pub const COLLECTOR_DASHBOARD_PATH: &str = "/collectors/dashboard";

/// RouteClass
///
/// The path classification the decision table dispatches on: root, the two
/// role-scoped prefixes, or anything else (outside the matcher, passed through
/// untouched). Root is mutually exclusive with the prefixes by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RouteClass {
    Root,
    Admin,
    Collectors,
    Unmatched,
}

fn classify(path: &str) -> RouteClass {
    if path == "/" {
        RouteClass::Root
    } else if path.starts_with("/admin") {
        RouteClass::Admin
    } else if path.starts_with("/collectors") {
        RouteClass::Collectors
    } else {
        RouteClass::Unmatched
    }
}

/// AccessDecision
///
/// The derived value the middleware computes fresh per request. Handler-level
/// rejections (401/404/500) are a separate concern; the middleware itself only ever
/// redirects or passes through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDecision {
    Allow,
    Redirect(&'static str),
}

/// decide
///
/// The role-based routing decision table, as a pure function so it is testable
/// without HTTP plumbing. Total over all inputs: a path outside the matched route
/// classes is allowed through untouched regardless of session. For matched paths,
/// checks are evaluated in fixed order:
///
/// 1. Anonymous sessions are redirected to login before any path-specific logic.
/// 2. The root path dispatches purely on role: admin and collector go to their
///    dashboards, an unassigned role goes back to login.
/// 3. `/admin*` with a non-admin role redirects laterally to the collector dashboard.
/// 4. `/collectors*` with a non-collector role redirects to the admin dashboard.
/// 5. Everything else passes through unmodified.
///
/// An unrecognized role on a prefixed route is always redirected away: the table
/// fails closed, never open.
pub fn decide(path: &str, session: &Session) -> AccessDecision {
    let class = classify(path);
    if class == RouteClass::Unmatched {
        return AccessDecision::Allow;
    }

    let role = match session {
        Session::Anonymous => return AccessDecision::Redirect(LOGIN_PATH),
        Session::Authenticated(user) => user.role,
    };

    match class {
        RouteClass::Root => match role {
            Role::Admin => AccessDecision::Redirect(ADMIN_DASHBOARD_PATH),
            Role::Collector => AccessDecision::Redirect(COLLECTOR_DASHBOARD_PATH),
            Role::Unassigned => AccessDecision::Redirect(LOGIN_PATH),
        },
        RouteClass::Admin if role != Role::Admin => {
            AccessDecision::Redirect(COLLECTOR_DASHBOARD_PATH)
        }
        RouteClass::Collectors if role != Role::Collector => {
            AccessDecision::Redirect(ADMIN_DASHBOARD_PATH)
        }
        _ => AccessDecision::Allow,
    }
}

/// access_control
///
/// The middleware wrapper around `decide`. Applied with `.layer` on the portal
/// router, whose root route and nested `/admin` / `/collectors` sub-routers (each
/// with its own fallback) span the full matched route classes — so every path under
/// the two prefixes traverses the decision table, registered page or not. Paths
/// outside the portal router never reach it. Stateless across requests.
pub async fn access_control(session: Session, request: Request, next: Next) -> Response {
    match decide(request.uri().path(), &session) {
        AccessDecision::Allow => next.run(request).await,
        AccessDecision::Redirect(target) => {
            tracing::debug!(path = %request.uri().path(), target, "access redirect");
            Redirect::to(target).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::AuthUser;
    use uuid::Uuid;

    fn session(role: Role) -> Session {
        Session::Authenticated(AuthUser {
            id: Uuid::new_v4(),
            role,
        })
    }

    #[test]
    fn anonymous_is_redirected_to_login_on_every_matched_path() {
        for path in ["/", "/admin/dashboard", "/admin/reports", "/collectors/dashboard"] {
            assert_eq!(
                decide(path, &Session::Anonymous),
                AccessDecision::Redirect(LOGIN_PATH),
                "path: {path}"
            );
        }
    }

    #[test]
    fn root_dispatches_on_role() {
        assert_eq!(
            decide("/", &session(Role::Admin)),
            AccessDecision::Redirect(ADMIN_DASHBOARD_PATH)
        );
        assert_eq!(
            decide("/", &session(Role::Collector)),
            AccessDecision::Redirect(COLLECTOR_DASHBOARD_PATH)
        );
        assert_eq!(
            decide("/", &session(Role::Unassigned)),
            AccessDecision::Redirect(LOGIN_PATH)
        );
    }

    #[test]
    fn admin_prefix_redirects_non_admins_to_collector_dashboard() {
        assert_eq!(
            decide("/admin/dashboard", &session(Role::Collector)),
            AccessDecision::Redirect(COLLECTOR_DASHBOARD_PATH)
        );
        assert_eq!(
            decide("/admin/reports", &session(Role::Unassigned)),
            AccessDecision::Redirect(COLLECTOR_DASHBOARD_PATH)
        );
    }

    #[test]
    fn collector_prefix_redirects_non_collectors_to_admin_dashboard() {
        assert_eq!(
            decide("/collectors/dashboard", &session(Role::Admin)),
            AccessDecision::Redirect(ADMIN_DASHBOARD_PATH)
        );
        assert_eq!(
            decide("/collectors/routes", &session(Role::Unassigned)),
            AccessDecision::Redirect(ADMIN_DASHBOARD_PATH)
        );
    }

    #[test]
    fn matching_roles_pass_through_with_no_redirect_loop() {
        assert_eq!(
            decide("/admin/dashboard", &session(Role::Admin)),
            AccessDecision::Allow
        );
        assert_eq!(
            decide("/collectors/dashboard", &session(Role::Collector)),
            AccessDecision::Allow
        );
    }

    #[test]
    fn unmatched_paths_pass_through_untouched_for_any_session() {
        // Outside the route classes the table never redirects, not even anonymous.
        for path in ["/health", "/api/admin/pending-deposits", "/login"] {
            assert_eq!(
                decide(path, &Session::Anonymous),
                AccessDecision::Allow,
                "path: {path}"
            );
            assert_eq!(
                decide(path, &session(Role::Unassigned)),
                AccessDecision::Allow,
                "path: {path}"
            );
        }
    }
}
