use crate::{
    AppState,
    access::LOGIN_PATH,
    auth::AuthUser,
    error::ApiError,
    models::{DepositListResponse, MessageResponse, StatsResponse},
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::Redirect,
};
use uuid::Uuid;

/// report_failure
///
/// Boundary conversion for persistence failures: the detail goes to the tracing log
/// and the diagnostic sink, and the caller gets nothing but the generic 500 body.
async fn report_failure(state: &AppState, context: &str, err: sqlx::Error) -> ApiError {
    tracing::error!("{}: {:?}", context, err);
    state
        .diag
        .append(context, Some(serde_json::json!({ "error": err.to_string() })))
        .await;
    ApiError::Internal
}

// --- JSON API Handlers ---

/// get_pending_deposits
///
/// [Admin Route] Lists deposits awaiting collection, most recent deposit date first.
///
/// *Authorization*: re-checks the admin role locally before touching the repository,
/// independent of any upstream middleware.
#[utoipa::path(
    get,
    path = "/api/admin/pending-deposits",
    responses(
        (status = 200, description = "Pending deposits", body = DepositListResponse),
        (status = 401, description = "Not an admin session"),
        (status = 500, description = "Persistence failure")
    )
)]
pub async fn get_pending_deposits(
    user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<DepositListResponse>, ApiError> {
    user.require_admin()?;

    match state.repo.get_pending_deposits().await {
        Ok(deposits) => Ok(Json(DepositListResponse {
            success: true,
            data: deposits,
        })),
        Err(e) => Err(report_failure(&state, "pending deposits query failed", e).await),
    }
}

/// remove_customer_assignment
///
/// [Admin Route] Soft-deletes a customer-collector assignment: the row is never
/// removed, `is_active` is flipped to false and history is preserved.
///
/// *Idempotency*: repeating the call on an already-inactive assignment succeeds
/// silently with no observable change.
#[utoipa::path(
    delete,
    path = "/api/customer-assignments/{id}",
    params(("id" = Uuid, Path, description = "Assignment ID")),
    responses(
        (status = 200, description = "Assignment removed", body = MessageResponse),
        (status = 401, description = "Not an admin session"),
        (status = 404, description = "No such assignment"),
        (status = 500, description = "Persistence failure")
    )
)]
pub async fn remove_customer_assignment(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, ApiError> {
    user.require_admin()?;

    match state.repo.deactivate_assignment(id).await {
        Ok(Some(_)) => Ok(Json(MessageResponse {
            success: true,
            message: "Assignment removed".to_string(),
        })),
        Ok(None) => Err(ApiError::NotFound("Assignment not found")),
        Err(e) => Err(report_failure(&state, "assignment removal failed", e).await),
    }
}

/// get_portal_stats
///
/// [Admin Route] Aggregate counters for the admin dashboard.
#[utoipa::path(
    get,
    path = "/api/admin/stats",
    responses(
        (status = 200, description = "Stats", body = StatsResponse),
        (status = 401, description = "Not an admin session"),
        (status = 500, description = "Persistence failure")
    )
)]
pub async fn get_portal_stats(
    user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<StatsResponse>, ApiError> {
    user.require_admin()?;

    match state.repo.get_stats().await {
        Ok(stats) => Ok(Json(StatsResponse {
            success: true,
            data: stats,
        })),
        Err(e) => Err(report_failure(&state, "stats query failed", e).await),
    }
}

/// get_my_deposits
///
/// [Collector Route] Lists the authenticated collector's own deposits, most recent
/// deposit date first. The collector id comes from the resolved session, never from
/// the request, so a collector cannot read another collector's rows.
#[utoipa::path(
    get,
    path = "/api/collectors/me/deposits",
    responses(
        (status = 200, description = "My deposits", body = DepositListResponse),
        (status = 401, description = "Not a collector session"),
        (status = 500, description = "Persistence failure")
    )
)]
pub async fn get_my_deposits(
    user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<DepositListResponse>, ApiError> {
    user.require_collector()?;

    match state.repo.get_collector_deposits(user.id).await {
        Ok(deposits) => Ok(Json(DepositListResponse {
            success: true,
            data: deposits,
        })),
        Err(e) => Err(report_failure(&state, "collector deposits query failed", e).await),
    }
}

// --- Navigation Targets ---
// Minimal page shells: the real UI is a separate frontend, these exist as the
// destinations the access-control middleware redirects to.

pub async fn login_page() -> Json<MessageResponse> {
    Json(MessageResponse {
        success: true,
        message: "login".to_string(),
    })
}

pub async fn admin_dashboard() -> Json<MessageResponse> {
    Json(MessageResponse {
        success: true,
        message: "admin dashboard".to_string(),
    })
}

pub async fn collector_dashboard() -> Json<MessageResponse> {
    Json(MessageResponse {
        success: true,
        message: "collector dashboard".to_string(),
    })
}

/// root
///
/// Fallback for `/`. The access-control middleware always redirects the root path
/// before the handler runs, so this only answers if the route is ever mounted without
/// its layer; it sends the caller to login, matching the anonymous decision.
pub async fn root() -> Redirect {
    Redirect::to(LOGIN_PATH)
}

/// page_not_found
///
/// Fallback for the nested `/admin` and `/collectors` page routers. Only reachable
/// by a session whose role already passed the access-control table; everyone else
/// has been redirected away before routing resolves.
pub async fn page_not_found() -> StatusCode {
    StatusCode::NOT_FOUND
}
