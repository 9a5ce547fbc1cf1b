use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::models::ErrorResponse;

/// ApiError
///
/// The closed error taxonomy of the JSON surface. Every handler failure maps onto one
/// of these variants at the HTTP boundary; no underlying error (sqlx, JWT) ever crosses
/// it. The variants mirror the status codes the frontend is written against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Missing/invalid session, or a session lacking the role the endpoint requires.
    Unauthorized,
    /// The addressed entity does not exist. Carries a user-safe description.
    NotFound(&'static str),
    /// Any persistence failure. The detail is logged to the diagnostic sink by the
    /// handler before this variant is returned; the body stays generic.
    Internal,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized"),
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, message),
            ApiError::Internal => (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error"),
        };
        (
            status,
            Json(ErrorResponse {
                error: message.to_string(),
            }),
        )
            .into_response()
    }
}
