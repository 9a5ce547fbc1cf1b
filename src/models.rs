use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use ts_rs::TS;
use utoipa::ToSchema;
use uuid::Uuid;

// --- Core Application Schemas (Mapped to Database) ---

/// DepositStatus
///
/// Lifecycle state of a cash deposit. Stored as the Postgres enum `deposit_status`.
/// Only `Pending` rows are surfaced by the admin review queue.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS, ToSchema, sqlx::Type,
)]
#[sqlx(type_name = "deposit_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum DepositStatus {
    /// Declared by the collector, not yet collected.
    #[default]
    Pending,
    /// Cash physically collected.
    Collected,
    /// Collected and matched against the ledger.
    Reconciled,
}

/// Deposit
///
/// Represents a cash deposit record from the `public.deposits` table.
/// This is the primary data structure for the review-queue business logic.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct Deposit {
    pub id: Uuid,
    // FK to the customer the cash was collected from.
    pub customer_id: Uuid,
    // FK to the collector responsible for the deposit.
    pub collector_id: Uuid,

    /// Amount in integer cents. Monetary values are never stored as floats.
    pub amount_cents: i64,

    pub status: DepositStatus,

    /// The date the deposit was (or is due to be) made. Listing order key.
    #[ts(type = "string")]
    pub deposit_date: DateTime<Utc>,

    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
}

/// Assignment
///
/// Represents a customer-collector assignment from the `public.customer_assignments`
/// table. Assignments are **soft-deleted**: removal flips `is_active` to false and the
/// row is kept for history. The flip is one-way at this API surface; there is no
/// reactivation endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct Assignment {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub collector_id: Uuid,

    // False once the assignment has been removed. Never deleted physically.
    pub is_active: bool,

    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

/// --- Dashboard Schemas (Output) ---

/// PortalStats
///
/// Output schema for the administrative statistics endpoint (GET /api/admin/stats).
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct PortalStats {
    /// Deposits currently awaiting collection (`status = pending`).
    pub pending_deposits: i64,
    /// Customer assignments with `is_active = true`.
    pub active_assignments: i64,
    pub total_deposits: i64,
}

/// --- Response Envelopes ---

/// DepositListResponse
///
/// Success envelope for deposit listing endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct DepositListResponse {
    pub success: bool,
    pub data: Vec<Deposit>,
}

/// StatsResponse
///
/// Success envelope for the stats endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct StatsResponse {
    pub success: bool,
    pub data: PortalStats,
}

/// MessageResponse
///
/// Success envelope for mutations and navigation targets that carry no data payload.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

/// ErrorResponse
///
/// Generic error body. Carries a user-safe message only; persistence failure detail
/// goes to the diagnostic sink, never to the caller.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct ErrorResponse {
    pub error: String,
}
