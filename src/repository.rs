use crate::models::{Assignment, Deposit, DepositStatus, PortalStats};
use async_trait::async_trait;
use sqlx::PgPool;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

/// Repository Trait
///
/// Defines the abstract contract for all persistence operations. This is the core of
/// the Repository Abstraction pattern, allowing the handlers to interact with the data
/// layer without knowing the specific implementation (Postgres, Mock, etc.).
///
/// All methods return `Result` so the handlers own the boundary conversion: any
/// `sqlx::Error` becomes a generic 500 while the detail goes to the diagnostic sink.
///
/// **Send + Sync + async_trait** are required to make the trait object
/// (`Arc<dyn Repository>`) safely shareable across Axum's asynchronous task boundaries.
#[async_trait]
pub trait Repository: Send + Sync {
    /// Admin review queue: deposits with `status = pending`, most recent deposit
    /// date first.
    async fn get_pending_deposits(&self) -> Result<Vec<Deposit>, sqlx::Error>;

    /// Collector-scoped listing: every deposit belonging to the given collector,
    /// most recent deposit date first.
    async fn get_collector_deposits(&self, collector_id: Uuid)
    -> Result<Vec<Deposit>, sqlx::Error>;

    /// Soft-deletes a customer assignment: flips `is_active` to false in a single
    /// update-by-id and returns the updated row. `None` means the id does not exist.
    /// Idempotent: re-running on an already-inactive row succeeds with no change.
    async fn deactivate_assignment(&self, id: Uuid) -> Result<Option<Assignment>, sqlx::Error>;

    /// Aggregate counters for the admin dashboard.
    async fn get_stats(&self) -> Result<PortalStats, sqlx::Error>;
}

/// RepositoryState
///
/// The concrete type used to share the persistence layer access across the application state.
pub type RepositoryState = Arc<dyn Repository>;

/// PostgresRepository
///
/// The concrete implementation of the `Repository` trait, backed by the PostgreSQL
/// database.
pub struct PostgresRepository {
    pool: PgPool,
}

impl PostgresRepository {
    /// Creates a new repository instance using the initialized connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Repository for PostgresRepository {
    /// get_pending_deposits
    ///
    /// **Security**: the `status = 'pending'` filter is applied unconditionally in the
    /// query; collected or reconciled rows never leave the database for this endpoint.
    async fn get_pending_deposits(&self) -> Result<Vec<Deposit>, sqlx::Error> {
        sqlx::query_as::<_, Deposit>(
            r#"
            SELECT id, customer_id, collector_id, amount_cents, status, deposit_date, created_at
            FROM deposits
            WHERE status = 'pending'
            ORDER BY deposit_date DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
    }

    async fn get_collector_deposits(
        &self,
        collector_id: Uuid,
    ) -> Result<Vec<Deposit>, sqlx::Error> {
        sqlx::query_as::<_, Deposit>(
            r#"
            SELECT id, customer_id, collector_id, amount_cents, status, deposit_date, created_at
            FROM deposits
            WHERE collector_id = $1
            ORDER BY deposit_date DESC
            "#,
        )
        .bind(collector_id)
        .fetch_all(&self.pool)
        .await
    }

    /// deactivate_assignment
    ///
    /// A single `UPDATE ... WHERE id = $1` carries the soft-delete; its row-level
    /// atomicity is what makes two concurrent removals of the same assignment safe.
    /// The update is unconditional on the current flag value, so repeating it on an
    /// already-inactive row still returns the row (idempotence) without churn beyond
    /// the `updated_at` touch.
    async fn deactivate_assignment(&self, id: Uuid) -> Result<Option<Assignment>, sqlx::Error> {
        sqlx::query_as::<_, Assignment>(
            r#"
            UPDATE customer_assignments
            SET is_active = false, updated_at = NOW()
            WHERE id = $1
            RETURNING id, customer_id, collector_id, is_active, created_at, updated_at
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    /// get_stats
    ///
    /// Compiles all counters for the administrative dashboard in one call.
    async fn get_stats(&self) -> Result<PortalStats, sqlx::Error> {
        let pending_deposits = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM deposits WHERE status = 'pending'",
        )
        .fetch_one(&self.pool)
        .await?;
        let active_assignments = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM customer_assignments WHERE is_active = true",
        )
        .fetch_one(&self.pool)
        .await?;
        let total_deposits = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM deposits")
            .fetch_one(&self.pool)
            .await?;

        Ok(PortalStats {
            pending_deposits,
            active_assignments,
            total_deposits,
        })
    }
}

// --- The Mock Implementation (For Tests) ---

/// MockRepository
///
/// An in-memory implementation of `Repository` used exclusively for testing. It keeps
/// real (if tiny) state so the idempotence of the soft-delete is observable, and it
/// counts every call so tests can assert that an unauthorized request performed
/// **zero** persistence operations.
#[derive(Default)]
pub struct MockRepository {
    deposits: Mutex<Vec<Deposit>>,
    assignments: Mutex<HashMap<Uuid, Assignment>>,
    calls: AtomicUsize,
    /// When true, every operation returns a simulated database failure.
    should_fail: bool,
}

impl MockRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn new_failing() -> Self {
        Self {
            should_fail: true,
            ..Self::default()
        }
    }

    pub fn seed_deposit(&self, deposit: Deposit) {
        self.deposits.lock().unwrap().push(deposit);
    }

    pub fn seed_assignment(&self, assignment: Assignment) {
        self.assignments
            .lock()
            .unwrap()
            .insert(assignment.id, assignment);
    }

    /// Total number of repository operations performed, across all methods.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Direct state inspection for idempotence assertions.
    pub fn assignment(&self, id: Uuid) -> Option<Assignment> {
        self.assignments.lock().unwrap().get(&id).cloned()
    }

    fn record_call(&self) -> Result<(), sqlx::Error> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.should_fail {
            return Err(sqlx::Error::PoolClosed);
        }
        Ok(())
    }
}

#[async_trait]
impl Repository for MockRepository {
    async fn get_pending_deposits(&self) -> Result<Vec<Deposit>, sqlx::Error> {
        self.record_call()?;
        let mut pending: Vec<Deposit> = self
            .deposits
            .lock()
            .unwrap()
            .iter()
            .filter(|d| d.status == DepositStatus::Pending)
            .cloned()
            .collect();
        pending.sort_by(|a, b| b.deposit_date.cmp(&a.deposit_date));
        Ok(pending)
    }

    async fn get_collector_deposits(
        &self,
        collector_id: Uuid,
    ) -> Result<Vec<Deposit>, sqlx::Error> {
        self.record_call()?;
        let mut mine: Vec<Deposit> = self
            .deposits
            .lock()
            .unwrap()
            .iter()
            .filter(|d| d.collector_id == collector_id)
            .cloned()
            .collect();
        mine.sort_by(|a, b| b.deposit_date.cmp(&a.deposit_date));
        Ok(mine)
    }

    async fn deactivate_assignment(&self, id: Uuid) -> Result<Option<Assignment>, sqlx::Error> {
        self.record_call()?;
        let mut assignments = self.assignments.lock().unwrap();
        Ok(assignments.get_mut(&id).map(|assignment| {
            assignment.is_active = false;
            assignment.clone()
        }))
    }

    async fn get_stats(&self) -> Result<PortalStats, sqlx::Error> {
        self.record_call()?;
        let deposits = self.deposits.lock().unwrap();
        let assignments = self.assignments.lock().unwrap();
        Ok(PortalStats {
            pending_deposits: deposits
                .iter()
                .filter(|d| d.status == DepositStatus::Pending)
                .count() as i64,
            active_assignments: assignments.values().filter(|a| a.is_active).count() as i64,
            total_deposits: deposits.len() as i64,
        })
    }
}
