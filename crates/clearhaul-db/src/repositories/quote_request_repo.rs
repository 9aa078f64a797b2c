//! Quote request repository implementation
//!
//! Provides PostgreSQL-backed storage for submitted quote requests. The
//! customer's selection is kept as a JSONB snapshot; it is carried across
//! the wire as text and cast with `::jsonb` so the queries stay plain
//! runtime queries.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use clearhaul_core::{
    models::{QuoteRequest, QuoteRequestStatus},
    traits::{QuoteRequestRepository, Repository},
    AppError, AppResult,
};
use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::{debug, error, instrument};

/// PostgreSQL implementation of QuoteRequestRepository
pub struct PgQuoteRequestRepository {
    pool: PgPool,
}

impl PgQuoteRequestRepository {
    /// Create a new quote request repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Convert database quote request status string to enum
    fn parse_status(s: &str) -> QuoteRequestStatus {
        QuoteRequestStatus::from_str(s).unwrap_or(QuoteRequestStatus::Pending)
    }
}

const QUOTE_REQUEST_SELECT_COLUMNS: &str = r#"
    id, customer_name, customer_phone, customer_email,
    selection::text AS selection, estimated_total,
    description, status,
    created_at, updated_at
"#;

#[async_trait]
impl Repository<QuoteRequest, i64> for PgQuoteRequestRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: i64) -> AppResult<Option<QuoteRequest>> {
        debug!("Finding quote request by id: {}", id);

        let query = format!(
            "SELECT {} FROM quote_requests WHERE id = $1",
            QUOTE_REQUEST_SELECT_COLUMNS
        );

        let result = sqlx::query_as::<sqlx::Postgres, QuoteRequestRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                error!("Database error finding quote request {}: {}", id, e);
                AppError::Database(format!("Failed to find quote request: {}", e))
            })?;

        Ok(result.map(Into::into))
    }

    #[instrument(skip(self))]
    async fn find_all(&self, limit: i64, offset: i64) -> AppResult<Vec<QuoteRequest>> {
        debug!(
            "Finding all quote requests with limit {} offset {}",
            limit, offset
        );

        let query = format!(
            "SELECT {} FROM quote_requests ORDER BY created_at DESC LIMIT $1 OFFSET $2",
            QUOTE_REQUEST_SELECT_COLUMNS
        );

        let rows = sqlx::query_as::<sqlx::Postgres, QuoteRequestRow>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                error!("Database error finding quote requests: {}", e);
                AppError::Database(format!("Failed to fetch quote requests: {}", e))
            })?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    #[instrument(skip(self))]
    async fn count(&self) -> AppResult<i64> {
        let result: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM quote_requests")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                error!("Database error counting quote requests: {}", e);
                AppError::Database(format!("Failed to count quote requests: {}", e))
            })?;

        Ok(result.0)
    }

    #[instrument(skip(self, entity))]
    async fn create(&self, entity: &QuoteRequest) -> AppResult<QuoteRequest> {
        debug!("Creating quote request for {}", entity.customer_name);

        let query = format!(
            r#"
            INSERT INTO quote_requests (
                customer_name, customer_phone, customer_email,
                selection, estimated_total, description, status
            )
            VALUES ($1, $2, $3, $4::jsonb, $5, $6, $7)
            RETURNING {}
            "#,
            QUOTE_REQUEST_SELECT_COLUMNS
        );

        let row = sqlx::query_as::<sqlx::Postgres, QuoteRequestRow>(&query)
            .bind(&entity.customer_name)
            .bind(&entity.customer_phone)
            .bind(&entity.customer_email)
            .bind(entity.selection.to_string())
            .bind(entity.estimated_total)
            .bind(&entity.description)
            .bind(entity.status.to_string())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                error!("Database error creating quote request: {}", e);
                AppError::Database(format!("Failed to create quote request: {}", e))
            })?;

        Ok(row.into())
    }

    #[instrument(skip(self, entity))]
    async fn update(&self, entity: &QuoteRequest) -> AppResult<QuoteRequest> {
        debug!("Updating quote request: {}", entity.id);

        let query = format!(
            r#"
            UPDATE quote_requests
            SET customer_name = $2,
                customer_phone = $3,
                customer_email = $4,
                selection = $5::jsonb,
                estimated_total = $6,
                description = $7,
                status = $8,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            QUOTE_REQUEST_SELECT_COLUMNS
        );

        let row = sqlx::query_as::<sqlx::Postgres, QuoteRequestRow>(&query)
            .bind(entity.id)
            .bind(&entity.customer_name)
            .bind(&entity.customer_phone)
            .bind(&entity.customer_email)
            .bind(entity.selection.to_string())
            .bind(entity.estimated_total)
            .bind(&entity.description)
            .bind(entity.status.to_string())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                error!("Database error updating quote request {}: {}", entity.id, e);
                AppError::Database(format!("Failed to update quote request: {}", e))
            })?;

        Ok(row.into())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: i64) -> AppResult<bool> {
        debug!("Deleting quote request: {}", id);

        let result = sqlx::query("DELETE FROM quote_requests WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                error!("Database error deleting quote request {}: {}", id, e);
                AppError::Database(format!("Failed to delete quote request: {}", e))
            })?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl QuoteRequestRepository for PgQuoteRequestRepository {
    #[instrument(skip(self))]
    async fn list_filtered(
        &self,
        status: Option<QuoteRequestStatus>,
        limit: i64,
        offset: i64,
    ) -> AppResult<(Vec<QuoteRequest>, i64)> {
        debug!(
            "Listing quote requests with filters: status={:?}, limit={}, offset={}",
            status, limit, offset
        );

        let where_clause = match status {
            Some(s) => format!("WHERE status = '{}'", s),
            None => String::new(),
        };

        let count_sql = format!("SELECT COUNT(*) FROM quote_requests {}", where_clause);
        let data_sql = format!(
            "SELECT {} FROM quote_requests {} ORDER BY created_at DESC LIMIT {} OFFSET {}",
            QUOTE_REQUEST_SELECT_COLUMNS, where_clause, limit, offset
        );

        let total: (i64,) = sqlx::query_as(&count_sql)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                error!("Database error counting filtered quote requests: {}", e);
                AppError::Database(format!("Failed to count quote requests: {}", e))
            })?;

        let rows = sqlx::query_as::<sqlx::Postgres, QuoteRequestRow>(&data_sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                error!("Database error fetching filtered quote requests: {}", e);
                AppError::Database(format!("Failed to fetch quote requests: {}", e))
            })?;

        Ok((rows.into_iter().map(Into::into).collect(), total.0))
    }

    #[instrument(skip(self))]
    async fn update_status(&self, id: i64, status: QuoteRequestStatus) -> AppResult<QuoteRequest> {
        debug!("Updating quote request {} status to {}", id, status);

        let query = format!(
            r#"
            UPDATE quote_requests
            SET status = $2,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            QUOTE_REQUEST_SELECT_COLUMNS
        );

        let row = sqlx::query_as::<sqlx::Postgres, QuoteRequestRow>(&query)
            .bind(id)
            .bind(status.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                error!("Database error updating quote request status: {}", e);
                AppError::Database(format!("Failed to update quote request status: {}", e))
            })?
            .ok_or_else(|| AppError::QuoteRequestNotFound(id.to_string()))?;

        Ok(row.into())
    }
}

/// Helper struct for mapping database rows
#[derive(Debug, sqlx::FromRow)]
struct QuoteRequestRow {
    id: i64,
    customer_name: String,
    customer_phone: String,
    customer_email: Option<String>,
    selection: String,
    estimated_total: Decimal,
    description: Option<String>,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<QuoteRequestRow> for QuoteRequest {
    fn from(row: QuoteRequestRow) -> Self {
        Self {
            id: row.id,
            customer_name: row.customer_name,
            customer_phone: row.customer_phone,
            customer_email: row.customer_email,
            selection: serde_json::from_str(&row.selection).unwrap_or(serde_json::Value::Null),
            estimated_total: row.estimated_total,
            description: row.description,
            status: PgQuoteRequestRepository::parse_status(&row.status),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}
