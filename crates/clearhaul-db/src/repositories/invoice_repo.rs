//! Invoice repository implementation
//!
//! Provides PostgreSQL-backed storage for invoices with number lookups,
//! filtered listings and status updates that stamp the payment time.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use clearhaul_core::{
    models::{Invoice, InvoiceStatus},
    traits::{InvoiceRepository, Repository},
    AppError, AppResult,
};
use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::{debug, error, instrument};

/// PostgreSQL implementation of InvoiceRepository
pub struct PgInvoiceRepository {
    pool: PgPool,
}

impl PgInvoiceRepository {
    /// Create a new invoice repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Convert database invoice status string to enum
    fn parse_status(s: &str) -> InvoiceStatus {
        InvoiceStatus::from_str(s).unwrap_or(InvoiceStatus::Draft)
    }
}

const INVOICE_SELECT_COLUMNS: &str = r#"
    id, invoice_number, client_id, booking_id,
    amount, status,
    issued_date, due_date, paid_at,
    created_at, updated_at
"#;

#[async_trait]
impl Repository<Invoice, i64> for PgInvoiceRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Invoice>> {
        debug!("Finding invoice by id: {}", id);

        let query = format!(
            "SELECT {} FROM invoices WHERE id = $1",
            INVOICE_SELECT_COLUMNS
        );

        let result = sqlx::query_as::<sqlx::Postgres, InvoiceRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                error!("Database error finding invoice {}: {}", id, e);
                AppError::Database(format!("Failed to find invoice: {}", e))
            })?;

        Ok(result.map(Into::into))
    }

    #[instrument(skip(self))]
    async fn find_all(&self, limit: i64, offset: i64) -> AppResult<Vec<Invoice>> {
        debug!("Finding all invoices with limit {} offset {}", limit, offset);

        let query = format!(
            "SELECT {} FROM invoices ORDER BY issued_date DESC, id DESC LIMIT $1 OFFSET $2",
            INVOICE_SELECT_COLUMNS
        );

        let rows = sqlx::query_as::<sqlx::Postgres, InvoiceRow>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                error!("Database error finding invoices: {}", e);
                AppError::Database(format!("Failed to fetch invoices: {}", e))
            })?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    #[instrument(skip(self))]
    async fn count(&self) -> AppResult<i64> {
        let result: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM invoices")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                error!("Database error counting invoices: {}", e);
                AppError::Database(format!("Failed to count invoices: {}", e))
            })?;

        Ok(result.0)
    }

    #[instrument(skip(self, entity))]
    async fn create(&self, entity: &Invoice) -> AppResult<Invoice> {
        debug!("Creating invoice: {}", entity.invoice_number);

        let query = format!(
            r#"
            INSERT INTO invoices (
                invoice_number, client_id, booking_id,
                amount, status, issued_date, due_date, paid_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {}
            "#,
            INVOICE_SELECT_COLUMNS
        );

        let row = sqlx::query_as::<sqlx::Postgres, InvoiceRow>(&query)
            .bind(&entity.invoice_number)
            .bind(entity.client_id)
            .bind(entity.booking_id)
            .bind(entity.amount)
            .bind(entity.status.to_string())
            .bind(entity.issued_date)
            .bind(entity.due_date)
            .bind(entity.paid_at)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                error!("Database error creating invoice: {}", e);
                if e.to_string().contains("unique constraint") {
                    AppError::AlreadyExists(format!(
                        "Invoice {} already exists",
                        entity.invoice_number
                    ))
                } else {
                    AppError::Database(format!("Failed to create invoice: {}", e))
                }
            })?;

        Ok(row.into())
    }

    #[instrument(skip(self, entity))]
    async fn update(&self, entity: &Invoice) -> AppResult<Invoice> {
        debug!("Updating invoice: {}", entity.id);

        let query = format!(
            r#"
            UPDATE invoices
            SET invoice_number = $2,
                client_id = $3,
                booking_id = $4,
                amount = $5,
                status = $6,
                issued_date = $7,
                due_date = $8,
                paid_at = $9,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            INVOICE_SELECT_COLUMNS
        );

        let row = sqlx::query_as::<sqlx::Postgres, InvoiceRow>(&query)
            .bind(entity.id)
            .bind(&entity.invoice_number)
            .bind(entity.client_id)
            .bind(entity.booking_id)
            .bind(entity.amount)
            .bind(entity.status.to_string())
            .bind(entity.issued_date)
            .bind(entity.due_date)
            .bind(entity.paid_at)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                error!("Database error updating invoice {}: {}", entity.id, e);
                AppError::Database(format!("Failed to update invoice: {}", e))
            })?;

        Ok(row.into())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: i64) -> AppResult<bool> {
        debug!("Deleting invoice: {}", id);

        let result = sqlx::query("DELETE FROM invoices WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                error!("Database error deleting invoice {}: {}", id, e);
                AppError::Database(format!("Failed to delete invoice: {}", e))
            })?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl InvoiceRepository for PgInvoiceRepository {
    #[instrument(skip(self))]
    async fn find_by_number(&self, invoice_number: &str) -> AppResult<Option<Invoice>> {
        debug!("Finding invoice by number: {}", invoice_number);

        let query = format!(
            "SELECT {} FROM invoices WHERE invoice_number = $1",
            INVOICE_SELECT_COLUMNS
        );

        let result = sqlx::query_as::<sqlx::Postgres, InvoiceRow>(&query)
            .bind(invoice_number)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                error!("Database error finding invoice by number: {}", e);
                AppError::Database(format!("Failed to find invoice: {}", e))
            })?;

        Ok(result.map(Into::into))
    }

    #[instrument(skip(self))]
    async fn list_filtered(
        &self,
        status: Option<InvoiceStatus>,
        client_id: Option<i32>,
        limit: i64,
        offset: i64,
    ) -> AppResult<(Vec<Invoice>, i64)> {
        debug!(
            "Listing invoices with filters: status={:?}, client_id={:?}, limit={}, offset={}",
            status, client_id, limit, offset
        );

        let mut conditions = Vec::new();

        if let Some(s) = status {
            conditions.push(format!("status = '{}'", s));
        }
        if let Some(cid) = client_id {
            conditions.push(format!("client_id = {}", cid));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let count_sql = format!("SELECT COUNT(*) FROM invoices {}", where_clause);
        let data_sql = format!(
            "SELECT {} FROM invoices {} ORDER BY issued_date DESC, id DESC LIMIT {} OFFSET {}",
            INVOICE_SELECT_COLUMNS, where_clause, limit, offset
        );

        let total: (i64,) = sqlx::query_as(&count_sql)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                error!("Database error counting filtered invoices: {}", e);
                AppError::Database(format!("Failed to count invoices: {}", e))
            })?;

        let rows = sqlx::query_as::<sqlx::Postgres, InvoiceRow>(&data_sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                error!("Database error fetching filtered invoices: {}", e);
                AppError::Database(format!("Failed to fetch invoices: {}", e))
            })?;

        Ok((rows.into_iter().map(Into::into).collect(), total.0))
    }

    #[instrument(skip(self))]
    async fn update_status(
        &self,
        id: i64,
        status: InvoiceStatus,
        paid_at: Option<DateTime<Utc>>,
    ) -> AppResult<Invoice> {
        debug!("Updating invoice {} status to {}", id, status);

        let query = format!(
            r#"
            UPDATE invoices
            SET status = $2,
                paid_at = COALESCE($3, paid_at),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            INVOICE_SELECT_COLUMNS
        );

        let row = sqlx::query_as::<sqlx::Postgres, InvoiceRow>(&query)
            .bind(id)
            .bind(status.to_string())
            .bind(paid_at)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                error!("Database error updating invoice status: {}", e);
                AppError::Database(format!("Failed to update invoice status: {}", e))
            })?
            .ok_or_else(|| AppError::InvoiceNotFound(id.to_string()))?;

        Ok(row.into())
    }
}

/// Helper struct for mapping database rows
#[derive(Debug, sqlx::FromRow)]
struct InvoiceRow {
    id: i64,
    invoice_number: String,
    client_id: i32,
    booking_id: Option<i64>,
    amount: Decimal,
    status: String,
    issued_date: NaiveDate,
    due_date: Option<NaiveDate>,
    paid_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<InvoiceRow> for Invoice {
    fn from(row: InvoiceRow) -> Self {
        Self {
            id: row.id,
            invoice_number: row.invoice_number,
            client_id: row.client_id,
            booking_id: row.booking_id,
            amount: row.amount,
            status: PgInvoiceRepository::parse_status(&row.status),
            issued_date: row.issued_date,
            due_date: row.due_date,
            paid_at: row.paid_at,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invoice_row_conversion() {
        let now = Utc::now();
        let row = InvoiceRow {
            id: 3,
            invoice_number: "INV-2025-0003".to_string(),
            client_id: 12,
            booking_id: Some(7),
            amount: Decimal::new(35500, 2),
            status: "sent".to_string(),
            issued_date: NaiveDate::from_ymd_opt(2025, 6, 14).unwrap(),
            due_date: NaiveDate::from_ymd_opt(2025, 7, 14),
            paid_at: None,
            created_at: now,
            updated_at: now,
        };

        let invoice: Invoice = row.into();
        assert_eq!(invoice.status, InvoiceStatus::Sent);
        assert_eq!(invoice.amount, Decimal::new(35500, 2));
        assert_eq!(invoice.booking_id, Some(7));
    }
}
