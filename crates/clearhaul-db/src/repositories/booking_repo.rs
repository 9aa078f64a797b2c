//! Booking repository implementation
//!
//! Provides PostgreSQL-backed storage for bookings with optimized queries
//! for per-day availability checks and status updates.
//! Uses runtime queries (not compile-time macros) to avoid requiring
//! database connection at build time.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use clearhaul_core::{
    models::{Booking, BookingStatus, LoadSize, TimeSlot},
    traits::{BookingRepository, Repository},
    AppError, AppResult,
};
use sqlx::PgPool;
use tracing::{debug, error, instrument};
use uuid::Uuid;

/// PostgreSQL implementation of BookingRepository
pub struct PgBookingRepository {
    pool: PgPool,
}

impl PgBookingRepository {
    /// Create a new booking repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Convert database time slot label to enum
    fn parse_time_slot(s: &str) -> TimeSlot {
        TimeSlot::from_label(s).unwrap_or(TimeSlot::EarlyMorning)
    }

    /// Convert database booking status string to enum
    fn parse_status(s: &str) -> BookingStatus {
        BookingStatus::from_str(s).unwrap_or(BookingStatus::Pending)
    }
}

const BOOKING_SELECT_COLUMNS: &str = r#"
    id, reference,
    customer_name, customer_phone, customer_email,
    service_address, service_date, time_slot,
    load_size, status, notes,
    created_at, updated_at
"#;

#[async_trait]
impl Repository<Booking, i64> for PgBookingRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Booking>> {
        debug!("Finding booking by id: {}", id);

        let query = format!(
            "SELECT {} FROM bookings WHERE id = $1",
            BOOKING_SELECT_COLUMNS
        );

        let result = sqlx::query_as::<sqlx::Postgres, BookingRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                error!("Database error finding booking {}: {}", id, e);
                AppError::Database(format!("Failed to find booking: {}", e))
            })?;

        Ok(result.map(Into::into))
    }

    #[instrument(skip(self))]
    async fn find_all(&self, limit: i64, offset: i64) -> AppResult<Vec<Booking>> {
        debug!("Finding all bookings with limit {} offset {}", limit, offset);

        let query = format!(
            "SELECT {} FROM bookings ORDER BY service_date DESC, id DESC LIMIT $1 OFFSET $2",
            BOOKING_SELECT_COLUMNS
        );

        let rows = sqlx::query_as::<sqlx::Postgres, BookingRow>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                error!("Database error finding bookings: {}", e);
                AppError::Database(format!("Failed to fetch bookings: {}", e))
            })?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    #[instrument(skip(self))]
    async fn count(&self) -> AppResult<i64> {
        let result: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM bookings")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                error!("Database error counting bookings: {}", e);
                AppError::Database(format!("Failed to count bookings: {}", e))
            })?;

        Ok(result.0)
    }

    #[instrument(skip(self, entity))]
    async fn create(&self, entity: &Booking) -> AppResult<Booking> {
        debug!("Creating booking for {}", entity.service_date);

        let query = format!(
            r#"
            INSERT INTO bookings (
                reference,
                customer_name, customer_phone, customer_email,
                service_address, service_date, time_slot,
                load_size, status, notes
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {}
            "#,
            BOOKING_SELECT_COLUMNS
        );

        let row = sqlx::query_as::<sqlx::Postgres, BookingRow>(&query)
            .bind(entity.reference)
            .bind(&entity.customer_name)
            .bind(&entity.customer_phone)
            .bind(&entity.customer_email)
            .bind(&entity.service_address)
            .bind(entity.service_date)
            .bind(entity.time_slot.to_string())
            .bind(entity.load_size.map(|l| l.to_string()))
            .bind(entity.status.to_string())
            .bind(&entity.notes)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                error!("Database error creating booking: {}", e);
                if e.to_string().contains("unique constraint") {
                    // The only unique index besides the key is the active-slot one
                    AppError::SlotUnavailable {
                        date: entity.service_date,
                        slot: entity.time_slot.to_string(),
                    }
                } else {
                    AppError::Database(format!("Failed to create booking: {}", e))
                }
            })?;

        Ok(row.into())
    }

    #[instrument(skip(self, entity))]
    async fn update(&self, entity: &Booking) -> AppResult<Booking> {
        debug!("Updating booking: {}", entity.id);

        let query = format!(
            r#"
            UPDATE bookings
            SET customer_name = $2,
                customer_phone = $3,
                customer_email = $4,
                service_address = $5,
                service_date = $6,
                time_slot = $7,
                load_size = $8,
                status = $9,
                notes = $10,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            BOOKING_SELECT_COLUMNS
        );

        let row = sqlx::query_as::<sqlx::Postgres, BookingRow>(&query)
            .bind(entity.id)
            .bind(&entity.customer_name)
            .bind(&entity.customer_phone)
            .bind(&entity.customer_email)
            .bind(&entity.service_address)
            .bind(entity.service_date)
            .bind(entity.time_slot.to_string())
            .bind(entity.load_size.map(|l| l.to_string()))
            .bind(entity.status.to_string())
            .bind(&entity.notes)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                error!("Database error updating booking {}: {}", entity.id, e);
                if e.to_string().contains("unique constraint") {
                    AppError::SlotUnavailable {
                        date: entity.service_date,
                        slot: entity.time_slot.to_string(),
                    }
                } else {
                    AppError::Database(format!("Failed to update booking: {}", e))
                }
            })?;

        Ok(row.into())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: i64) -> AppResult<bool> {
        debug!("Deleting booking: {}", id);

        let result = sqlx::query("DELETE FROM bookings WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                error!("Database error deleting booking {}: {}", id, e);
                AppError::Database(format!("Failed to delete booking: {}", e))
            })?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl BookingRepository for PgBookingRepository {
    #[instrument(skip(self))]
    async fn find_for_date(&self, date: NaiveDate) -> AppResult<Vec<Booking>> {
        debug!("Finding bookings for date: {}", date);

        let query = format!(
            "SELECT {} FROM bookings WHERE service_date = $1 ORDER BY id",
            BOOKING_SELECT_COLUMNS
        );

        let rows = sqlx::query_as::<sqlx::Postgres, BookingRow>(&query)
            .bind(date)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                error!("Database error finding bookings for {}: {}", date, e);
                AppError::Database(format!("Failed to fetch bookings: {}", e))
            })?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    #[instrument(skip(self))]
    async fn list_filtered(
        &self,
        status: Option<BookingStatus>,
        from_date: Option<NaiveDate>,
        to_date: Option<NaiveDate>,
        limit: i64,
        offset: i64,
    ) -> AppResult<(Vec<Booking>, i64)> {
        debug!(
            "Listing bookings with filters: status={:?}, from={:?}, to={:?}, limit={}, offset={}",
            status, from_date, to_date, limit, offset
        );

        // Build raw SQL with rendered values for filters. Enum and date
        // Display impls only emit fixed slot labels, statuses and ISO dates.
        let mut conditions = Vec::new();

        if let Some(s) = status {
            conditions.push(format!("status = '{}'", s));
        }
        if let Some(from) = from_date {
            conditions.push(format!("service_date >= '{}'", from));
        }
        if let Some(to) = to_date {
            conditions.push(format!("service_date <= '{}'", to));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let count_sql = format!("SELECT COUNT(*) FROM bookings {}", where_clause);
        let data_sql = format!(
            "SELECT {} FROM bookings {} ORDER BY service_date DESC, id DESC LIMIT {} OFFSET {}",
            BOOKING_SELECT_COLUMNS, where_clause, limit, offset
        );

        let total: (i64,) = sqlx::query_as(&count_sql)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                error!("Database error counting filtered bookings: {}", e);
                AppError::Database(format!("Failed to count bookings: {}", e))
            })?;

        let rows = sqlx::query_as::<sqlx::Postgres, BookingRow>(&data_sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                error!("Database error fetching filtered bookings: {}", e);
                AppError::Database(format!("Failed to fetch bookings: {}", e))
            })?;

        Ok((rows.into_iter().map(Into::into).collect(), total.0))
    }

    #[instrument(skip(self))]
    async fn update_status(&self, id: i64, status: BookingStatus) -> AppResult<Booking> {
        debug!("Updating booking {} status to {}", id, status);

        let query = format!(
            r#"
            UPDATE bookings
            SET status = $2,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            BOOKING_SELECT_COLUMNS
        );

        let row = sqlx::query_as::<sqlx::Postgres, BookingRow>(&query)
            .bind(id)
            .bind(status.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                error!("Database error updating booking status: {}", e);
                AppError::Database(format!("Failed to update booking status: {}", e))
            })?
            .ok_or_else(|| AppError::BookingNotFound(id.to_string()))?;

        Ok(row.into())
    }
}

/// Helper struct for mapping database rows to domain model
#[derive(Debug, sqlx::FromRow)]
struct BookingRow {
    id: i64,
    reference: Uuid,
    customer_name: String,
    customer_phone: String,
    customer_email: Option<String>,
    service_address: String,
    service_date: NaiveDate,
    time_slot: String,
    load_size: Option<String>,
    status: String,
    notes: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<BookingRow> for Booking {
    fn from(row: BookingRow) -> Self {
        Self {
            id: row.id,
            reference: row.reference,
            customer_name: row.customer_name,
            customer_phone: row.customer_phone,
            customer_email: row.customer_email,
            service_address: row.service_address,
            service_date: row.service_date,
            time_slot: PgBookingRepository::parse_time_slot(&row.time_slot),
            load_size: row.load_size.as_deref().and_then(LoadSize::from_str),
            status: PgBookingRepository::parse_status(&row.status),
            notes: row.notes,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_booking_row_conversion() {
        let now = Utc::now();
        let row = BookingRow {
            id: 7,
            reference: Uuid::new_v4(),
            customer_name: "Dana Flores".to_string(),
            customer_phone: "555-014-2231".to_string(),
            customer_email: None,
            service_address: "18 Alder Ct".to_string(),
            service_date: NaiveDate::from_ymd_opt(2025, 6, 12).unwrap(),
            time_slot: "10:00 AM - 12:00 PM".to_string(),
            load_size: Some("half".to_string()),
            status: "confirmed".to_string(),
            notes: None,
            created_at: now,
            updated_at: now,
        };

        let booking: Booking = row.into();
        assert_eq!(booking.time_slot, TimeSlot::LateMorning);
        assert_eq!(booking.load_size, Some(LoadSize::Half));
        assert_eq!(booking.status, BookingStatus::Confirmed);
    }

    #[test]
    fn test_unknown_labels_fall_back() {
        let now = Utc::now();
        let row = BookingRow {
            id: 8,
            reference: Uuid::new_v4(),
            customer_name: "N".to_string(),
            customer_phone: "5550000000".to_string(),
            customer_email: None,
            service_address: "1 Main St".to_string(),
            service_date: NaiveDate::from_ymd_opt(2025, 6, 12).unwrap(),
            time_slot: "garbage".to_string(),
            load_size: Some("oversize".to_string()),
            status: "unknown".to_string(),
            notes: None,
            created_at: now,
            updated_at: now,
        };

        let booking: Booking = row.into();
        assert_eq!(booking.time_slot, TimeSlot::EarlyMorning);
        assert_eq!(booking.load_size, None);
        assert_eq!(booking.status, BookingStatus::Pending);
    }
}
