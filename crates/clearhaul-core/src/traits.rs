//! Common traits for repositories and services
//!
//! Defines abstractions for database access and business logic.

use crate::error::AppError;
use crate::models::{
    Booking, BookingStatus, Client, Invoice, InvoiceStatus, QuoteRequest, QuoteRequestStatus,
    TimeSlot,
};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

/// Generic repository trait for CRUD operations
#[async_trait]
pub trait Repository<T, ID>: Send + Sync {
    /// Find entity by ID
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, AppError>;

    /// Find all entities with pagination
    async fn find_all(&self, limit: i64, offset: i64) -> Result<Vec<T>, AppError>;

    /// Count total entities
    async fn count(&self) -> Result<i64, AppError>;

    /// Create a new entity
    async fn create(&self, entity: &T) -> Result<T, AppError>;

    /// Update an existing entity
    async fn update(&self, entity: &T) -> Result<T, AppError>;

    /// Delete entity by ID
    async fn delete(&self, id: ID) -> Result<bool, AppError>;
}

/// Booking repository trait with specialized methods
#[async_trait]
pub trait BookingRepository: Repository<Booking, i64> {
    /// Find all bookings scheduled on a date, regardless of status
    async fn find_for_date(&self, date: NaiveDate) -> Result<Vec<Booking>, AppError>;

    /// List bookings with filtering
    async fn list_filtered(
        &self,
        status: Option<BookingStatus>,
        from_date: Option<NaiveDate>,
        to_date: Option<NaiveDate>,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Booking>, i64), AppError>;

    /// Update booking status
    async fn update_status(&self, id: i64, status: BookingStatus) -> Result<Booking, AppError>;
}

/// Client repository trait with specialized methods
#[async_trait]
pub trait ClientRepository: Repository<Client, i32> {
    /// Find client by normalized phone digits
    async fn find_by_phone(&self, phone: &str) -> Result<Option<Client>, AppError>;

    /// Search clients by name or phone fragment
    async fn search(
        &self,
        term: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Client>, i64), AppError>;
}

/// Invoice repository trait with specialized methods
#[async_trait]
pub trait InvoiceRepository: Repository<Invoice, i64> {
    /// Find invoice by its human-facing number
    async fn find_by_number(&self, invoice_number: &str) -> Result<Option<Invoice>, AppError>;

    /// List invoices with filtering
    async fn list_filtered(
        &self,
        status: Option<InvoiceStatus>,
        client_id: Option<i32>,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Invoice>, i64), AppError>;

    /// Update invoice status, recording the payment timestamp when given
    async fn update_status(
        &self,
        id: i64,
        status: InvoiceStatus,
        paid_at: Option<DateTime<Utc>>,
    ) -> Result<Invoice, AppError>;
}

/// Quote request repository trait with specialized methods
#[async_trait]
pub trait QuoteRequestRepository: Repository<QuoteRequest, i64> {
    /// List quote requests with filtering
    async fn list_filtered(
        &self,
        status: Option<QuoteRequestStatus>,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<QuoteRequest>, i64), AppError>;

    /// Update follow-up status
    async fn update_status(
        &self,
        id: i64,
        status: QuoteRequestStatus,
    ) -> Result<QuoteRequest, AppError>;
}

/// Availability for one calendar date
#[derive(Debug, Clone)]
pub struct DayAvailability {
    pub date: NaiveDate,
    pub open_slots: Vec<TimeSlot>,
    /// True when the booking lookup failed and every slot was reported open
    pub degraded: bool,
}

/// Availability service trait
#[async_trait]
pub trait AvailabilityService: Send + Sync {
    /// Report which slots are open on a date
    ///
    /// Recomputed on every call; results are never cached. When the booking
    /// lookup fails the service reports every slot open with the degraded
    /// flag set instead of failing the request.
    async fn slots_for_date(&self, date: NaiveDate) -> Result<DayAvailability, AppError>;
}

/// Pagination parameters
#[derive(Debug, Clone, Default)]
pub struct Pagination {
    pub page: i64,
    pub per_page: i64,
}

impl Pagination {
    pub fn new(page: i64, per_page: i64) -> Self {
        Self {
            page: page.max(1),
            per_page: per_page.clamp(1, 1000),
        }
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.per_page
    }

    pub fn limit(&self) -> i64 {
        self.per_page
    }
}

/// Paginated response wrapper
#[derive(Debug, Clone, Serialize)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub pagination: PaginationMeta,
}

/// Pagination metadata
#[derive(Debug, Clone, Serialize)]
pub struct PaginationMeta {
    pub total: i64,
    pub page: i64,
    pub per_page: i64,
    pub total_pages: i64,
}

impl PaginationMeta {
    pub fn new(total: i64, page: i64, per_page: i64) -> Self {
        let total_pages = if per_page > 0 {
            (total + per_page - 1) / per_page
        } else {
            0
        };

        Self {
            total,
            page,
            per_page,
            total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination() {
        let p = Pagination::new(1, 10);
        assert_eq!(p.offset(), 0);
        assert_eq!(p.limit(), 10);

        let p = Pagination::new(3, 20);
        assert_eq!(p.offset(), 40);
        assert_eq!(p.limit(), 20);
    }

    #[test]
    fn test_pagination_bounds() {
        let p = Pagination::new(0, 10); // page 0 becomes 1
        assert_eq!(p.page, 1);

        let p = Pagination::new(1, 2000); // per_page capped at 1000
        assert_eq!(p.per_page, 1000);
    }

    #[test]
    fn test_pagination_meta() {
        let meta = PaginationMeta::new(95, 1, 10);
        assert_eq!(meta.total_pages, 10);

        let meta = PaginationMeta::new(100, 1, 10);
        assert_eq!(meta.total_pages, 10);

        let meta = PaginationMeta::new(101, 1, 10);
        assert_eq!(meta.total_pages, 11);
    }
}
