//! Invoice DTOs
//!
//! Request and response types for invoice endpoints.

use crate::dto::PaginationParams;
use chrono::{DateTime, NaiveDate, Utc};
use clearhaul_core::models::{Invoice, InvoiceStatus};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Invoice creation request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct InvoiceCreateRequest {
    /// Billed client
    pub client_id: i32,

    /// Originating booking, if any
    pub booking_id: Option<i64>,

    /// Invoiced amount (must be positive, validated in handler)
    pub amount: Decimal,

    /// Invoice number; generated when omitted
    #[validate(length(min = 1, max = 50))]
    pub invoice_number: Option<String>,

    /// Issue date; defaults to today
    pub issued_date: Option<NaiveDate>,

    /// Due date; defaults to the standard payment term after the issue date
    pub due_date: Option<NaiveDate>,
}

impl InvoiceCreateRequest {
    /// Convert to an Invoice entity
    ///
    /// Missing number and due date stay empty here; the invoicing service
    /// fills them at creation time.
    pub fn to_invoice(&self) -> Invoice {
        Invoice {
            id: 0,
            invoice_number: self.invoice_number.clone().unwrap_or_default(),
            client_id: self.client_id,
            booking_id: self.booking_id,
            amount: self.amount,
            status: InvoiceStatus::Draft,
            issued_date: self.issued_date.unwrap_or_else(|| Utc::now().date_naive()),
            due_date: self.due_date,
            paid_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }
}

/// Invoice update request
///
/// Only draft invoices accept edits.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct InvoiceUpdateRequest {
    /// Invoiced amount
    pub amount: Option<Decimal>,

    /// Due date
    pub due_date: Option<NaiveDate>,

    /// Originating booking
    pub booking_id: Option<i64>,
}

/// Invoice status update request
#[derive(Debug, Clone, Deserialize)]
pub struct InvoiceStatusUpdateRequest {
    /// New status (draft/sent/paid/void)
    pub status: String,
}

/// Invoice list filter parameters
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct InvoiceFilterParams {
    /// Pagination
    #[serde(flatten)]
    #[validate(nested)]
    pub pagination: PaginationParams,

    /// Filter by status
    pub status: Option<InvoiceStatus>,

    /// Filter by billed client
    pub client_id: Option<i32>,
}

/// Invoice response
#[derive(Debug, Clone, Serialize)]
pub struct InvoiceResponse {
    /// Invoice ID
    pub id: i64,

    /// Invoice number
    pub invoice_number: String,

    /// Billed client
    pub client_id: i32,

    /// Originating booking
    pub booking_id: Option<i64>,

    /// Invoiced amount
    pub amount: Decimal,

    /// Status
    pub status: String,

    /// Issue date
    pub issued_date: NaiveDate,

    /// Due date
    pub due_date: Option<NaiveDate>,

    /// When payment was recorded
    pub paid_at: Option<DateTime<Utc>>,

    /// True when sent and past the due date
    pub overdue: bool,

    /// Created timestamp
    pub created_at: DateTime<Utc>,

    /// Updated timestamp
    pub updated_at: DateTime<Utc>,
}

impl From<Invoice> for InvoiceResponse {
    fn from(invoice: Invoice) -> Self {
        let overdue = invoice.is_overdue(Utc::now().date_naive());

        Self {
            id: invoice.id,
            invoice_number: invoice.invoice_number,
            client_id: invoice.client_id,
            booking_id: invoice.booking_id,
            amount: invoice.amount,
            status: invoice.status.to_string(),
            issued_date: invoice.issued_date,
            due_date: invoice.due_date,
            paid_at: invoice.paid_at,
            overdue,
            created_at: invoice.created_at,
            updated_at: invoice.updated_at,
        }
    }
}
