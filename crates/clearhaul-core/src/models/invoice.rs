//! Invoice model
//!
//! Invoices issued against clients, optionally tied to a booking, with a
//! draft/sent/paid/void lifecycle.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Invoice status enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    /// Created but not yet sent to the client
    #[default]
    Draft,
    /// Delivered, awaiting payment
    Sent,
    /// Paid in full
    Paid,
    /// Voided, no longer collectible
    Void,
}

impl fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvoiceStatus::Draft => write!(f, "draft"),
            InvoiceStatus::Sent => write!(f, "sent"),
            InvoiceStatus::Paid => write!(f, "paid"),
            InvoiceStatus::Void => write!(f, "void"),
        }
    }
}

impl InvoiceStatus {
    /// Parse from string (case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "draft" => Some(InvoiceStatus::Draft),
            "sent" => Some(InvoiceStatus::Sent),
            "paid" => Some(InvoiceStatus::Paid),
            "void" => Some(InvoiceStatus::Void),
            _ => None,
        }
    }

    /// Check if this status accepts no further transitions
    pub fn is_terminal(&self) -> bool {
        matches!(self, InvoiceStatus::Paid | InvoiceStatus::Void)
    }

    /// Check if the transition to `next` is allowed
    pub fn can_transition_to(&self, next: InvoiceStatus) -> bool {
        matches!(
            (self, next),
            (InvoiceStatus::Draft, InvoiceStatus::Sent)
                | (InvoiceStatus::Draft, InvoiceStatus::Void)
                | (InvoiceStatus::Sent, InvoiceStatus::Paid)
                | (InvoiceStatus::Sent, InvoiceStatus::Void)
        )
    }
}

/// Invoice entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invoice {
    /// Unique identifier
    pub id: i64,

    /// Unique human-facing number (e.g. "INV-2025-0042")
    pub invoice_number: String,

    /// Billed client
    pub client_id: i32,

    /// Originating booking, if any
    pub booking_id: Option<i64>,

    /// Invoiced amount
    pub amount: Decimal,

    /// Invoice status
    pub status: InvoiceStatus,

    /// Date the invoice was issued
    pub issued_date: NaiveDate,

    /// Payment due date
    pub due_date: Option<NaiveDate>,

    /// When payment was recorded
    pub paid_at: Option<DateTime<Utc>>,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl Invoice {
    /// Check if the invoice is overdue as of `today`
    ///
    /// Only sent invoices can be overdue. Draft invoices have not been
    /// delivered and paid/void invoices are settled.
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.status == InvoiceStatus::Sent && self.due_date.map_or(false, |due| due < today)
    }
}

impl Default for Invoice {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            invoice_number: String::new(),
            client_id: 0,
            booking_id: None,
            amount: Decimal::ZERO,
            status: InvoiceStatus::Draft,
            issued_date: now.date_naive(),
            due_date: None,
            paid_at: None,
            created_at: now,
            updated_at: now,
        }
    }
}
