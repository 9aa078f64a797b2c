//! Quote request model
//!
//! A submitted estimate: contact details, the selection snapshot, and the
//! server-computed total. The snapshot is stored as JSON for display and is
//! never re-queried per kind; the total is always recomputed server-side at
//! submission time because client-supplied totals are not trusted.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Quote request status enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum QuoteRequestStatus {
    /// Submitted, not yet followed up
    #[default]
    Pending,
    /// Office has reached out
    Contacted,
    /// Converted to a booking
    Converted,
    /// Customer declined
    Declined,
}

impl fmt::Display for QuoteRequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuoteRequestStatus::Pending => write!(f, "pending"),
            QuoteRequestStatus::Contacted => write!(f, "contacted"),
            QuoteRequestStatus::Converted => write!(f, "converted"),
            QuoteRequestStatus::Declined => write!(f, "declined"),
        }
    }
}

impl QuoteRequestStatus {
    /// Parse from string (case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Some(QuoteRequestStatus::Pending),
            "contacted" => Some(QuoteRequestStatus::Contacted),
            "converted" => Some(QuoteRequestStatus::Converted),
            "declined" => Some(QuoteRequestStatus::Declined),
            _ => None,
        }
    }
}

/// Quote request entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteRequest {
    /// Unique identifier
    pub id: i64,

    /// Customer name
    pub customer_name: String,

    /// Customer phone
    pub customer_phone: String,

    /// Customer email
    pub customer_email: Option<String>,

    /// Selection snapshot as submitted (load size plus non-zero quantities)
    pub selection: serde_json::Value,

    /// Total computed from the process catalog at submission time
    pub estimated_total: Decimal,

    /// Free-text job description
    pub description: Option<String>,

    /// Follow-up status
    pub status: QuoteRequestStatus,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl Default for QuoteRequest {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            customer_name: String::new(),
            customer_phone: String::new(),
            customer_email: None,
            selection: serde_json::Value::Null,
            estimated_total: Decimal::ZERO,
            description: None,
            status: QuoteRequestStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parse() {
        assert_eq!(
            QuoteRequestStatus::from_str("pending"),
            Some(QuoteRequestStatus::Pending)
        );
        assert_eq!(
            QuoteRequestStatus::from_str("CONVERTED"),
            Some(QuoteRequestStatus::Converted)
        );
        assert_eq!(QuoteRequestStatus::from_str("archived"), None);
    }

    #[test]
    fn test_new_request_defaults_to_pending() {
        let request = QuoteRequest::default();
        assert_eq!(request.status, QuoteRequestStatus::Pending);
    }
}
