//! Dashboard DTOs

use rust_decimal::Decimal;
use serde::Serialize;

/// Operational dashboard statistics response
#[derive(Debug, Clone, Serialize)]
pub struct DashboardStats {
    /// Bookings scheduled for today, excluding cancelled ones
    pub bookings_today: i64,

    /// Bookings on future dates, excluding cancelled ones
    pub upcoming_bookings: i64,

    /// Bookings from today onward still awaiting confirmation
    pub pending_bookings: i64,

    /// Confirmed bookings from today onward
    pub confirmed_bookings: i64,

    /// Quote requests awaiting follow-up
    pub pending_quote_requests: i64,

    /// Total clients on file
    pub total_clients: i64,

    /// Sent invoices awaiting payment
    pub outstanding_invoices: i64,

    /// Total amount across sent invoices
    pub outstanding_amount: Decimal,

    /// Sent invoices past their due date
    pub overdue_invoices: i64,

    /// Total amount collected across paid invoices
    pub revenue_collected: Decimal,
}
