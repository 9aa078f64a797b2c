//! Dashboard handlers
//!
//! Aggregated counters for the office dashboard: today's schedule, the
//! confirmation queue, and invoice totals. Read-only.

use crate::dto::{ApiResponse, DashboardStats};
use actix_web::{web, Result};
use chrono::{NaiveDate, Utc};
use clearhaul_core::models::{Booking, BookingStatus, Invoice, InvoiceStatus, QuoteRequestStatus};
use clearhaul_core::traits::{
    BookingRepository, InvoiceRepository, QuoteRequestRepository, Repository,
};
use clearhaul_db::{
    PgBookingRepository, PgClientRepository, PgInvoiceRepository, PgQuoteRequestRepository,
};
use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::{debug, info, instrument};

/// Get dashboard statistics
///
/// Booking counters cover today and future dates only; past bookings are
/// history, not work to act on.
///
/// GET /api/v1/dashboard/stats
#[instrument(skip(pool))]
pub async fn get_dashboard_stats(
    pool: web::Data<PgPool>,
) -> Result<web::Json<ApiResponse<DashboardStats>>> {
    let today = Utc::now().date_naive();
    debug!("Computing dashboard stats for {}", today);

    let booking_repo = PgBookingRepository::new(pool.get_ref().clone());
    let (bookings, _) = booking_repo
        .list_filtered(
            None,
            Some(today),
            None,
            1_000_000, // Large limit for stats
            0,
        )
        .await?;

    let invoice_repo = PgInvoiceRepository::new(pool.get_ref().clone());
    let (sent_invoices, _) = invoice_repo
        .list_filtered(Some(InvoiceStatus::Sent), None, 1_000_000, 0)
        .await?;
    let (paid_invoices, _) = invoice_repo
        .list_filtered(Some(InvoiceStatus::Paid), None, 1_000_000, 0)
        .await?;

    let client_repo = PgClientRepository::new(pool.get_ref().clone());
    let total_clients = client_repo.count().await?;

    let quote_repo = PgQuoteRequestRepository::new(pool.get_ref().clone());
    let (_, pending_quote_requests) = quote_repo
        .list_filtered(Some(QuoteRequestStatus::Pending), 1, 0)
        .await?;

    let stats = calculate_stats(
        &bookings,
        &sent_invoices,
        &paid_invoices,
        total_clients,
        pending_quote_requests,
        today,
    );

    info!(
        "Dashboard stats: bookings_today={}, pending={}, outstanding={}",
        stats.bookings_today, stats.pending_bookings, stats.outstanding_amount
    );

    Ok(web::Json(ApiResponse::success(stats)))
}

/// Calculate dashboard counters from fetched rows
///
/// `bookings` holds rows from `today` onward; the invoice slices are already
/// filtered to sent and paid respectively.
fn calculate_stats(
    bookings: &[Booking],
    sent_invoices: &[Invoice],
    paid_invoices: &[Invoice],
    total_clients: i64,
    pending_quote_requests: i64,
    today: NaiveDate,
) -> DashboardStats {
    let bookings_today = bookings
        .iter()
        .filter(|b| b.service_date == today && b.status != BookingStatus::Cancelled)
        .count() as i64;

    let upcoming_bookings = bookings
        .iter()
        .filter(|b| b.service_date > today && b.status != BookingStatus::Cancelled)
        .count() as i64;

    let pending_bookings = bookings
        .iter()
        .filter(|b| b.status == BookingStatus::Pending)
        .count() as i64;

    let confirmed_bookings = bookings
        .iter()
        .filter(|b| b.status == BookingStatus::Confirmed)
        .count() as i64;

    let outstanding_invoices = sent_invoices.len() as i64;
    let outstanding_amount: Decimal = sent_invoices.iter().map(|i| i.amount).sum();
    let overdue_invoices = sent_invoices
        .iter()
        .filter(|i| i.is_overdue(today))
        .count() as i64;

    let revenue_collected: Decimal = paid_invoices.iter().map(|i| i.amount).sum();

    DashboardStats {
        bookings_today,
        upcoming_bookings,
        pending_bookings,
        confirmed_bookings,
        pending_quote_requests,
        total_clients,
        outstanding_invoices,
        outstanding_amount,
        overdue_invoices,
        revenue_collected,
    }
}

/// Configure dashboard routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/dashboard").route("/stats", web::get().to(get_dashboard_stats)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use rust_decimal_macros::dec;

    fn booking_on(date: NaiveDate, status: BookingStatus) -> Booking {
        Booking {
            service_date: date,
            status,
            ..Default::default()
        }
    }

    fn sent_invoice(amount: Decimal, due_date: Option<NaiveDate>) -> Invoice {
        Invoice {
            amount,
            status: InvoiceStatus::Sent,
            due_date,
            ..Default::default()
        }
    }

    #[test]
    fn test_calculate_stats_empty() {
        let today = Utc::now().date_naive();
        let stats = calculate_stats(&[], &[], &[], 0, 0, today);

        assert_eq!(stats.bookings_today, 0);
        assert_eq!(stats.upcoming_bookings, 0);
        assert_eq!(stats.outstanding_amount, Decimal::ZERO);
        assert_eq!(stats.revenue_collected, Decimal::ZERO);
    }

    #[test]
    fn test_calculate_stats_booking_counters() {
        let today = Utc::now().date_naive();
        let tomorrow = today + Duration::days(1);

        let bookings = vec![
            booking_on(today, BookingStatus::Confirmed),
            booking_on(today, BookingStatus::Cancelled),
            booking_on(tomorrow, BookingStatus::Pending),
            booking_on(tomorrow, BookingStatus::Pending),
        ];

        let stats = calculate_stats(&bookings, &[], &[], 5, 2, today);

        assert_eq!(stats.bookings_today, 1);
        assert_eq!(stats.upcoming_bookings, 2);
        assert_eq!(stats.pending_bookings, 2);
        assert_eq!(stats.confirmed_bookings, 1);
        assert_eq!(stats.total_clients, 5);
        assert_eq!(stats.pending_quote_requests, 2);
    }

    #[test]
    fn test_calculate_stats_invoice_totals() {
        let today = Utc::now().date_naive();
        let last_week = today - Duration::days(7);

        let sent = vec![
            sent_invoice(dec!(450.00), Some(last_week)),
            sent_invoice(dec!(125.50), Some(today + Duration::days(14))),
        ];
        let paid = vec![Invoice {
            amount: dec!(300.00),
            status: InvoiceStatus::Paid,
            ..Default::default()
        }];

        let stats = calculate_stats(&[], &sent, &paid, 0, 0, today);

        assert_eq!(stats.outstanding_invoices, 2);
        assert_eq!(stats.outstanding_amount, dec!(575.50));
        assert_eq!(stats.overdue_invoices, 1);
        assert_eq!(stats.revenue_collected, dec!(300.00));
    }
}
