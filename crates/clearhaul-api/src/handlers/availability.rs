//! Availability handlers
//!
//! HTTP handler for the daily open-slot lookup used by the booking form.

use crate::dto::{ApiResponse, AvailabilityQuery, AvailabilityResponse};
use actix_web::{web, Result};
use clearhaul_core::traits::AvailabilityService;
use clearhaul_db::PgBookingRepository;
use clearhaul_services::AvailabilityServiceImpl;
use sqlx::PgPool;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Get open time slots for a date
///
/// When the booking lookup fails the day is reported fully open with the
/// `degraded` flag set, so the form stays usable and the office resolves
/// conflicts by phone.
///
/// GET /api/v1/availability?date=2025-06-14
#[instrument(skip(pool))]
pub async fn get_availability(
    pool: web::Data<PgPool>,
    query: web::Query<AvailabilityQuery>,
) -> Result<web::Json<ApiResponse<AvailabilityResponse>>> {
    debug!(date = %query.date, "Checking availability");

    let repo = PgBookingRepository::new(pool.get_ref().clone());
    let service = AvailabilityServiceImpl::new(Arc::new(repo));

    let availability = service.slots_for_date(query.date).await?;

    Ok(web::Json(ApiResponse::success(AvailabilityResponse::from(
        availability,
    ))))
}

/// Configure availability routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/availability").route("", web::get().to(get_availability)));
}
