//! Availability service implementation
//!
//! Reports which time slots are open on a given date. Availability is
//! recomputed from the booking table on every call and never cached, so a
//! new booking is reflected by the next request.

use async_trait::async_trait;
use chrono::NaiveDate;
use clearhaul_core::{
    models::TimeSlot,
    traits::{AvailabilityService, BookingRepository, DayAvailability},
    AppError,
};
use std::sync::Arc;
use tracing::{debug, instrument, warn};

/// Availability service backed by the booking repository
///
/// When the booking lookup fails, the service degrades open instead of
/// failing the request: every slot is reported available and the result is
/// flagged so callers can tell a degraded answer from a genuinely free day.
/// A conflicting booking attempt is still rejected at creation time.
pub struct AvailabilityServiceImpl<R: BookingRepository> {
    booking_repo: Arc<R>,
}

impl<R: BookingRepository> AvailabilityServiceImpl<R> {
    /// Create a new availability service
    pub fn new(booking_repo: Arc<R>) -> Self {
        Self { booking_repo }
    }
}

#[async_trait]
impl<R: BookingRepository> AvailabilityService for AvailabilityServiceImpl<R> {
    #[instrument(skip(self))]
    async fn slots_for_date(&self, date: NaiveDate) -> Result<DayAvailability, AppError> {
        debug!("Computing open slots for {}", date);

        match self.booking_repo.find_for_date(date).await {
            Ok(bookings) => {
                let open_slots = TimeSlot::open_slots(&bookings);
                debug!("{} of {} slots open on {}", open_slots.len(), TimeSlot::ALL.len(), date);

                Ok(DayAvailability {
                    date,
                    open_slots,
                    degraded: false,
                })
            }
            Err(e) => {
                warn!(
                    "Booking lookup failed for {}, reporting all slots open: {}",
                    date, e
                );

                Ok(DayAvailability {
                    date,
                    open_slots: TimeSlot::ALL.to_vec(),
                    degraded: true,
                })
            }
        }
    }
}
