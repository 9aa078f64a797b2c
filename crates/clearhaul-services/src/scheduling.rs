//! Scheduling service implementation
//!
//! Owns the booking lifecycle: slot conflict checks at creation, reschedule
//! checks on edits, and the status transition rules.

use clearhaul_core::{
    models::{Booking, BookingStatus},
    traits::BookingRepository,
    AppError, AppResult,
};
use std::sync::Arc;
use tracing::{debug, instrument};

/// Booking scheduling service
///
/// A slot is taken while any non-cancelled booking holds it. The check here
/// races with concurrent writers; the partial unique index on active
/// bookings is the backstop, and the repository maps that violation to the
/// same slot conflict error.
pub struct SchedulingService<R: BookingRepository> {
    booking_repo: Arc<R>,
}

impl<R: BookingRepository> SchedulingService<R> {
    /// Create a new scheduling service
    pub fn new(booking_repo: Arc<R>) -> Self {
        Self { booking_repo }
    }

    /// Create a booking after confirming its slot is still open
    #[instrument(skip(self, booking))]
    pub async fn create_booking(&self, booking: &Booking) -> AppResult<Booking> {
        debug!(
            "Creating booking for {} at {}",
            booking.service_date, booking.time_slot
        );

        let existing = self.booking_repo.find_for_date(booking.service_date).await?;
        let taken = existing
            .iter()
            .any(|b| b.blocks_slot() && b.time_slot == booking.time_slot);

        if taken {
            return Err(AppError::SlotUnavailable {
                date: booking.service_date,
                slot: booking.time_slot.to_string(),
            });
        }

        self.booking_repo.create(booking).await
    }

    /// Update a booking's details, re-checking the slot when it moved
    ///
    /// Status changes do not belong here; they go through [`transition`]
    /// so the transition rules always apply.
    ///
    /// [`transition`]: SchedulingService::transition
    #[instrument(skip(self, booking))]
    pub async fn update_booking(&self, booking: &Booking) -> AppResult<Booking> {
        debug!("Updating booking {}", booking.id);

        let current = self
            .booking_repo
            .find_by_id(booking.id)
            .await?
            .ok_or_else(|| AppError::BookingNotFound(booking.id.to_string()))?;

        let moved = current.service_date != booking.service_date
            || current.time_slot != booking.time_slot;

        if moved && booking.blocks_slot() {
            let existing = self.booking_repo.find_for_date(booking.service_date).await?;
            let taken = existing
                .iter()
                .any(|b| b.id != booking.id && b.blocks_slot() && b.time_slot == booking.time_slot);

            if taken {
                return Err(AppError::SlotUnavailable {
                    date: booking.service_date,
                    slot: booking.time_slot.to_string(),
                });
            }
        }

        self.booking_repo.update(booking).await
    }

    /// Move a booking to a new status, enforcing the transition rules
    #[instrument(skip(self))]
    pub async fn transition(&self, id: i64, next: BookingStatus) -> AppResult<Booking> {
        debug!("Transitioning booking {} to {}", id, next);

        let booking = self
            .booking_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::BookingNotFound(id.to_string()))?;

        if !booking.status.can_transition_to(next) {
            return Err(AppError::InvalidTransition {
                from: booking.status.to_string(),
                to: next.to_string(),
            });
        }

        self.booking_repo.update_status(id, next).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use clearhaul_core::models::TimeSlot;
    use clearhaul_core::traits::Repository;

    struct MockBookingRepository {
        bookings: Vec<Booking>,
    }

    #[async_trait]
    impl Repository<Booking, i64> for MockBookingRepository {
        async fn find_by_id(&self, id: i64) -> AppResult<Option<Booking>> {
            Ok(self.bookings.iter().find(|b| b.id == id).cloned())
        }

        async fn find_all(&self, _limit: i64, _offset: i64) -> AppResult<Vec<Booking>> {
            Ok(self.bookings.clone())
        }

        async fn count(&self) -> AppResult<i64> {
            Ok(self.bookings.len() as i64)
        }

        async fn create(&self, entity: &Booking) -> AppResult<Booking> {
            Ok(entity.clone())
        }

        async fn update(&self, entity: &Booking) -> AppResult<Booking> {
            Ok(entity.clone())
        }

        async fn delete(&self, _id: i64) -> AppResult<bool> {
            Ok(true)
        }
    }

    #[async_trait]
    impl BookingRepository for MockBookingRepository {
        async fn find_for_date(&self, date: NaiveDate) -> AppResult<Vec<Booking>> {
            Ok(self
                .bookings
                .iter()
                .filter(|b| b.service_date == date)
                .cloned()
                .collect())
        }

        async fn list_filtered(
            &self,
            _status: Option<BookingStatus>,
            _from_date: Option<NaiveDate>,
            _to_date: Option<NaiveDate>,
            _limit: i64,
            _offset: i64,
        ) -> AppResult<(Vec<Booking>, i64)> {
            Ok((self.bookings.clone(), self.bookings.len() as i64))
        }

        async fn update_status(&self, id: i64, status: BookingStatus) -> AppResult<Booking> {
            let mut booking = self
                .bookings
                .iter()
                .find(|b| b.id == id)
                .cloned()
                .ok_or_else(|| AppError::BookingNotFound(id.to_string()))?;
            booking.status = status;
            Ok(booking)
        }
    }

    fn booking(id: i64, date: NaiveDate, slot: TimeSlot, status: BookingStatus) -> Booking {
        Booking {
            id,
            service_date: date,
            time_slot: slot,
            status,
            ..Booking::default()
        }
    }

    fn june(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, day).unwrap()
    }

    fn service(bookings: Vec<Booking>) -> SchedulingService<MockBookingRepository> {
        SchedulingService::new(Arc::new(MockBookingRepository { bookings }))
    }

    #[tokio::test]
    async fn test_create_booking_in_open_slot() {
        let svc = service(vec![booking(
            1,
            june(12),
            TimeSlot::LateMorning,
            BookingStatus::Confirmed,
        )]);

        let new = booking(0, june(12), TimeSlot::Midday, BookingStatus::Pending);
        let created = svc.create_booking(&new).await.unwrap();
        assert_eq!(created.time_slot, TimeSlot::Midday);
    }

    #[tokio::test]
    async fn test_create_booking_in_taken_slot_conflicts() {
        let svc = service(vec![booking(
            1,
            june(12),
            TimeSlot::LateMorning,
            BookingStatus::Pending,
        )]);

        let new = booking(0, june(12), TimeSlot::LateMorning, BookingStatus::Pending);
        let err = svc.create_booking(&new).await.unwrap_err();
        assert!(matches!(err, AppError::SlotUnavailable { .. }));
    }

    #[tokio::test]
    async fn test_create_booking_over_cancelled_slot() {
        let svc = service(vec![booking(
            1,
            june(12),
            TimeSlot::LateMorning,
            BookingStatus::Cancelled,
        )]);

        let new = booking(0, june(12), TimeSlot::LateMorning, BookingStatus::Pending);
        assert!(svc.create_booking(&new).await.is_ok());
    }

    #[tokio::test]
    async fn test_update_booking_to_taken_slot_conflicts() {
        let svc = service(vec![
            booking(1, june(12), TimeSlot::LateMorning, BookingStatus::Confirmed),
            booking(2, june(12), TimeSlot::Midday, BookingStatus::Pending),
        ]);

        let moved = booking(2, june(12), TimeSlot::LateMorning, BookingStatus::Pending);
        let err = svc.update_booking(&moved).await.unwrap_err();
        assert!(matches!(err, AppError::SlotUnavailable { .. }));
    }

    #[tokio::test]
    async fn test_update_booking_keeping_its_own_slot() {
        let svc = service(vec![booking(
            2,
            june(12),
            TimeSlot::Midday,
            BookingStatus::Pending,
        )]);

        let mut edited = booking(2, june(12), TimeSlot::Midday, BookingStatus::Pending);
        edited.customer_name = "Renamed".to_string();
        assert!(svc.update_booking(&edited).await.is_ok());
    }

    #[tokio::test]
    async fn test_update_missing_booking() {
        let svc = service(vec![]);

        let edited = booking(9, june(12), TimeSlot::Midday, BookingStatus::Pending);
        let err = svc.update_booking(&edited).await.unwrap_err();
        assert!(matches!(err, AppError::BookingNotFound(_)));
    }

    #[tokio::test]
    async fn test_transition_pending_to_confirmed() {
        let svc = service(vec![booking(
            1,
            june(12),
            TimeSlot::Midday,
            BookingStatus::Pending,
        )]);

        let updated = svc.transition(1, BookingStatus::Confirmed).await.unwrap();
        assert_eq!(updated.status, BookingStatus::Confirmed);
    }

    #[tokio::test]
    async fn test_transition_pending_to_completed_rejected() {
        let svc = service(vec![booking(
            1,
            june(12),
            TimeSlot::Midday,
            BookingStatus::Pending,
        )]);

        let err = svc.transition(1, BookingStatus::Completed).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidTransition { .. }));
    }

    #[tokio::test]
    async fn test_transition_from_terminal_status_rejected() {
        let svc = service(vec![booking(
            1,
            june(12),
            TimeSlot::Midday,
            BookingStatus::Cancelled,
        )]);

        let err = svc.transition(1, BookingStatus::Pending).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidTransition { .. }));
    }

    #[tokio::test]
    async fn test_transition_missing_booking() {
        let svc = service(vec![]);

        let err = svc.transition(42, BookingStatus::Confirmed).await.unwrap_err();
        assert!(matches!(err, AppError::BookingNotFound(_)));
    }
}
