//! Booking DTOs
//!
//! Request and response types for booking and availability endpoints.

use crate::dto::{ExportFormat, PaginationParams};
use chrono::{DateTime, NaiveDate, Utc};
use clearhaul_core::models::{Booking, BookingStatus, LoadSize, TimeSlot};
use clearhaul_core::traits::DayAvailability;
use clearhaul_core::AppError;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Booking creation request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct BookingCreateRequest {
    /// Customer name
    #[validate(length(min = 1, max = 200, message = "Customer name is required"))]
    pub customer_name: String,

    /// Customer phone
    #[validate(length(min = 7, max = 30, message = "A valid phone number is required"))]
    pub customer_phone: String,

    /// Customer email (optional)
    #[validate(email)]
    pub customer_email: Option<String>,

    /// Service address
    #[validate(length(min = 1, max = 500, message = "Service address is required"))]
    pub service_address: String,

    /// Requested calendar date
    pub service_date: NaiveDate,

    /// Requested time slot, as its wire label (e.g. "8:00 AM - 10:00 AM")
    pub time_slot: String,

    /// Estimated truck load size (optional)
    pub load_size: Option<LoadSize>,

    /// Free-form notes
    #[validate(length(max = 2000))]
    pub notes: Option<String>,
}

impl BookingCreateRequest {
    /// Convert to a Booking entity
    ///
    /// # Errors
    ///
    /// Returns `AppError::InvalidTimeSlot` when the label is not one of the
    /// five service windows.
    pub fn to_booking(&self) -> Result<Booking, AppError> {
        let time_slot = TimeSlot::from_label(&self.time_slot)
            .ok_or_else(|| AppError::InvalidTimeSlot(self.time_slot.clone()))?;

        Ok(Booking {
            id: 0,
            reference: Uuid::new_v4(),
            customer_name: self.customer_name.clone(),
            customer_phone: self.customer_phone.clone(),
            customer_email: self.customer_email.clone(),
            service_address: self.service_address.clone(),
            service_date: self.service_date,
            time_slot,
            load_size: self.load_size,
            status: BookingStatus::Pending,
            notes: self.notes.clone(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        })
    }
}

/// Booking update request
///
/// All fields optional; only supplied fields change. Status changes go
/// through the status endpoint instead.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct BookingUpdateRequest {
    /// Customer name
    #[validate(length(min = 1, max = 200))]
    pub customer_name: Option<String>,

    /// Customer phone
    #[validate(length(min = 7, max = 30))]
    pub customer_phone: Option<String>,

    /// Customer email
    #[validate(email)]
    pub customer_email: Option<String>,

    /// Service address
    #[validate(length(min = 1, max = 500))]
    pub service_address: Option<String>,

    /// Requested calendar date
    pub service_date: Option<NaiveDate>,

    /// Requested time slot, as its wire label
    pub time_slot: Option<String>,

    /// Estimated truck load size
    pub load_size: Option<LoadSize>,

    /// Free-form notes
    #[validate(length(max = 2000))]
    pub notes: Option<String>,
}

/// Booking status update request
#[derive(Debug, Clone, Deserialize)]
pub struct BookingStatusUpdateRequest {
    /// New status (pending/confirmed/completed/cancelled)
    pub status: String,
}

/// Booking list filter parameters
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct BookingFilterParams {
    /// Pagination
    #[serde(flatten)]
    #[validate(nested)]
    pub pagination: PaginationParams,

    /// Filter by status
    pub status: Option<BookingStatus>,

    /// Only bookings on or after this date
    pub from_date: Option<NaiveDate>,

    /// Only bookings on or before this date
    pub to_date: Option<NaiveDate>,
}

/// Booking export parameters
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct BookingExportParams {
    /// Export format (csv/json/jsonl)
    #[serde(default)]
    pub format: ExportFormat,

    /// Filter by status
    pub status: Option<BookingStatus>,

    /// Only bookings on or after this date
    pub from_date: Option<NaiveDate>,

    /// Only bookings on or before this date
    pub to_date: Option<NaiveDate>,

    /// Maximum number of rows to export
    #[serde(default = "default_export_limit")]
    #[validate(range(min = 1, max = 1_000_000))]
    pub limit: i64,
}

fn default_export_limit() -> i64 {
    100_000
}

/// Booking export row
///
/// All fields pre-rendered as strings for export serialization.
#[derive(Debug, Clone, Serialize)]
pub struct BookingExportRow {
    /// Booking ID
    pub id: String,
    /// Public reference
    pub reference: String,
    /// Customer name
    pub customer_name: String,
    /// Customer phone
    pub customer_phone: String,
    /// Customer email
    pub customer_email: String,
    /// Service address
    pub service_address: String,
    /// Service date (ISO 8601)
    pub service_date: String,
    /// Time slot label
    pub time_slot: String,
    /// Load size key
    pub load_size: String,
    /// Status
    pub status: String,
    /// Notes
    pub notes: String,
    /// Created timestamp (RFC 3339)
    pub created_at: String,
}

impl From<Booking> for BookingExportRow {
    fn from(booking: Booking) -> Self {
        Self {
            id: booking.id.to_string(),
            reference: booking.reference.to_string(),
            customer_name: booking.customer_name,
            customer_phone: booking.customer_phone,
            customer_email: booking.customer_email.unwrap_or_default(),
            service_address: booking.service_address,
            service_date: booking.service_date.to_string(),
            time_slot: booking.time_slot.label().to_string(),
            load_size: booking
                .load_size
                .map(|l| l.to_string())
                .unwrap_or_default(),
            status: booking.status.to_string(),
            notes: booking.notes.unwrap_or_default(),
            created_at: booking.created_at.to_rfc3339(),
        }
    }
}

/// Booking response
#[derive(Debug, Clone, Serialize)]
pub struct BookingResponse {
    /// Booking ID
    pub id: i64,

    /// Public reference
    pub reference: Uuid,

    /// Customer name
    pub customer_name: String,

    /// Customer phone
    pub customer_phone: String,

    /// Customer email
    pub customer_email: Option<String>,

    /// Service address
    pub service_address: String,

    /// Service date
    pub service_date: NaiveDate,

    /// Time slot label
    pub time_slot: String,

    /// Load size key
    pub load_size: Option<String>,

    /// Status
    pub status: String,

    /// Notes
    pub notes: Option<String>,

    /// Created timestamp
    pub created_at: DateTime<Utc>,

    /// Updated timestamp
    pub updated_at: DateTime<Utc>,
}

impl From<Booking> for BookingResponse {
    fn from(booking: Booking) -> Self {
        Self {
            id: booking.id,
            reference: booking.reference,
            customer_name: booking.customer_name,
            customer_phone: booking.customer_phone,
            customer_email: booking.customer_email,
            service_address: booking.service_address,
            service_date: booking.service_date,
            time_slot: booking.time_slot.label().to_string(),
            load_size: booking.load_size.map(|l| l.to_string()),
            status: booking.status.to_string(),
            notes: booking.notes,
            created_at: booking.created_at,
            updated_at: booking.updated_at,
        }
    }
}

/// Availability query parameters
#[derive(Debug, Clone, Deserialize)]
pub struct AvailabilityQuery {
    /// Calendar date to check
    pub date: NaiveDate,
}

/// Availability response for one day
#[derive(Debug, Clone, Serialize)]
pub struct AvailabilityResponse {
    /// The queried date
    pub date: NaiveDate,

    /// Open slot labels in day order
    pub open_slots: Vec<String>,

    /// True when the booking lookup failed and all slots were reported open
    pub degraded: bool,
}

impl From<DayAvailability> for AvailabilityResponse {
    fn from(availability: DayAvailability) -> Self {
        Self {
            date: availability.date,
            open_slots: availability
                .open_slots
                .iter()
                .map(|slot| slot.label().to_string())
                .collect(),
            degraded: availability.degraded,
        }
    }
}
