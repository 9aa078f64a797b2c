//! Booking model
//!
//! Service bookings with their time slot vocabulary and status lifecycle,
//! plus the pure availability filter over a day's bookings.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::models::catalog::LoadSize;

/// Daily service time slot
///
/// The five fixed two-hour windows offered by the booking form. The wire
/// labels are a shared vocabulary with the existing booking clients and must
/// stay byte-for-byte identical.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeSlot {
    #[serde(rename = "8:00 AM - 10:00 AM")]
    EarlyMorning,
    #[serde(rename = "10:00 AM - 12:00 PM")]
    LateMorning,
    #[serde(rename = "12:00 PM - 2:00 PM")]
    Midday,
    #[serde(rename = "2:00 PM - 4:00 PM")]
    Afternoon,
    #[serde(rename = "4:00 PM - 6:00 PM")]
    LateAfternoon,
}

impl TimeSlot {
    /// All slots in declaration order (earliest first)
    pub const ALL: [TimeSlot; 5] = [
        TimeSlot::EarlyMorning,
        TimeSlot::LateMorning,
        TimeSlot::Midday,
        TimeSlot::Afternoon,
        TimeSlot::LateAfternoon,
    ];

    /// Canonical wire label
    pub fn label(&self) -> &'static str {
        match self {
            TimeSlot::EarlyMorning => "8:00 AM - 10:00 AM",
            TimeSlot::LateMorning => "10:00 AM - 12:00 PM",
            TimeSlot::Midday => "12:00 PM - 2:00 PM",
            TimeSlot::Afternoon => "2:00 PM - 4:00 PM",
            TimeSlot::LateAfternoon => "4:00 PM - 6:00 PM",
        }
    }

    /// Parse from the canonical wire label (exact match)
    pub fn from_label(s: &str) -> Option<Self> {
        TimeSlot::ALL.into_iter().find(|slot| slot.label() == s)
    }

    /// Filter the fixed slots against a day's bookings
    ///
    /// A slot is open unless some booking whose status still occupies a slot
    /// carries that exact label. Returns open slots in declaration order.
    /// Pure filter: the caller supplies the day's bookings.
    pub fn open_slots(bookings: &[Booking]) -> Vec<TimeSlot> {
        TimeSlot::ALL
            .into_iter()
            .filter(|slot| {
                !bookings
                    .iter()
                    .any(|b| b.status.blocks_slot() && b.time_slot == *slot)
            })
            .collect()
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Booking status enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    /// Submitted by the customer, awaiting confirmation
    #[default]
    Pending,
    /// Confirmed by the office
    Confirmed,
    /// Service visit finished
    Completed,
    /// Cancelled by either side
    Cancelled,
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BookingStatus::Pending => write!(f, "pending"),
            BookingStatus::Confirmed => write!(f, "confirmed"),
            BookingStatus::Completed => write!(f, "completed"),
            BookingStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

impl BookingStatus {
    /// Parse from string (case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Some(BookingStatus::Pending),
            "confirmed" => Some(BookingStatus::Confirmed),
            "completed" => Some(BookingStatus::Completed),
            "cancelled" => Some(BookingStatus::Cancelled),
            _ => None,
        }
    }

    /// Check if a booking in this status occupies its time slot
    ///
    /// Every status except cancelled blocks the slot.
    pub fn blocks_slot(&self) -> bool {
        !matches!(self, BookingStatus::Cancelled)
    }

    /// Check if this status accepts no further transitions
    pub fn is_terminal(&self) -> bool {
        matches!(self, BookingStatus::Completed | BookingStatus::Cancelled)
    }

    /// Check if the transition to `next` is allowed
    pub fn can_transition_to(&self, next: BookingStatus) -> bool {
        matches!(
            (self, next),
            (BookingStatus::Pending, BookingStatus::Confirmed)
                | (BookingStatus::Pending, BookingStatus::Cancelled)
                | (BookingStatus::Confirmed, BookingStatus::Completed)
                | (BookingStatus::Confirmed, BookingStatus::Cancelled)
        )
    }
}

/// Booking entity
///
/// A scheduled service visit: who, where, which calendar date, and which of
/// the five daily slots. The service date is a plain calendar date chosen by
/// the customer, so no time zone arithmetic applies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    /// Unique identifier
    pub id: i64,

    /// Public reference for customer-facing lookups
    pub reference: Uuid,

    /// Customer name
    pub customer_name: String,

    /// Customer phone
    pub customer_phone: String,

    /// Customer email
    pub customer_email: Option<String>,

    /// Service address
    pub service_address: String,

    /// Requested calendar date
    pub service_date: NaiveDate,

    /// Requested time slot
    pub time_slot: TimeSlot,

    /// Estimated truck load size (if known at booking time)
    pub load_size: Option<LoadSize>,

    /// Booking status
    pub status: BookingStatus,

    /// Free-form office notes
    pub notes: Option<String>,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    /// Check if this booking still occupies its slot
    #[inline]
    pub fn blocks_slot(&self) -> bool {
        self.status.blocks_slot()
    }
}

impl Default for Booking {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            reference: Uuid::new_v4(),
            customer_name: String::new(),
            customer_phone: String::new(),
            customer_email: None,
            service_address: String::new(),
            service_date: now.date_naive(),
            time_slot: TimeSlot::EarlyMorning,
            load_size: None,
            status: BookingStatus::Pending,
            notes: None,
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn booking_at(slot: TimeSlot, status: BookingStatus) -> Booking {
        Booking {
            time_slot: slot,
            status,
            ..Default::default()
        }
    }

    #[test]
    fn test_slot_labels_are_canonical() {
        let labels: Vec<_> = TimeSlot::ALL.iter().map(|s| s.label()).collect();
        assert_eq!(
            labels,
            vec![
                "8:00 AM - 10:00 AM",
                "10:00 AM - 12:00 PM",
                "12:00 PM - 2:00 PM",
                "2:00 PM - 4:00 PM",
                "4:00 PM - 6:00 PM",
            ]
        );
    }

    #[test]
    fn test_slot_label_round_trip() {
        for slot in TimeSlot::ALL {
            assert_eq!(TimeSlot::from_label(slot.label()), Some(slot));
        }
        // Exact match only, no case folding on the wire label.
        assert_eq!(TimeSlot::from_label("8:00 am - 10:00 am"), None);
        assert_eq!(TimeSlot::from_label("6:00 PM - 8:00 PM"), None);
    }

    #[test]
    fn test_slot_serde_uses_label() {
        let json = serde_json::to_string(&TimeSlot::LateMorning).unwrap();
        assert_eq!(json, "\"10:00 AM - 12:00 PM\"");
        let slot: TimeSlot = serde_json::from_str("\"4:00 PM - 6:00 PM\"").unwrap();
        assert_eq!(slot, TimeSlot::LateAfternoon);
    }

    #[test]
    fn test_open_slots_excludes_booked_slot() {
        // One non-cancelled booking at 10-12 leaves the other four open.
        let bookings = vec![booking_at(TimeSlot::LateMorning, BookingStatus::Confirmed)];

        let open = TimeSlot::open_slots(&bookings);

        assert_eq!(
            open,
            vec![
                TimeSlot::EarlyMorning,
                TimeSlot::Midday,
                TimeSlot::Afternoon,
                TimeSlot::LateAfternoon,
            ]
        );
    }

    #[test]
    fn test_open_slots_ignores_cancelled_bookings() {
        let bookings = vec![
            booking_at(TimeSlot::Midday, BookingStatus::Cancelled),
            booking_at(TimeSlot::Afternoon, BookingStatus::Pending),
        ];

        let open = TimeSlot::open_slots(&bookings);

        assert!(open.contains(&TimeSlot::Midday));
        assert!(!open.contains(&TimeSlot::Afternoon));
    }

    #[test]
    fn test_open_slots_empty_day() {
        assert_eq!(TimeSlot::open_slots(&[]), TimeSlot::ALL.to_vec());
    }

    #[test]
    fn test_blocks_slot() {
        assert!(BookingStatus::Pending.blocks_slot());
        assert!(BookingStatus::Confirmed.blocks_slot());
        assert!(BookingStatus::Completed.blocks_slot());
        assert!(!BookingStatus::Cancelled.blocks_slot());
    }

    #[test]
    fn test_status_transitions() {
        assert!(BookingStatus::Pending.can_transition_to(BookingStatus::Confirmed));
        assert!(BookingStatus::Pending.can_transition_to(BookingStatus::Cancelled));
        assert!(BookingStatus::Confirmed.can_transition_to(BookingStatus::Completed));
        assert!(BookingStatus::Confirmed.can_transition_to(BookingStatus::Cancelled));

        assert!(!BookingStatus::Pending.can_transition_to(BookingStatus::Completed));
        assert!(!BookingStatus::Completed.can_transition_to(BookingStatus::Cancelled));
        assert!(!BookingStatus::Cancelled.can_transition_to(BookingStatus::Pending));
        assert!(!BookingStatus::Confirmed.can_transition_to(BookingStatus::Confirmed));
    }

    #[test]
    fn test_terminal_statuses() {
        assert!(!BookingStatus::Pending.is_terminal());
        assert!(!BookingStatus::Confirmed.is_terminal());
        assert!(BookingStatus::Completed.is_terminal());
        assert!(BookingStatus::Cancelled.is_terminal());
    }
}
