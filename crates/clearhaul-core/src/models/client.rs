//! Client model
//!
//! Customers managed through the admin panel. Clients exist independently of
//! bookings; a booking may or may not belong to a known client.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Client entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Client {
    /// Unique identifier
    pub id: i32,

    /// Client name
    pub name: String,

    /// Phone number as entered
    pub phone: String,

    /// Email address
    pub email: Option<String>,

    /// Service address
    pub address: Option<String>,

    /// Free-form office notes
    pub notes: Option<String>,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl Client {
    /// Normalize a phone number for matching
    ///
    /// Duplicate detection compares digits only, so "(555) 123-4567" and
    /// "555-123-4567" collide.
    pub fn normalize_phone(phone: &str) -> String {
        phone.chars().filter(|c| c.is_ascii_digit()).collect()
    }
}

impl Default for Client {
    fn default() -> Self {
        Self {
            id: 0,
            name: String::new(),
            phone: String::new(),
            email: None,
            address: None,
            notes: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_phone() {
        assert_eq!(Client::normalize_phone("+1-555-123-4567"), "15551234567");
        assert_eq!(Client::normalize_phone("(555) 123-4567"), "5551234567");
        assert_eq!(Client::normalize_phone("5551234567"), "5551234567");
        assert_eq!(Client::normalize_phone(""), "");
    }
}
