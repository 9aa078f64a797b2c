//! Client DTOs
//!
//! Request and response types for client management endpoints.

use crate::dto::PaginationParams;
use chrono::{DateTime, Utc};
use clearhaul_core::models::Client;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Client creation request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ClientCreateRequest {
    /// Client name
    #[validate(length(min = 1, max = 200, message = "Client name is required"))]
    pub name: String,

    /// Phone number
    #[validate(length(min = 7, max = 30, message = "A valid phone number is required"))]
    pub phone: String,

    /// Email address (optional)
    #[validate(email)]
    pub email: Option<String>,

    /// Service address (optional)
    #[validate(length(max = 500))]
    pub address: Option<String>,

    /// Free-form notes (optional)
    #[validate(length(max = 2000))]
    pub notes: Option<String>,
}

impl ClientCreateRequest {
    /// Convert to a Client entity
    pub fn to_client(&self) -> Client {
        Client {
            id: 0,
            name: self.name.clone(),
            phone: self.phone.clone(),
            email: self.email.clone(),
            address: self.address.clone(),
            notes: self.notes.clone(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }
}

/// Client update request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ClientUpdateRequest {
    /// Client name
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,

    /// Phone number
    #[validate(length(min = 7, max = 30))]
    pub phone: Option<String>,

    /// Email address
    #[validate(email)]
    pub email: Option<String>,

    /// Service address
    #[validate(length(max = 500))]
    pub address: Option<String>,

    /// Free-form notes
    #[validate(length(max = 2000))]
    pub notes: Option<String>,
}

/// Client list filter parameters
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ClientFilterParams {
    /// Pagination
    #[serde(flatten)]
    #[validate(nested)]
    pub pagination: PaginationParams,

    /// Search term matched against name and phone
    pub q: Option<String>,
}

/// Client response
#[derive(Debug, Clone, Serialize)]
pub struct ClientResponse {
    /// Client ID
    pub id: i32,

    /// Client name
    pub name: String,

    /// Phone number
    pub phone: String,

    /// Email address
    pub email: Option<String>,

    /// Service address
    pub address: Option<String>,

    /// Notes
    pub notes: Option<String>,

    /// Created timestamp
    pub created_at: DateTime<Utc>,

    /// Updated timestamp
    pub updated_at: DateTime<Utc>,
}

impl From<Client> for ClientResponse {
    fn from(client: Client) -> Self {
        Self {
            id: client.id,
            name: client.name,
            phone: client.phone,
            email: client.email,
            address: client.address,
            notes: client.notes,
            created_at: client.created_at,
            updated_at: client.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_create_request_to_client() {
        let req = ClientCreateRequest {
            name: "Morgan Lee".to_string(),
            phone: "(555) 321-7788".to_string(),
            email: Some("morgan@example.com".to_string()),
            address: None,
            notes: None,
        };

        assert!(req.validate().is_ok());

        let client = req.to_client();
        assert_eq!(client.id, 0);
        assert_eq!(client.name, "Morgan Lee");
        assert_eq!(client.phone, "(555) 321-7788");
    }

    #[test]
    fn test_client_create_request_rejects_short_phone() {
        let req = ClientCreateRequest {
            name: "Morgan Lee".to_string(),
            phone: "555".to_string(),
            email: None,
            address: None,
            notes: None,
        };
        assert!(req.validate().is_err());
    }
}
