//! Pricing and quote request DTOs
//!
//! Request and response types for the catalog, estimate, and quote request
//! endpoints.

use crate::dto::PaginationParams;
use chrono::{DateTime, Utc};
use clearhaul_core::models::{
    ItemKind, LaborKind, LoadSize, PriceCatalog, QuoteRequest, QuoteRequestStatus, QuoteSelection,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// One priced entry of the published catalog
#[derive(Debug, Clone, Serialize)]
pub struct PriceEntry {
    /// Wire key of the tier or kind
    pub key: String,

    /// Human-readable label
    pub label: String,

    /// Unit price
    pub price: Decimal,
}

/// Published price catalog
///
/// Every truck load tier, item kind, and labor kind with its price, in
/// catalog declaration order.
#[derive(Debug, Clone, Serialize)]
pub struct CatalogResponse {
    /// Base prices per truck load tier
    pub truck_loads: Vec<PriceEntry>,

    /// Per-unit prices for itemized extras
    pub items: Vec<PriceEntry>,

    /// Per-unit labor surcharges
    pub labor: Vec<PriceEntry>,
}

impl CatalogResponse {
    /// Build the response from the process catalog
    pub fn from_catalog(catalog: &PriceCatalog) -> Self {
        let truck_loads = LoadSize::ALL
            .into_iter()
            .map(|size| PriceEntry {
                key: size.to_string(),
                label: size.display_name().to_string(),
                price: catalog.load_price(size),
            })
            .collect();

        let items = ItemKind::ALL
            .into_iter()
            .map(|kind| PriceEntry {
                key: kind.to_string(),
                label: kind.display_name().to_string(),
                price: catalog.item_price(kind),
            })
            .collect();

        let labor = LaborKind::ALL
            .into_iter()
            .map(|kind| PriceEntry {
                key: kind.to_string(),
                label: kind.display_name().to_string(),
                price: catalog.labor_price(kind),
            })
            .collect();

        Self {
            truck_loads,
            items,
            labor,
        }
    }
}

/// Quote request creation request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct QuoteRequestCreateRequest {
    /// Customer name
    #[validate(length(min = 1, max = 200, message = "Customer name is required"))]
    pub customer_name: String,

    /// Customer phone
    #[validate(length(min = 7, max = 30, message = "A valid phone number is required"))]
    pub customer_phone: String,

    /// Customer email (optional)
    #[validate(email)]
    pub customer_email: Option<String>,

    /// The selection to price; the total is recomputed server-side
    pub selection: QuoteSelection,

    /// Free-text job description
    #[validate(length(max = 2000))]
    pub description: Option<String>,
}

/// Quote request status update request
#[derive(Debug, Clone, Deserialize)]
pub struct QuoteRequestStatusUpdateRequest {
    /// New status (pending/contacted/converted/declined)
    pub status: String,
}

/// Quote request list filter parameters
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct QuoteRequestFilterParams {
    /// Pagination
    #[serde(flatten)]
    #[validate(nested)]
    pub pagination: PaginationParams,

    /// Filter by follow-up status
    pub status: Option<QuoteRequestStatus>,
}

/// Quote request response
#[derive(Debug, Clone, Serialize)]
pub struct QuoteRequestResponse {
    /// Quote request ID
    pub id: i64,

    /// Customer name
    pub customer_name: String,

    /// Customer phone
    pub customer_phone: String,

    /// Customer email
    pub customer_email: Option<String>,

    /// Selection snapshot as submitted
    pub selection: serde_json::Value,

    /// Server-computed total
    pub estimated_total: Decimal,

    /// Job description
    pub description: Option<String>,

    /// Follow-up status
    pub status: String,

    /// Created timestamp
    pub created_at: DateTime<Utc>,

    /// Updated timestamp
    pub updated_at: DateTime<Utc>,
}

impl From<QuoteRequest> for QuoteRequestResponse {
    fn from(request: QuoteRequest) -> Self {
        Self {
            id: request.id,
            customer_name: request.customer_name,
            customer_phone: request.customer_phone,
            customer_email: request.customer_email,
            selection: request.selection,
            estimated_total: request.estimated_total,
            description: request.description,
            status: request.status.to_string(),
            created_at: request.created_at,
            updated_at: request.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_catalog_response_covers_every_kind() {
        let catalog = PriceCatalog::standard();
        let response = CatalogResponse::from_catalog(&catalog);

        assert_eq!(response.truck_loads.len(), LoadSize::ALL.len());
        assert_eq!(response.items.len(), ItemKind::ALL.len());
        assert_eq!(response.labor.len(), LaborKind::ALL.len());

        assert_eq!(response.truck_loads[0].key, "quarter");
        assert_eq!(response.truck_loads[0].label, "Quarter Truck Load");
        assert_eq!(response.truck_loads[0].price, dec!(150));
        assert_eq!(response.labor[2].key, "disassembly");
        assert_eq!(response.labor[2].price, dec!(40));
    }

    #[test]
    fn test_create_request_validation() {
        let req = QuoteRequestCreateRequest {
            customer_name: "Dana Reed".to_string(),
            customer_phone: "555-987-1234".to_string(),
            customer_email: Some("dana@example.com".to_string()),
            selection: QuoteSelection::new(LoadSize::Half),
            description: None,
        };
        assert!(req.validate().is_ok());

        let bad = QuoteRequestCreateRequest {
            customer_name: String::new(),
            customer_phone: "555".to_string(),
            customer_email: Some("not-an-email".to_string()),
            selection: QuoteSelection::default(),
            description: None,
        };
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_quote_request_response_from_model() {
        let request = QuoteRequest {
            id: 7,
            customer_name: "Dana Reed".to_string(),
            estimated_total: dec!(355),
            selection: serde_json::json!({"load_size": "half"}),
            ..Default::default()
        };

        let response = QuoteRequestResponse::from(request);
        assert_eq!(response.id, 7);
        assert_eq!(response.status, "pending");
        assert_eq!(response.estimated_total, dec!(355));
        assert_eq!(response.selection["load_size"], "half");
    }
}
