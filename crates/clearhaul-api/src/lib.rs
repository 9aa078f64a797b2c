//! API layer for ClearHaul
//!
//! HTTP API handlers for pricing, availability, bookings, quote requests,
//! clients, and invoices.

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    clippy::cargo,
    missing_docs
)]

pub mod dto;
pub mod handlers;

// Re-export DTOs (common types)
pub use dto::{ApiResponse, PaginationParams};

// Re-export handler configuration functions and booking handlers
pub use handlers::{
    configure_availability, configure_clients, configure_dashboard, configure_invoices,
    configure_pricing, configure_quote_requests,
    // Booking handlers (configured manually in main.rs)
    booking,
};
