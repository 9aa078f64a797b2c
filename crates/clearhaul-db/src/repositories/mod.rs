//! Repository implementations
//!
//! This module contains concrete implementations of all repository traits
//! defined in clearhaul-core, using sqlx for PostgreSQL access.

pub mod booking_repo;
pub mod client_repo;
pub mod invoice_repo;
pub mod quote_request_repo;

pub use booking_repo::PgBookingRepository;
pub use client_repo::PgClientRepository;
pub use invoice_repo::PgInvoiceRepository;
pub use quote_request_repo::PgQuoteRequestRepository;
