//! HTTP handlers for the API

pub mod availability;
pub mod booking;
pub mod client;
pub mod dashboard;
pub mod invoice;
pub mod pricing;
pub mod quote_request;

pub use availability::configure as configure_availability;
pub use client::configure as configure_clients;
pub use dashboard::configure as configure_dashboard;
pub use invoice::configure as configure_invoices;
pub use pricing::configure as configure_pricing;
pub use quote_request::configure as configure_quote_requests;
