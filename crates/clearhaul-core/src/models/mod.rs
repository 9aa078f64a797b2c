//! Domain models for ClearHaul
//!
//! This module contains all the core domain models used throughout the application.

pub mod booking;
pub mod catalog;
pub mod client;
pub mod invoice;
pub mod quote;
pub mod quote_request;

pub use booking::{Booking, BookingStatus, TimeSlot};
pub use catalog::{ItemKind, LaborKind, LoadSize, PriceCatalog};
pub use client::Client;
pub use invoice::{Invoice, InvoiceStatus};
pub use quote::{QuoteEstimate, QuoteLineItem, QuoteSelection};
pub use quote_request::{QuoteRequest, QuoteRequestStatus};
