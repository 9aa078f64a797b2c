//! Business logic services for ClearHaul
//!
//! This crate contains the business logic that sits between the HTTP
//! handlers and the repositories: availability reporting, booking
//! scheduling and invoice lifecycle management.
//!
//! # Architecture
//!
//! Services are designed to be composable and testable:
//! - Each service owns its repository dependencies behind `Arc`
//! - Services are generic over the repository traits, so tests swap in mocks
//! - All operations are instrumented with tracing
//! - Comprehensive error handling with AppError
//!
//! # Services
//!
//! - `AvailabilityServiceImpl` - Per-day open slot reporting with fail-open
//! - `SchedulingService` - Booking creation, rescheduling and status changes
//! - `InvoicingService` - Invoice numbering, due dates and payment recording

pub mod availability;
pub mod invoicing;
pub mod scheduling;

pub use availability::AvailabilityServiceImpl;
pub use invoicing::InvoicingService;
pub use scheduling::SchedulingService;

/// Business logic constants
pub mod constants {
    /// Days until a newly issued invoice falls due
    pub const DEFAULT_DUE_DAYS: u64 = 30;
}
