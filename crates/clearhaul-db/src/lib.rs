//! ClearHaul Database Layer
//!
//! This crate provides PostgreSQL database access and repository implementations
//! for the ClearHaul backend. It includes:
//!
//! - Connection pool management with sqlx
//! - Repository implementations for all domain entities
//! - Filtered listings with pagination for the back office
//! - Status updates that return the refreshed row

pub mod pool;
pub mod repositories;

pub use pool::create_pool;
pub use repositories::*;

// Re-export commonly used types
pub use clearhaul_core::{AppError, AppResult};
pub use sqlx::{PgPool, Postgres, Transaction};
