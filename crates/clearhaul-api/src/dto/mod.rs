//! Data Transfer Objects (DTOs) for API requests and responses

pub mod booking;
pub mod client;
pub mod common;
pub mod dashboard;
pub mod invoice;
pub mod quote;

pub use booking::*;
pub use client::*;
pub use common::*;
pub use dashboard::*;
pub use invoice::*;
pub use quote::*;
