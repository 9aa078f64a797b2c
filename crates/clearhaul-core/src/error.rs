//! Unified error handling for ClearHaul
//!
//! This module provides a comprehensive error type that covers all possible
//! failure scenarios in the application, with automatic HTTP response mapping.

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use chrono::NaiveDate;
use serde_json::json;
use thiserror::Error;

/// Main application error type
///
/// All errors in the application should be converted to this type.
/// It implements `ResponseError` for automatic HTTP response generation.
#[derive(Error, Debug)]
pub enum AppError {
    // ==================== Database Errors ====================
    #[error("Database error: {0}")]
    Database(String),

    #[error("Database pool error: {0}")]
    Pool(String),

    #[error("Transaction failed: {0}")]
    Transaction(String),

    // ==================== Scheduling Errors ====================
    #[error("Time slot {slot} is already booked on {date}")]
    SlotUnavailable { date: NaiveDate, slot: String },

    #[error("Invalid time slot label: {0}")]
    InvalidTimeSlot(String),

    #[error("Invalid status transition: {from} -> {to}")]
    InvalidTransition { from: String, to: String },

    // ==================== Business Logic Errors ====================
    #[error("Booking not found: {0}")]
    BookingNotFound(String),

    #[error("Client not found: {0}")]
    ClientNotFound(String),

    #[error("Invoice not found: {0}")]
    InvoiceNotFound(String),

    #[error("Quote request not found: {0}")]
    QuoteRequestNotFound(String),

    // ==================== Validation Errors ====================
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    // ==================== Resource Errors ====================
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Already exists: {0}")]
    AlreadyExists(String),

    // ==================== Internal Errors ====================
    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl AppError {
    /// Returns the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            // 400 Bad Request
            AppError::Validation(_)
            | AppError::InvalidInput(_)
            | AppError::MissingField(_)
            | AppError::InvalidTimeSlot(_) => StatusCode::BAD_REQUEST,

            // 404 Not Found
            AppError::BookingNotFound(_)
            | AppError::ClientNotFound(_)
            | AppError::InvoiceNotFound(_)
            | AppError::QuoteRequestNotFound(_)
            | AppError::NotFound(_) => StatusCode::NOT_FOUND,

            // 409 Conflict
            AppError::SlotUnavailable { .. }
            | AppError::InvalidTransition { .. }
            | AppError::Conflict(_)
            | AppError::AlreadyExists(_) => StatusCode::CONFLICT,

            // 500 Internal Server Error
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns the error code for API responses
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::Database(_) => "database_error",
            AppError::Pool(_) => "pool_error",
            AppError::Transaction(_) => "transaction_error",
            AppError::SlotUnavailable { .. } => "slot_unavailable",
            AppError::InvalidTimeSlot(_) => "invalid_time_slot",
            AppError::InvalidTransition { .. } => "invalid_transition",
            AppError::BookingNotFound(_) => "booking_not_found",
            AppError::ClientNotFound(_) => "client_not_found",
            AppError::InvoiceNotFound(_) => "invoice_not_found",
            AppError::QuoteRequestNotFound(_) => "quote_request_not_found",
            AppError::Validation(_) => "validation_error",
            AppError::InvalidInput(_) => "invalid_input",
            AppError::MissingField(_) => "missing_field",
            AppError::NotFound(_) => "not_found",
            AppError::Conflict(_) => "conflict",
            AppError::AlreadyExists(_) => "already_exists",
            AppError::Internal(_) => "internal_error",
            AppError::Config(_) => "config_error",
            AppError::Serialization(_) => "serialization_error",
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        AppError::status_code(self)
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let body = json!({
            "error": self.error_code(),
            "message": self.to_string(),
            "status": status.as_u16(),
        });

        HttpResponse::build(status).json(body)
    }
}

// ==================== From implementations ====================

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::Config(err.to_string())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::Validation(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_codes() {
        assert_eq!(
            AppError::InvalidTimeSlot("9:00 AM - 11:00 AM".to_string()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::BookingNotFound("123".to_string()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::SlotUnavailable {
                date: NaiveDate::from_ymd_opt(2025, 6, 14).unwrap(),
                slot: "10:00 AM - 12:00 PM".to_string()
            }
            .status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::InvalidTransition {
                from: "completed".to_string(),
                to: "pending".to_string()
            }
            .status_code(),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(
            AppError::SlotUnavailable {
                date: NaiveDate::from_ymd_opt(2025, 6, 14).unwrap(),
                slot: "8:00 AM - 10:00 AM".to_string()
            }
            .error_code(),
            "slot_unavailable"
        );
        assert_eq!(
            AppError::InvoiceNotFound("INV-0001".to_string()).error_code(),
            "invoice_not_found"
        );
    }

    #[test]
    fn test_slot_unavailable_message() {
        let err = AppError::SlotUnavailable {
            date: NaiveDate::from_ymd_opt(2025, 6, 14).unwrap(),
            slot: "2:00 PM - 4:00 PM".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Time slot 2:00 PM - 4:00 PM is already booked on 2025-06-14"
        );
    }
}
