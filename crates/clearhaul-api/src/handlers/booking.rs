//! Booking handlers
//!
//! HTTP handlers for booking listing, creation, updates, status transitions,
//! and export. Exports stream in batches so large date ranges never load
//! fully into memory.

use crate::dto::{
    ApiResponse, BookingCreateRequest, BookingExportParams, BookingExportRow, BookingFilterParams,
    BookingResponse, BookingStatusUpdateRequest, BookingUpdateRequest, ExportFormat,
};
use actix_web::{web, HttpResponse, Result};
use chrono::Utc;
use clearhaul_core::models::{BookingStatus, TimeSlot};
use clearhaul_core::traits::{BookingRepository, PaginatedResponse, Repository};
use clearhaul_core::{AppError, AppResult};
use clearhaul_db::PgBookingRepository;
use clearhaul_services::SchedulingService;
use futures::stream;
use sqlx::PgPool;
use std::io::Write;
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};
use validator::Validate;

/// List bookings with filtering and pagination
///
/// GET /api/v1/bookings?page=1&per_page=50&status=pending&from_date=2025-06-01
#[instrument(skip(pool, query))]
pub async fn list_bookings(
    query: web::Query<BookingFilterParams>,
    pool: web::Data<PgPool>,
) -> Result<web::Json<PaginatedResponse<BookingResponse>>> {
    query.validate().map_err(|e| {
        warn!("Invalid query parameters: {}", e);
        AppError::Validation(e.to_string())
    })?;

    debug!(
        page = query.pagination.page,
        per_page = query.pagination.per_page,
        status = ?query.status,
        "Listing bookings"
    );

    let repo = PgBookingRepository::new(pool.get_ref().clone());

    let (bookings, total) = repo
        .list_filtered(
            query.status,
            query.from_date,
            query.to_date,
            query.pagination.limit(),
            query.pagination.offset(),
        )
        .await?;

    let response_data: Vec<BookingResponse> =
        bookings.into_iter().map(BookingResponse::from).collect();

    Ok(web::Json(query.pagination.paginate(response_data, total)))
}

/// Create a new booking
///
/// The requested slot is checked against the day's bookings before insert;
/// the partial unique index on active bookings backstops concurrent racers.
///
/// POST /api/v1/bookings
#[instrument(skip(pool, req))]
pub async fn create_booking(
    pool: web::Data<PgPool>,
    req: web::Json<BookingCreateRequest>,
) -> Result<HttpResponse, AppError> {
    req.validate().map_err(|e| {
        warn!("Booking creation validation failed: {}", e);
        AppError::Validation(e.to_string())
    })?;

    let booking = req.to_booking()?;
    debug!(
        date = %booking.service_date,
        slot = %booking.time_slot,
        "Creating booking"
    );

    let service = SchedulingService::new(Arc::new(PgBookingRepository::new(
        pool.get_ref().clone(),
    )));
    let created = service.create_booking(&booking).await?;

    info!(
        id = created.id,
        reference = %created.reference,
        date = %created.service_date,
        "Booking created successfully"
    );

    let response = BookingResponse::from(created);
    Ok(HttpResponse::Created().json(ApiResponse::with_message(
        response,
        "Booking created successfully",
    )))
}

/// Get a single booking by ID
///
/// GET /api/v1/bookings/{id}
#[instrument(skip(pool))]
pub async fn get_booking(
    path: web::Path<i64>,
    pool: web::Data<PgPool>,
) -> Result<web::Json<ApiResponse<BookingResponse>>> {
    let booking_id = path.into_inner();
    debug!("Fetching booking {}", booking_id);

    let repo = PgBookingRepository::new(pool.get_ref().clone());
    let booking = repo
        .find_by_id(booking_id)
        .await?
        .ok_or_else(|| AppError::BookingNotFound(booking_id.to_string()))?;

    Ok(web::Json(ApiResponse::success(BookingResponse::from(
        booking,
    ))))
}

/// Update a booking
///
/// Supplied fields replace the current values; status is never touched here.
/// Moving a booking to another date or slot re-checks availability.
///
/// PUT /api/v1/bookings/{id}
#[instrument(skip(pool, req))]
pub async fn update_booking(
    pool: web::Data<PgPool>,
    path: web::Path<i64>,
    req: web::Json<BookingUpdateRequest>,
) -> Result<HttpResponse, AppError> {
    req.validate().map_err(|e| {
        warn!("Booking update validation failed: {}", e);
        AppError::Validation(e.to_string())
    })?;

    let booking_id = path.into_inner();
    debug!(id = booking_id, "Updating booking");

    let repo = PgBookingRepository::new(pool.get_ref().clone());

    let mut booking = repo
        .find_by_id(booking_id)
        .await?
        .ok_or_else(|| AppError::BookingNotFound(booking_id.to_string()))?;

    if let Some(name) = &req.customer_name {
        booking.customer_name = name.clone();
    }
    if let Some(phone) = &req.customer_phone {
        booking.customer_phone = phone.clone();
    }
    if let Some(email) = &req.customer_email {
        booking.customer_email = Some(email.clone());
    }
    if let Some(address) = &req.service_address {
        booking.service_address = address.clone();
    }
    if let Some(date) = req.service_date {
        booking.service_date = date;
    }
    if let Some(label) = &req.time_slot {
        booking.time_slot =
            TimeSlot::from_label(label).ok_or_else(|| AppError::InvalidTimeSlot(label.clone()))?;
    }
    if let Some(load_size) = req.load_size {
        booking.load_size = Some(load_size);
    }
    if let Some(notes) = &req.notes {
        booking.notes = Some(notes.clone());
    }
    booking.updated_at = Utc::now();

    let service = SchedulingService::new(Arc::new(PgBookingRepository::new(
        pool.get_ref().clone(),
    )));
    let updated = service.update_booking(&booking).await?;

    info!(id = updated.id, "Booking updated successfully");

    let response = BookingResponse::from(updated);
    Ok(HttpResponse::Ok().json(ApiResponse::with_message(
        response,
        "Booking updated successfully",
    )))
}

/// Transition a booking to a new status
///
/// PATCH /api/v1/bookings/{id}/status
#[instrument(skip(pool, req))]
pub async fn update_booking_status(
    pool: web::Data<PgPool>,
    path: web::Path<i64>,
    req: web::Json<BookingStatusUpdateRequest>,
) -> Result<HttpResponse, AppError> {
    let booking_id = path.into_inner();

    let next = BookingStatus::from_str(&req.status)
        .ok_or_else(|| AppError::Validation(format!("Invalid status: {}", req.status)))?;

    debug!(id = booking_id, status = %next, "Transitioning booking");

    let service = SchedulingService::new(Arc::new(PgBookingRepository::new(
        pool.get_ref().clone(),
    )));
    let updated = service.transition(booking_id, next).await?;

    info!(id = updated.id, status = %updated.status, "Booking status updated");

    let response = BookingResponse::from(updated);
    Ok(HttpResponse::Ok().json(ApiResponse::with_message(
        response,
        "Booking status updated",
    )))
}

/// Delete a booking
///
/// DELETE /api/v1/bookings/{id}
#[instrument(skip(pool))]
pub async fn delete_booking(
    pool: web::Data<PgPool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let booking_id = path.into_inner();
    debug!(id = booking_id, "Deleting booking");

    let repo = PgBookingRepository::new(pool.get_ref().clone());

    repo.find_by_id(booking_id)
        .await?
        .ok_or_else(|| AppError::BookingNotFound(booking_id.to_string()))?;

    let deleted = repo.delete(booking_id).await?;

    if deleted {
        info!(id = booking_id, "Booking deleted successfully");
        Ok(HttpResponse::NoContent().finish())
    } else {
        Err(AppError::Internal("Failed to delete booking".to_string()))
    }
}

/// Export bookings in various formats (CSV, JSON, JSONL)
///
/// Streams the response in batches to handle large exports without memory
/// pressure.
///
/// GET /api/v1/bookings/export?format=csv&status=confirmed&limit=10000
#[instrument(skip(pool, query))]
pub async fn export_bookings(
    query: web::Query<BookingExportParams>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse> {
    query.validate().map_err(|e| {
        warn!("Invalid export parameters: {}", e);
        AppError::Validation(e.to_string())
    })?;

    info!(
        format = ?query.format,
        limit = query.limit,
        status = ?query.status,
        "Starting booking export"
    );

    let format = query.format;
    let pool = pool.get_ref().clone();

    let timestamp = Utc::now().format("%Y%m%d_%H%M%S");
    let filename = format!("bookings_export_{}.{}", timestamp, format.extension());

    let mut response = HttpResponse::Ok();
    response.content_type(format.content_type()).insert_header((
        "Content-Disposition",
        format!("attachment; filename=\"{}\"", filename),
    ));

    match format {
        ExportFormat::Csv => {
            let stream = create_csv_stream(pool, query.into_inner()).await?;
            Ok(response.streaming(stream))
        }
        ExportFormat::Json => {
            let stream = create_json_stream(pool, query.into_inner()).await?;
            Ok(response.streaming(stream))
        }
        ExportFormat::Jsonl => {
            let stream = create_jsonl_stream(pool, query.into_inner()).await?;
            Ok(response.streaming(stream))
        }
    }
}

const BATCH_SIZE: i64 = 1000;

/// Quote a CSV field per RFC 4180 when it contains a comma, quote, or newline
fn csv_field(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Create CSV streaming response
async fn create_csv_stream(
    pool: PgPool,
    params: BookingExportParams,
) -> AppResult<impl futures::Stream<Item = Result<actix_web::web::Bytes, actix_web::Error>>> {
    let stream = stream::unfold(
        (0_i64, false, pool, params),
        |(offset, done, pool, params)| async move {
            if done {
                return None;
            }

            let repo = PgBookingRepository::new(pool.clone());
            let (bookings, _) = match repo
                .list_filtered(
                    params.status,
                    params.from_date,
                    params.to_date,
                    BATCH_SIZE,
                    offset,
                )
                .await
            {
                Ok(result) => result,
                Err(e) => {
                    error!("Error fetching bookings for export: {}", e);
                    return None;
                }
            };

            if bookings.is_empty() {
                return None;
            }

            let is_done =
                bookings.len() < BATCH_SIZE as usize || offset + BATCH_SIZE >= params.limit;

            let mut csv_data = Vec::new();

            // Write header on first batch
            if offset == 0 {
                if let Err(e) = writeln!(
                    &mut csv_data,
                    "id,reference,customer_name,customer_phone,customer_email,service_address,service_date,time_slot,load_size,status,notes,created_at"
                ) {
                    error!("Error writing CSV header: {}", e);
                    return None;
                }
            }

            for booking in bookings {
                let row = BookingExportRow::from(booking);
                if let Err(e) = writeln!(
                    &mut csv_data,
                    "{},{},{},{},{},{},{},{},{},{},{},{}",
                    row.id,
                    row.reference,
                    csv_field(&row.customer_name),
                    csv_field(&row.customer_phone),
                    csv_field(&row.customer_email),
                    csv_field(&row.service_address),
                    row.service_date,
                    csv_field(&row.time_slot),
                    row.load_size,
                    row.status,
                    csv_field(&row.notes),
                    row.created_at
                ) {
                    error!("Error writing CSV row: {}", e);
                    return None;
                }
            }

            Some((
                Ok(actix_web::web::Bytes::from(csv_data)),
                (offset + BATCH_SIZE, is_done, pool, params),
            ))
        },
    );

    Ok(stream)
}

/// Create JSON streaming response (array format)
async fn create_json_stream(
    pool: PgPool,
    params: BookingExportParams,
) -> AppResult<impl futures::Stream<Item = Result<actix_web::web::Bytes, actix_web::Error>>> {
    let stream = stream::unfold(
        (0_i64, false, pool, params, true),
        |(offset, done, pool, params, is_first)| async move {
            if done {
                // Send the closing bracket exactly once, then stop
                if !is_first {
                    return Some((
                        Ok(actix_web::web::Bytes::from("]")),
                        (offset, true, pool, params, true),
                    ));
                }
                return None;
            }

            let repo = PgBookingRepository::new(pool.clone());
            let (bookings, _) = match repo
                .list_filtered(
                    params.status,
                    params.from_date,
                    params.to_date,
                    BATCH_SIZE,
                    offset,
                )
                .await
            {
                Ok(result) => result,
                Err(e) => {
                    error!("Error fetching bookings for export: {}", e);
                    return None;
                }
            };

            let mut json_data = String::new();

            // Opening bracket on first batch
            if is_first {
                json_data.push('[');
            }

            if bookings.is_empty() {
                if is_first {
                    json_data.push(']');
                }
                return Some((
                    Ok(actix_web::web::Bytes::from(json_data)),
                    (offset, true, pool, params, is_first),
                ));
            }

            let is_done =
                bookings.len() < BATCH_SIZE as usize || offset + BATCH_SIZE >= params.limit;

            for (i, booking) in bookings.iter().enumerate() {
                if !is_first || i > 0 {
                    json_data.push(',');
                }

                let row = BookingExportRow::from(booking.clone());
                if let Ok(json) = serde_json::to_string(&row) {
                    json_data.push_str(&json);
                }
            }

            Some((
                Ok(actix_web::web::Bytes::from(json_data)),
                (offset + BATCH_SIZE, is_done, pool, params, false),
            ))
        },
    );

    Ok(stream)
}

/// Create JSON Lines streaming response (one object per line)
async fn create_jsonl_stream(
    pool: PgPool,
    params: BookingExportParams,
) -> AppResult<impl futures::Stream<Item = Result<actix_web::web::Bytes, actix_web::Error>>> {
    let stream = stream::unfold(
        (0_i64, false, pool, params),
        |(offset, done, pool, params)| async move {
            if done {
                return None;
            }

            let repo = PgBookingRepository::new(pool.clone());
            let (bookings, _) = match repo
                .list_filtered(
                    params.status,
                    params.from_date,
                    params.to_date,
                    BATCH_SIZE,
                    offset,
                )
                .await
            {
                Ok(result) => result,
                Err(e) => {
                    error!("Error fetching bookings for export: {}", e);
                    return None;
                }
            };

            if bookings.is_empty() {
                return None;
            }

            let is_done =
                bookings.len() < BATCH_SIZE as usize || offset + BATCH_SIZE >= params.limit;

            let mut jsonl_data = String::new();

            for booking in bookings {
                let row = BookingExportRow::from(booking);
                if let Ok(json) = serde_json::to_string(&row) {
                    jsonl_data.push_str(&json);
                    jsonl_data.push('\n');
                }
            }

            Some((
                Ok(actix_web::web::Bytes::from(jsonl_data)),
                (offset + BATCH_SIZE, is_done, pool, params),
            ))
        },
    );

    Ok(stream)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csv_field_passthrough() {
        assert_eq!(csv_field("plain"), "plain");
        assert_eq!(csv_field("8:00 AM - 10:00 AM"), "8:00 AM - 10:00 AM");
    }

    #[test]
    fn test_csv_field_quotes_commas_and_quotes() {
        assert_eq!(
            csv_field("12 Pine St, Springfield"),
            "\"12 Pine St, Springfield\""
        );
        assert_eq!(
            csv_field("gate code \"4412\""),
            "\"gate code \"\"4412\"\"\""
        );
        assert_eq!(csv_field("line\nbreak"), "\"line\nbreak\"");
    }
}
