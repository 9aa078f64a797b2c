//! Invoice handlers
//!
//! HTTP handlers for invoice management. Numbering and due dates come from
//! the invoicing service; only draft invoices accept edits or deletion.

use crate::dto::{
    ApiResponse, InvoiceCreateRequest, InvoiceFilterParams, InvoiceResponse,
    InvoiceStatusUpdateRequest, InvoiceUpdateRequest,
};
use actix_web::{web, HttpResponse, Result};
use chrono::Utc;
use clearhaul_core::models::InvoiceStatus;
use clearhaul_core::traits::{InvoiceRepository, PaginatedResponse, Repository};
use clearhaul_core::AppError;
use clearhaul_db::{PgClientRepository, PgInvoiceRepository};
use clearhaul_services::InvoicingService;
use rust_decimal::Decimal;
use sqlx::PgPool;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use validator::Validate;

/// List invoices with filtering and pagination
///
/// GET /api/v1/invoices?page=1&per_page=50&status=sent&client_id=3
#[instrument(skip(pool, query))]
pub async fn list_invoices(
    query: web::Query<InvoiceFilterParams>,
    pool: web::Data<PgPool>,
) -> Result<web::Json<PaginatedResponse<InvoiceResponse>>> {
    query.validate().map_err(|e| {
        warn!("Invalid query parameters: {}", e);
        AppError::Validation(e.to_string())
    })?;

    debug!(
        page = query.pagination.page,
        status = ?query.status,
        client_id = ?query.client_id,
        "Listing invoices"
    );

    let repo = PgInvoiceRepository::new(pool.get_ref().clone());

    let (invoices, total) = repo
        .list_filtered(
            query.status,
            query.client_id,
            query.pagination.limit(),
            query.pagination.offset(),
        )
        .await?;

    let response_data: Vec<InvoiceResponse> =
        invoices.into_iter().map(InvoiceResponse::from).collect();

    Ok(web::Json(query.pagination.paginate(response_data, total)))
}

/// Create a new invoice
///
/// POST /api/v1/invoices
#[instrument(skip(pool, req))]
pub async fn create_invoice(
    pool: web::Data<PgPool>,
    req: web::Json<InvoiceCreateRequest>,
) -> Result<HttpResponse, AppError> {
    req.validate().map_err(|e| {
        warn!("Invoice creation validation failed: {}", e);
        AppError::Validation(e.to_string())
    })?;

    if req.amount <= Decimal::ZERO {
        return Err(AppError::Validation(
            "Invoice amount must be positive".to_string(),
        ));
    }

    debug!(client_id = req.client_id, amount = %req.amount, "Creating invoice");

    let client_repo = PgClientRepository::new(pool.get_ref().clone());
    client_repo
        .find_by_id(req.client_id)
        .await?
        .ok_or_else(|| AppError::ClientNotFound(req.client_id.to_string()))?;

    let repo = PgInvoiceRepository::new(pool.get_ref().clone());

    if let Some(number) = &req.invoice_number {
        if let Some(_existing) = repo.find_by_number(number).await? {
            warn!(
                invoice_number = %number,
                "Invoice creation failed: duplicate number"
            );
            return Err(AppError::AlreadyExists(format!(
                "Invoice {} already exists",
                number
            )));
        }
    }

    let service = InvoicingService::new(Arc::new(repo));
    let created = service.create_invoice(&req.to_invoice()).await?;

    info!(
        id = created.id,
        invoice_number = %created.invoice_number,
        "Invoice created successfully"
    );

    let response = InvoiceResponse::from(created);
    Ok(HttpResponse::Created().json(ApiResponse::with_message(
        response,
        "Invoice created successfully",
    )))
}

/// Get a single invoice by ID
///
/// GET /api/v1/invoices/{id}
#[instrument(skip(pool))]
pub async fn get_invoice(
    path: web::Path<i64>,
    pool: web::Data<PgPool>,
) -> Result<web::Json<ApiResponse<InvoiceResponse>>> {
    let invoice_id = path.into_inner();
    debug!("Fetching invoice {}", invoice_id);

    let repo = PgInvoiceRepository::new(pool.get_ref().clone());
    let invoice = repo
        .find_by_id(invoice_id)
        .await?
        .ok_or_else(|| AppError::InvoiceNotFound(invoice_id.to_string()))?;

    Ok(web::Json(ApiResponse::success(InvoiceResponse::from(
        invoice,
    ))))
}

/// Update a draft invoice
///
/// PUT /api/v1/invoices/{id}
#[instrument(skip(pool, req))]
pub async fn update_invoice(
    pool: web::Data<PgPool>,
    path: web::Path<i64>,
    req: web::Json<InvoiceUpdateRequest>,
) -> Result<HttpResponse, AppError> {
    req.validate().map_err(|e| {
        warn!("Invoice update validation failed: {}", e);
        AppError::Validation(e.to_string())
    })?;

    let invoice_id = path.into_inner();
    debug!(id = invoice_id, "Updating invoice");

    let repo = PgInvoiceRepository::new(pool.get_ref().clone());

    let mut invoice = repo
        .find_by_id(invoice_id)
        .await?
        .ok_or_else(|| AppError::InvoiceNotFound(invoice_id.to_string()))?;

    if invoice.status != InvoiceStatus::Draft {
        return Err(AppError::Conflict(format!(
            "Only draft invoices can be edited; invoice {} is {}",
            invoice.invoice_number, invoice.status
        )));
    }

    if let Some(amount) = req.amount {
        if amount <= Decimal::ZERO {
            return Err(AppError::Validation(
                "Invoice amount must be positive".to_string(),
            ));
        }
        invoice.amount = amount;
    }
    if let Some(due_date) = req.due_date {
        invoice.due_date = Some(due_date);
    }
    if let Some(booking_id) = req.booking_id {
        invoice.booking_id = Some(booking_id);
    }
    invoice.updated_at = Utc::now();

    let updated = repo.update(&invoice).await?;

    info!(id = updated.id, "Invoice updated successfully");

    let response = InvoiceResponse::from(updated);
    Ok(HttpResponse::Ok().json(ApiResponse::with_message(
        response,
        "Invoice updated successfully",
    )))
}

/// Transition an invoice to a new status
///
/// PATCH /api/v1/invoices/{id}/status
#[instrument(skip(pool, req))]
pub async fn update_invoice_status(
    pool: web::Data<PgPool>,
    path: web::Path<i64>,
    req: web::Json<InvoiceStatusUpdateRequest>,
) -> Result<HttpResponse, AppError> {
    let invoice_id = path.into_inner();

    let next = InvoiceStatus::from_str(&req.status)
        .ok_or_else(|| AppError::Validation(format!("Invalid status: {}", req.status)))?;

    debug!(id = invoice_id, status = %next, "Transitioning invoice");

    let service = InvoicingService::new(Arc::new(PgInvoiceRepository::new(
        pool.get_ref().clone(),
    )));
    let updated = service.transition(invoice_id, next).await?;

    info!(id = updated.id, status = %updated.status, "Invoice status updated");

    let response = InvoiceResponse::from(updated);
    Ok(HttpResponse::Ok().json(ApiResponse::with_message(
        response,
        "Invoice status updated",
    )))
}

/// Record payment of a sent invoice
///
/// POST /api/v1/invoices/{id}/pay
#[instrument(skip(pool))]
pub async fn pay_invoice(
    pool: web::Data<PgPool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let invoice_id = path.into_inner();
    debug!(id = invoice_id, "Recording invoice payment");

    let service = InvoicingService::new(Arc::new(PgInvoiceRepository::new(
        pool.get_ref().clone(),
    )));
    let paid = service.mark_paid(invoice_id).await?;

    info!(
        id = paid.id,
        invoice_number = %paid.invoice_number,
        "Invoice marked paid"
    );

    let response = InvoiceResponse::from(paid);
    Ok(HttpResponse::Ok().json(ApiResponse::with_message(response, "Invoice marked paid")))
}

/// Delete a draft invoice
///
/// DELETE /api/v1/invoices/{id}
#[instrument(skip(pool))]
pub async fn delete_invoice(
    pool: web::Data<PgPool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let invoice_id = path.into_inner();
    debug!(id = invoice_id, "Deleting invoice");

    let repo = PgInvoiceRepository::new(pool.get_ref().clone());

    let invoice = repo
        .find_by_id(invoice_id)
        .await?
        .ok_or_else(|| AppError::InvoiceNotFound(invoice_id.to_string()))?;

    if invoice.status != InvoiceStatus::Draft {
        return Err(AppError::Conflict(format!(
            "Only draft invoices can be deleted; invoice {} is {}",
            invoice.invoice_number, invoice.status
        )));
    }

    let deleted = repo.delete(invoice_id).await?;

    if deleted {
        info!(id = invoice_id, "Invoice deleted successfully");
        Ok(HttpResponse::NoContent().finish())
    } else {
        Err(AppError::Internal("Failed to delete invoice".to_string()))
    }
}

/// Configure invoice routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/invoices")
            .route("", web::get().to(list_invoices))
            .route("", web::post().to(create_invoice))
            .route("/{id}", web::get().to(get_invoice))
            .route("/{id}", web::put().to(update_invoice))
            .route("/{id}", web::delete().to(delete_invoice))
            .route("/{id}/status", web::patch().to(update_invoice_status))
            .route("/{id}/pay", web::post().to(pay_invoice)),
    );
}
