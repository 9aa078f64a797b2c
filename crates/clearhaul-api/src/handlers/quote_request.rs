//! Quote request handlers
//!
//! HTTP handlers for submitted estimates. The total is always recomputed
//! from the process catalog at submission time; client-supplied totals are
//! never trusted.

use crate::dto::{
    ApiResponse, QuoteRequestCreateRequest, QuoteRequestFilterParams, QuoteRequestResponse,
    QuoteRequestStatusUpdateRequest,
};
use actix_web::{web, HttpResponse, Result};
use chrono::Utc;
use clearhaul_core::models::{PriceCatalog, QuoteRequest, QuoteRequestStatus};
use clearhaul_core::traits::{PaginatedResponse, QuoteRequestRepository, Repository};
use clearhaul_core::AppError;
use clearhaul_db::PgQuoteRequestRepository;
use sqlx::PgPool;
use tracing::{debug, info, instrument, warn};
use validator::Validate;

/// Submit a quote request
///
/// POST /api/v1/quote-requests
#[instrument(skip(pool, catalog, req))]
pub async fn create_quote_request(
    pool: web::Data<PgPool>,
    catalog: web::Data<PriceCatalog>,
    req: web::Json<QuoteRequestCreateRequest>,
) -> Result<HttpResponse, AppError> {
    req.validate().map_err(|e| {
        warn!("Quote request validation failed: {}", e);
        AppError::Validation(e.to_string())
    })?;

    let estimate = catalog.estimate(&req.selection);
    let snapshot = serde_json::to_value(&req.selection)?;

    debug!(
        customer = %req.customer_name,
        total = %estimate.total,
        "Creating quote request"
    );

    let quote_request = QuoteRequest {
        id: 0,
        customer_name: req.customer_name.clone(),
        customer_phone: req.customer_phone.clone(),
        customer_email: req.customer_email.clone(),
        selection: snapshot,
        estimated_total: estimate.total,
        description: req.description.clone(),
        status: QuoteRequestStatus::Pending,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    };

    let repo = PgQuoteRequestRepository::new(pool.get_ref().clone());
    let created = repo.create(&quote_request).await?;

    info!(
        id = created.id,
        total = %created.estimated_total,
        "Quote request created successfully"
    );

    let response = QuoteRequestResponse::from(created);
    Ok(HttpResponse::Created().json(ApiResponse::with_message(
        response,
        "Quote request submitted successfully",
    )))
}

/// List quote requests with pagination and filters
///
/// GET /api/v1/quote-requests?page=1&per_page=50&status=pending
#[instrument(skip(pool, query))]
pub async fn list_quote_requests(
    query: web::Query<QuoteRequestFilterParams>,
    pool: web::Data<PgPool>,
) -> Result<web::Json<PaginatedResponse<QuoteRequestResponse>>> {
    query.validate().map_err(|e| {
        warn!("Invalid query parameters: {}", e);
        AppError::Validation(e.to_string())
    })?;

    debug!(
        page = query.pagination.page,
        status = ?query.status,
        "Listing quote requests"
    );

    let repo = PgQuoteRequestRepository::new(pool.get_ref().clone());

    let (requests, total) = repo
        .list_filtered(
            query.status,
            query.pagination.limit(),
            query.pagination.offset(),
        )
        .await?;

    let response_data: Vec<QuoteRequestResponse> = requests
        .into_iter()
        .map(QuoteRequestResponse::from)
        .collect();

    Ok(web::Json(query.pagination.paginate(response_data, total)))
}

/// Get a single quote request by ID
///
/// GET /api/v1/quote-requests/{id}
#[instrument(skip(pool))]
pub async fn get_quote_request(
    path: web::Path<i64>,
    pool: web::Data<PgPool>,
) -> Result<web::Json<ApiResponse<QuoteRequestResponse>>> {
    let request_id = path.into_inner();
    debug!("Fetching quote request {}", request_id);

    let repo = PgQuoteRequestRepository::new(pool.get_ref().clone());
    let request = repo
        .find_by_id(request_id)
        .await?
        .ok_or_else(|| AppError::QuoteRequestNotFound(request_id.to_string()))?;

    Ok(web::Json(ApiResponse::success(QuoteRequestResponse::from(
        request,
    ))))
}

/// Update a quote request's follow-up status
///
/// Follow-up statuses are bookkeeping, so any status can move to any other.
///
/// PATCH /api/v1/quote-requests/{id}/status
#[instrument(skip(pool, req))]
pub async fn update_quote_request_status(
    pool: web::Data<PgPool>,
    path: web::Path<i64>,
    req: web::Json<QuoteRequestStatusUpdateRequest>,
) -> Result<HttpResponse, AppError> {
    let request_id = path.into_inner();

    let status = QuoteRequestStatus::from_str(&req.status)
        .ok_or_else(|| AppError::Validation(format!("Invalid status: {}", req.status)))?;

    debug!(id = request_id, status = %status, "Updating quote request status");

    let repo = PgQuoteRequestRepository::new(pool.get_ref().clone());
    let updated = repo.update_status(request_id, status).await?;

    info!(id = updated.id, status = %updated.status, "Quote request status updated");

    let response = QuoteRequestResponse::from(updated);
    Ok(HttpResponse::Ok().json(ApiResponse::with_message(
        response,
        "Quote request status updated",
    )))
}

/// Delete a quote request
///
/// DELETE /api/v1/quote-requests/{id}
#[instrument(skip(pool))]
pub async fn delete_quote_request(
    pool: web::Data<PgPool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let request_id = path.into_inner();
    debug!(id = request_id, "Deleting quote request");

    let repo = PgQuoteRequestRepository::new(pool.get_ref().clone());

    repo.find_by_id(request_id)
        .await?
        .ok_or_else(|| AppError::QuoteRequestNotFound(request_id.to_string()))?;

    let deleted = repo.delete(request_id).await?;

    if deleted {
        info!(id = request_id, "Quote request deleted successfully");
        Ok(HttpResponse::NoContent().finish())
    } else {
        Err(AppError::Internal(
            "Failed to delete quote request".to_string(),
        ))
    }
}

/// Configure quote request routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/quote-requests")
            .route("", web::get().to(list_quote_requests))
            .route("", web::post().to(create_quote_request))
            .route("/{id}", web::get().to(get_quote_request))
            .route("/{id}", web::delete().to(delete_quote_request))
            .route("/{id}/status", web::patch().to(update_quote_request_status)),
    );
}
