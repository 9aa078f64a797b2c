//! Client handlers
//!
//! HTTP handlers for client management endpoints.

use crate::dto::{
    ApiResponse, ClientCreateRequest, ClientFilterParams, ClientResponse, ClientUpdateRequest,
};
use actix_web::{web, HttpResponse, Result};
use chrono::Utc;
use clearhaul_core::traits::{ClientRepository, PaginatedResponse, Repository};
use clearhaul_core::AppError;
use clearhaul_db::PgClientRepository;
use sqlx::PgPool;
use tracing::{debug, info, instrument, warn};
use validator::Validate;

/// List clients with optional search and pagination
///
/// The search term matches against name and phone.
///
/// GET /api/v1/clients?page=1&per_page=50&q=morgan
#[instrument(skip(pool, query))]
pub async fn list_clients(
    query: web::Query<ClientFilterParams>,
    pool: web::Data<PgPool>,
) -> Result<web::Json<PaginatedResponse<ClientResponse>>> {
    query.validate().map_err(|e| {
        warn!("Invalid query parameters: {}", e);
        AppError::Validation(e.to_string())
    })?;

    debug!(
        page = query.pagination.page,
        search = ?query.q,
        "Listing clients"
    );

    let repo = PgClientRepository::new(pool.get_ref().clone());

    let (clients, total) = repo
        .search(
            query.q.as_deref(),
            query.pagination.limit(),
            query.pagination.offset(),
        )
        .await?;

    let response_data: Vec<ClientResponse> = clients.into_iter().map(ClientResponse::from).collect();

    Ok(web::Json(query.pagination.paginate(response_data, total)))
}

/// Create a new client
///
/// Duplicate detection compares phone digits only, so formatting variants of
/// the same number are rejected.
///
/// POST /api/v1/clients
#[instrument(skip(pool, req))]
pub async fn create_client(
    pool: web::Data<PgPool>,
    req: web::Json<ClientCreateRequest>,
) -> Result<HttpResponse, AppError> {
    req.validate().map_err(|e| {
        warn!("Client creation validation failed: {}", e);
        AppError::Validation(e.to_string())
    })?;

    debug!(name = %req.name, "Creating client");

    let repo = PgClientRepository::new(pool.get_ref().clone());

    if let Some(existing) = repo.find_by_phone(&req.phone).await? {
        warn!(
            phone = %req.phone,
            existing_id = existing.id,
            "Client creation failed: duplicate phone"
        );
        return Err(AppError::AlreadyExists(format!(
            "Client with phone {} already exists",
            req.phone
        )));
    }

    let client = req.to_client();
    let created = repo.create(&client).await?;

    info!(id = created.id, name = %created.name, "Client created successfully");

    let response = ClientResponse::from(created);
    Ok(HttpResponse::Created().json(ApiResponse::with_message(
        response,
        "Client created successfully",
    )))
}

/// Get a single client by ID
///
/// GET /api/v1/clients/{id}
#[instrument(skip(pool))]
pub async fn get_client(
    path: web::Path<i32>,
    pool: web::Data<PgPool>,
) -> Result<web::Json<ApiResponse<ClientResponse>>> {
    let client_id = path.into_inner();
    debug!("Fetching client {}", client_id);

    let repo = PgClientRepository::new(pool.get_ref().clone());
    let client = repo
        .find_by_id(client_id)
        .await?
        .ok_or_else(|| AppError::ClientNotFound(client_id.to_string()))?;

    Ok(web::Json(ApiResponse::success(ClientResponse::from(client))))
}

/// Update a client
///
/// PUT /api/v1/clients/{id}
#[instrument(skip(pool, req))]
pub async fn update_client(
    pool: web::Data<PgPool>,
    path: web::Path<i32>,
    req: web::Json<ClientUpdateRequest>,
) -> Result<HttpResponse, AppError> {
    req.validate().map_err(|e| {
        warn!("Client update validation failed: {}", e);
        AppError::Validation(e.to_string())
    })?;

    let client_id = path.into_inner();
    debug!(id = client_id, "Updating client");

    let repo = PgClientRepository::new(pool.get_ref().clone());

    let mut client = repo
        .find_by_id(client_id)
        .await?
        .ok_or_else(|| AppError::ClientNotFound(client_id.to_string()))?;

    if let Some(name) = &req.name {
        client.name = name.clone();
    }
    if let Some(phone) = &req.phone {
        client.phone = phone.clone();
    }
    if let Some(email) = &req.email {
        client.email = Some(email.clone());
    }
    if let Some(address) = &req.address {
        client.address = Some(address.clone());
    }
    if let Some(notes) = &req.notes {
        client.notes = Some(notes.clone());
    }
    client.updated_at = Utc::now();

    let updated = repo.update(&client).await?;

    info!(id = updated.id, "Client updated successfully");

    let response = ClientResponse::from(updated);
    Ok(HttpResponse::Ok().json(ApiResponse::with_message(
        response,
        "Client updated successfully",
    )))
}

/// Delete a client
///
/// DELETE /api/v1/clients/{id}
#[instrument(skip(pool))]
pub async fn delete_client(
    pool: web::Data<PgPool>,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let client_id = path.into_inner();
    debug!(id = client_id, "Deleting client");

    let repo = PgClientRepository::new(pool.get_ref().clone());

    repo.find_by_id(client_id)
        .await?
        .ok_or_else(|| AppError::ClientNotFound(client_id.to_string()))?;

    let deleted = repo.delete(client_id).await?;

    if deleted {
        info!(id = client_id, "Client deleted successfully");
        Ok(HttpResponse::NoContent().finish())
    } else {
        Err(AppError::Internal("Failed to delete client".to_string()))
    }
}

/// Configure client routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/clients")
            .route("", web::get().to(list_clients))
            .route("", web::post().to(create_client))
            .route("/{id}", web::get().to(get_client))
            .route("/{id}", web::put().to(update_client))
            .route("/{id}", web::delete().to(delete_client)),
    );
}
