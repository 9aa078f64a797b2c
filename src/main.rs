//! ClearHaul Backend Server
//!
//! Backend for junk removal quoting, booking, and invoicing. Serves the
//! public quote and booking endpoints plus the office-facing client,
//! invoice, and dashboard APIs.

use actix_cors::Cors;
use actix_web::{http::header, middleware, web, App, HttpResponse, HttpServer};
use clearhaul_api::handlers::{
    booking, configure_availability, configure_clients, configure_dashboard, configure_invoices,
    configure_pricing, configure_quote_requests,
};
use clearhaul_core::config::AppConfig;
use clearhaul_core::models::PriceCatalog;
use clearhaul_db::create_pool;
use std::env;
use tracing::info;
use tracing_actix_web::TracingLogger;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Health check endpoint
async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "clearhaul-backend",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Configure API routes
fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            // Health check
            .route("/health", web::get().to(health_check))
            // Dashboard stats
            .configure(configure_dashboard)
            // Price catalog and quote estimates
            .configure(configure_pricing)
            // Slot availability
            .configure(configure_availability)
            // Quote request intake and follow-up
            .configure(configure_quote_requests)
            // Client endpoints
            .configure(configure_clients)
            // Invoice endpoints
            .configure(configure_invoices)
            // Booking endpoints - export must be registered before /{id}
            .service(
                web::scope("/bookings")
                    .route("", web::get().to(booking::list_bookings))
                    .route("", web::post().to(booking::create_booking))
                    .route("/export", web::get().to(booking::export_bookings))
                    .route("/{id}", web::get().to(booking::get_booking))
                    .route("/{id}", web::put().to(booking::update_booking))
                    .route("/{id}", web::delete().to(booking::delete_booking))
                    .route("/{id}/status", web::patch().to(booking::update_booking_status)),
            ),
    );
}

/// Initialize tracing/logging
fn init_tracing() {
    let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "clearhaul_backend={},clearhaul_api={},clearhaul_db={},actix_web=info,sqlx=warn",
            log_level, log_level, log_level
        ))
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true),
        )
        .init();
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize logging
    init_tracing();

    info!(
        "Starting ClearHaul Backend v{}",
        env!("CARGO_PKG_VERSION")
    );

    // Load configuration (defaults, config/ files, then environment)
    let config = AppConfig::load().expect("Failed to load configuration");
    let workers = config.server.workers;

    // Price catalog is built once at startup and shared read-only
    let catalog = web::Data::new(PriceCatalog::from_config(&config.pricing));

    // CORS configuration
    let cors_origins = env::var("CORS_ORIGINS")
        .unwrap_or_else(|_| "http://localhost:3000,http://127.0.0.1:3000".to_string());

    info!("Connecting to database...");
    let pool = create_pool(&config.database)
        .await
        .expect("Failed to create database pool");

    info!(
        "Database connection established with {} max connections",
        config.database.max_connections
    );

    let bind_addr = config.server_addr();
    info!(
        "Starting HTTP server on {} with {} workers",
        bind_addr, workers
    );

    // Create and run server
    HttpServer::new(move || {
        // Configure CORS - clone cors_origins for each worker
        let cors_origins_inner = cors_origins.clone();
        let cors = Cors::default()
            .allowed_origin_fn(move |origin, _req_head| {
                let origins: Vec<&str> = cors_origins_inner.split(',').collect();
                if let Ok(origin_str) = origin.to_str() {
                    origins.iter().any(|o| o.trim() == origin_str)
                } else {
                    false
                }
            })
            .allowed_methods(vec!["GET", "POST", "PUT", "PATCH", "DELETE", "OPTIONS"])
            .allowed_headers(vec![
                header::AUTHORIZATION,
                header::ACCEPT,
                header::CONTENT_TYPE,
            ])
            .supports_credentials()
            .max_age(3600);

        App::new()
            // Add database pool to app data
            .app_data(web::Data::new(pool.clone()))
            // Add shared price catalog
            .app_data(catalog.clone())
            // Configure payload limits for large exports
            .app_data(web::PayloadConfig::new(10 * 1024 * 1024)) // 10MB max payload
            .app_data(web::QueryConfig::default().error_handler(|err, _req| {
                let error_message = err.to_string();
                actix_web::error::InternalError::from_response(
                    err,
                    HttpResponse::BadRequest().json(serde_json::json!({
                        "error": "invalid_query",
                        "message": error_message
                    })),
                )
                .into()
            }))
            // Middleware
            .wrap(cors)
            .wrap(TracingLogger::default())
            .wrap(middleware::Logger::new("%a \"%r\" %s %b %Dms"))
            .wrap(middleware::Compress::default())
            .wrap(middleware::NormalizePath::trim())
            // Configure routes
            .configure(configure_routes)
            // Root redirect to health
            .route(
                "/",
                web::get().to(|| async {
                    HttpResponse::Found()
                        .append_header(("Location", "/api/v1/health"))
                        .finish()
                }),
            )
    })
    .workers(workers)
    .bind(&bind_addr)?
    .run()
    .await
}
