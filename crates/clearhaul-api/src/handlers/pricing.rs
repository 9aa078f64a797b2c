//! Pricing handlers
//!
//! HTTP handlers for the published price catalog and quote estimation.
//! Estimation is pure computation over the process catalog; no database
//! access is involved.

use crate::dto::{ApiResponse, CatalogResponse};
use actix_web::{web, Result};
use clearhaul_core::models::{PriceCatalog, QuoteEstimate, QuoteSelection};
use tracing::{debug, instrument};

/// Get the published price catalog
///
/// GET /api/v1/pricing/catalog
#[instrument(skip(catalog))]
pub async fn get_catalog(
    catalog: web::Data<PriceCatalog>,
) -> Result<web::Json<ApiResponse<CatalogResponse>>> {
    debug!("Serving price catalog");

    let response = CatalogResponse::from_catalog(catalog.get_ref());
    Ok(web::Json(ApiResponse::success(response)))
}

/// Compute a quote estimate for a selection
///
/// The caller owns the selection; this endpoint prices it and returns the
/// breakdown without persisting anything.
///
/// POST /api/v1/pricing/estimate
#[instrument(skip(catalog, selection))]
pub async fn estimate_quote(
    catalog: web::Data<PriceCatalog>,
    selection: web::Json<QuoteSelection>,
) -> Result<web::Json<ApiResponse<QuoteEstimate>>> {
    let selection = selection.into_inner();
    debug!(
        load_size = %selection.load_size,
        extras = selection.has_extras(),
        "Estimating quote"
    );

    let estimate = catalog.estimate(&selection);
    Ok(web::Json(ApiResponse::success(estimate)))
}

/// Configure pricing routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/pricing")
            .route("/catalog", web::get().to(get_catalog))
            .route("/estimate", web::post().to(estimate_quote)),
    );
}
