// storefront/src/web/handlers/catalog_handlers.rs

use actix_web::{web, HttpResponse};
use pix_checkout::catalog;
use serde::Deserialize;
use tracing::instrument;

use crate::errors::AppError;

#[derive(Debug, Deserialize)]
pub struct CustomPackageQuery {
  pub robux: u32,
}

#[instrument(name = "handler::list_packages")]
pub async fn list_packages_handler() -> Result<HttpResponse, AppError> {
  Ok(HttpResponse::Ok().json(catalog::packages()))
}

/// Prices a custom amount. The amount is rounded and clamped to the supported range.
#[instrument(name = "handler::custom_package", skip(query), fields(robux = query.robux))]
pub async fn custom_package_handler(query: web::Query<CustomPackageQuery>) -> Result<HttpResponse, AppError> {
  Ok(HttpResponse::Ok().json(catalog::custom_package(query.robux)))
}

#[instrument(name = "handler::get_package")]
pub async fn get_package_handler(path: web::Path<String>) -> Result<HttpResponse, AppError> {
  let package_id = path.into_inner();
  catalog::find_package(&package_id)
    .map(|package| HttpResponse::Ok().json(package))
    .ok_or_else(|| AppError::NotFound(format!("Package '{}' not found", package_id)))
}
