// storefront/src/errors.rs

use actix_web::{HttpResponse, ResponseError};
use pix_checkout::error::CheckoutError;
use serde_json::json;
use thiserror::Error;

/// Failures of the HTTP layer itself. Checkout outcomes are not errors here:
/// the orchestrator already folds them into `{success: false, error}` bodies.
#[derive(Debug, Error)]
pub enum AppError {
  #[error("Validation Error: {0}")]
  Validation(String),

  #[error("Unauthorized: {0}")]
  Unauthorized(String),

  #[error("Resource Not Found: {0}")]
  NotFound(String),

  #[error("Configuration Error: {0}")]
  Config(String),

  #[error("Checkout Error: {0}")]
  Checkout(#[from] CheckoutError),
}

impl ResponseError for AppError {
  fn error_response(&self) -> HttpResponse {
    tracing::error!(application_error = %self, "Responding with error");
    match self {
      AppError::Validation(m) => HttpResponse::BadRequest().json(json!({"success": false, "error": m})),
      AppError::Unauthorized(m) => HttpResponse::Unauthorized().json(json!({"success": false, "error": m})),
      AppError::NotFound(m) => HttpResponse::NotFound().json(json!({"success": false, "error": m})),
      AppError::Config(_) => {
        HttpResponse::InternalServerError().json(json!({"success": false, "error": "Configuration issue"}))
      }
      AppError::Checkout(CheckoutError::Persistence(_)) => {
        HttpResponse::InternalServerError().json(json!({"success": false, "error": "Order store unavailable"}))
      }
      AppError::Checkout(_) => {
        HttpResponse::InternalServerError().json(json!({"success": false, "error": "An internal error occurred"}))
      }
    }
  }
}

pub type Result<T, E = AppError> = std::result::Result<T, E>;
