// storefront/src/web/handlers/payment_handlers.rs

use actix_web::{web, HttpResponse};
use pix_checkout::models::{CreatePaymentRequest, StatusRequest};
use tracing::{info, instrument};

use crate::errors::AppError;
use crate::state::AppState;

/// `POST /api/v1/payments/pix`
///
/// 200 with `{success: true, ...}` when the charge was created, 500 with
/// `{success: false, error}` otherwise.
#[instrument(
  name = "handler::create_pix_payment",
  skip(app_state, req_payload),
  fields(product_id = %req_payload.product_id)
)]
pub async fn create_pix_payment_handler(
  app_state: web::Data<AppState>,
  req_payload: web::Json<CreatePaymentRequest>,
) -> Result<HttpResponse, AppError> {
  let result = app_state.orchestrator.create_payment(req_payload.into_inner()).await;

  if result.is_success() {
    info!(transaction_id = ?result.transaction_id(), "PIX payment created.");
    Ok(HttpResponse::Ok().json(result))
  } else {
    Ok(HttpResponse::InternalServerError().json(result))
  }
}

/// `POST /api/v1/payments/pix/status`
#[instrument(
  name = "handler::check_pix_status",
  skip(app_state, req_payload),
  fields(transaction_id = %req_payload.transaction_id)
)]
pub async fn check_pix_status_handler(
  app_state: web::Data<AppState>,
  req_payload: web::Json<StatusRequest>,
) -> Result<HttpResponse, AppError> {
  let result = app_state.orchestrator.get_status(&req_payload.transaction_id).await;

  if result.is_success() {
    Ok(HttpResponse::Ok().json(result))
  } else {
    Ok(HttpResponse::InternalServerError().json(result))
  }
}
