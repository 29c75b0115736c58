// storefront/src/web/handlers/order_handlers.rs

use actix_web::{web, HttpResponse};
use pix_checkout::models::OrderSummary;
use serde_json::json;
use tracing::{error, instrument};

use crate::errors::AppError;
use crate::state::AppState;
use crate::web::extractors::AdminAccess;

/// `GET /api/v1/orders`: every order, newest first, plus headline totals. Admin only.
#[instrument(name = "handler::list_orders", skip(app_state, _admin))]
pub async fn list_orders_handler(
  app_state: web::Data<AppState>,
  _admin: AdminAccess,
) -> Result<HttpResponse, AppError> {
  let orders = app_state.store.list_orders().await.map_err(|e| {
    error!("Failed to list orders: {}", e);
    AppError::from(e)
  })?;
  let summary = OrderSummary::from_orders(&orders);

  Ok(HttpResponse::Ok().json(json!({
    "orders": orders,
    "summary": summary,
  })))
}
