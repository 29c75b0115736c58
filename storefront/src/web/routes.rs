// storefront/src/web/routes.rs

use actix_web::{web, HttpResponse};

use crate::errors::AppError;
use crate::web::handlers::{catalog_handlers, order_handlers, payment_handlers};

async fn health_check_handler() -> HttpResponse {
  HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

/// Malformed bodies answer 400 in the same `{success: false, error}` shape as checkout failures.
fn json_config() -> web::JsonConfig {
  web::JsonConfig::default().error_handler(|err, _req| AppError::Validation(err.to_string()).into())
}

pub fn configure_app_routes(cfg: &mut web::ServiceConfig) {
  cfg.service(
    web::scope("/api/v1")
      .app_data(json_config())
      .route("/health", web::get().to(health_check_handler))
      .service(
        web::scope("/payments/pix")
          .route("", web::post().to(payment_handlers::create_pix_payment_handler))
          .route("/status", web::post().to(payment_handlers::check_pix_status_handler)),
      )
      .route("/orders", web::get().to(order_handlers::list_orders_handler))
      .service(
        web::scope("/packages")
          .route("", web::get().to(catalog_handlers::list_packages_handler))
          .route("/custom", web::get().to(catalog_handlers::custom_package_handler))
          .route("/{package_id}", web::get().to(catalog_handlers::get_package_handler)),
      ),
  );
}
