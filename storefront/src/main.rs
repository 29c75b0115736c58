// storefront/src/main.rs

mod config;
mod errors;
mod state;
mod web;

use crate::config::AppConfig;
use crate::state::AppState;

use actix_web::{web as actix_data, App, HttpServer};
use anyhow::Context;
use pix_checkout::gateway::SigiloPayClient;
use pix_checkout::orchestrator::PaymentOrchestrator;
use pix_checkout::store::{InMemoryOrderStore, OrderStore, PgOrderStore};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::FmtSpan;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(log_filter(std::env::var("RUST_LOG").ok().as_deref()))
    .with_span_events(FmtSpan::CLOSE)
    .init();

  tracing::info!("Starting storefront server...");

  let app_config = AppConfig::from_env().context("Failed to load application configuration")?;

  let store = build_order_store(&app_config).await?;
  let gateway = SigiloPayClient::new(app_config.gateway.clone()).context("Failed to build the SigiloPay client")?;
  let orchestrator = Arc::new(PaymentOrchestrator::new(Arc::new(gateway), store.clone()));

  let app_state = AppState {
    orchestrator,
    store,
    admin_token: app_config.admin_token.as_deref().map(Arc::from),
  };

  let server_address = app_config.bind_address();
  tracing::info!("Attempting to bind server to {}...", server_address);

  HttpServer::new(move || {
    App::new()
      .app_data(actix_data::Data::new(app_state.clone()))
      .wrap(tracing_actix_web::TracingLogger::default())
      .configure(web::configure_app_routes)
  })
  .bind(&server_address)
  .with_context(|| format!("Failed to bind {}", server_address))?
  .run()
  .await
  .context("HTTP server terminated with an error")
}

const DEFAULT_LOG_FILTER: &str = "info";

/// `RUST_LOG` when it is set and parses, INFO otherwise.
fn log_filter(rust_log: Option<&str>) -> EnvFilter {
  rust_log
    .filter(|directives| !directives.trim().is_empty())
    .and_then(|directives| EnvFilter::try_new(directives).ok())
    .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_FILTER))
}

async fn build_order_store(app_config: &AppConfig) -> anyhow::Result<Arc<dyn OrderStore>> {
  let Some(database_url) = app_config.database_url.as_deref() else {
    tracing::warn!("DATABASE_URL is not set; orders are kept in memory and lost on restart.");
    return Ok(Arc::new(InMemoryOrderStore::new()));
  };

  let store = PgOrderStore::connect(database_url)
    .await
    .context("Failed to connect to the order database")?;
  if app_config.run_migrations {
    store.run_migrations().await.context("Failed to migrate the order database")?;
  }
  Ok(Arc::new(store))
}
