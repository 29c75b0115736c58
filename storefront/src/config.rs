// storefront/src/config.rs

use crate::errors::{AppError, Result};
use dotenvy::dotenv;
use pix_checkout::config::GatewayConfig;
use std::env;

#[derive(Debug, Clone)]
pub struct AppConfig {
  pub server_host: String,
  pub server_port: u16,
  /// Orders are kept in memory when unset.
  pub database_url: Option<String>,
  pub run_migrations: bool,
  /// Bearer token guarding `GET /orders`. The listing is refused when unset.
  pub admin_token: Option<String>,
  pub gateway: GatewayConfig,
}

impl AppConfig {
  pub fn from_env() -> Result<Self> {
    dotenv().ok();

    let get_env = |var_name: &str| {
      env::var(var_name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
    };

    let server_host = get_env("SERVER_HOST").unwrap_or_else(|| "127.0.0.1".to_string());
    let server_port = get_env("SERVER_PORT")
      .unwrap_or_else(|| "8080".to_string())
      .parse::<u16>()
      .map_err(|e| AppError::Config(format!("Invalid SERVER_PORT: {}", e)))?;
    let database_url = get_env("DATABASE_URL");
    let run_migrations = get_env("RUN_MIGRATIONS")
      .unwrap_or_else(|| "true".to_string())
      .parse::<bool>()
      .map_err(|e| AppError::Config(format!("Invalid RUN_MIGRATIONS value: {}", e)))?;

    let admin_token = get_env("ADMIN_TOKEN");
    if admin_token.is_none() {
      tracing::warn!("ADMIN_TOKEN is not set; the order listing is disabled.");
    }

    let gateway = GatewayConfig::from_env().map_err(|e| AppError::Config(e.to_string()))?;

    tracing::info!(
      server_host = %server_host,
      server_port,
      database_configured = database_url.is_some(),
      gateway_configured = gateway.has_credentials(),
      "Application configuration loaded."
    );

    Ok(Self {
      server_host,
      server_port,
      database_url,
      run_migrations,
      admin_token,
      gateway,
    })
  }

  pub fn bind_address(&self) -> String {
    format!("{}:{}", self.server_host, self.server_port)
  }
}
