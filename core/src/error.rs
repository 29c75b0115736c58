// core/src/error.rs
use crate::pipeline::PipelineError;
use thiserror::Error;

/// Every failure the checkout core can produce.
///
/// None of these cross the public orchestrator boundary as `Err`: `create_payment`
/// and `get_status` fold them into their `{ success: false, error }` result shapes.
#[derive(Debug, Error)]
pub enum CheckoutError {
  /// Gateway credentials are absent from the environment. Operator action required.
  #[error("Gateway configuration error: {0}")]
  GatewayConfiguration(String),

  /// The gateway answered with a non-success status.
  #[error("{message}")]
  GatewayRequest { status: Option<u16>, message: String },

  /// The gateway could not be reached or its body could not be read.
  #[error("Gateway transport error: {0}")]
  GatewayTransport(String),

  #[error("Order store error: {0}")]
  Persistence(String),

  #[error("Validation error: {0}")]
  Validation(String),

  #[error("Checkout pipeline error: {0}")]
  Pipeline(#[from] PipelineError),

  #[error("Internal error: {0}")]
  Internal(String),
}

impl CheckoutError {
  /// True when the remote call itself was rejected or failed.
  pub fn is_gateway_request(&self) -> bool {
    matches!(self, CheckoutError::GatewayRequest { .. } | CheckoutError::GatewayTransport(_))
  }
}

impl From<reqwest::Error> for CheckoutError {
  fn from(err: reqwest::Error) -> Self {
    CheckoutError::GatewayTransport(err.to_string())
  }
}

impl From<sqlx::Error> for CheckoutError {
  fn from(err: sqlx::Error) -> Self {
    CheckoutError::Persistence(err.to_string())
  }
}

impl From<sqlx::migrate::MigrateError> for CheckoutError {
  fn from(err: sqlx::migrate::MigrateError) -> Self {
    CheckoutError::Persistence(format!("migration failed: {}", err))
  }
}

impl From<anyhow::Error> for CheckoutError {
  fn from(err: anyhow::Error) -> Self {
    CheckoutError::Internal(format!("{:#}", err))
  }
}

pub type CheckoutResult<T, E = CheckoutError> = std::result::Result<T, E>;
