// core/src/config.rs

use crate::error::{CheckoutError, CheckoutResult};
use anyhow::Context;
use dotenvy::dotenv;
use std::env;
use std::fmt;
use std::time::Duration;

pub const DEFAULT_GATEWAY_BASE_URL: &str = "https://app.sigilopay.com.br/api/v1";
pub const DEFAULT_GATEWAY_TIMEOUT_SECS: u64 = 15;

/// Settings for the SigiloPay gateway client.
///
/// Credentials are kept optional here: a missing key is reported on each gateway
/// call as `CheckoutError::GatewayConfiguration`, before any request is sent.
#[derive(Clone)]
pub struct GatewayConfig {
  pub public_key: Option<String>,
  pub secret_key: Option<String>,
  pub base_url: String,
  pub timeout: Duration,
}

impl GatewayConfig {
  pub fn new(public_key: impl Into<String>, secret_key: impl Into<String>) -> Self {
    Self {
      public_key: Some(public_key.into()),
      secret_key: Some(secret_key.into()),
      ..Self::unconfigured()
    }
  }

  /// No credentials, default endpoint.
  pub fn unconfigured() -> Self {
    Self {
      public_key: None,
      secret_key: None,
      base_url: DEFAULT_GATEWAY_BASE_URL.to_string(),
      timeout: Duration::from_secs(DEFAULT_GATEWAY_TIMEOUT_SECS),
    }
  }

  pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
    self.base_url = base_url.into().trim_end_matches('/').to_string();
    self
  }

  pub fn from_env() -> CheckoutResult<Self> {
    dotenv().ok();

    // Blank values count as absent.
    let non_blank = |var_name: &str| env::var(var_name).ok().filter(|v| !v.trim().is_empty());

    let timeout_secs = match non_blank("SIGILO_PAY_TIMEOUT_SECS") {
      Some(raw) => raw
        .trim()
        .parse::<u64>()
        .with_context(|| format!("Invalid SIGILO_PAY_TIMEOUT_SECS: {:?}", raw))?,
      None => DEFAULT_GATEWAY_TIMEOUT_SECS,
    };

    let config = Self {
      public_key: non_blank("SIGILO_PAY_PUBLIC_KEY"),
      secret_key: non_blank("SIGILO_PAY_SECRET_KEY"),
      base_url: DEFAULT_GATEWAY_BASE_URL.to_string(),
      timeout: Duration::from_secs(timeout_secs),
    };
    let config = match non_blank("SIGILO_PAY_BASE_URL") {
      Some(url) => config.with_base_url(url),
      None => config,
    };

    if !config.has_credentials() {
      tracing::warn!("SigiloPay credentials are not set; payment calls will fail until they are configured.");
    }
    Ok(config)
  }

  pub fn has_credentials(&self) -> bool {
    self.public_key.is_some() && self.secret_key.is_some()
  }

  /// `(public_key, secret_key)`, or a configuration error naming what is missing.
  pub fn credentials(&self) -> CheckoutResult<(&str, &str)> {
    match (self.public_key.as_deref(), self.secret_key.as_deref()) {
      (Some(public), Some(secret)) => Ok((public, secret)),
      _ => Err(CheckoutError::GatewayConfiguration(
        "SigiloPay credentials not configured".to_string(),
      )),
    }
  }
}

impl fmt::Debug for GatewayConfig {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let redact = |v: &Option<String>| if v.is_some() { "[REDACTED]" } else { "<unset>" };
    f.debug_struct("GatewayConfig")
      .field("public_key", &redact(&self.public_key))
      .field("secret_key", &redact(&self.secret_key))
      .field("base_url", &self.base_url)
      .field("timeout", &self.timeout)
      .finish()
  }
}
