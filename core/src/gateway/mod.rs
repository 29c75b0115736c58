// core/src/gateway/mod.rs

//! The external PIX payment provider, seen through the `PixGateway` trait.

pub mod sigilopay;

pub use sigilopay::SigiloPayClient;

use crate::error::CheckoutResult;
use crate::models::{BuyerInfo, OrderStatus};
use async_trait::async_trait;
use rust_decimal::Decimal;

/// A PIX charge to open at the gateway.
#[derive(Debug, Clone, PartialEq)]
pub struct PixChargeRequest {
  pub amount: Decimal,
  pub product_id: String,
  pub product_name: String,
  pub quantity: u32,
  /// Phone and document are expected digits-only.
  pub buyer: BuyerInfo,
}

impl PixChargeRequest {
  /// Per-unit price sent in the product line: the exact quotient, never rounded to cents.
  pub fn unit_price(&self) -> Decimal {
    if self.quantity == 0 {
      return self.amount;
    }
    self.amount / Decimal::from(self.quantity)
  }
}

/// What the gateway returned for an opened charge.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PixCharge {
  pub transaction_id: String,
  pub raw_status: Option<String>,
  pub pix_code: Option<String>,
  /// Base64 PNG of the QR code, without a data-URI prefix.
  pub pix_qr_base64: Option<String>,
  pub order_url: Option<String>,
}

impl PixCharge {
  pub fn qr_code_data_uri(&self) -> Option<String> {
    self
      .pix_qr_base64
      .as_deref()
      .filter(|b64| !b64.is_empty())
      .map(|b64| format!("data:image/png;base64,{}", b64))
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixStatus {
  pub transaction_id: String,
  pub raw_status: Option<String>,
  pub status: OrderStatus,
}

impl PixStatus {
  pub fn from_raw(transaction_id: impl Into<String>, raw_status: Option<String>) -> Self {
    let status = normalize_status(raw_status.as_deref());
    Self {
      transaction_id: transaction_id.into(),
      raw_status,
      status,
    }
  }
}

/// Maps provider vocabulary onto the order lifecycle.
///
/// Case-insensitive. Anything unrecognised, or no status at all, stays `Pending`
/// so a new provider value is never mistaken for a terminal failure.
pub fn normalize_status(raw: Option<&str>) -> OrderStatus {
  let Some(raw) = raw else {
    return OrderStatus::Pending;
  };
  match raw.trim().to_ascii_uppercase().as_str() {
    "PAID" | "COMPLETED" | "APPROVED" => OrderStatus::Paid,
    "EXPIRED" | "CANCELLED" | "CANCELED" | "FAILED" => OrderStatus::Failed,
    _ => OrderStatus::Pending,
  }
}

#[async_trait]
pub trait PixGateway: Send + Sync {
  /// Opens a PIX charge. Fails with `GatewayConfiguration` when credentials are
  /// missing and with `GatewayRequest` / `GatewayTransport` when the call fails.
  async fn submit_pix_payment(&self, request: &PixChargeRequest) -> CheckoutResult<PixCharge>;

  /// Reads the current state of a charge opened by `submit_pix_payment`.
  async fn fetch_pix_status(&self, transaction_id: &str) -> CheckoutResult<PixStatus>;
}
