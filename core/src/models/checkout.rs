// core/src/models/checkout.rs

//! Request and result shapes of the two public checkout operations.

use crate::catalog::RobuxPackage;
use crate::error::{CheckoutError, CheckoutResult};
use crate::models::order::OrderStatus;
use rust_decimal::Decimal;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

/// Strips every non-digit, e.g. `"(11) 99999-9999"` -> `"11999999999"`.
pub fn digits_only(value: &str) -> String {
  value.chars().filter(|c| c.is_ascii_digit()).collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuyerInfo {
  pub name: String,
  pub email: String,
  pub phone: String,
  /// CPF.
  pub document: String,
  pub roblox_user: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaymentRequest {
  pub amount: Decimal,
  pub product_name: String,
  pub product_id: String,
  pub quantity: u32,
  /// Base plus bonus.
  pub robux_amount: u32,
  pub client: BuyerInfo,
}

impl CreatePaymentRequest {
  /// Checkout request for a catalog (or custom) package, bought once.
  pub fn for_package(package: &RobuxPackage, client: BuyerInfo) -> Self {
    Self {
      amount: package.price,
      product_name: package.product_name(),
      product_id: package.id.clone(),
      quantity: 1,
      robux_amount: package.total_robux(),
      client,
    }
  }

  /// Trims text fields and reduces phone and document to digits.
  pub fn normalized(mut self) -> Self {
    self.product_name = self.product_name.trim().to_string();
    self.product_id = self.product_id.trim().to_string();
    self.client.name = self.client.name.trim().to_string();
    self.client.email = self.client.email.trim().to_string();
    self.client.roblox_user = self.client.roblox_user.trim().to_string();
    self.client.phone = digits_only(&self.client.phone);
    self.client.document = digits_only(&self.client.document);
    self
  }

  pub fn validate(&self) -> CheckoutResult<()> {
    if self.amount <= Decimal::ZERO {
      return Err(CheckoutError::Validation("amount must be greater than zero".to_string()));
    }
    if self.amount.normalize().scale() > 2 {
      return Err(CheckoutError::Validation("amount must be in whole centavos".to_string()));
    }
    if self.quantity == 0 {
      return Err(CheckoutError::Validation("quantity must be greater than zero".to_string()));
    }
    if self.robux_amount == 0 {
      return Err(CheckoutError::Validation("robuxAmount must be greater than zero".to_string()));
    }

    let required = [
      ("productName", &self.product_name),
      ("productId", &self.product_id),
      ("client.name", &self.client.name),
      ("client.email", &self.client.email),
      ("client.phone", &self.client.phone),
      ("client.document", &self.client.document),
      ("client.robloxUser", &self.client.roblox_user),
    ];
    match required.iter().find(|(_, value)| value.trim().is_empty()) {
      Some((field, _)) => Err(CheckoutError::Validation(format!("{} is required", field))),
      None => Ok(()),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusRequest {
  pub transaction_id: String,
}

/// A payment the gateway accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentCreated {
  pub transaction_id: String,
  /// Copy-and-paste PIX code.
  pub pix_code: Option<String>,
  /// `data:image/png;base64,...` URI of the QR code.
  pub pix_qr_code: Option<String>,
  pub order_url: Option<String>,
}

/// Outcome of `create_payment`. Serializes as `{success: true, ...}` or `{success: false, error}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentResult {
  Created(PaymentCreated),
  Failed { error: String },
}

impl PaymentResult {
  pub fn is_success(&self) -> bool {
    matches!(self, PaymentResult::Created(_))
  }

  pub fn transaction_id(&self) -> Option<&str> {
    match self {
      PaymentResult::Created(created) => Some(&created.transaction_id),
      PaymentResult::Failed { .. } => None,
    }
  }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PaymentResultWire<'a> {
  success: bool,
  #[serde(skip_serializing_if = "Option::is_none")]
  transaction_id: Option<&'a str>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pix_code: Option<&'a str>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pix_qr_code: Option<&'a str>,
  #[serde(skip_serializing_if = "Option::is_none")]
  order_url: Option<&'a str>,
  #[serde(skip_serializing_if = "Option::is_none")]
  error: Option<&'a str>,
}

impl Serialize for PaymentResult {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    let wire = match self {
      PaymentResult::Created(created) => PaymentResultWire {
        success: true,
        transaction_id: Some(&created.transaction_id),
        pix_code: created.pix_code.as_deref(),
        pix_qr_code: created.pix_qr_code.as_deref(),
        order_url: created.order_url.as_deref(),
        error: None,
      },
      PaymentResult::Failed { error } => PaymentResultWire {
        success: false,
        transaction_id: None,
        pix_code: None,
        pix_qr_code: None,
        order_url: None,
        error: Some(error),
      },
    };
    wire.serialize(serializer)
  }
}

/// Outcome of `get_status`. Serializes as `{success: true, status, rawStatus}` or `{success: false, error}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusResult {
  Checked {
    transaction_id: String,
    status: OrderStatus,
    /// Provider vocabulary, verbatim. `None` when the provider sent no status.
    raw_status: Option<String>,
  },
  Failed {
    error: String,
  },
}

impl StatusResult {
  pub fn is_success(&self) -> bool {
    matches!(self, StatusResult::Checked { .. })
  }

  pub fn status(&self) -> Option<OrderStatus> {
    match self {
      StatusResult::Checked { status, .. } => Some(*status),
      StatusResult::Failed { .. } => None,
    }
  }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StatusResultWire<'a> {
  success: bool,
  #[serde(skip_serializing_if = "Option::is_none")]
  transaction_id: Option<&'a str>,
  #[serde(skip_serializing_if = "Option::is_none")]
  status: Option<OrderStatus>,
  #[serde(skip_serializing_if = "Option::is_none")]
  raw_status: Option<&'a str>,
  #[serde(skip_serializing_if = "Option::is_none")]
  error: Option<&'a str>,
}

impl Serialize for StatusResult {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    let wire = match self {
      StatusResult::Checked {
        transaction_id,
        status,
        raw_status,
      } => StatusResultWire {
        success: true,
        transaction_id: Some(transaction_id),
        status: Some(*status),
        raw_status: raw_status.as_deref(),
        error: None,
      },
      StatusResult::Failed { error } => StatusResultWire {
        success: false,
        transaction_id: None,
        status: None,
        raw_status: None,
        error: Some(error),
      },
    };
    wire.serialize(serializer)
  }
}
