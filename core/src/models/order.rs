// core/src/models/order.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type as SqlxType};
use std::fmt;
use uuid::Uuid;

/// Lifecycle of an order. `Pending` is the only non-terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, SqlxType)]
#[sqlx(type_name = "order_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
  Pending,
  Paid,
  Failed,
}

impl OrderStatus {
  pub fn is_terminal(self) -> bool {
    !matches!(self, OrderStatus::Pending)
  }

  pub fn as_str(self) -> &'static str {
    match self {
      OrderStatus::Pending => "pending",
      OrderStatus::Paid => "paid",
      OrderStatus::Failed => "failed",
    }
  }

  /// Whether a stored order in `self` may be overwritten with `next`.
  /// Terminal states only accept a redundant write of the same value.
  pub fn can_become(self, next: OrderStatus) -> bool {
    self == OrderStatus::Pending || self == next
  }
}

impl fmt::Display for OrderStatus {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// A persisted order row. Keyed for reconciliation by `transaction_id`.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Order {
  pub id: Uuid,
  pub transaction_id: String,
  pub customer_name: String,
  pub email: String,
  /// Kept for reconciliation, never serialized.
  #[serde(skip_serializing)]
  pub phone: String,
  /// CPF. Never serialized.
  #[serde(skip_serializing)]
  pub document: String,
  pub roblox_username: String,
  pub robux_amount: i32,
  #[serde(rename = "priceBRL", with = "rust_decimal::serde::float")]
  pub price_brl: Decimal,
  pub status: OrderStatus,
  pub created_at: DateTime<Utc>,
}

/// Buyer-supplied attributes of an order about to be inserted.
/// Insertion assigns `id`, `created_at` and `status = pending`.
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrder {
  pub transaction_id: String,
  pub customer_name: String,
  pub email: String,
  pub phone: String,
  pub document: String,
  pub roblox_username: String,
  pub robux_amount: i32,
  pub price_brl: Decimal,
}

impl NewOrder {
  pub fn into_pending_order(self, created_at: DateTime<Utc>) -> Order {
    Order {
      id: Uuid::new_v4(),
      transaction_id: self.transaction_id,
      customer_name: self.customer_name,
      email: self.email,
      phone: self.phone,
      document: self.document,
      roblox_username: self.roblox_username,
      robux_amount: self.robux_amount,
      price_brl: self.price_brl,
      status: OrderStatus::Pending,
      created_at,
    }
  }
}

/// Headline numbers for the admin order table.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
  pub total_orders: usize,
  pub paid_orders: usize,
  pub pending_orders: usize,
  /// Sum of `price_brl` over paid orders.
  #[serde(with = "rust_decimal::serde::float")]
  pub revenue_brl: Decimal,
}

impl OrderSummary {
  pub fn from_orders(orders: &[Order]) -> Self {
    orders.iter().fold(OrderSummary::default(), |mut acc, order| {
      acc.total_orders += 1;
      match order.status {
        OrderStatus::Paid => {
          acc.paid_orders += 1;
          acc.revenue_brl += order.price_brl;
        }
        OrderStatus::Pending => acc.pending_orders += 1,
        OrderStatus::Failed => {}
      }
      acc
    })
  }
}
