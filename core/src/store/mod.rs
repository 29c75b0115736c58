// core/src/store/mod.rs

//! Durable record of orders. The payment orchestrator is the only writer.

pub mod memory;
pub mod postgres;

pub use memory::InMemoryOrderStore;
pub use postgres::PgOrderStore;

use crate::error::CheckoutResult;
use crate::models::{NewOrder, Order, OrderStatus};
use async_trait::async_trait;

#[async_trait]
pub trait OrderStore: Send + Sync {
  /// Inserts a `pending` order. A duplicate `transaction_id` is a `Persistence` error.
  async fn insert_order(&self, order: NewOrder) -> CheckoutResult<Order>;

  /// Sets the status of the order with `transaction_id` and returns the number of rows changed.
  ///
  /// Zero rows is not an error: the order may not be persisted yet, or it is
  /// already terminal with a different status (terminal orders never move).
  async fn update_status(&self, transaction_id: &str, status: OrderStatus) -> CheckoutResult<u64>;

  /// Every order, most recent `created_at` first.
  async fn list_orders(&self) -> CheckoutResult<Vec<Order>>;
}
