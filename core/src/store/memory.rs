// core/src/store/memory.rs

use super::OrderStore;
use crate::error::{CheckoutError, CheckoutResult};
use crate::models::{NewOrder, Order, OrderStatus};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Process-local order store keyed by transaction id.
///
/// Used when no database is configured and by tests. Orders do not survive a restart.
#[derive(Debug, Default, Clone)]
pub struct InMemoryOrderStore {
  orders: Arc<RwLock<HashMap<String, Order>>>,
}

impl InMemoryOrderStore {
  pub fn new() -> Self {
    Self::default()
  }

  pub async fn get(&self, transaction_id: &str) -> Option<Order> {
    self.orders.read().await.get(transaction_id).cloned()
  }

  pub async fn len(&self) -> usize {
    self.orders.read().await.len()
  }

  pub async fn is_empty(&self) -> bool {
    self.orders.read().await.is_empty()
  }
}

#[async_trait]
impl OrderStore for InMemoryOrderStore {
  async fn insert_order(&self, order: NewOrder) -> CheckoutResult<Order> {
    let mut orders = self.orders.write().await;
    if orders.contains_key(&order.transaction_id) {
      return Err(CheckoutError::Persistence(format!(
        "duplicate transaction id {}",
        order.transaction_id
      )));
    }
    let order = order.into_pending_order(Utc::now());
    orders.insert(order.transaction_id.clone(), order.clone());
    Ok(order)
  }

  async fn update_status(&self, transaction_id: &str, status: OrderStatus) -> CheckoutResult<u64> {
    let mut orders = self.orders.write().await;
    match orders.get_mut(transaction_id) {
      Some(order) if order.status.can_become(status) => {
        order.status = status;
        Ok(1)
      }
      _ => Ok(0),
    }
  }

  async fn list_orders(&self) -> CheckoutResult<Vec<Order>> {
    let mut all: Vec<Order> = self.orders.read().await.values().cloned().collect();
    all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(all)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use rust_decimal_macros::dec;

  fn new_order(tx: &str) -> NewOrder {
    NewOrder {
      transaction_id: tx.to_string(),
      customer_name: "Ana".to_string(),
      email: "a@x.com".to_string(),
      phone: "11999999999".to_string(),
      document: "12345678900".to_string(),
      roblox_username: "ana123".to_string(),
      robux_amount: 1800,
      price_brl: dec!(49.90),
    }
  }

  #[tokio::test]
  async fn insert_starts_pending_and_rejects_duplicates() {
    let store = InMemoryOrderStore::new();
    let order = store.insert_order(new_order("tx1")).await.unwrap();
    assert_eq!(order.status, OrderStatus::Pending);

    let dup = store.insert_order(new_order("tx1")).await;
    assert!(matches!(dup, Err(CheckoutError::Persistence(_))));
    assert_eq!(store.len().await, 1);
  }

  #[tokio::test]
  async fn update_of_unknown_order_is_a_no_op() {
    let store = InMemoryOrderStore::new();
    assert_eq!(store.update_status("nope", OrderStatus::Paid).await.unwrap(), 0);
    assert!(store.is_empty().await);
  }

  #[tokio::test]
  async fn terminal_orders_keep_their_status() {
    let store = InMemoryOrderStore::new();
    store.insert_order(new_order("tx1")).await.unwrap();

    assert_eq!(store.update_status("tx1", OrderStatus::Paid).await.unwrap(), 1);
    assert_eq!(store.update_status("tx1", OrderStatus::Pending).await.unwrap(), 0);
    assert_eq!(store.update_status("tx1", OrderStatus::Failed).await.unwrap(), 0);
    assert_eq!(store.get("tx1").await.unwrap().status, OrderStatus::Paid);
  }

  #[tokio::test]
  async fn lists_most_recent_first() {
    let store = InMemoryOrderStore::new();
    store.insert_order(new_order("older")).await.unwrap();
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    store.insert_order(new_order("newer")).await.unwrap();

    let ids: Vec<String> = store
      .list_orders()
      .await
      .unwrap()
      .into_iter()
      .map(|o| o.transaction_id)
      .collect();
    assert_eq!(ids, vec!["newer", "older"]);
  }
}
