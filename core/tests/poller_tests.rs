// tests/poller_tests.rs
mod common;

use common::*;
use pix_checkout::error::CheckoutError;
use pix_checkout::models::OrderStatus;
use pix_checkout::orchestrator::PaymentOrchestrator;
use pix_checkout::poller::{self, PollOutcome, PollerConfig};
use pix_checkout::store::InMemoryOrderStore;
use std::sync::Arc;
use std::time::Duration;

#[tokio::test(start_paused = true)]
async fn checkout_is_polled_until_paid() {
  setup_tracing();
  let gateway = Arc::new(
    FakeGateway::new()
      .with_charge(waiting_charge("tx1"))
      .with_raw_status("tx1", Some("WAITING_PAYMENT"))
      .with_status_error(CheckoutError::GatewayTransport("timed out".to_string()))
      .with_raw_status("tx1", Some("PAID")),
  );
  let store = Arc::new(InMemoryOrderStore::new());
  let orchestrator = Arc::new(PaymentOrchestrator::new(gateway.clone(), store.clone()));

  let created = orchestrator.create_payment(popular_request()).await;
  let transaction_id = created.transaction_id().expect("payment created").to_string();

  let handle = poller::spawn(orchestrator.clone(), transaction_id, PollerConfig::default());
  assert_eq!(handle.join().await, PollOutcome::Terminal(OrderStatus::Paid));
  assert_eq!(gateway.status_calls(), 3);
  assert_eq!(store.get("tx1").await.unwrap().status, OrderStatus::Paid);

  tokio::time::sleep(Duration::from_secs(60)).await;
  assert_eq!(gateway.status_calls(), 3);
}

#[tokio::test(start_paused = true)]
async fn cancelled_poller_makes_no_further_calls() {
  setup_tracing();
  let gateway = Arc::new(FakeGateway::new().with_raw_status("tx1", Some("WAITING_PAYMENT")));
  let orchestrator = Arc::new(PaymentOrchestrator::new(gateway.clone(), Arc::new(InMemoryOrderStore::new())));

  let handle = poller::spawn(orchestrator, "tx1", PollerConfig::default());
  tokio::time::sleep(Duration::from_millis(10_100)).await;
  assert_eq!(gateway.status_calls(), 2);
  assert_eq!(handle.latest_status(), OrderStatus::Pending);

  handle.cancel();
  assert_eq!(handle.join().await, PollOutcome::Cancelled);

  tokio::time::sleep(Duration::from_secs(60)).await;
  assert_eq!(gateway.status_calls(), 2);
}
