// tests/common/mod.rs
#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::Mutex;
use pix_checkout::error::{CheckoutError, CheckoutResult};
use pix_checkout::gateway::{PixCharge, PixChargeRequest, PixGateway, PixStatus};
use pix_checkout::models::{BuyerInfo, CreatePaymentRequest, NewOrder, Order, OrderStatus};
use pix_checkout::store::OrderStore;
use rust_decimal_macros::dec;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::Level;

// --- Scripted gateway ---

/// Gateway double: replies come from queues, every call is counted.
#[derive(Default)]
pub struct FakeGateway {
  submit_replies: Mutex<VecDeque<CheckoutResult<PixCharge>>>,
  status_replies: Mutex<VecDeque<CheckoutResult<PixStatus>>>,
  pub submitted: Mutex<Vec<PixChargeRequest>>,
  pub submit_calls: AtomicUsize,
  pub status_calls: AtomicUsize,
}

impl FakeGateway {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_charge(self, charge: PixCharge) -> Self {
    self.submit_replies.lock().push_back(Ok(charge));
    self
  }

  pub fn with_submit_error(self, err: CheckoutError) -> Self {
    self.submit_replies.lock().push_back(Err(err));
    self
  }

  /// Queues a status reply built from the provider's raw value.
  pub fn with_raw_status(self, transaction_id: &str, raw: Option<&str>) -> Self {
    self
      .status_replies
      .lock()
      .push_back(Ok(PixStatus::from_raw(transaction_id, raw.map(str::to_string))));
    self
  }

  pub fn with_status_error(self, err: CheckoutError) -> Self {
    self.status_replies.lock().push_back(Err(err));
    self
  }

  pub fn submit_calls(&self) -> usize {
    self.submit_calls.load(Ordering::SeqCst)
  }

  pub fn status_calls(&self) -> usize {
    self.status_calls.load(Ordering::SeqCst)
  }
}

#[async_trait]
impl PixGateway for FakeGateway {
  async fn submit_pix_payment(&self, request: &PixChargeRequest) -> CheckoutResult<PixCharge> {
    self.submit_calls.fetch_add(1, Ordering::SeqCst);
    self.submitted.lock().push(request.clone());
    self
      .submit_replies
      .lock()
      .pop_front()
      .unwrap_or_else(|| Err(CheckoutError::Internal("no scripted charge".to_string())))
  }

  async fn fetch_pix_status(&self, transaction_id: &str) -> CheckoutResult<PixStatus> {
    self.status_calls.fetch_add(1, Ordering::SeqCst);
    let mut replies = self.status_replies.lock();
    // The last scripted reply repeats, like a provider whose state stopped changing.
    if replies.len() > 1 {
      replies.pop_front().unwrap_or_else(|| Ok(PixStatus::from_raw(transaction_id, None)))
    } else {
      match replies.front() {
        Some(Ok(status)) => Ok(status.clone()),
        Some(Err(_)) => replies.pop_front().unwrap_or_else(|| Ok(PixStatus::from_raw(transaction_id, None))),
        None => Ok(PixStatus::from_raw(transaction_id, None)),
      }
    }
  }
}

pub fn waiting_charge(transaction_id: &str) -> PixCharge {
  PixCharge {
    transaction_id: transaction_id.to_string(),
    raw_status: Some("WAITING_PAYMENT".to_string()),
    pix_code: Some("00020126...".to_string()),
    pix_qr_base64: Some("iVBORw0KGgo=".to_string()),
    order_url: Some(format!("https://app.sigilopay.com.br/order/{}", transaction_id)),
  }
}

// --- Store that always fails ---

#[derive(Default)]
pub struct FailingStore {
  pub calls: AtomicUsize,
}

#[async_trait]
impl OrderStore for FailingStore {
  async fn insert_order(&self, order: NewOrder) -> CheckoutResult<Order> {
    self.calls.fetch_add(1, Ordering::SeqCst);
    Err(CheckoutError::Persistence(format!(
      "duplicate key value violates unique constraint (transaction_id={})",
      order.transaction_id
    )))
  }

  async fn update_status(&self, _transaction_id: &str, _status: OrderStatus) -> CheckoutResult<u64> {
    self.calls.fetch_add(1, Ordering::SeqCst);
    Err(CheckoutError::Persistence("connection refused".to_string()))
  }

  async fn list_orders(&self) -> CheckoutResult<Vec<Order>> {
    self.calls.fetch_add(1, Ordering::SeqCst);
    Err(CheckoutError::Persistence("connection refused".to_string()))
  }
}

// --- Requests ---

pub fn buyer() -> BuyerInfo {
  BuyerInfo {
    name: "Ana Souza".to_string(),
    email: "ana@example.com".to_string(),
    phone: "(11) 99999-9999".to_string(),
    document: "123.456.789-00".to_string(),
    roblox_user: "ana123".to_string(),
  }
}

/// The "Popular" package: 1700 + 100 bonus for R$ 49.90.
pub fn popular_request() -> CreatePaymentRequest {
  CreatePaymentRequest {
    amount: dec!(49.90),
    product_name: "1800 Robux".to_string(),
    product_id: "pkg-1700".to_string(),
    quantity: 1,
    robux_amount: 1800,
    client: buyer(),
  }
}

// --- Tracing ---
use once_cell::sync::Lazy;
static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer()
    .try_init()
    .ok();
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}
