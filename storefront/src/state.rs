// storefront/src/state.rs
use pix_checkout::orchestrator::PaymentOrchestrator;
use pix_checkout::store::OrderStore;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
  pub orchestrator: Arc<PaymentOrchestrator>,
  /// Same store the orchestrator writes to; read by the admin order listing.
  pub store: Arc<dyn OrderStore>,
  /// Bearer token for the admin order listing; `None` disables it.
  pub admin_token: Option<Arc<str>>,
}
