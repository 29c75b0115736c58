// core/src/orchestrator/check_status.rs
use super::contexts::StatusCtxData;
use crate::error::CheckoutError;
use crate::pipeline::{ContextData, Pipeline, StepControl};
use tracing::{debug, error, info};

pub const VALIDATE_TRANSACTION_ID: &str = "validate_transaction_id";
pub const FETCH_GATEWAY_STATUS: &str = "fetch_gateway_status";
pub const PERSIST_STATUS: &str = "persist_status";

pub fn build_status_pipeline() -> Pipeline<StatusCtxData, CheckoutError> {
  let mut p = Pipeline::<StatusCtxData, CheckoutError>::new(&[
    (VALIDATE_TRANSACTION_ID, false),
    (FETCH_GATEWAY_STATUS, false),
    (PERSIST_STATUS, true),
  ]);

  p.on_step(VALIDATE_TRANSACTION_ID, |ctx_data: ContextData<StatusCtxData>| async move {
    let mut guard = ctx_data.write();
    let trimmed = guard.transaction_id.trim().to_string();
    if trimmed.is_empty() {
      return Err(CheckoutError::Validation("transactionId is required".to_string()));
    }
    guard.transaction_id = trimmed;
    Ok(StepControl::Continue)
  });

  p.on_step(FETCH_GATEWAY_STATUS, |ctx_data: ContextData<StatusCtxData>| async move {
    let (gateway, transaction_id) = {
      let guard = ctx_data.read();
      (guard.deps.gateway.clone(), guard.transaction_id.clone())
    };

    let status = gateway.fetch_pix_status(&transaction_id).await?;
    debug!(
      transaction_id = %transaction_id,
      raw_status = ?status.raw_status,
      status = %status.status,
      "Gateway status fetched."
    );
    ctx_data.write().status = Some(status);
    Ok::<_, CheckoutError>(StepControl::Continue)
  });

  // Best effort: the gateway is the source of truth, the local row only mirrors it.
  p.on_step(PERSIST_STATUS, |ctx_data: ContextData<StatusCtxData>| async move {
    let (store, transaction_id, status) = {
      let guard = ctx_data.read();
      match &guard.status {
        Some(fetched) => (guard.deps.store.clone(), guard.transaction_id.clone(), fetched.status),
        None => return Ok::<_, CheckoutError>(StepControl::Continue),
      }
    };

    match store.update_status(&transaction_id, status).await {
      Ok(0) => {
        debug!(transaction_id = %transaction_id, status = %status, "No order row changed.");
      }
      Ok(rows) => {
        info!(transaction_id = %transaction_id, status = %status, rows, "Order status updated.");
      }
      Err(e) => {
        error!(transaction_id = %transaction_id, error = %e, "Failed to update order status.");
      }
    }
    Ok(StepControl::Continue)
  });

  p
}
