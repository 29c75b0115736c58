// core/src/orchestrator/create_payment.rs
use super::contexts::CreatePaymentCtxData;
use crate::error::{CheckoutError, CheckoutResult};
use crate::gateway::PixChargeRequest;
use crate::models::{CreatePaymentRequest, NewOrder};
use crate::pipeline::{ContextData, Pipeline, StepControl};
use tracing::{error, info};

pub const VALIDATE_REQUEST: &str = "validate_request";
pub const SUBMIT_PIX_CHARGE: &str = "submit_pix_charge";
pub const RECORD_PENDING_ORDER: &str = "record_pending_order";

pub fn build_create_payment_pipeline() -> Pipeline<CreatePaymentCtxData, CheckoutError> {
  let mut p = Pipeline::<CreatePaymentCtxData, CheckoutError>::new(&[
    (VALIDATE_REQUEST, false),
    (SUBMIT_PIX_CHARGE, false),
    (RECORD_PENDING_ORDER, true),
  ]);

  // Step 1: normalize buyer input, reject blanks before touching the gateway.
  p.on_step(VALIDATE_REQUEST, |ctx_data: ContextData<CreatePaymentCtxData>| async move {
    let mut guard = ctx_data.write();
    let request = guard.request.clone().normalized();
    request.validate()?;
    guard.request = request;
    Ok::<_, CheckoutError>(StepControl::Continue)
  });

  // Step 2: create the charge. Any failure here fails the whole operation.
  p.on_step(SUBMIT_PIX_CHARGE, |ctx_data: ContextData<CreatePaymentCtxData>| async move {
    let (gateway, charge_request) = {
      let guard = ctx_data.read();
      let request = &guard.request;
      (
        guard.deps.gateway.clone(),
        PixChargeRequest {
          amount: request.amount,
          product_id: request.product_id.clone(),
          product_name: request.product_name.clone(),
          quantity: request.quantity,
          buyer: request.client.clone(),
        },
      )
    };

    let charge = gateway.submit_pix_payment(&charge_request).await?;
    info!(
      transaction_id = %charge.transaction_id,
      raw_status = ?charge.raw_status,
      "PIX charge created."
    );
    ctx_data.write().charge = Some(charge);
    Ok::<_, CheckoutError>(StepControl::Continue)
  });

  // Step 3: bookkeeping. The gateway already holds the payment, so a failed write is logged and dropped.
  p.on_step(RECORD_PENDING_ORDER, |ctx_data: ContextData<CreatePaymentCtxData>| async move {
    let (store, transaction_id, new_order) = {
      let guard = ctx_data.read();
      let transaction_id = match &guard.charge {
        Some(charge) => charge.transaction_id.clone(),
        None => return Ok::<_, CheckoutError>(StepControl::Continue),
      };
      let new_order = pending_order(&guard.request, &transaction_id);
      (guard.deps.store.clone(), transaction_id, new_order)
    };

    let outcome = match new_order {
      Ok(order) => store.insert_order(order).await,
      Err(e) => Err(e),
    };

    match outcome {
      Ok(order) => {
        info!(transaction_id = %order.transaction_id, order_id = %order.id, "Pending order recorded.");
      }
      Err(e) => {
        error!(
          transaction_id = %transaction_id,
          error = %e,
          "Failed to record pending order; payment stays valid at the gateway."
        );
      }
    }
    Ok(StepControl::Continue)
  });

  p
}

fn pending_order(request: &CreatePaymentRequest, transaction_id: &str) -> CheckoutResult<NewOrder> {
  let robux_amount = i32::try_from(request.robux_amount)
    .map_err(|_| CheckoutError::Persistence(format!("robux amount {} out of range", request.robux_amount)))?;

  Ok(NewOrder {
    transaction_id: transaction_id.to_string(),
    customer_name: request.client.name.clone(),
    email: request.client.email.clone(),
    phone: request.client.phone.clone(),
    document: request.client.document.clone(),
    roblox_username: request.client.roblox_user.clone(),
    robux_amount,
    price_brl: request.amount,
  })
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn only_bookkeeping_is_optional() {
    let pipeline = build_create_payment_pipeline();
    let steps: Vec<(&str, bool)> = pipeline.steps().iter().map(|s| (s.name.as_str(), s.optional)).collect();
    assert_eq!(
      steps,
      vec![(VALIDATE_REQUEST, false), (SUBMIT_PIX_CHARGE, false), (RECORD_PENDING_ORDER, true)]
    );
  }
}
