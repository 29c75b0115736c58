// core/src/orchestrator/mod.rs

//! `PaymentOrchestrator`: the two public checkout operations.
//!
//! Both operations run as step pipelines (see [`crate::pipeline`]) and fold every
//! failure into their result enums. Nothing here returns `Err` or lets a panic
//! escape to the caller.

pub mod check_status;
pub mod contexts;
pub mod create_payment;

use crate::error::CheckoutError;
use crate::gateway::PixGateway;
use crate::models::{CreatePaymentRequest, PaymentCreated, PaymentResult, StatusResult};
use crate::pipeline::{ContextData, Pipeline, PipelineResult};
use crate::store::OrderStore;
use contexts::{Collaborators, CreatePaymentCtxData, StatusCtxData};
use std::sync::Arc;
use tracing::{error, instrument, warn};

pub const CREATE_PAYMENT_FALLBACK_ERROR: &str = "Failed to create PIX payment";
pub const STATUS_FALLBACK_ERROR: &str = "Failed to check payment status";
pub const CONFIGURATION_ERROR: &str = "Payment gateway configuration error";

#[derive(Clone)]
pub struct PaymentOrchestrator {
  deps: Collaborators,
  create_pipeline: Arc<Pipeline<CreatePaymentCtxData, CheckoutError>>,
  status_pipeline: Arc<Pipeline<StatusCtxData, CheckoutError>>,
}

impl PaymentOrchestrator {
  pub fn new(gateway: Arc<dyn PixGateway>, store: Arc<dyn OrderStore>) -> Self {
    Self {
      deps: Collaborators { gateway, store },
      create_pipeline: Arc::new(create_payment::build_create_payment_pipeline()),
      status_pipeline: Arc::new(check_status::build_status_pipeline()),
    }
  }

  pub fn store(&self) -> Arc<dyn OrderStore> {
    self.deps.store.clone()
  }

  /// Creates a PIX charge and records a pending order for it.
  ///
  /// A store failure after the gateway accepted the charge is logged and the
  /// result is still a success.
  #[instrument(
    name = "orchestrator::create_payment",
    skip(self, request),
    fields(product_id = %request.product_id, robux_amount = request.robux_amount)
  )]
  pub async fn create_payment(&self, request: CreatePaymentRequest) -> PaymentResult {
    let ctx_data = ContextData::new(CreatePaymentCtxData::new(self.deps.clone(), request));
    let pipeline = self.create_pipeline.clone();
    let run_ctx = ctx_data.clone();

    let outcome = run_isolated(async move { pipeline.run(run_ctx).await }).await;
    let charge = ctx_data.read().charge.clone();

    match (outcome, charge) {
      (Ok(PipelineResult::Completed), Some(charge)) => PaymentResult::Created(PaymentCreated {
        pix_qr_code: charge.qr_code_data_uri(),
        transaction_id: charge.transaction_id,
        pix_code: charge.pix_code,
        order_url: charge.order_url,
      }),
      (Ok(_), _) => {
        error!("Create-payment pipeline finished without a charge.");
        PaymentResult::Failed {
          error: CREATE_PAYMENT_FALLBACK_ERROR.to_string(),
        }
      }
      (Err(e), _) => {
        warn!(error = %e, "PIX payment creation failed.");
        PaymentResult::Failed {
          error: failure_message(&e, CREATE_PAYMENT_FALLBACK_ERROR),
        }
      }
    }
  }

  /// Fetches the gateway status of `transaction_id`, normalizes it and mirrors it to the store.
  ///
  /// Calling this repeatedly with unchanged remote state yields the same result.
  #[instrument(name = "orchestrator::get_status", skip(self))]
  pub async fn get_status(&self, transaction_id: &str) -> StatusResult {
    let ctx_data = ContextData::new(StatusCtxData::new(self.deps.clone(), transaction_id.to_string()));
    let pipeline = self.status_pipeline.clone();
    let run_ctx = ctx_data.clone();

    let outcome = run_isolated(async move { pipeline.run(run_ctx).await }).await;
    let fetched = ctx_data.read().status.clone();

    match (outcome, fetched) {
      (Ok(PipelineResult::Completed), Some(fetched)) => StatusResult::Checked {
        transaction_id: fetched.transaction_id,
        status: fetched.status,
        raw_status: fetched.raw_status,
      },
      (Ok(_), _) => {
        error!("Status pipeline finished without a gateway status.");
        StatusResult::Failed {
          error: STATUS_FALLBACK_ERROR.to_string(),
        }
      }
      (Err(e), _) => {
        warn!(error = %e, "Payment status check failed.");
        StatusResult::Failed {
          error: failure_message(&e, STATUS_FALLBACK_ERROR),
        }
      }
    }
  }
}

/// Runs `fut` on its own task so a panic inside a step becomes an `Internal` error.
async fn run_isolated<F>(fut: F) -> Result<PipelineResult, CheckoutError>
where
  F: std::future::Future<Output = Result<PipelineResult, CheckoutError>> + Send + 'static,
{
  match tokio::spawn(fut).await {
    Ok(result) => result,
    Err(join_err) => {
      error!(error = %join_err, "Checkout pipeline task aborted.");
      Err(CheckoutError::Internal(join_err.to_string()))
    }
  }
}

/// Caller-facing message for a failed operation. Internal details stay in the logs.
fn failure_message(err: &CheckoutError, fallback: &str) -> String {
  match err {
    CheckoutError::GatewayConfiguration(_) => CONFIGURATION_ERROR.to_string(),
    CheckoutError::Validation(_) => err.to_string(),
    CheckoutError::GatewayRequest { message, .. } if !message.trim().is_empty() => message.clone(),
    _ => fallback.to_string(),
  }
}
