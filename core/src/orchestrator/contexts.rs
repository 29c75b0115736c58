// core/src/orchestrator/contexts.rs

//! Data the two orchestrator pipelines operate on.
//! Handlers receive these wrapped in `ContextData`.

use crate::gateway::{PixCharge, PixGateway, PixStatus};
use crate::models::CreatePaymentRequest;
use crate::store::OrderStore;
use std::sync::Arc;

/// Collaborators shared by every pipeline run.
#[derive(Clone)]
pub struct Collaborators {
  pub gateway: Arc<dyn PixGateway>,
  pub store: Arc<dyn OrderStore>,
}

#[derive(Clone)]
pub struct CreatePaymentCtxData {
  pub deps: Collaborators,
  pub request: CreatePaymentRequest,
  pub charge: Option<PixCharge>,
}

impl CreatePaymentCtxData {
  pub fn new(deps: Collaborators, request: CreatePaymentRequest) -> Self {
    Self {
      deps,
      request,
      charge: None,
    }
  }
}

#[derive(Clone)]
pub struct StatusCtxData {
  pub deps: Collaborators,
  pub transaction_id: String,
  pub status: Option<PixStatus>,
}

impl StatusCtxData {
  pub fn new(deps: Collaborators, transaction_id: String) -> Self {
    Self {
      deps,
      transaction_id,
      status: None,
    }
  }
}
