// core/src/pipeline/mod.rs

//! A small step-pipeline runner the payment orchestrator is assembled from.
//!
//! A `Pipeline<TData, Err>` is an ordered list of named steps. Each step owns zero
//! or more async handlers operating on a shared `ContextData<TData>`. Handlers
//! steer the run with `StepControl::Continue` / `StepControl::Stop` or fail it
//! with `Err`.

pub mod context_data;
pub mod control;
pub mod definition;
pub mod execution;

pub use context_data::ContextData;
pub use control::{PipelineResult, StepControl};
pub use definition::{Pipeline, StepDef, StepHandler};

use thiserror::Error;

/// Failures raised by the runner itself, as opposed to failures raised by handlers.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PipelineError {
  #[error("Handler missing for non-optional step: {step_name}")]
  HandlerMissing { step_name: String },
}
