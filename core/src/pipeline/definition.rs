// core/src/pipeline/definition.rs

//! `Pipeline<TData, Err>` construction and handler registration.

use super::context_data::ContextData;
use super::control::StepControl;
use super::PipelineError;
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;

/// A boxed async step handler.
///
/// Handlers receive a clone of the run's `ContextData<TData>` and must release
/// any lock guard before awaiting.
pub type StepHandler<TData, Err> = Box<
  dyn Fn(ContextData<TData>) -> Pin<Box<dyn Future<Output = Result<StepControl, Err>> + Send>> + Send + Sync,
>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepDef {
  pub name: String,
  /// An optional step without handlers is skipped instead of failing the run.
  pub optional: bool,
}

pub struct Pipeline<TData, Err>
where
  TData: 'static + Send + Sync,
  Err: std::error::Error + From<PipelineError> + Send + Sync + 'static,
{
  pub(crate) steps: Vec<StepDef>,
  pub(crate) handlers: HashMap<String, Vec<StepHandler<TData, Err>>>,
}

impl<TData, Err> Pipeline<TData, Err>
where
  TData: 'static + Send + Sync,
  Err: std::error::Error + From<PipelineError> + Send + Sync + 'static,
{
  pub fn new(step_defs: &[(&str, bool)]) -> Self {
    let steps = step_defs
      .iter()
      .map(|(name, optional)| StepDef {
        name: (*name).to_string(),
        optional: *optional,
      })
      .collect();

    Self {
      steps,
      handlers: HashMap::new(),
    }
  }

  pub fn steps(&self) -> &[StepDef] {
    &self.steps
  }

  /// Panics when the step is not declared; a typo in a step name is a wiring bug.
  fn ensure_step_exists(&self, step_name: &str) {
    if !self.steps.iter().any(|s| s.name == step_name) {
      panic!("Pipeline setup error: step '{}' is not declared.", step_name);
    }
  }

  /// Registers a handler for `step_name`. Handlers of one step run in registration order.
  pub fn on_step<F, HandlerErr>(
    &mut self,
    step_name: &str,
    handler_fn: impl Fn(ContextData<TData>) -> F + Send + Sync + 'static,
  ) where
    F: Future<Output = Result<StepControl, HandlerErr>> + Send + 'static,
    HandlerErr: Into<Err> + Send + Sync + 'static,
  {
    self.ensure_step_exists(step_name);
    let boxed: StepHandler<TData, Err> = Box::new(move |ctx_data| {
      let fut = handler_fn(ctx_data);
      Box::pin(async move { fut.await.map_err(Into::into) })
    });
    self.handlers.entry(step_name.to_string()).or_default().push(boxed);
  }
}
