// core/src/pipeline/execution.rs

//! `Pipeline::run`.

use super::context_data::ContextData;
use super::control::{PipelineResult, StepControl};
use super::definition::Pipeline;
use super::PipelineError;
use tracing::{event, instrument, Instrument, Level};

impl<TData, Err> Pipeline<TData, Err>
where
  TData: 'static + Send + Sync,
  Err: std::error::Error + From<PipelineError> + Send + Sync + 'static,
{
  /// Runs every declared step in order against `ctx_data`.
  #[instrument(
    name = "Pipeline::run",
    skip_all,
    fields(context_type = %std::any::type_name::<TData>(), num_steps = self.steps.len()),
    err(Display)
  )]
  pub async fn run(&self, ctx_data: ContextData<TData>) -> Result<PipelineResult, Err> {
    for (step_idx, step_def) in self.steps.iter().enumerate() {
      let step_span = tracing::info_span!(
        "pipeline_step",
        step_name = step_def.name.as_str(),
        step_index = step_idx,
        optional = step_def.optional
      );

      let handlers = match self.handlers.get(&step_def.name) {
        Some(handlers) if !handlers.is_empty() => handlers,
        _ if step_def.optional => {
          event!(parent: &step_span, Level::DEBUG, "Optional step has no handlers, skipping.");
          continue;
        }
        _ => {
          event!(parent: &step_span, Level::ERROR, "Non-optional step has no handlers.");
          return Err(Err::from(PipelineError::HandlerMissing {
            step_name: step_def.name.clone(),
          }));
        }
      };

      for handler_fn in handlers {
        match handler_fn(ctx_data.clone()).instrument(step_span.clone()).await {
          Ok(StepControl::Continue) => {}
          Ok(StepControl::Stop) => {
            event!(parent: &step_span, Level::INFO, "Pipeline stopped by handler.");
            return Ok(PipelineResult::Stopped);
          }
          Err(e) => {
            event!(parent: &step_span, Level::WARN, error = %e, "Step handler failed.");
            return Err(e);
          }
        }
      }
    }

    event!(Level::DEBUG, "Pipeline completed.");
    Ok(PipelineResult::Completed)
  }
}
