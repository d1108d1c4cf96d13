//! Whole-system synthesis, one system at a time or many in parallel.

use rayon::prelude::*;
use tracing::{debug, info, warn};

use super::config::ForecastContext;
use super::stage::{ForecastState, Pipeline, PipelineError};
use super::system::{FaultSystem, FaultSystemSpec, Forecast};

/// Runs the standard pipeline on one sectioned fault system.
pub fn synthesize(system: FaultSystem, ctx: &ForecastContext) -> Result<Forecast, PipelineError> {
    let pipeline = Pipeline::standard(&ctx.config);
    let name = system.name.clone();
    let mut state = ForecastState::new(system);

    pipeline.run_with_callbacks(
        &mut state,
        ctx,
        |stage, i, total| debug!(system = %name, stage, step = i + 1, total, "Stage started"),
        |_, _, _| {},
    )?;

    let forecast = state.into_forecast()?;
    info!(
        system = %forecast.name,
        sections = forecast.section_count,
        branches = forecast.branch_count(),
        ruptures = forecast.ruptures.len(),
        moment_rate = forecast.moment_rate,
        "Synthesized forecast"
    );
    Ok(forecast)
}

/// Sections and synthesizes every system on the rayon pool.
///
/// Systems share nothing but the read-only context. A failure only discards
/// its own system; results keep input order.
pub fn synthesize_batch(specs: &[FaultSystemSpec], ctx: &ForecastContext) -> Vec<Result<Forecast, PipelineError>> {
    info!(systems = specs.len(), "Starting batch synthesis");
    specs
        .par_iter()
        .map(|spec| {
            let result = spec
                .to_fault_system(&ctx.config.sections)
                .map_err(PipelineError::from)
                .and_then(|system| synthesize(system, ctx));
            if let Err(err) = &result {
                warn!(system = %spec.name, error = %err, "Fault system failed");
            }
            result
        })
        .collect()
}
