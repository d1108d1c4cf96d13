//! Forecast stage trait and pipeline orchestration.

use thiserror::Error;
use tracing::{debug, warn};

use super::config::{ForecastConfig, ForecastContext};
use super::system::{FaultMfd, FaultSystem, Forecast};
use crate::error::{ConsistencyError, DomainError, ForecastError};
use crate::fault::SectionArena;
use crate::mfd::{moment_rate, MfdBuilder, MomentBudget};
use crate::rupture::{combine_into, GenerationReport, RuptureSet, RuptureSetGenerator};

/// Unique identifier for forecast stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StageId {
    /// Section arena and slip-derived moment budget.
    Moment,
    /// Moment-balanced MFD branches per fault.
    Mfd,
    /// Floating-window rupture generation.
    Ruptures,
    /// Mainshock-rate reduction.
    Aftershock,
}

impl StageId {
    /// Returns the name of the stage.
    pub fn name(&self) -> &'static str {
        match self {
            StageId::Moment => "moment",
            StageId::Mfd => "mfd",
            StageId::Ruptures => "ruptures",
            StageId::Aftershock => "aftershock",
        }
    }
}

/// Errors that can occur during pipeline execution.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PipelineError {
    #[error("Missing dependency: stage '{0}' requires '{1}'")]
    MissingDependency(String, String),
    #[error("Stage output '{0}' was never produced")]
    MissingArtifact(&'static str),
    #[error(transparent)]
    Consistency(#[from] ConsistencyError),
    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl From<ForecastError> for PipelineError {
    fn from(err: ForecastError) -> Self {
        match err {
            ForecastError::Consistency(e) => PipelineError::Consistency(e),
            ForecastError::Domain(e) => PipelineError::Domain(e),
        }
    }
}

/// Intermediate products of one fault system's run.
#[derive(Debug)]
pub struct ForecastState {
    pub system: FaultSystem,
    pub arena: Option<SectionArena>,
    pub budget: Option<MomentBudget>,
    pub mfds: Vec<FaultMfd>,
    pub ruptures: Option<RuptureSet>,
    pub report: GenerationReport,
    pub aftershock_filtered: bool,
}

impl ForecastState {
    pub fn new(system: FaultSystem) -> Self {
        Self {
            system,
            arena: None,
            budget: None,
            mfds: Vec::new(),
            ruptures: None,
            report: GenerationReport::default(),
            aftershock_filtered: false,
        }
    }

    fn arena(&self) -> Result<&SectionArena, PipelineError> {
        self.arena.as_ref().ok_or(PipelineError::MissingArtifact("arena"))
    }

    /// Final forecast; fails if the moment or rupture stage never ran.
    pub fn into_forecast(self) -> Result<Forecast, PipelineError> {
        let budget = self.budget.ok_or(PipelineError::MissingArtifact("moment budget"))?;
        let ruptures = self.ruptures.ok_or(PipelineError::MissingArtifact("ruptures"))?;
        Ok(Forecast {
            name: self.system.name,
            section_count: self.system.sections.len(),
            moment_rate: budget.total,
            faults: self.mfds,
            ruptures,
            report: self.report,
            aftershock_filtered: self.aftershock_filtered,
        })
    }
}

/// Trait for implementing forecast stages.
///
/// Each stage reads what earlier stages left in the [`ForecastState`] and
/// adds its own product. Stages hold no per-run data, so one pipeline can
/// serve many fault systems concurrently.
pub trait ForecastStage: Send + Sync {
    /// Returns the unique identifier for this stage.
    fn id(&self) -> StageId;

    /// Returns a human-readable name for the stage.
    fn name(&self) -> &str;

    /// Returns the stage IDs that must be executed before this stage.
    fn dependencies(&self) -> &[StageId] {
        &[]
    }

    /// Executes the stage, extending the state in place.
    fn execute(&self, state: &mut ForecastState, ctx: &ForecastContext) -> Result<(), PipelineError>;
}

/// Orchestrates forecast stages in order.
#[derive(Default)]
pub struct Pipeline {
    stages: Vec<Box<dyn ForecastStage>>,
}

impl Pipeline {
    /// Creates a new empty pipeline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Moment, MFD and rupture stages, plus aftershock filtering when enabled.
    pub fn standard(config: &ForecastConfig) -> Self {
        let mut pipeline = Self::new();
        pipeline.add_stage(MomentStage).add_stage(MfdStage).add_stage(RuptureStage);
        if config.apply_aftershock_filter {
            pipeline.add_stage(AftershockStage);
        }
        pipeline
    }

    /// Adds a stage to the pipeline.
    pub fn add_stage<S: ForecastStage + 'static>(&mut self, stage: S) -> &mut Self {
        self.stages.push(Box::new(stage));
        self
    }

    /// Returns the number of stages in the pipeline.
    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }

    /// Executes all stages in order.
    pub fn run(&self, state: &mut ForecastState, ctx: &ForecastContext) -> Result<(), PipelineError> {
        self.run_with_callbacks(state, ctx, |_, _, _| {}, |_, _, _| {})
    }

    /// Executes all stages with progress callbacks.
    ///
    /// # Arguments
    /// * `on_stage_start` - Called when each stage begins
    /// * `on_stage_complete` - Called when each stage finishes
    pub fn run_with_callbacks<F1, F2>(
        &self,
        state: &mut ForecastState,
        ctx: &ForecastContext,
        mut on_stage_start: F1,
        mut on_stage_complete: F2,
    ) -> Result<(), PipelineError>
    where
        F1: FnMut(&str, usize, usize),
        F2: FnMut(&str, usize, usize),
    {
        let total = self.stages.len();
        let mut completed: Vec<StageId> = Vec::new();

        for (i, stage) in self.stages.iter().enumerate() {
            on_stage_start(stage.name(), i, total);

            for dep in stage.dependencies() {
                if !completed.contains(dep) {
                    return Err(PipelineError::MissingDependency(
                        stage.name().to_string(),
                        dep.name().to_string(),
                    ));
                }
            }

            stage.execute(state, ctx)?;
            completed.push(stage.id());

            on_stage_complete(stage.name(), i, total);
        }

        Ok(())
    }
}

/// Builds the section arena and the per-section moment budget.
pub struct MomentStage;

impl ForecastStage for MomentStage {
    fn id(&self) -> StageId {
        StageId::Moment
    }

    fn name(&self) -> &str {
        "Moment Budget"
    }

    fn execute(&self, state: &mut ForecastState, _ctx: &ForecastContext) -> Result<(), PipelineError> {
        let arena = SectionArena::new(&state.system.sections)?;
        let budget = MomentBudget::from_arena(&arena);
        debug!(
            system = %state.system.name,
            sections = arena.len(),
            moment_rate = budget.total,
            "Computed moment budget"
        );
        state.arena = Some(arena);
        state.budget = Some(budget);
        Ok(())
    }
}

/// Builds one moment-balanced branch set per fault run.
pub struct MfdStage;

impl ForecastStage for MfdStage {
    fn id(&self) -> StageId {
        StageId::Mfd
    }

    fn name(&self) -> &str {
        "MFD Branches"
    }

    fn dependencies(&self) -> &[StageId] {
        &[StageId::Moment]
    }

    fn execute(&self, state: &mut ForecastState, ctx: &ForecastContext) -> Result<(), PipelineError> {
        let arena = state.arena()?;
        let builder = MfdBuilder::new(ctx.config.mfd.clone());

        let mut mfds = Vec::with_capacity(state.system.faults.len());
        for run in &state.system.faults {
            let surfaces = arena.surfaces_for(&run.sections)?;
            let area_km2: f64 = surfaces.iter().map(|s| s.area).sum();
            let fault_moment: f64 = surfaces.iter().map(|s| moment_rate(s.area, s.slip_rate)).sum();
            let branches = builder.build(fault_moment, area_km2)?;
            mfds.push(FaultMfd {
                fault: run.name.clone(),
                moment_rate: fault_moment,
                area_km2,
                branches,
            });
        }
        state.mfds = mfds;
        Ok(())
    }
}

/// Turns every fault's MFD branches into ruptures and merges the results.
pub struct RuptureStage;

impl ForecastStage for RuptureStage {
    fn id(&self) -> StageId {
        StageId::Ruptures
    }

    fn name(&self) -> &str {
        "Rupture Generation"
    }

    fn dependencies(&self) -> &[StageId] {
        &[StageId::Moment, StageId::Mfd]
    }

    fn execute(&self, state: &mut ForecastState, ctx: &ForecastContext) -> Result<(), PipelineError> {
        let arena = state.arena()?;
        let mut ruptures = RuptureSet::new();
        let mut report = GenerationReport::default();

        for (run, mfd) in state.system.faults.iter().zip(&state.mfds) {
            let generator = RuptureSetGenerator::new(
                arena,
                run.sections.clone(),
                ctx.config.sections.target_section_length_km,
                &ctx.config.mag_length,
            );
            let (set, run_report) = generator.generate_all(&mfd.branches)?;
            if !run_report.skipped_bins.is_empty() {
                warn!(
                    fault = %run.name,
                    bins = run_report.skipped_bins.len(),
                    rate = run_report.skipped_rate,
                    "Magnitude bins dropped for lack of sections"
                );
            }
            combine_into(&mut ruptures, set);
            report.merge(run_report);
        }

        state.ruptures = Some(ruptures);
        state.report = report;
        Ok(())
    }
}

/// Scales fault rupture rates to their mainshock share.
pub struct AftershockStage;

impl ForecastStage for AftershockStage {
    fn id(&self) -> StageId {
        StageId::Aftershock
    }

    fn name(&self) -> &str {
        "Aftershock Filter"
    }

    fn dependencies(&self) -> &[StageId] {
        &[StageId::Ruptures]
    }

    fn execute(&self, state: &mut ForecastState, ctx: &ForecastContext) -> Result<(), PipelineError> {
        let ruptures = state
            .ruptures
            .as_mut()
            .ok_or(PipelineError::MissingArtifact("ruptures"))?;
        for rupture in ruptures.ruptures_mut() {
            rupture.rate = ctx.aftershock.scale_fault_rate(rupture.magnitude, rupture.rate);
        }
        state.aftershock_filtered = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fault::SectionConfig;
    use crate::geometry::{Location, Trace};
    use crate::pipeline::FaultSystemSpec;

    fn demo_state(length_km: f64) -> ForecastState {
        let spec = FaultSystemSpec::demo(length_km, 20.0, &SectionConfig::default()).unwrap();
        ForecastState::new(spec.to_fault_system(&SectionConfig::default()).unwrap())
    }

    fn context(config: ForecastConfig) -> ForecastContext {
        ForecastContext::new(config).unwrap()
    }

    #[test]
    fn test_standard_stage_count() {
        assert_eq!(Pipeline::standard(&ForecastConfig::default()).stage_count(), 4);
        assert_eq!(Pipeline::standard(&ForecastConfig::unfiltered()).stage_count(), 3);
    }

    #[test]
    fn test_pipeline_execution() {
        let ctx = context(ForecastConfig::unfiltered());
        let mut state = demo_state(100.0);
        Pipeline::standard(&ctx.config).run(&mut state, &ctx).unwrap();

        let forecast = state.into_forecast().unwrap();
        assert_eq!(forecast.section_count, 20);
        assert!(forecast.moment_rate > 0.0);
        assert!(!forecast.ruptures.is_empty());
        assert!(!forecast.aftershock_filtered);
        let mfd = &forecast.faults[0];
        assert!((mfd.branch_moment_rate() - mfd.moment_rate).abs() / mfd.moment_rate < 1e-6);
    }

    #[test]
    fn test_two_faults_split_budget_and_keep_ruptures_apart() {
        let mut spec = FaultSystemSpec::demo(60.0, 20.0, &SectionConfig::default()).unwrap();
        let mut second = spec.faults[0].clone();
        second.name = "Second Fault".to_string();
        let shifted: Vec<Location> = second.trace.points().iter().map(|p| p.destination(90.0, 50.0)).collect();
        second.trace = Trace::new(shifted).unwrap();
        spec.faults.push(second);

        let ctx = context(ForecastConfig::unfiltered());
        let mut state = ForecastState::new(spec.to_fault_system(&ctx.config.sections).unwrap());
        Pipeline::standard(&ctx.config).run(&mut state, &ctx).unwrap();
        let forecast = state.into_forecast().unwrap();

        assert_eq!(forecast.faults.len(), 2);
        let per_fault: f64 = forecast.faults.iter().map(|f| f.moment_rate).sum();
        assert!((per_fault - forecast.moment_rate).abs() / forecast.moment_rate < 1e-9);
        // Disjoint faults never share a rupture signature.
        assert_eq!(forecast.ruptures.len(), forecast.report.ruptures);
    }

    #[test]
    fn test_aftershock_stage_scales_rates() {
        let mut raw = demo_state(60.0);
        let ctx = context(ForecastConfig::unfiltered());
        Pipeline::standard(&ctx.config).run(&mut raw, &ctx).unwrap();
        let raw_rate = raw.ruptures.as_ref().unwrap().total_rate();

        let mut filtered = demo_state(60.0);
        let ctx = context(ForecastConfig::default());
        Pipeline::standard(&ctx.config).run(&mut filtered, &ctx).unwrap();
        let forecast = filtered.into_forecast().unwrap();

        assert!(forecast.aftershock_filtered);
        assert!((forecast.ruptures.total_rate() - 0.97 * raw_rate).abs() < 1e-12 * raw_rate.max(1.0));
    }

    #[test]
    fn test_missing_dependency() {
        let ctx = context(ForecastConfig::default());
        let mut pipeline = Pipeline::new();
        pipeline.add_stage(RuptureStage);
        let err = pipeline.run(&mut demo_state(20.0), &ctx).unwrap_err();
        assert_eq!(
            err,
            PipelineError::MissingDependency("Rupture Generation".to_string(), "moment".to_string())
        );
    }

    #[test]
    fn test_incomplete_state_has_no_forecast() {
        let ctx = context(ForecastConfig::default());
        let mut pipeline = Pipeline::new();
        pipeline.add_stage(MomentStage);
        let mut state = demo_state(20.0);
        pipeline.run(&mut state, &ctx).unwrap();
        assert_eq!(
            state.into_forecast().unwrap_err(),
            PipelineError::MissingArtifact("ruptures")
        );
    }

    #[test]
    fn test_pipeline_with_callbacks() {
        let ctx = context(ForecastConfig::default());
        let mut started = Vec::new();
        let mut completed = 0;
        Pipeline::standard(&ctx.config)
            .run_with_callbacks(
                &mut demo_state(60.0),
                &ctx,
                |name, _, _| started.push(name.to_string()),
                |_, _, _| completed += 1,
            )
            .unwrap();
        assert_eq!(started.first().map(String::as_str), Some("Moment Budget"));
        assert_eq!(completed, 4);
    }

    #[test]
    fn test_consistency_error_aborts_system() {
        let ctx = context(ForecastConfig::default());
        let mut state = demo_state(20.0);
        state.system.faults[0].sections.push(99);
        let err = Pipeline::standard(&ctx.config).run(&mut state, &ctx).unwrap_err();
        assert_eq!(err, PipelineError::Consistency(ConsistencyError::UnknownSection(99)));
    }
}
