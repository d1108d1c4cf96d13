//! Pipeline module for orchestrating forecast synthesis stages.
//!
//! Provides a trait-based architecture for modular stages that turn a
//! sectioned fault system into MFD branches and rupture rates, and batch
//! helpers that run many systems in parallel.

mod batch;
mod config;
mod stage;
mod system;

pub use batch::{synthesize, synthesize_batch};
pub use config::{ForecastConfig, ForecastContext};
pub use stage::{
    AftershockStage, ForecastStage, ForecastState, MfdStage, MomentStage,
    Pipeline, PipelineError, RuptureStage, StageId,
};
pub use system::{BatchSpec, FaultMfd, FaultRun, FaultSystem, FaultSystemSpec, Forecast};
