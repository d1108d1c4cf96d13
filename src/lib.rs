//! Earthquake rupture forecast synthesis for fault systems.
//!
//! This crate turns partitioned fault-section geometry and along-strike slip
//! rates into ruptures whose total moment release matches the slip-derived
//! budget, across epistemic and aleatory magnitude-frequency branches.

pub mod error;
pub mod geometry;
pub mod fault;
pub mod mfd;
pub mod rupture;
pub mod pipeline;

pub use error::{ConsistencyError, DomainError, ForecastError};
pub use geometry::{Location, Trace};
pub use fault::{CompositeSurface, CompositeSurfaceBuilder, SectionArena, SectionConfig, SectionGeometry, SlipRateInterpolator};
pub use mfd::{BranchKey, MfdBranch, MfdBuilder, MfdConfig, MomentBudget};
pub use rupture::{AftershockRateFilter, Rupture, RuptureSet, RuptureSetGenerator, combine};
pub use pipeline::{ForecastConfig, ForecastContext, Pipeline, synthesize, synthesize_batch};
