//! Fault sections and their rupture surfaces.
//!
//! This module covers everything between a digitized fault trace and the
//! aggregate geometry of a multi-section rupture:
//! - Subsectioning parent faults into equal-length sections
//! - Slip-rate interpolation between sparse anchor sections
//! - Per-section surfaces held in an index-addressed arena
//! - Composite surfaces with orientation reconciliation

mod config;
mod section;
mod sections;
pub mod composite;
pub mod slip;
pub mod surface;

pub use config::SectionConfig;
pub use section::SectionGeometry;
pub use sections::{ParentFault, SlipAnchor, build_sections};
pub use composite::{CompositeSurface, CompositeSurfaceBuilder, composite_surface, resolve_orientation};
pub use slip::SlipRateInterpolator;
pub use surface::{SectionArena, SectionSurface};
