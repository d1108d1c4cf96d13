//! Ruptures and rupture-rate sets.
//!
//! Ruptures come either from the floating-window generator, which turns an
//! MFD branch into rates on contiguous section runs, or from externally
//! inverted parallel arrays. Sets from different sources merge by section
//! signature, and rates can be reduced to their mainshock share.

mod config;
mod set;
mod types;
pub mod aftershock;
pub mod combiner;
pub mod generator;

pub use config::AftershockConfig;
pub use set::{BranchRuptures, RuptureSet};
pub use types::Rupture;
pub use aftershock::AftershockRateFilter;
pub use combiner::{CombinedRuptures, combine, combine_into, combine_ruptures};
pub use generator::{GenerationReport, RuptureSetGenerator};
