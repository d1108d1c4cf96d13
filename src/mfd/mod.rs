//! Magnitude-frequency distributions and moment budgets.
//!
//! This module implements the moment-balanced MFD branch tree:
//! - Slip-derived moment budgets for a set of sections
//! - Truncated Gutenberg-Richter and characteristic Gaussian distributions
//! - Epistemic (magnitude offset) and aleatory (magnitude scatter) branches
//! - Magnitude scaling relations for rupture length and area

mod config;
mod builder;
pub mod branch;
pub mod distributions;
pub mod magnitude;
pub mod moment;
pub mod scaling;

pub use config::{AleatoryBranch, CharacteristicConfig, EpistemicBranch, GutenbergRichterConfig, MfdConfig};
pub use builder::{MfdBuilder, characteristic_branches, gutenberg_richter_branches};
pub use branch::{BranchKey, MfdBranch, Milli};
pub use distributions::{gaussian, gutenberg_richter};
pub use magnitude::{SHEAR_MODULUS, magnitude_bins, magnitude_from_moment, moment_from_magnitude, total_moment_rate};
pub use moment::{MomentBudget, moment_rate};
pub use scaling::{
    EllsworthB, HanksBakun2002, MagAreaModel, MagAreaRelation,
    MagLengthModel, MagLengthRelation, WellsCoppersmith1994,
};
