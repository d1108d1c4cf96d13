//! Configuration for magnitude-frequency branch construction.

use serde::{Deserialize, Serialize};

use super::scaling::MagAreaModel;

/// An epistemic alternative: a magnitude offset and its confidence weight.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EpistemicBranch {
    pub offset: f64,
    pub weight: f64,
}

impl EpistemicBranch {
    pub const fn new(offset: f64, weight: f64) -> Self {
        Self { offset, weight }
    }
}

/// An aleatory magnitude-scatter option for characteristic events.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AleatoryBranch {
    /// Standard deviation in magnitude units; 0 gives a single bin.
    pub sigma: f64,
    /// Half-width of the distribution in sigmas.
    pub truncation: f64,
    /// Number of magnitude bins across the full width.
    pub bins: usize,
    pub weight: f64,
}

impl Default for AleatoryBranch {
    fn default() -> Self {
        Self {
            sigma: 0.12,
            truncation: 2.0,
            bins: 9,
            weight: 1.0,
        }
    }
}

/// Truncated Gutenberg-Richter family.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GutenbergRichterConfig {
    pub m_min: f64,
    /// Upper magnitude before epistemic offsets; `None` uses the
    /// magnitude-area estimate for the whole fault system.
    pub m_max: Option<f64>,
    pub d_mag: f64,
    pub b_value: f64,
    pub m_max_branches: Vec<EpistemicBranch>,
}

impl Default for GutenbergRichterConfig {
    fn default() -> Self {
        Self {
            m_min: 6.5,
            m_max: None,
            d_mag: 0.1,
            b_value: 0.8,
            m_max_branches: vec![
                EpistemicBranch::new(-0.2, 0.2),
                EpistemicBranch::new(0.0, 0.6),
                EpistemicBranch::new(0.2, 0.2),
            ],
        }
    }
}

/// Characteristic (Gaussian) family.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CharacteristicConfig {
    /// Central magnitude before offsets; `None` uses the magnitude-area estimate.
    pub ref_mag: Option<f64>,
    pub mag_branches: Vec<EpistemicBranch>,
    pub aleatory: Vec<AleatoryBranch>,
}

impl Default for CharacteristicConfig {
    fn default() -> Self {
        Self {
            ref_mag: None,
            mag_branches: vec![
                EpistemicBranch::new(-0.2, 0.2),
                EpistemicBranch::new(0.0, 0.6),
                EpistemicBranch::new(0.2, 0.2),
            ],
            aleatory: vec![AleatoryBranch::default()],
        }
    }
}

/// Branch tree for one fault system.
///
/// The characteristic family receives `characteristic_fraction` of the
/// moment budget and Gutenberg-Richter the rest. A missing family hands its
/// share to the other.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MfdConfig {
    pub gutenberg_richter: Option<GutenbergRichterConfig>,
    pub characteristic: Option<CharacteristicConfig>,
    pub characteristic_fraction: f64,
    /// Used when `m_max` or `ref_mag` are not given.
    pub mag_area: MagAreaModel,
    /// Tolerance when checking that weights sum to 1.
    pub weight_tolerance: f64,
}

impl Default for MfdConfig {
    fn default() -> Self {
        Self {
            gutenberg_richter: Some(GutenbergRichterConfig::default()),
            characteristic: Some(CharacteristicConfig::default()),
            characteristic_fraction: 0.67,
            mag_area: MagAreaModel::default(),
            weight_tolerance: 1e-4,
        }
    }
}

impl MfdConfig {
    /// Mixed characteristic / GR tree with UCERF2-style weights.
    pub fn ucerf_like() -> Self {
        Self::default()
    }

    /// Gutenberg-Richter only, with explicit magnitude bounds and mMax branches.
    pub fn gr_only(m_min: f64, m_max: f64, m_max_branches: Vec<EpistemicBranch>) -> Self {
        Self {
            gutenberg_richter: Some(GutenbergRichterConfig {
                m_min,
                m_max: Some(m_max),
                m_max_branches,
                ..Default::default()
            }),
            characteristic: None,
            characteristic_fraction: 0.0,
            ..Default::default()
        }
    }

    /// Characteristic only, centred on `ref_mag`.
    pub fn characteristic_only(ref_mag: f64) -> Self {
        Self {
            gutenberg_richter: None,
            characteristic: Some(CharacteristicConfig {
                ref_mag: Some(ref_mag),
                ..Default::default()
            }),
            characteristic_fraction: 1.0,
            ..Default::default()
        }
    }
}
