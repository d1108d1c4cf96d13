//! Weighted MFD branches and their structural keys.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::magnitude::{moment_from_magnitude, total_moment_rate};

/// A magnitude-like parameter stored in thousandths.
///
/// Keys built from the same configuration compare equal regardless of how
/// the floating-point inputs were produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Milli(pub i32);

impl Milli {
    pub fn from_f64(value: f64) -> Self {
        Milli((value * 1000.0).round() as i32)
    }

    pub fn value(self) -> f64 {
        self.0 as f64 / 1000.0
    }
}

/// Identity of an MFD branch, used to match rupture sets across runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BranchKey {
    /// Truncated GR with `m_max` shifted by an epistemic offset.
    GutenbergRichter { m_max_offset: Milli, b_value: Milli },
    /// Characteristic Gaussian shifted by an epistemic offset, with the
    /// aleatory sigma, truncation (in sigmas) and bin count.
    Characteristic {
        mag_offset: Milli,
        sigma: Milli,
        truncation: Milli,
        bins: u32,
    },
}

impl BranchKey {
    pub fn gutenberg_richter(m_max_offset: f64, b_value: f64) -> Self {
        BranchKey::GutenbergRichter {
            m_max_offset: Milli::from_f64(m_max_offset),
            b_value: Milli::from_f64(b_value),
        }
    }

    pub fn characteristic(mag_offset: f64, sigma: f64, truncation: f64, bins: usize) -> Self {
        BranchKey::Characteristic {
            mag_offset: Milli::from_f64(mag_offset),
            sigma: Milli::from_f64(sigma),
            truncation: Milli::from_f64(truncation),
            bins: u32::try_from(bins).unwrap_or(u32::MAX),
        }
    }
}

impl fmt::Display for BranchKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BranchKey::GutenbergRichter { m_max_offset, b_value } => write!(
                f,
                "GR mMax{:+.2} b={:.2}",
                m_max_offset.value(),
                b_value.value()
            ),
            BranchKey::Characteristic {
                mag_offset,
                sigma,
                truncation,
                bins,
            } => write!(
                f,
                "Char M{:+.2} sigma={:.2} trunc={:.1} n={}",
                mag_offset.value(),
                sigma.value(),
                truncation.value(),
                bins
            ),
        }
    }
}

/// One weighted magnitude-frequency distribution.
///
/// Rates include the branch weight, so summing rates over branches gives the
/// forecast. The conditional moment rate (weight removed) is what each
/// branch would release on its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MfdBranch {
    pub key: BranchKey,
    pub weight: f64,
    pub magnitudes: Vec<f64>,
    pub rates: Vec<f64>,
}

impl MfdBranch {
    /// Human-readable label derived from the key.
    pub fn label(&self) -> String {
        self.key.to_string()
    }

    /// `(magnitude, rate)` pairs in ascending magnitude.
    pub fn bins(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.magnitudes.iter().copied().zip(self.rates.iter().copied())
    }

    pub fn total_rate(&self) -> f64 {
        self.rates.iter().sum()
    }

    /// Rate of events with magnitude `>= mag`.
    pub fn cumulative_rate(&self, mag: f64) -> f64 {
        self.bins()
            .filter(|&(m, _)| m >= mag - 1e-9)
            .map(|(_, r)| r)
            .sum()
    }

    /// Weighted moment rate contributed to the forecast, N·m/yr.
    pub fn moment_rate(&self) -> f64 {
        total_moment_rate(&self.magnitudes, &self.rates)
    }

    /// Moment rate the branch releases when taken alone.
    pub fn conditional_moment_rate(&self) -> f64 {
        if self.weight > 0.0 {
            self.moment_rate() / self.weight
        } else {
            0.0
        }
    }

    pub fn max_magnitude(&self) -> Option<f64> {
        self.magnitudes.last().copied()
    }

    /// Rate-weighted mean moment per event, N·m.
    pub fn mean_moment(&self) -> f64 {
        let total = self.total_rate();
        if total > 0.0 {
            self.bins().map(|(m, r)| r * moment_from_magnitude(m)).sum::<f64>() / total
        } else {
            0.0
        }
    }
}
