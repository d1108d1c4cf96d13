//! Removal of the aftershock contribution from raw occurrence rates.
//!
//! Two Gutenberg-Richter curves are compared on a fixed magnitude grid: one
//! for all events and one for mainshocks only, the latter scaled so that
//! above the reference magnitude it holds the empirical mainshock share of
//! the full curve. Their ratio, capped at 1, is the magnitude-dependent
//! fraction of a gridded rate that survives filtering. Fault ruptures get a
//! flat factor instead.
//!
//! The filter is built once and shared read-only; it holds no interior
//! mutability and is `Sync`.

use crate::error::{ensure_positive, DomainError};

use super::config::AftershockConfig;

/// Precomputed mainshock fractions on a magnitude grid.
#[derive(Debug, Clone, PartialEq)]
pub struct AftershockRateFilter {
    min_mag: f64,
    delta_mag: f64,
    fractions: Vec<f64>,
    fault_factor: f64,
}

impl AftershockRateFilter {
    pub fn new(config: &AftershockConfig) -> Result<Self, DomainError> {
        let delta = ensure_positive("aftershock magnitude step", config.delta_mag)?;
        if !(config.max_mag > config.min_mag) {
            return Err(DomainError::InvalidMagnitudeRange {
                m_min: config.min_mag,
                m_max: config.max_mag,
            });
        }
        if !(0.0..=1.0).contains(&config.mainshock_ratio) {
            return Err(DomainError::InvalidWeight(config.mainshock_ratio));
        }
        if !(0.0..=1.0).contains(&config.fault_factor) {
            return Err(DomainError::InvalidWeight(config.fault_factor));
        }
        if !(config.reference_mag >= config.min_mag && config.reference_mag <= config.max_mag) {
            return Err(DomainError::MagnitudeOutOfRange {
                magnitude: config.reference_mag,
                min: config.min_mag,
                max: config.max_mag,
            });
        }

        let count = ((config.max_mag - config.min_mag) / delta).round() as usize + 1;
        let mags: Vec<f64> = (0..count).map(|i| config.min_mag + i as f64 * delta).collect();
        let all: Vec<f64> = mags.iter().map(|m| 10f64.powf(-config.all_events_b * m)).collect();
        let main: Vec<f64> = mags.iter().map(|m| 10f64.powf(-config.mainshock_b * m)).collect();

        let above = |curve: &[f64]| -> f64 {
            mags.iter()
                .zip(curve)
                .filter(|&(&m, _)| m >= config.reference_mag - 1e-9)
                .map(|(_, &r)| r)
                .sum()
        };
        let scale = config.mainshock_ratio * above(&all) / above(&main);

        let fractions = all
            .iter()
            .zip(&main)
            .map(|(&a, &m)| (scale * m / a).min(1.0))
            .collect();

        Ok(Self {
            min_mag: config.min_mag,
            delta_mag: delta,
            fractions,
            fault_factor: config.fault_factor,
        })
    }

    /// `(first, last)` magnitude of the grid.
    pub fn magnitude_range(&self) -> (f64, f64) {
        let last = self.min_mag + (self.fractions.len() - 1) as f64 * self.delta_mag;
        (self.min_mag, last)
    }

    /// Mainshock fraction at the grid magnitude nearest to `mag`.
    ///
    /// Magnitudes more than half a step outside the grid are rejected.
    pub fn mainshock_fraction(&self, mag: f64) -> Result<f64, DomainError> {
        let (min, max) = self.magnitude_range();
        let half = 0.5 * self.delta_mag + 1e-9;
        if !(mag >= min - half && mag <= max + half) {
            return Err(DomainError::MagnitudeOutOfRange { magnitude: mag, min, max });
        }
        let i = ((mag - self.min_mag) / self.delta_mag).round().max(0.0) as usize;
        Ok(self.fractions[i.min(self.fractions.len() - 1)])
    }

    /// Mainshock-only rate for a gridded (point-source) rupture.
    pub fn scale_grid_rate(&self, mag: f64, rate: f64) -> Result<f64, DomainError> {
        Ok(rate * self.mainshock_fraction(mag)?)
    }

    /// Mainshock-only rate for a fault rupture; independent of magnitude.
    pub fn scale_fault_rate(&self, _mag: f64, rate: f64) -> f64 {
        rate * self.fault_factor
    }

    pub fn fault_factor(&self) -> f64 {
        self.fault_factor
    }
}
