//! Configuration for aftershock rate filtering.

use serde::{Deserialize, Serialize};

/// Reference curves behind the mainshock-fraction filter.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AftershockConfig {
    /// First magnitude of the discretized curve.
    pub min_mag: f64,
    /// Last magnitude of the discretized curve.
    pub max_mag: f64,
    pub delta_mag: f64,
    /// b-value of the full catalog (mainshocks and aftershocks).
    pub all_events_b: f64,
    /// b-value of the declustered, mainshock-only catalog.
    pub mainshock_b: f64,
    /// Magnitude above which the empirical ratio is matched.
    pub reference_mag: f64,
    /// Mainshock share of all events above `reference_mag`.
    pub mainshock_ratio: f64,
    /// Constant mainshock share applied to supra-seismogenic fault ruptures.
    pub fault_factor: f64,
}

impl Default for AftershockConfig {
    fn default() -> Self {
        Self {
            min_mag: 2.5,
            max_mag: 9.0,
            delta_mag: 0.1,
            all_events_b: 1.0,
            mainshock_b: 0.8,
            reference_mag: 5.0,
            mainshock_ratio: 0.556,
            fault_factor: 0.97,
        }
    }
}
