//! Configuration for fault subsectioning.

use serde::{Deserialize, Serialize};

/// Parameters controlling how parent faults are cut into sections.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SectionConfig {
    /// Target section length in km; actual lengths are `length / round(length / target)`.
    pub target_section_length_km: f64,
    /// Decimal places kept for interpolated slip rates.
    pub slip_rate_decimals: u32,
}

impl Default for SectionConfig {
    fn default() -> Self {
        Self {
            target_section_length_km: 5.0,
            slip_rate_decimals: 4,
        }
    }
}

impl SectionConfig {
    /// Coarse sections for quick exploratory runs.
    pub fn coarse() -> Self {
        Self {
            target_section_length_km: 10.0,
            ..Default::default()
        }
    }

    /// Fine sections for detailed multi-fault systems.
    pub fn fine() -> Self {
        Self {
            target_section_length_km: 2.5,
            ..Default::default()
        }
    }
}
