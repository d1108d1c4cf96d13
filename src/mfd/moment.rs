//! Slip-derived seismic moment budgets.

use serde::Serialize;

use super::magnitude::SHEAR_MODULUS;
use crate::fault::{SectionArena, SectionGeometry, SectionSurface};

/// Moment rate in N·m/yr of a surface of `area_km2` slipping at `slip_rate_mm_yr`.
pub fn moment_rate(area_km2: f64, slip_rate_mm_yr: f64) -> f64 {
    SHEAR_MODULUS * (area_km2 * 1e6) * (slip_rate_mm_yr * 1e-3)
}

/// Moment rate a fault system must release, per section and in total.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MomentBudget {
    /// `(section index, N·m/yr)` in input order.
    pub per_section: Vec<(usize, f64)>,
    /// Sum over sections, N·m/yr.
    pub total: f64,
}

impl MomentBudget {
    /// Budget from raw section records, using the aseismic-reduced area.
    pub fn from_sections(sections: &[SectionGeometry]) -> Self {
        Self::collect(
            sections
                .iter()
                .map(|s| (s.index, moment_rate(s.reduced_area(), s.slip_rate))),
        )
    }

    /// Budget from precomputed surfaces.
    pub fn from_arena(arena: &SectionArena) -> Self {
        Self::collect(arena.iter().map(|s: &SectionSurface| (s.index, moment_rate(s.area, s.slip_rate))))
    }

    fn collect(per_section: impl Iterator<Item = (usize, f64)>) -> Self {
        let per_section: Vec<(usize, f64)> = per_section.collect();
        let total = per_section.iter().map(|&(_, m)| m).sum();
        Self { per_section, total }
    }
}
