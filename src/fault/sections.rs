//! Subsectioning of parent faults into indexed sections.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::config::SectionConfig;
use super::section::SectionGeometry;
use super::slip::SlipRateInterpolator;
use crate::error::{ensure_positive, ForecastError};
use crate::geometry::Trace;

/// Slip rate measured at one section position along a parent fault.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SlipAnchor {
    /// Position along strike, 0 = first section.
    pub section: usize,
    /// Slip rate in mm/yr.
    pub rate: f64,
}

/// A named fault before it is cut into sections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParentFault {
    pub name: String,
    pub trace: Trace,
    pub dip: f64,
    /// Overrides the right-hand-rule dip direction when present.
    #[serde(default)]
    pub dip_direction: Option<f64>,
    pub top_depth: f64,
    pub lower_depth: f64,
    #[serde(default)]
    pub aseismic_slip_factor: f64,
    #[serde(default)]
    pub rake: f64,
    /// Must include the first and last section.
    pub slip_anchors: Vec<SlipAnchor>,
}

impl ParentFault {
    /// Anchors keyed by section position. Later duplicates win.
    pub fn anchor_map(&self) -> BTreeMap<usize, f64> {
        self.slip_anchors.iter().map(|a| (a.section, a.rate)).collect()
    }
}

/// Cuts `parent` into equal-length sections numbered from `first_index`.
///
/// Sections are named `"<parent>, Subsection k"` and carry interpolated slip
/// rates; a slip-rate count mismatch aborts with a consistency error.
pub fn build_sections(
    parent: &ParentFault,
    config: &SectionConfig,
    first_index: usize,
) -> Result<Vec<SectionGeometry>, ForecastError> {
    let target = ensure_positive("target section length", config.target_section_length_km)?;
    let pieces = parent.trace.partition(target);
    let slip_rates = SlipRateInterpolator::new(config.slip_rate_decimals)
        .interpolate(pieces.len(), &parent.anchor_map())?;

    debug!(
        fault = %parent.name,
        sections = pieces.len(),
        length_km = parent.trace.length(),
        "Subsectioned parent fault"
    );

    pieces
        .into_iter()
        .zip(slip_rates)
        .enumerate()
        .map(|(k, (trace, slip_rate))| {
            let mut section = SectionGeometry::new(
                first_index + k,
                format!("{}, Subsection {}", parent.name, k),
                trace,
                parent.dip,
                parent.top_depth,
                parent.lower_depth,
            )?
            .with_slip_rate(slip_rate)
            .with_rake(parent.rake)
            .with_aseismic_slip_factor(parent.aseismic_slip_factor);
            if let Some(dir) = parent.dip_direction {
                section.dip_direction = dir;
            }
            section.validate()?;
            Ok(section)
        })
        .collect()
}
