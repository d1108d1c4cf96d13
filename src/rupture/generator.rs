//! Floating-window rupture generation from an MFD.
//!
//! For each magnitude bin the rupture length from the scaling relation fixes
//! how many adjacent sections a rupture spans. Every window of that many
//! sections along strike becomes one rupture, and the bin rate is shared
//! between windows in proportion to their mean slip rate.

use std::collections::HashMap;

use serde::Serialize;
use tracing::{debug, warn};

use super::set::RuptureSet;
use super::types::Rupture;
use crate::error::ConsistencyError;
use crate::fault::{CompositeSurface, CompositeSurfaceBuilder, SectionArena};
use crate::mfd::{MagLengthRelation, MfdBranch};

/// Counters describing one generation run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GenerationReport {
    /// Ruptures emitted.
    pub ruptures: usize,
    /// Magnitudes of bins whose rupture length exceeded the fault.
    pub skipped_bins: Vec<f64>,
    /// Rate carried by skipped bins.
    pub skipped_rate: f64,
}

impl GenerationReport {
    pub fn merge(&mut self, other: GenerationReport) {
        self.ruptures += other.ruptures;
        self.skipped_bins.extend(other.skipped_bins);
        self.skipped_rate += other.skipped_rate;
    }
}

/// Generates ruptures on an ordered run of sections.
pub struct RuptureSetGenerator<'a> {
    arena: &'a SectionArena,
    order: Vec<usize>,
    target_section_length: f64,
    length_relation: &'a dyn MagLengthRelation,
}

impl<'a> RuptureSetGenerator<'a> {
    /// `order` lists section indices along strike; windows slide over it.
    pub fn new(
        arena: &'a SectionArena,
        order: Vec<usize>,
        target_section_length: f64,
        length_relation: &'a dyn MagLengthRelation,
    ) -> Self {
        Self {
            arena,
            order,
            target_section_length,
            length_relation,
        }
    }

    pub fn section_count(&self) -> usize {
        self.order.len()
    }

    /// `round(length(mag) / target section length)`, at least one.
    pub fn sections_per_rupture(&self, mag: f64) -> usize {
        let n = (self.length_relation.length_km(mag) / self.target_section_length).round();
        if n.is_finite() && n >= 1.0 {
            n as usize
        } else {
            1
        }
    }

    /// Ruptures for `(magnitude, rate)` bins.
    pub fn generate(&self, bins: &[(f64, f64)]) -> Result<(Vec<Rupture>, GenerationReport), ConsistencyError> {
        let mut cache = HashMap::new();
        self.generate_cached(bins, &mut cache)
    }

    /// Ruptures for one MFD branch.
    pub fn generate_branch(&self, branch: &MfdBranch) -> Result<(Vec<Rupture>, GenerationReport), ConsistencyError> {
        let bins: Vec<(f64, f64)> = branch.bins().collect();
        self.generate(&bins)
    }

    /// Ruptures for every branch, grouped by branch key.
    ///
    /// Composite surfaces are shared across branches: each window is
    /// aggregated once no matter how many bins reuse it.
    pub fn generate_all(&self, branches: &[MfdBranch]) -> Result<(RuptureSet, GenerationReport), ConsistencyError> {
        let mut cache = HashMap::new();
        let mut set = RuptureSet::new();
        let mut report = GenerationReport::default();
        for branch in branches {
            let bins: Vec<(f64, f64)> = branch.bins().collect();
            let (ruptures, branch_report) = self.generate_cached(&bins, &mut cache)?;
            debug!(
                branch = %branch.key,
                ruptures = ruptures.len(),
                "Generated branch ruptures"
            );
            set.insert(branch.key, ruptures);
            report.merge(branch_report);
        }
        Ok((set, report))
    }

    fn generate_cached(
        &self,
        bins: &[(f64, f64)],
        cache: &mut HashMap<(usize, usize), CompositeSurface>,
    ) -> Result<(Vec<Rupture>, GenerationReport), ConsistencyError> {
        let slip: Vec<f64> = self
            .arena
            .surfaces_for(&self.order)?
            .iter()
            .map(|s| s.slip_rate)
            .collect();
        let count = self.order.len();
        let builder = CompositeSurfaceBuilder::new(self.arena);

        let mut ruptures = Vec::new();
        let mut report = GenerationReport::default();

        for &(mag, rate) in bins {
            let span = self.sections_per_rupture(mag);
            if span > count {
                warn!(
                    magnitude = mag,
                    sections_needed = span,
                    sections_available = count,
                    "Skipping magnitude bin longer than the fault"
                );
                report.skipped_bins.push(mag);
                report.skipped_rate += rate;
                continue;
            }

            let window_count = count - span + 1;
            let weights: Vec<f64> = (0..window_count)
                .map(|start| slip[start..start + span].iter().sum::<f64>() / span as f64)
                .collect();
            let total: f64 = weights.iter().sum();

            for (start, weight) in weights.into_iter().enumerate() {
                let share = if total > 0.0 {
                    weight / total
                } else {
                    1.0 / window_count as f64
                };
                let sections = &self.order[start..start + span];
                let key = (start, span);
                if !cache.contains_key(&key) {
                    cache.insert(key, builder.build(sections)?);
                }
                ruptures.push(Rupture::from_surface(sections.to_vec(), mag, rate * share, &cache[&key]));
            }
        }

        report.ruptures = ruptures.len();
        Ok((ruptures, report))
    }
}
