//! Per-section rupture surfaces and the index-addressed arena that owns them.

use std::collections::HashMap;

use rayon::prelude::*;

use super::section::SectionGeometry;
use crate::error::{ConsistencyError, ForecastError};
use crate::geometry::{Location, Trace};

/// Planar rupture surface of a single section.
///
/// The upper edge sits at the aseismic-corrected top depth; width and area
/// cover only the seismogenic part.
#[derive(Debug, Clone, PartialEq)]
pub struct SectionSurface {
    pub index: usize,
    upper_trace: Trace,
    pub dip: f64,
    pub dip_direction: f64,
    pub upper_depth: f64,
    pub length: f64,
    pub width: f64,
    pub area: f64,
    pub rake: f64,
    pub slip_rate: f64,
}

impl SectionSurface {
    pub fn from_section(section: &SectionGeometry) -> Self {
        let upper_depth = section.effective_top_depth();
        let length = section.length();
        let width = section.reduced_width();
        Self {
            index: section.index,
            upper_trace: section.trace.at_depth(upper_depth),
            dip: section.dip,
            dip_direction: section.dip_direction,
            upper_depth,
            length,
            width,
            area: length * width,
            rake: section.rake,
            slip_rate: section.slip_rate,
        }
    }

    pub fn upper_trace(&self) -> &Trace {
        &self.upper_trace
    }

    pub fn first(&self) -> &Location {
        self.upper_trace.first()
    }

    pub fn last(&self) -> &Location {
        self.upper_trace.last()
    }
}

/// Read-only store of section surfaces addressed by section index.
///
/// Each surface is computed once and then shared by every rupture that
/// touches the section.
#[derive(Debug, Clone, Default)]
pub struct SectionArena {
    surfaces: Vec<SectionSurface>,
    lookup: HashMap<usize, usize>,
}

impl SectionArena {
    /// Validates the sections and computes their surfaces in parallel.
    pub fn new(sections: &[SectionGeometry]) -> Result<Self, ForecastError> {
        let mut lookup = HashMap::with_capacity(sections.len());
        for (slot, section) in sections.iter().enumerate() {
            section.validate()?;
            if lookup.insert(section.index, slot).is_some() {
                return Err(ConsistencyError::DuplicateSection(section.index).into());
            }
        }

        let surfaces = sections
            .par_iter()
            .map(SectionSurface::from_section)
            .collect();

        Ok(Self { surfaces, lookup })
    }

    pub fn len(&self) -> usize {
        self.surfaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.surfaces.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&SectionSurface> {
        self.lookup.get(&index).map(|&slot| &self.surfaces[slot])
    }

    /// Surfaces in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &SectionSurface> {
        self.surfaces.iter()
    }

    /// Section indices in insertion order.
    pub fn indices(&self) -> Vec<usize> {
        self.surfaces.iter().map(|s| s.index).collect()
    }

    /// Resolves a participation list, failing on the first unknown index.
    pub fn surfaces_for(&self, indices: &[usize]) -> Result<Vec<&SectionSurface>, ConsistencyError> {
        indices
            .iter()
            .map(|&i| self.get(i).ok_or(ConsistencyError::UnknownSection(i)))
            .collect()
    }

    /// Total seismogenic area in km².
    pub fn total_area(&self) -> f64 {
        self.surfaces.iter().map(|s| s.area).sum()
    }

    /// Total trace length in km.
    pub fn total_length(&self) -> f64 {
        self.surfaces.iter().map(|s| s.length).sum()
    }
}
