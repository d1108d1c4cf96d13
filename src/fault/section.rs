//! Fault-section geometry records.

use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::geometry::{normalize_azimuth, Trace};

/// One fixed-length subdivision of a fault trace.
///
/// Depths are in km, dip and dip direction in degrees, slip rate in mm/yr.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionGeometry {
    /// Stable, unique identifier used for every cross-reference.
    pub index: usize,
    pub name: String,
    /// Upper-edge trace.
    pub trace: Trace,
    /// Dip in (0, 180). Values above 90 dip to the left of the trace.
    pub dip: f64,
    /// Azimuth of dip, normally strike + 90.
    pub dip_direction: f64,
    pub top_depth: f64,
    pub lower_depth: f64,
    /// Fraction of the down-dip extent that slips aseismically, in [0, 1].
    #[serde(default)]
    pub aseismic_slip_factor: f64,
    #[serde(default)]
    pub slip_rate: f64,
    #[serde(default)]
    pub rake: f64,
}

impl SectionGeometry {
    /// Creates a section with dip direction taken from the trace (right-hand rule).
    pub fn new(
        index: usize,
        name: impl Into<String>,
        trace: Trace,
        dip: f64,
        top_depth: f64,
        lower_depth: f64,
    ) -> Result<Self, DomainError> {
        let dip_direction = trace.dip_direction();
        let section = Self {
            index,
            name: name.into(),
            trace,
            dip,
            dip_direction,
            top_depth,
            lower_depth,
            aseismic_slip_factor: 0.0,
            slip_rate: 0.0,
            rake: 0.0,
        };
        section.validate()?;
        Ok(section)
    }

    pub fn with_slip_rate(mut self, slip_rate: f64) -> Self {
        self.slip_rate = slip_rate;
        self
    }

    pub fn with_rake(mut self, rake: f64) -> Self {
        self.rake = rake;
        self
    }

    pub fn with_aseismic_slip_factor(mut self, factor: f64) -> Self {
        self.aseismic_slip_factor = factor;
        self
    }

    /// Checks dip, depth ordering, aseismic factor and slip rate.
    pub fn validate(&self) -> Result<(), DomainError> {
        if !(self.dip > 0.0 && self.dip < 180.0) {
            return Err(DomainError::InvalidDip(self.dip));
        }
        if !(self.lower_depth > self.top_depth) {
            return Err(DomainError::InvalidDepths {
                top: self.top_depth,
                lower: self.lower_depth,
            });
        }
        if !(0.0..=1.0).contains(&self.aseismic_slip_factor) {
            return Err(DomainError::InvalidAseismicFactor(self.aseismic_slip_factor));
        }
        crate::error::ensure_non_negative("slip rate", self.slip_rate)?;
        Ok(())
    }

    /// Top of the seismogenic zone after removing the aseismic fraction.
    pub fn effective_top_depth(&self) -> f64 {
        self.top_depth + self.aseismic_slip_factor * (self.lower_depth - self.top_depth)
    }

    /// Down-dip width of the seismogenic part in km.
    pub fn reduced_width(&self) -> f64 {
        (self.lower_depth - self.effective_top_depth()) / self.dip.to_radians().sin()
    }

    pub fn length(&self) -> f64 {
        self.trace.length()
    }

    /// Seismogenic area in km².
    pub fn reduced_area(&self) -> f64 {
        self.length() * self.reduced_width()
    }

    /// The same physical surface described from the other end of the trace.
    ///
    /// Trace order flips, dip is mirrored to `180 - dip` and the dip direction
    /// turns by 180°.
    pub fn reversed(&self) -> Self {
        Self {
            trace: self.trace.reversed(),
            dip: 180.0 - self.dip,
            dip_direction: normalize_azimuth(self.dip_direction + 180.0),
            ..self.clone()
        }
    }
}
