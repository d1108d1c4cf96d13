//! Along-strike slip-rate interpolation between sparse anchor sections.

use std::collections::BTreeMap;

use crate::error::ConsistencyError;
use crate::geometry::Trace;

/// Linear slip-rate interpolator with fixed decimal rounding.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlipRateInterpolator {
    decimals: u32,
}

impl Default for SlipRateInterpolator {
    fn default() -> Self {
        Self { decimals: 4 }
    }
}

impl SlipRateInterpolator {
    /// Interpolated values are rounded to `decimals` places.
    pub fn new(decimals: u32) -> Self {
        Self { decimals }
    }

    /// Slip rates for the sections of `trace` partitioned at `target_length_km`.
    pub fn interpolate_trace(
        &self,
        trace: &Trace,
        target_length_km: f64,
        anchors: &BTreeMap<usize, f64>,
    ) -> Result<Vec<f64>, ConsistencyError> {
        self.interpolate(trace.section_count(target_length_km), anchors)
    }

    /// One slip rate per section from `{section position -> slip rate}` anchors.
    ///
    /// Anchors must start at 0 and end at `section_count - 1`. Anchor values
    /// are copied through unrounded; values between anchors are linear and
    /// rounded.
    pub fn interpolate(
        &self,
        section_count: usize,
        anchors: &BTreeMap<usize, f64>,
    ) -> Result<Vec<f64>, ConsistencyError> {
        if let Some(&first) = anchors.keys().next() {
            if first != 0 {
                return Err(ConsistencyError::AnchorOffset(first));
            }
        }

        let mut rates: Vec<f64> = Vec::with_capacity(section_count);
        if anchors.len() == 1 {
            rates.extend(anchors.values().copied());
        }

        for ((&i0, &v0), (&i1, &v1)) in anchors.iter().zip(anchors.iter().skip(1)) {
            let span = i1 - i0;
            let skip = usize::from(!rates.is_empty());
            for k in skip..=span {
                let value = if k == 0 {
                    v0
                } else if k == span {
                    v1
                } else {
                    self.round(v0 + (v1 - v0) * k as f64 / span as f64)
                };
                rates.push(value);
            }
        }

        if rates.len() != section_count {
            return Err(ConsistencyError::SlipRateCount {
                expected: section_count,
                got: rates.len(),
            });
        }
        Ok(rates)
    }

    fn round(&self, value: f64) -> f64 {
        let scale = 10f64.powi(self.decimals as i32);
        (value * scale).round() / scale
    }
}
