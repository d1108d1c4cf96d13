//! Fault traces: ordered polylines of locations along strike.

use serde::{Deserialize, Serialize};

use super::location::{normalize_azimuth, Location};
use crate::error::DomainError;

/// Points closer than this (km) are treated as the same point.
const COINCIDENT_KM: f64 = 1e-9;

/// An ordered, non-empty sequence of locations along strike.
///
/// Consecutive duplicate points are collapsed on construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Location>", into = "Vec<Location>")]
pub struct Trace {
    points: Vec<Location>,
}

impl Trace {
    /// Builds a trace, dropping consecutive duplicates.
    pub fn new(points: Vec<Location>) -> Result<Self, DomainError> {
        if points.is_empty() {
            return Err(DomainError::EmptyTrace);
        }
        let mut deduped: Vec<Location> = Vec::with_capacity(points.len());
        for p in points {
            push_distinct(&mut deduped, p);
        }
        Ok(Self { points: deduped })
    }

    pub fn points(&self) -> &[Location] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> &Location {
        &self.points[0]
    }

    pub fn last(&self) -> &Location {
        &self.points[self.points.len() - 1]
    }

    /// Total horizontal length in km.
    pub fn length(&self) -> f64 {
        self.points
            .windows(2)
            .map(|w| w[0].horizontal_distance(&w[1]))
            .sum()
    }

    /// Returns the trace walked in the opposite direction.
    pub fn reversed(&self) -> Trace {
        let mut points = self.points.clone();
        points.reverse();
        Trace { points }
    }

    /// Returns the trace with every point moved to `depth`.
    pub fn at_depth(&self, depth: f64) -> Trace {
        Trace {
            points: self.points.iter().map(|p| p.with_depth(depth)).collect(),
        }
    }

    /// Length-weighted average strike in degrees [0, 360).
    ///
    /// Segment azimuths are averaged as unit vectors so that strikes on either
    /// side of north do not cancel. A single-point trace has strike 0.
    pub fn average_strike(&self) -> f64 {
        let (mut sx, mut sy) = (0.0, 0.0);
        for w in self.points.windows(2) {
            let len = w[0].horizontal_distance(&w[1]);
            let az = w[0].azimuth_to(&w[1]).to_radians();
            sx += len * az.sin();
            sy += len * az.cos();
        }
        if sx == 0.0 && sy == 0.0 {
            return 0.0;
        }
        normalize_azimuth(sx.atan2(sy).to_degrees())
    }

    /// Dip direction implied by the right-hand rule: strike + 90°.
    pub fn dip_direction(&self) -> f64 {
        normalize_azimuth(self.average_strike() + 90.0)
    }

    /// Number of equal-length sections for a target section length.
    ///
    /// `round(length / target)`, never less than one.
    pub fn section_count(&self, target_length_km: f64) -> usize {
        let n = (self.length() / target_length_km).round();
        if n.is_finite() && n >= 1.0 {
            n as usize
        } else {
            1
        }
    }

    /// Splits the trace into `section_count(target)` pieces of equal length.
    ///
    /// Cut points are interpolated along the great circle of the segment they
    /// fall on; each piece keeps the original vertices it spans.
    pub fn partition(&self, target_length_km: f64) -> Vec<Trace> {
        let n = self.section_count(target_length_km);
        if n == 1 || self.points.len() < 2 {
            return vec![self.clone()];
        }
        let piece_len = self.length() / n as f64;

        let mut pieces = Vec::with_capacity(n);
        let mut current = vec![self.points[0]];
        let mut remaining = piece_len;

        for w in self.points.windows(2) {
            let mut start = w[0];
            let end = w[1];
            let mut seg = start.horizontal_distance(&end);
            while seg >= remaining && pieces.len() < n - 1 {
                let cut = start.interpolate(&end, remaining / seg);
                push_distinct(&mut current, cut);
                pieces.push(Trace {
                    points: std::mem::replace(&mut current, vec![cut]),
                });
                seg -= remaining;
                start = cut;
                remaining = piece_len;
            }
            push_distinct(&mut current, end);
            remaining -= seg;
        }
        if current.len() > 1 || pieces.is_empty() {
            pieces.push(Trace { points: current });
        } else if let Some(last) = pieces.last_mut() {
            // Rounding left a zero-length tail; fold its point into the last piece.
            push_distinct(&mut last.points, current[0]);
        }
        pieces
    }
}

impl TryFrom<Vec<Location>> for Trace {
    type Error = DomainError;

    fn try_from(points: Vec<Location>) -> Result<Self, Self::Error> {
        Trace::new(points)
    }
}

impl From<Trace> for Vec<Location> {
    fn from(trace: Trace) -> Self {
        trace.points
    }
}

/// Appends `p` unless it coincides with the current last point.
pub(crate) fn push_distinct(points: &mut Vec<Location>, p: Location) {
    match points.last() {
        Some(last)
            if last.horizontal_distance(&p) < COINCIDENT_KM
                && (last.depth - p.depth).abs() < COINCIDENT_KM => {}
        _ => points.push(p),
    }
}
