//! Reduction of an ordered list of section surfaces to one rupture surface.
//!
//! Sections arrive in participation order but each may be digitized in
//! either direction. The builder first decides which sections to walk
//! backwards so that consecutive sections join end-to-start, then takes
//! area-weighted averages of dip, width and depth and stitches the traces.
//!
//! Orientation follows the right-hand rule: looking along the trace, the
//! surface dips to the right. A reversed section therefore contributes
//! `180 - dip`, and an averaged dip above 90° means the whole stitched trace
//! has to be walked the other way.

use serde::Serialize;

use super::surface::{SectionArena, SectionSurface};
use crate::error::ConsistencyError;
use crate::geometry::{normalize_azimuth, push_distinct, Location, Trace};

/// Aggregate geometry of a multi-section rupture.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompositeSurface {
    /// Area-weighted dip in (0, 90] after orientation reconciliation.
    pub dip: f64,
    pub dip_direction: f64,
    /// Area-weighted seismogenic down-dip width, km.
    pub width: f64,
    /// Area-weighted upper seismogenic depth, km.
    pub depth: f64,
    /// Area-weighted mean rake, degrees in (-180, 180].
    pub rake: f64,
    /// Total seismogenic area, km².
    pub area: f64,
    /// Sum of section lengths, km.
    pub length: f64,
    /// Stitched upper-edge trace.
    pub trace: Trace,
    /// True when the stitched trace was reversed to bring dip back to ≤ 90°.
    pub order_reversed: bool,
}

/// Builds [`CompositeSurface`]s from section indices resolved through an arena.
#[derive(Debug, Clone, Copy)]
pub struct CompositeSurfaceBuilder<'a> {
    arena: &'a SectionArena,
}

impl<'a> CompositeSurfaceBuilder<'a> {
    pub fn new(arena: &'a SectionArena) -> Self {
        Self { arena }
    }

    /// Builds the composite surface for an ordered participation list.
    pub fn build(&self, indices: &[usize]) -> Result<CompositeSurface, ConsistencyError> {
        let surfaces = self.arena.surfaces_for(indices)?;
        composite_surface(&surfaces)
    }
}

/// Decides, per section, whether its trace must be walked backwards.
///
/// The first pair is resolved from the four endpoint distances; every later
/// section is compared against the (possibly reversed) end of its
/// predecessor. Ties keep list order: candidates are tried as
/// first→first, first→last, last→first, last→last and only a strictly
/// smaller distance displaces an earlier candidate.
pub fn resolve_orientation(surfaces: &[&SectionSurface]) -> Vec<bool> {
    let mut reversed = vec![false; surfaces.len()];
    if surfaces.len() < 2 {
        return reversed;
    }

    let (a, b) = (surfaces[0], surfaces[1]);
    let candidates = [
        (a.first().horizontal_distance(b.first()), true, false),
        (a.first().horizontal_distance(b.last()), true, true),
        (a.last().horizontal_distance(b.first()), false, false),
        (a.last().horizontal_distance(b.last()), false, true),
    ];
    let mut best = candidates[0];
    for candidate in &candidates[1..] {
        if candidate.0 < best.0 {
            best = *candidate;
        }
    }
    reversed[0] = best.1;
    reversed[1] = best.2;

    for i in 2..surfaces.len() {
        let prev = surfaces[i - 1];
        let prev_end = if reversed[i - 1] { prev.first() } else { prev.last() };
        let cand = surfaces[i];
        let to_first = prev_end.horizontal_distance(cand.first());
        let to_last = prev_end.horizontal_distance(cand.last());
        reversed[i] = to_last < to_first;
    }
    reversed
}

/// Aggregates an ordered list of section surfaces.
///
/// Non-adjacent inputs are not detected; they produce a stitched trace that
/// jumps between sections.
pub fn composite_surface(surfaces: &[&SectionSurface]) -> Result<CompositeSurface, ConsistencyError> {
    let Some(&first) = surfaces.first() else {
        return Err(ConsistencyError::EmptyRupture);
    };

    if surfaces.len() == 1 {
        return Ok(CompositeSurface {
            dip: first.dip,
            dip_direction: first.dip_direction,
            width: first.width,
            depth: first.upper_depth,
            rake: first.rake,
            area: first.area,
            length: first.length,
            trace: first.upper_trace().clone(),
            order_reversed: false,
        });
    }

    let reversed = resolve_orientation(surfaces);

    let mut area = 0.0;
    let mut dip_sum = 0.0;
    let mut width_sum = 0.0;
    let mut depth_sum = 0.0;
    let mut rake_sin = 0.0;
    let mut rake_cos = 0.0;
    let mut length = 0.0;
    let mut points: Vec<Location> = Vec::new();

    for (surface, &flip) in surfaces.iter().zip(&reversed) {
        let a = surface.area;
        area += a;
        dip_sum += a * if flip { 180.0 - surface.dip } else { surface.dip };
        width_sum += a * surface.width;
        depth_sum += a * surface.upper_depth;
        let rake = surface.rake.to_radians();
        rake_sin += a * rake.sin();
        rake_cos += a * rake.cos();
        length += surface.length;

        let trace = surface.upper_trace().points();
        if flip {
            trace.iter().rev().for_each(|&p| push_distinct(&mut points, p));
        } else {
            trace.iter().for_each(|&p| push_distinct(&mut points, p));
        }
    }

    // Zero-area sections (e.g. fully aseismic) fall back to plain means.
    let (mut dip, width, depth) = if area > 0.0 {
        (dip_sum / area, width_sum / area, depth_sum / area)
    } else {
        let n = surfaces.len() as f64;
        let dip = surfaces
            .iter()
            .zip(&reversed)
            .map(|(s, &flip)| if flip { 180.0 - s.dip } else { s.dip })
            .sum::<f64>()
            / n;
        let width = surfaces.iter().map(|s| s.width).sum::<f64>() / n;
        let depth = surfaces.iter().map(|s| s.upper_depth).sum::<f64>() / n;
        (dip, width, depth)
    };

    let order_reversed = dip > 90.0;
    if order_reversed {
        dip = 180.0 - dip;
        points.reverse();
    }

    let trace = Trace::new(points).map_err(|_| ConsistencyError::EmptyRupture)?;
    let dip_direction = if trace.len() > 1 {
        trace.dip_direction()
    } else {
        normalize_azimuth(first.dip_direction)
    };

    Ok(CompositeSurface {
        dip,
        dip_direction,
        width,
        depth,
        rake: mean_rake(rake_sin, rake_cos, first.rake),
        area,
        length,
        trace,
        order_reversed,
    })
}

fn mean_rake(sin_sum: f64, cos_sum: f64, fallback: f64) -> f64 {
    if sin_sum == 0.0 && cos_sum == 0.0 {
        return fallback;
    }
    let rake = sin_sum.atan2(cos_sum).to_degrees();
    if rake <= -180.0 {
        rake + 360.0
    } else {
        rake
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fault::section::SectionGeometry;

    const ORIGIN: Location = Location::new(35.0, -120.0, 0.0);

    /// A north-striking section starting `offset_km` north of the origin.
    fn section(index: usize, offset_km: f64, length_km: f64, dip: f64) -> SectionGeometry {
        let start = ORIGIN.destination(0.0, offset_km);
        let trace = Trace::new(vec![start, start.destination(0.0, length_km)]).unwrap();
        SectionGeometry::new(index, format!("S{index}"), trace, dip, 0.0, 15.0)
            .unwrap()
            .with_slip_rate(5.0)
            .with_rake(180.0)
    }

    fn build(sections: &[SectionGeometry], indices: &[usize]) -> CompositeSurface {
        let arena = SectionArena::new(sections).unwrap();
        CompositeSurfaceBuilder::new(&arena).build(indices).unwrap()
    }

    #[test]
    fn test_single_section_passthrough() {
        let s = section(0, 0.0, 10.0, 70.0);
        let surface = build(std::slice::from_ref(&s), &[0]);
        assert_eq!(surface.dip, 70.0);
        assert_eq!(surface.trace.len(), 2);
        assert!(!surface.order_reversed);
        assert!((surface.area - s.reduced_area()).abs() < 1e-9);
    }

    #[test]
    fn test_empty_rejected() {
        let arena = SectionArena::new(&[section(0, 0.0, 10.0, 70.0)]).unwrap();
        assert_eq!(
            CompositeSurfaceBuilder::new(&arena).build(&[]).unwrap_err(),
            ConsistencyError::EmptyRupture
        );
    }

    #[test]
    fn test_contiguous_sections_not_reversed() {
        let sections = [
            section(0, 0.0, 10.0, 60.0),
            section(1, 10.0, 10.0, 80.0),
            section(2, 20.0, 10.0, 70.0),
        ];
        let arena = SectionArena::new(&sections).unwrap();
        let surfaces = arena.surfaces_for(&[0, 1, 2]).unwrap();
        assert_eq!(resolve_orientation(&surfaces), vec![false, false, false]);

        let surface = composite_surface(&surfaces).unwrap();
        assert_eq!(surface.trace.len(), 4);
        assert!((surface.length - 30.0).abs() < 1e-6);
        // Steeper sections are narrower, so the average leans toward 60°.
        assert!(surface.dip > 60.0 && surface.dip < 70.0);
        assert!((surface.rake.abs() - 180.0).abs() < 1e-9);
    }

    #[test]
    fn test_second_section_reversed() {
        let mut sections = vec![section(0, 0.0, 10.0, 60.0), section(1, 10.0, 10.0, 60.0)];
        sections[1] = sections[1].reversed();
        let arena = SectionArena::new(&sections).unwrap();
        let surfaces = arena.surfaces_for(&[0, 1]).unwrap();
        assert_eq!(resolve_orientation(&surfaces), vec![false, true]);

        let surface = composite_surface(&surfaces).unwrap();
        assert!((surface.dip - 60.0).abs() < 1e-9);
        assert!(!surface.order_reversed);
        assert_eq!(surface.trace.first(), surfaces[0].first());
    }

    #[test]
    fn test_listed_backwards_flags_full_reversal() {
        // Participation order runs south, the surfaces dip east.
        let sections = [section(0, 0.0, 10.0, 60.0), section(1, 10.0, 10.0, 60.0)];
        let surface = build(&sections, &[1, 0]);
        assert!((surface.dip - 60.0).abs() < 1e-9);
        assert!(surface.order_reversed);
        // Final trace still runs north, matching the dip direction.
        assert!(surface.trace.first().lat < surface.trace.last().lat);
        assert!((surface.dip_direction - 90.0).abs() < 0.1);
    }

    #[test]
    fn test_orientation_idempotent_under_prereversal() {
        let sections = [section(0, 0.0, 10.0, 50.0), section(1, 10.0, 12.0, 70.0)];
        let flipped = [sections[0].reversed(), sections[1].reversed()];
        let a = build(&sections, &[0, 1]);
        let b = build(&flipped, &[0, 1]);
        assert!((a.dip - b.dip).abs() < 1e-9);
        assert!((a.width - b.width).abs() < 1e-9);
        assert!((a.depth - b.depth).abs() < 1e-9);
        assert_eq!(a.trace.len(), b.trace.len());
        for (p, q) in a.trace.points().iter().zip(b.trace.points()) {
            assert!(p.horizontal_distance(q) < 1e-9);
        }
    }

    #[test]
    fn test_aseismic_depth_is_area_weighted() {
        let sections = [
            section(0, 0.0, 10.0, 90.0).with_aseismic_slip_factor(0.0),
            section(1, 10.0, 10.0, 90.0).with_aseismic_slip_factor(0.5),
        ];
        let surface = build(&sections, &[0, 1]);
        // Areas 150 and 75 km²; depths 0 and 7.5 km.
        assert!((surface.depth - 2.5).abs() < 1e-6);
        assert!((surface.width - 12.5).abs() < 1e-6);
    }

    #[test]
    fn test_equal_distance_tie_keeps_list_order() {
        // Identical traces: first->first and last->last both measure zero,
        // and the earlier candidate (reverse the first section) wins.
        let s0 = section(0, 0.0, 10.0, 60.0);
        let mut s1 = s0.clone();
        s1.index = 1;
        let arena = SectionArena::new(&[s0, s1]).unwrap();
        let surfaces = arena.surfaces_for(&[0, 1]).unwrap();
        assert_eq!(resolve_orientation(&surfaces), vec![true, false]);
    }

    #[test]
    fn test_parallel_stepover_reverses_first_section() {
        // Two 11 km north-striking sections mirrored about the equator, the
        // second stepped about 1 km east, so first->first equals last->last.
        let strand = |index: usize, lon: f64| {
            let trace = Trace::new(vec![Location::new(-0.05, lon, 0.0), Location::new(0.05, lon, 0.0)]).unwrap();
            SectionGeometry::new(index, format!("S{index}"), trace, 60.0, 0.0, 15.0)
                .unwrap()
                .with_slip_rate(5.0)
        };
        let arena = SectionArena::new(&[strand(0, 0.0), strand(1, 0.009)]).unwrap();
        let surfaces = arena.surfaces_for(&[0, 1]).unwrap();

        let ff = surfaces[0].first().horizontal_distance(surfaces[1].first());
        let ll = surfaces[0].last().horizontal_distance(surfaces[1].last());
        assert_eq!(ff, ll);
        assert!((ff - 1.0).abs() < 0.01);
        assert_eq!(resolve_orientation(&surfaces), vec![true, false]);

        // The stitched trace starts at the north end of the first section.
        let surface = composite_surface(&surfaces).unwrap();
        assert_eq!(surface.trace.len(), 4);
        assert!(surface.trace.points()[0].lat > 0.0);
    }
}
