//! The rupture record produced by the generator or ingested from inversions.

use serde::{Deserialize, Serialize};

use crate::error::{ensure_non_negative, ConsistencyError, ForecastError};
use crate::fault::{CompositeSurface, CompositeSurfaceBuilder, SectionArena};
use crate::mfd::moment_from_magnitude;

/// One earthquake spanning a contiguous run of sections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rupture {
    /// Participating section indices in participation order.
    pub sections: Vec<usize>,
    pub magnitude: f64,
    /// Annual occurrence rate, never negative.
    pub rate: f64,
    pub dip: f64,
    pub width: f64,
    pub depth: f64,
    pub rake: f64,
}

impl Rupture {
    /// Rupture with geometry taken from a composite surface.
    pub fn from_surface(sections: Vec<usize>, magnitude: f64, rate: f64, surface: &CompositeSurface) -> Self {
        Self {
            sections,
            magnitude,
            rate,
            dip: surface.dip,
            width: surface.width,
            depth: surface.depth,
            rake: surface.rake,
        }
    }

    /// Identity used when merging rupture sets: the sorted section indices.
    pub fn signature(&self) -> Vec<usize> {
        let mut sig = self.sections.clone();
        sig.sort_unstable();
        sig
    }

    /// Moment rate released by this rupture, N·m/yr.
    pub fn moment_rate(&self) -> f64 {
        self.rate * moment_from_magnitude(self.magnitude)
    }

    /// Builds ruptures from parallel per-rupture arrays, as delivered by an
    /// external inversion.
    ///
    /// Geometry comes from the arena. When `rakes` is given it overrides the
    /// area-weighted section rake. Any length mismatch aborts the whole
    /// conversion.
    pub fn from_inversion(
        arena: &SectionArena,
        section_lists: &[Vec<usize>],
        magnitudes: &[f64],
        rates: &[f64],
        rakes: Option<&[f64]>,
    ) -> Result<Vec<Rupture>, ForecastError> {
        let expected = section_lists.len();
        check_len("magnitudes", expected, magnitudes.len())?;
        check_len("rates", expected, rates.len())?;
        if let Some(rakes) = rakes {
            check_len("rakes", expected, rakes.len())?;
        }

        let builder = CompositeSurfaceBuilder::new(arena);
        section_lists
            .iter()
            .enumerate()
            .map(|(i, sections)| {
                let rate = ensure_non_negative("rupture rate", rates[i])?;
                let surface = builder.build(sections)?;
                let mut rupture = Rupture::from_surface(sections.clone(), magnitudes[i], rate, &surface);
                if let Some(rakes) = rakes {
                    rupture.rake = rakes[i];
                }
                Ok(rupture)
            })
            .collect()
    }
}

fn check_len(name: &'static str, expected: usize, got: usize) -> Result<(), ConsistencyError> {
    if expected == got {
        Ok(())
    } else {
        Err(ConsistencyError::AttributeLength { name, expected, got })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DomainError;
    use crate::fault::SectionGeometry;
    use crate::geometry::{Location, Trace};

    fn arena() -> SectionArena {
        let origin = Location::new(35.0, -120.0, 0.0);
        let sections: Vec<SectionGeometry> = (0..3)
            .map(|i| {
                let start = origin.destination(0.0, i as f64 * 5.0);
                let trace = Trace::new(vec![start, start.destination(0.0, 5.0)]).unwrap();
                SectionGeometry::new(i, format!("S{i}"), trace, 90.0, 0.0, 12.0)
                    .unwrap()
                    .with_rake(0.0)
                    .with_slip_rate(4.0)
            })
            .collect();
        SectionArena::new(&sections).unwrap()
    }

    #[test]
    fn test_signature_is_order_free() {
        let r = Rupture {
            sections: vec![3, 1, 2],
            magnitude: 6.5,
            rate: 0.01,
            dip: 90.0,
            width: 12.0,
            depth: 0.0,
            rake: 0.0,
        };
        assert_eq!(r.signature(), vec![1, 2, 3]);
        assert!((r.moment_rate() - 0.01 * moment_from_magnitude(6.5)).abs() < 1.0);
    }

    #[test]
    fn test_from_inversion() {
        let arena = arena();
        let ruptures = Rupture::from_inversion(
            &arena,
            &[vec![0, 1], vec![1, 2], vec![0, 1, 2]],
            &[6.2, 6.2, 6.5],
            &[1e-3, 2e-3, 5e-4],
            Some(&[10.0, 20.0, 30.0][..]),
        )
        .unwrap();
        assert_eq!(ruptures.len(), 3);
        assert_eq!(ruptures[2].sections, vec![0, 1, 2]);
        assert_eq!(ruptures[1].rake, 20.0);
        assert!((ruptures[0].width - 12.0).abs() < 1e-9);
    }

    #[test]
    fn test_from_inversion_length_mismatch() {
        let err = Rupture::from_inversion(&arena(), &[vec![0], vec![1]], &[6.0], &[1e-3, 1e-3], None)
            .unwrap_err();
        assert_eq!(
            err,
            ConsistencyError::AttributeLength { name: "magnitudes", expected: 2, got: 1 }.into()
        );
    }

    #[test]
    fn test_from_inversion_unknown_section() {
        let err = Rupture::from_inversion(&arena(), &[vec![0, 9]], &[6.0], &[1e-3], None).unwrap_err();
        assert_eq!(err, ConsistencyError::UnknownSection(9).into());
    }

    #[test]
    fn test_from_inversion_negative_rate() {
        let err = Rupture::from_inversion(&arena(), &[vec![0]], &[6.0], &[-1.0], None).unwrap_err();
        assert!(matches!(err, ForecastError::Domain(DomainError::Negative { .. })));
    }
}
