//! Moment-magnitude conversions and magnitude binning.

use crate::error::{ensure_positive, DomainError};

/// Crustal shear modulus in Pa.
pub const SHEAR_MODULUS: f64 = 3.0e10;

/// Seismic moment in N·m for moment magnitude `mag` (Hanks & Kanamori).
pub fn moment_from_magnitude(mag: f64) -> f64 {
    10f64.powf(1.5 * mag + 9.05)
}

/// Moment magnitude for seismic moment `moment` in N·m.
pub fn magnitude_from_moment(moment: f64) -> f64 {
    (moment.log10() - 9.05) / 1.5
}

/// Evenly spaced magnitudes from `m_min` to `m_max` inclusive.
///
/// The bin count is rounded so that floating-point drift in
/// `(m_max - m_min) / d_mag` never adds or drops the last bin.
pub fn magnitude_bins(m_min: f64, m_max: f64, d_mag: f64) -> Result<Vec<f64>, DomainError> {
    ensure_positive("magnitude bin width", d_mag).map_err(|_| DomainError::InvalidBinWidth(d_mag))?;
    if !(m_max > m_min) {
        return Err(DomainError::InvalidMagnitudeRange { m_min, m_max });
    }
    let count = ((m_max - m_min) / d_mag).round() as usize + 1;
    Ok((0..count).map(|i| m_min + i as f64 * d_mag).collect())
}

/// Scales `shape` so that `Σ rate · moment(mag)` equals `moment_rate`.
///
/// A zero target yields all-zero rates.
pub fn moment_balance(magnitudes: &[f64], shape: &[f64], moment_rate: f64) -> Vec<f64> {
    let shape_moment: f64 = magnitudes
        .iter()
        .zip(shape)
        .map(|(&m, &s)| s * moment_from_magnitude(m))
        .sum();
    if moment_rate == 0.0 || shape_moment <= 0.0 {
        return vec![0.0; shape.len()];
    }
    let scale = moment_rate / shape_moment;
    shape.iter().map(|s| s * scale).collect()
}

/// Total moment rate `Σ rate · moment(mag)`.
pub fn total_moment_rate(magnitudes: &[f64], rates: &[f64]) -> f64 {
    magnitudes
        .iter()
        .zip(rates)
        .map(|(&m, &r)| r * moment_from_magnitude(m))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_moment_round_trip() {
        for mag in [5.0, 6.5, 7.8] {
            let m0 = moment_from_magnitude(mag);
            assert!((magnitude_from_moment(m0) - mag).abs() < 1e-12);
        }
        // One magnitude unit is a factor of ~31.6 in moment.
        let ratio = moment_from_magnitude(7.0) / moment_from_magnitude(6.0);
        assert!((ratio - 10f64.powf(1.5)).abs() < 1e-9);
    }

    #[test]
    fn test_magnitude_bins() {
        let bins = magnitude_bins(6.5, 7.2, 0.1).unwrap();
        assert_eq!(bins.len(), 8);
        assert!((bins[7] - 7.2).abs() < 1e-9);
    }

    #[test]
    fn test_magnitude_bins_rejects_bad_range() {
        assert_eq!(
            magnitude_bins(7.0, 6.5, 0.1),
            Err(DomainError::InvalidMagnitudeRange { m_min: 7.0, m_max: 6.5 })
        );
        assert_eq!(magnitude_bins(6.0, 7.0, 0.0), Err(DomainError::InvalidBinWidth(0.0)));
    }

    #[test]
    fn test_moment_balance() {
        let mags = [6.0, 6.5, 7.0];
        let rates = moment_balance(&mags, &[1.0, 0.5, 0.25], 1e17);
        let total = total_moment_rate(&mags, &rates);
        assert!((total - 1e17).abs() / 1e17 < 1e-12);
        assert!((rates[0] / rates[1] - 2.0).abs() < 1e-12);
        assert_eq!(moment_balance(&mags, &[1.0, 1.0, 1.0], 0.0), vec![0.0; 3]);
    }
}
