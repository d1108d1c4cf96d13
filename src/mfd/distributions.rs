//! Moment-balanced magnitude-frequency distributions.

use super::magnitude::{magnitude_bins, moment_balance};
use crate::error::{ensure_non_negative, ensure_positive, DomainError};

/// Incremental truncated Gutenberg-Richter distribution.
///
/// Rates follow `10^(-b m)` on bins from `m_min` to `m_max` (inclusive, step
/// `d_mag`) and are scaled to release `moment_rate` N·m/yr.
///
/// # Returns
/// `(magnitudes, rates)`
pub fn gutenberg_richter(
    m_min: f64,
    m_max: f64,
    d_mag: f64,
    b_value: f64,
    moment_rate: f64,
) -> Result<(Vec<f64>, Vec<f64>), DomainError> {
    ensure_non_negative("moment rate", moment_rate)?;
    let mags = magnitude_bins(m_min, m_max, d_mag)?;
    let shape: Vec<f64> = mags.iter().map(|m| 10f64.powf(-b_value * m)).collect();
    let rates = moment_balance(&mags, &shape, moment_rate);
    Ok((mags, rates))
}

/// Discretized Gaussian centred on `center`.
///
/// `bins` magnitudes span `center ± truncation·sigma`. A zero sigma or a
/// single bin collapses to one bin at `center`. Rates are scaled to release
/// `moment_rate` N·m/yr.
///
/// # Returns
/// `(magnitudes, rates)`
pub fn gaussian(
    center: f64,
    sigma: f64,
    truncation: f64,
    bins: usize,
    moment_rate: f64,
) -> Result<(Vec<f64>, Vec<f64>), DomainError> {
    ensure_non_negative("moment rate", moment_rate)?;
    ensure_non_negative("sigma", sigma)?;
    if sigma == 0.0 || bins <= 1 {
        let mags = vec![center];
        let rates = moment_balance(&mags, &[1.0], moment_rate);
        return Ok((mags, rates));
    }
    ensure_positive("truncation", truncation)?;

    let half_width = truncation * sigma;
    let step = 2.0 * half_width / (bins - 1) as f64;
    let mags: Vec<f64> = (0..bins).map(|i| center - half_width + i as f64 * step).collect();
    let shape: Vec<f64> = mags
        .iter()
        .map(|m| {
            let z = (m - center) / sigma;
            (-0.5 * z * z).exp()
        })
        .collect();
    let rates = moment_balance(&mags, &shape, moment_rate);
    Ok((mags, rates))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mfd::magnitude::total_moment_rate;

    #[test]
    fn test_gr_is_moment_balanced() {
        let (mags, rates) = gutenberg_richter(6.5, 7.0, 0.1, 1.0, 2e17).unwrap();
        assert_eq!(mags.len(), 6);
        assert!((total_moment_rate(&mags, &rates) - 2e17).abs() / 2e17 < 1e-12);
        // One b-unit per magnitude unit: 0.1 step is a factor of 10^0.1.
        assert!((rates[0] / rates[1] - 10f64.powf(0.1)).abs() < 1e-9);
    }

    #[test]
    fn test_gr_b_value_changes_shape_not_moment() {
        let (mags, flat) = gutenberg_richter(6.5, 7.5, 0.1, 0.5, 1e17).unwrap();
        let (_, steep) = gutenberg_richter(6.5, 7.5, 0.1, 1.5, 1e17).unwrap();
        assert!((total_moment_rate(&mags, &flat) - total_moment_rate(&mags, &steep)).abs() / 1e17 < 1e-12);
        assert!(steep.iter().sum::<f64>() > flat.iter().sum::<f64>());
    }

    #[test]
    fn test_gr_rejects_inverted_range() {
        assert!(matches!(
            gutenberg_richter(7.0, 7.0, 0.1, 1.0, 1e17),
            Err(DomainError::InvalidMagnitudeRange { .. })
        ));
    }

    #[test]
    fn test_gaussian_symmetric() {
        let (mags, rates) = gaussian(7.0, 0.12, 2.0, 9, 1e18).unwrap();
        assert_eq!(mags.len(), 9);
        assert!((mags[4] - 7.0).abs() < 1e-12);
        assert!((mags[0] - 6.76).abs() < 1e-12);
        let peak = rates.iter().cloned().fold(0.0, f64::max);
        assert_eq!(peak, rates[4]);
        assert!((total_moment_rate(&mags, &rates) - 1e18).abs() / 1e18 < 1e-12);
    }

    #[test]
    fn test_gaussian_degenerates_to_single_bin() {
        let (mags, rates) = gaussian(7.1, 0.0, 2.0, 9, 1e18).unwrap();
        assert_eq!(mags, vec![7.1]);
        assert_eq!(rates.len(), 1);
        assert!((total_moment_rate(&mags, &rates) - 1e18).abs() / 1e18 < 1e-12);
    }
}
