//! Construction of moment-balanced MFD branch sets.
//!
//! Every branch is scaled so that its weighted moment rate equals
//! `target × weight`, where the weight is the product of the family share,
//! the epistemic weight and (for characteristic branches) the aleatory
//! weight. Summed over a branch set the weighted moments therefore return
//! the target exactly, whatever b-values or magnitude ranges the branches use.

use tracing::{debug, warn};

use super::branch::{BranchKey, MfdBranch};
use super::config::{CharacteristicConfig, EpistemicBranch, GutenbergRichterConfig, MfdConfig};
use super::distributions::{gaussian, gutenberg_richter};
use super::scaling::MagAreaRelation;
use crate::error::{ensure_non_negative, DomainError};

/// Builds the branch set for one fault system from an [`MfdConfig`].
#[derive(Debug, Clone, Default)]
pub struct MfdBuilder {
    config: MfdConfig,
}

impl MfdBuilder {
    pub fn new(config: MfdConfig) -> Self {
        Self { config }
    }

    /// Magnitude-area estimate for a rupture of the whole fault system.
    pub fn reference_magnitude(&self, area_km2: f64) -> f64 {
        self.config.mag_area.magnitude(area_km2)
    }

    /// Builds all branches for a moment budget of `target_moment` N·m/yr.
    ///
    /// `fault_area_km2` feeds the magnitude-area relation when the config
    /// leaves `m_max` or `ref_mag` open.
    pub fn build(&self, target_moment: f64, fault_area_km2: f64) -> Result<Vec<MfdBranch>, DomainError> {
        ensure_non_negative("target moment rate", target_moment)?;
        let (gr_share, char_share) = self.family_shares()?;
        let area_mag = self.reference_magnitude(fault_area_km2);
        let tolerance = self.config.weight_tolerance;

        let mut branches = Vec::new();
        if let Some(gr) = &self.config.gutenberg_richter {
            if gr_share > 0.0 {
                branches.extend(gutenberg_richter_branches(
                    gr,
                    target_moment,
                    gr_share,
                    area_mag,
                    tolerance,
                )?);
            } else {
                warn!("Gutenberg-Richter family has zero weight, dropping it");
            }
        }
        if let Some(ch) = &self.config.characteristic {
            if char_share > 0.0 {
                branches.extend(characteristic_branches(
                    ch,
                    target_moment,
                    char_share,
                    area_mag,
                    tolerance,
                )?);
            } else {
                warn!("Characteristic family has zero weight, dropping it");
            }
        }

        if branches.is_empty() {
            return Err(DomainError::NoBranches);
        }
        let mut keys: Vec<BranchKey> = branches.iter().map(|b| b.key).collect();
        keys.sort_unstable();
        if let Some(pair) = keys.windows(2).find(|pair| pair[0] == pair[1]) {
            return Err(DomainError::DuplicateBranch(pair[0].to_string()));
        }
        debug!(
            branches = branches.len(),
            target_moment,
            reference_mag = area_mag,
            "Built MFD branch set"
        );
        Ok(branches)
    }

    /// Moment shares `(gutenberg_richter, characteristic)`.
    fn family_shares(&self) -> Result<(f64, f64), DomainError> {
        match (&self.config.gutenberg_richter, &self.config.characteristic) {
            (Some(_), Some(_)) => {
                let f = self.config.characteristic_fraction;
                if !(0.0..=1.0).contains(&f) {
                    return Err(DomainError::InvalidWeight(f));
                }
                Ok((1.0 - f, f))
            }
            (Some(_), None) => Ok((1.0, 0.0)),
            (None, Some(_)) => Ok((0.0, 1.0)),
            (None, None) => Err(DomainError::NoBranches),
        }
    }
}

/// One truncated GR branch per epistemic mMax offset.
///
/// Each branch spans `m_min ..= m_max + offset` and releases
/// `target × family_weight × w_offset`.
pub fn gutenberg_richter_branches(
    config: &GutenbergRichterConfig,
    target_moment: f64,
    family_weight: f64,
    default_m_max: f64,
    tolerance: f64,
) -> Result<Vec<MfdBranch>, DomainError> {
    let m_max = config.m_max.unwrap_or(default_m_max);
    let epistemic = retain_weighted(&config.m_max_branches, |b| b.weight, tolerance, "mMax")?;

    epistemic
        .into_iter()
        .map(|EpistemicBranch { offset, weight }| {
            let weight = family_weight * weight;
            let (magnitudes, rates) = gutenberg_richter(
                config.m_min,
                m_max + offset,
                config.d_mag,
                config.b_value,
                target_moment * weight,
            )?;
            Ok(MfdBranch {
                key: BranchKey::gutenberg_richter(offset, config.b_value),
                weight,
                magnitudes,
                rates,
            })
        })
        .collect()
}

/// One Gaussian branch per (epistemic magnitude offset, aleatory option) pair.
///
/// Each branch is centred on `ref_mag + offset` and releases
/// `target × family_weight × w_offset × w_aleatory`.
pub fn characteristic_branches(
    config: &CharacteristicConfig,
    target_moment: f64,
    family_weight: f64,
    default_ref_mag: f64,
    tolerance: f64,
) -> Result<Vec<MfdBranch>, DomainError> {
    let ref_mag = config.ref_mag.unwrap_or(default_ref_mag);
    let epistemic = retain_weighted(&config.mag_branches, |b| b.weight, tolerance, "characteristic magnitude")?;
    let aleatory = retain_weighted(&config.aleatory, |a| a.weight, tolerance, "aleatory")?;

    let mut branches = Vec::with_capacity(epistemic.len() * aleatory.len());
    for EpistemicBranch { offset, weight: w_epi } in epistemic {
        for option in &aleatory {
            let weight = family_weight * w_epi * option.weight;
            let (magnitudes, rates) = gaussian(
                ref_mag + offset,
                option.sigma,
                option.truncation,
                option.bins,
                target_moment * weight,
            )?;
            branches.push(MfdBranch {
                key: BranchKey::characteristic(offset, option.sigma, option.truncation, option.bins),
                weight,
                magnitudes,
                rates,
            });
        }
    }
    Ok(branches)
}

/// Drops zero-weight entries (with a warning) and checks the rest sum to 1.
fn retain_weighted<T: Copy>(
    items: &[T],
    weight: impl Fn(&T) -> f64,
    tolerance: f64,
    family: &'static str,
) -> Result<Vec<T>, DomainError> {
    let mut kept = Vec::with_capacity(items.len());
    let mut sum = 0.0;
    for item in items {
        let w = weight(item);
        if !(0.0..=1.0).contains(&w) {
            return Err(DomainError::InvalidWeight(w));
        }
        if w == 0.0 {
            warn!(family, "Dropping zero-weight MFD branch");
            continue;
        }
        sum += w;
        kept.push(*item);
    }
    if kept.is_empty() {
        return Err(DomainError::NoBranches);
    }
    if (sum - 1.0).abs() > tolerance {
        return Err(DomainError::WeightSum(sum));
    }
    Ok(kept)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mfd::config::AleatoryBranch;

    const TARGET: f64 = 3.0e17;

    fn weighted_conditional_sum(branches: &[MfdBranch]) -> f64 {
        branches
            .iter()
            .map(|b| b.weight * b.conditional_moment_rate())
            .sum()
    }

    #[test]
    fn test_two_mmax_branches_split_moment() {
        let config = MfdConfig::gr_only(
            6.5,
            7.0,
            vec![EpistemicBranch::new(0.0, 0.5), EpistemicBranch::new(0.2, 0.5)],
        );
        let branches = MfdBuilder::new(config).build(TARGET, 1000.0).unwrap();
        assert_eq!(branches.len(), 2);
        for branch in &branches {
            assert_eq!(branch.weight, 0.5);
            assert!((branch.moment_rate() - 0.5 * TARGET).abs() / TARGET < 1e-9);
        }
        assert!((branches[0].max_magnitude().unwrap() - 7.0).abs() < 1e-9);
        assert!((branches[1].max_magnitude().unwrap() - 7.2).abs() < 1e-9);
        // Same moment, higher mMax: fewer events overall.
        assert!(branches[1].total_rate() < branches[0].total_rate());
        assert!((weighted_conditional_sum(&branches) - TARGET).abs() / TARGET < 1e-6);
    }

    #[test]
    fn test_mixed_tree_conserves_moment() {
        let mut config = MfdConfig::ucerf_like();
        if let Some(ch) = config.characteristic.as_mut() {
            ch.aleatory = vec![
                AleatoryBranch { sigma: 0.0, weight: 0.3, ..Default::default() },
                AleatoryBranch { sigma: 0.12, weight: 0.7, ..Default::default() },
            ];
        }
        let branches = MfdBuilder::new(config).build(TARGET, 1200.0).unwrap();
        assert_eq!(branches.len(), 3 + 3 * 2);
        let weights: f64 = branches.iter().map(|b| b.weight).sum();
        assert!((weights - 1.0).abs() < 1e-12);
        assert!((weighted_conditional_sum(&branches) - TARGET).abs() / TARGET < 1e-6);
    }

    #[test]
    fn test_labels_unique() {
        let branches = MfdBuilder::default().build(TARGET, 1000.0).unwrap();
        let mut keys: Vec<_> = branches.iter().map(|b| b.key).collect();
        keys.sort();
        keys.dedup();
        assert_eq!(keys.len(), branches.len());
    }

    #[test]
    fn test_aleatory_options_sharing_sigma_stay_distinct() {
        let mut config = MfdConfig::characteristic_only(7.0);
        if let Some(ch) = config.characteristic.as_mut() {
            ch.aleatory = vec![
                AleatoryBranch { sigma: 0.12, truncation: 2.0, bins: 9, weight: 0.5 },
                AleatoryBranch { sigma: 0.12, truncation: 3.0, bins: 13, weight: 0.5 },
            ];
        }
        let branches = MfdBuilder::new(config).build(TARGET, 1000.0).unwrap();
        assert_eq!(branches.len(), 6);
        let mut labels: Vec<String> = branches.iter().map(|b| b.label()).collect();
        labels.sort();
        labels.dedup();
        assert_eq!(labels.len(), 6);

        let mut set = crate::rupture::RuptureSet::new();
        for branch in &branches {
            set.insert(branch.key, Vec::new());
        }
        assert_eq!(set.branch_count(), 6);
    }

    #[test]
    fn test_identical_aleatory_options_rejected() {
        let mut config = MfdConfig::characteristic_only(7.0);
        if let Some(ch) = config.characteristic.as_mut() {
            ch.aleatory = vec![
                AleatoryBranch { weight: 0.5, ..Default::default() },
                AleatoryBranch { weight: 0.5, ..Default::default() },
            ];
        }
        let err = MfdBuilder::new(config).build(TARGET, 1000.0).unwrap_err();
        assert!(matches!(err, DomainError::DuplicateBranch(_)));
    }

    #[test]
    fn test_zero_weight_branch_dropped() {
        let config = MfdConfig::gr_only(
            6.5,
            7.0,
            vec![EpistemicBranch::new(-0.2, 0.0), EpistemicBranch::new(0.0, 1.0)],
        );
        let branches = MfdBuilder::new(config).build(TARGET, 1000.0).unwrap();
        assert_eq!(branches.len(), 1);
        assert_eq!(branches[0].key, BranchKey::gutenberg_richter(0.0, 0.8));
    }

    #[test]
    fn test_weights_must_sum_to_one() {
        let config = MfdConfig::gr_only(
            6.5,
            7.0,
            vec![EpistemicBranch::new(0.0, 0.5), EpistemicBranch::new(0.2, 0.4)],
        );
        let err = MfdBuilder::new(config).build(TARGET, 1000.0).unwrap_err();
        assert!(matches!(err, DomainError::WeightSum(s) if (s - 0.9).abs() < 1e-12));
    }

    #[test]
    fn test_mmax_below_mmin_is_domain_error() {
        let config = MfdConfig::gr_only(6.5, 6.6, vec![EpistemicBranch::new(-0.2, 1.0)]);
        let err = MfdBuilder::new(config).build(TARGET, 1000.0).unwrap_err();
        assert!(matches!(err, DomainError::InvalidMagnitudeRange { .. }));
    }

    #[test]
    fn test_reference_magnitude_from_area() {
        let config = MfdConfig {
            gutenberg_richter: None,
            ..MfdConfig::default()
        };
        let branches = MfdBuilder::new(config).build(TARGET, 1000.0).unwrap();
        // Ellsworth-B: 4.2 + log10(1000) = 7.2, centre branch has zero offset.
        let centre = branches
            .iter()
            .find(|b| b.key == BranchKey::characteristic(0.0, 0.12, 2.0, 9))
            .unwrap();
        assert!((centre.magnitudes[4] - 7.2).abs() < 1e-9);
    }

    #[test]
    fn test_negative_target_rejected() {
        assert!(MfdBuilder::default().build(-1.0, 1000.0).is_err());
    }
}
