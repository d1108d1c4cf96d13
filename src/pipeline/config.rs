//! Forecast configuration and the shared read-only context built from it.

use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::fault::SectionConfig;
use crate::mfd::{MagLengthModel, MfdConfig};
use crate::rupture::{AftershockConfig, AftershockRateFilter};

/// Everything a forecast run is parameterized by.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastConfig {
    pub sections: SectionConfig,
    pub mfd: MfdConfig,
    pub aftershock: AftershockConfig,
    /// Reduce fault rupture rates to their mainshock share.
    pub apply_aftershock_filter: bool,
    /// Rupture length relation used to size generator windows.
    pub mag_length: MagLengthModel,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            sections: SectionConfig::default(),
            mfd: MfdConfig::default(),
            aftershock: AftershockConfig::default(),
            apply_aftershock_filter: true,
            mag_length: MagLengthModel::default(),
        }
    }
}

impl ForecastConfig {
    /// 10 km sections for quick looks at large systems.
    pub fn coarse() -> Self {
        Self {
            sections: SectionConfig::coarse(),
            ..Default::default()
        }
    }

    /// Raw rates, no aftershock reduction.
    pub fn unfiltered() -> Self {
        Self {
            apply_aftershock_filter: false,
            ..Default::default()
        }
    }
}

/// Config plus the lookup tables derived from it.
///
/// Built once before any fault system is processed and passed by reference
/// to every stage, so concurrent runs share it without synchronization.
#[derive(Debug, Clone)]
pub struct ForecastContext {
    pub config: ForecastConfig,
    pub aftershock: AftershockRateFilter,
}

impl ForecastContext {
    pub fn new(config: ForecastConfig) -> Result<Self, DomainError> {
        let aftershock = AftershockRateFilter::new(&config.aftershock)?;
        Ok(Self { config, aftershock })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_builds_filter_eagerly() {
        let ctx = ForecastContext::new(ForecastConfig::default()).unwrap();
        assert_eq!(ctx.aftershock.fault_factor(), 0.97);
    }

    #[test]
    fn test_bad_aftershock_config_fails_early() {
        let mut config = ForecastConfig::default();
        config.aftershock.delta_mag = 0.0;
        assert!(ForecastContext::new(config).is_err());
    }

    #[test]
    fn test_partial_toml() {
        let config: ForecastConfig = toml::from_str(
            r#"
            apply_aftershock_filter = false

            [sections]
            target_section_length_km = 7.5
            "#,
        )
        .unwrap();
        assert!(!config.apply_aftershock_filter);
        assert_eq!(config.sections.target_section_length_km, 7.5);
        assert_eq!(config.sections.slip_rate_decimals, 4);
        assert_eq!(config.mag_length, MagLengthModel::WellsCoppersmith1994);
    }
}
