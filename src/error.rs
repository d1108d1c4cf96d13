//! Error types shared across the forecast engine.
//!
//! A [`ConsistencyError`] means upstream data is corrupt and the whole fault
//! system must be abandoned. A [`DomainError`] rejects one bad query or
//! parameter.

use thiserror::Error;

/// Fatal inconsistencies between inputs that are supposed to line up.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConsistencyError {
    #[error("slip-rate interpolation produced {got} values for {expected} sections")]
    SlipRateCount { expected: usize, got: usize },
    #[error("slip-rate anchors must start at section 0, first anchor is at {0}")]
    AnchorOffset(usize),
    #[error("rupture attribute '{name}' has {got} entries, expected {expected}")]
    AttributeLength {
        name: &'static str,
        expected: usize,
        got: usize,
    },
    #[error("section index {0} is not present in the section arena")]
    UnknownSection(usize),
    #[error("section index {0} appears more than once")]
    DuplicateSection(usize),
    #[error("cannot build a composite surface from zero sections")]
    EmptyRupture,
}

/// Out-of-range parameters and queries.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("magnitude {magnitude} outside the supported range [{min}, {max}]")]
    MagnitudeOutOfRange { magnitude: f64, min: f64, max: f64 },
    #[error("maximum magnitude {m_max} must exceed minimum magnitude {m_min}")]
    InvalidMagnitudeRange { m_min: f64, m_max: f64 },
    #[error("magnitude bin width must be positive, got {0}")]
    InvalidBinWidth(f64),
    #[error("branch weights sum to {0}, expected 1")]
    WeightSum(f64),
    #[error("branch weight {0} outside [0, 1]")]
    InvalidWeight(f64),
    #[error("no branch carries positive weight")]
    NoBranches,
    #[error("two branches share the key '{0}'")]
    DuplicateBranch(String),
    #[error("dip {0} outside (0, 180)")]
    InvalidDip(f64),
    #[error("lower depth {lower} must exceed top depth {top}")]
    InvalidDepths { top: f64, lower: f64 },
    #[error("aseismic slip factor {0} outside [0, 1]")]
    InvalidAseismicFactor(f64),
    #[error("trace needs at least one point")]
    EmptyTrace,
    #[error("{name} must be positive and finite, got {value}")]
    NonPositive { name: &'static str, value: f64 },
    #[error("{name} must be non-negative and finite, got {value}")]
    Negative { name: &'static str, value: f64 },
}

/// Either failure family, for operations that can raise both.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ForecastError {
    #[error(transparent)]
    Consistency(#[from] ConsistencyError),
    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// Rejects NaN, infinities and values `<= 0`.
pub(crate) fn ensure_positive(name: &'static str, value: f64) -> Result<f64, DomainError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(DomainError::NonPositive { name, value })
    }
}

/// Rejects NaN, infinities and values `< 0`.
pub(crate) fn ensure_non_negative(name: &'static str, value: f64) -> Result<f64, DomainError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(DomainError::Negative { name, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = ConsistencyError::SlipRateCount { expected: 5, got: 4 };
        assert_eq!(
            err.to_string(),
            "slip-rate interpolation produced 4 values for 5 sections"
        );

        let err = DomainError::InvalidMagnitudeRange { m_min: 6.5, m_max: 6.0 };
        assert!(err.to_string().contains("6.5"));
    }

    #[test]
    fn test_forecast_error_from() {
        let err: ForecastError = DomainError::EmptyTrace.into();
        assert!(matches!(err, ForecastError::Domain(DomainError::EmptyTrace)));
    }

    #[test]
    fn test_ensure_helpers() {
        assert!(ensure_positive("length", 1.0).is_ok());
        assert!(ensure_positive("length", 0.0).is_err());
        assert!(ensure_positive("length", f64::NAN).is_err());
        assert!(ensure_non_negative("rate", 0.0).is_ok());
        assert!(ensure_non_negative("rate", -1e-9).is_err());
    }
}
