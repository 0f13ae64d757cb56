//! Run-wide policy parameters shared by every bond in a batch

use crate::error::ParameterError;
use serde::{Deserialize, Serialize};

/// Default fixed rate on a newly purchased bond (%)
pub const DEFAULT_NEW_FIXED_RATE_PCT: f64 = 1.3;

/// Default federal marginal tax rate applied to accrued interest (%)
pub const DEFAULT_FEDERAL_TAX_RATE_PCT: f64 = 22.0;

/// Default number of years the replacement bond is expected to be held
pub const DEFAULT_INVESTMENT_HORIZON_YEARS: u32 = 10;

/// Assumptions applied to every bond in a run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PolicyParameters {
    /// Fixed rate offered on a new bond, in percent
    pub new_fixed_rate_pct: f64,

    /// Federal tax rate on accrued interest, in percent
    pub federal_tax_rate_pct: f64,

    /// Holding horizon for the replacement bond, in whole years
    pub investment_horizon_years: u32,
}

impl PolicyParameters {
    pub fn new(new_fixed_rate_pct: f64, federal_tax_rate_pct: f64, investment_horizon_years: u32) -> Self {
        Self {
            new_fixed_rate_pct,
            federal_tax_rate_pct,
            investment_horizon_years,
        }
    }

    /// Check the parameters before a run. The calculator still copes with
    /// invalid values bond by bond, but a front end should reject them here.
    pub fn validate(&self) -> Result<(), ParameterError> {
        for (name, value) in [
            ("New fixed rate", self.new_fixed_rate_pct),
            ("Federal tax rate", self.federal_tax_rate_pct),
        ] {
            if !value.is_finite() {
                return Err(ParameterError::NotFinite { name, value });
            }
            if value < 0.0 {
                return Err(ParameterError::NegativeRate { name, value });
            }
        }
        if self.investment_horizon_years == 0 {
            return Err(ParameterError::NonPositiveHorizon);
        }
        Ok(())
    }

    pub(crate) fn new_fixed_rate(&self) -> f64 {
        self.new_fixed_rate_pct / 100.0
    }

    pub(crate) fn tax_rate(&self) -> f64 {
        self.federal_tax_rate_pct / 100.0
    }

    pub(crate) fn is_numeric(&self) -> bool {
        self.new_fixed_rate_pct.is_finite() && self.federal_tax_rate_pct.is_finite()
    }
}

impl Default for PolicyParameters {
    fn default() -> Self {
        Self::new(
            DEFAULT_NEW_FIXED_RATE_PCT,
            DEFAULT_FEDERAL_TAX_RATE_PCT,
            DEFAULT_INVESTMENT_HORIZON_YEARS,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let params = PolicyParameters::default();
        assert_eq!(params.new_fixed_rate_pct, 1.3);
        assert_eq!(params.federal_tax_rate_pct, 22.0);
        assert_eq!(params.investment_horizon_years, 10);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_validation_errors() {
        assert_eq!(
            PolicyParameters::new(-0.1, 22.0, 10).validate(),
            Err(ParameterError::NegativeRate { name: "New fixed rate", value: -0.1 })
        );
        assert_eq!(
            PolicyParameters::new(1.3, -1.0, 10).validate(),
            Err(ParameterError::NegativeRate { name: "Federal tax rate", value: -1.0 })
        );
        assert_eq!(
            PolicyParameters::new(1.3, 22.0, 0).validate(),
            Err(ParameterError::NonPositiveHorizon)
        );
        assert!(matches!(
            PolicyParameters::new(f64::NAN, 22.0, 10).validate(),
            Err(ParameterError::NotFinite { name: "New fixed rate", .. })
        ));
    }

    #[test]
    fn test_zero_rates_are_allowed() {
        assert!(PolicyParameters::new(0.0, 0.0, 1).validate().is_ok());
    }
}
