//! Rotation calculator: cost of redeeming an old bond now versus the
//! compounded benefit of reinvesting the proceeds at a higher fixed rate

use super::age::HoldingPeriod;
use super::result::{
    Advisory, BreakEven, CostBreakdown, LossReason, Recommendation, RotationMetrics,
    RotationResult, RotationStatus,
};
use crate::bond::BondInput;
use crate::parameters::PolicyParameters;
use chrono::NaiveDate;

/// Bonds held fewer months than this cannot be redeemed
pub const MIN_HOLDING_MONTHS: u32 = 12;

/// Redemption before this many months forfeits interest
pub const PENALTY_FREE_MONTHS: u32 = 60;

/// Months of interest forfeited by an early redemption
pub const PENALTY_INTEREST_MONTHS: f64 = 3.0;

/// Upper bound of the break-even search
pub const MAX_BREAK_EVEN_YEARS: u32 = 100;

/// Stateless calculator for one set of parameters and valuation date
#[derive(Debug, Clone)]
pub struct RotationCalculator {
    parameters: PolicyParameters,
    valuation_date: NaiveDate,
}

impl RotationCalculator {
    pub fn new(parameters: PolicyParameters, valuation_date: NaiveDate) -> Self {
        Self {
            parameters,
            valuation_date,
        }
    }

    pub fn parameters(&self) -> &PolicyParameters {
        &self.parameters
    }

    pub fn valuation_date(&self) -> NaiveDate {
        self.valuation_date
    }

    /// Analyze a single bond. Always returns a result; failures are
    /// reported through [`RotationStatus`].
    pub fn compute(&self, bond: &BondInput) -> RotationResult {
        let advisories = self.advisories(bond);
        let status = self.compute_status(bond);
        RotationResult::new(status, advisories)
    }

    fn advisories(&self, bond: &BondInput) -> Vec<Advisory> {
        let mut advisories = Vec::new();
        if bond.current_value < bond.principal {
            advisories.push(Advisory::ValueBelowPrincipal);
        }
        if self.parameters.new_fixed_rate_pct <= bond.fixed_rate_pct {
            advisories.push(Advisory::RateNotHigher {
                new_rate_pct: self.parameters.new_fixed_rate_pct,
                old_rate_pct: bond.fixed_rate_pct,
            });
        }
        advisories
    }

    fn compute_status(&self, bond: &BondInput) -> RotationStatus {
        if !bond.is_numeric() || !self.parameters.is_numeric() {
            return RotationStatus::InvalidInput {
                message: "Invalid non-numeric rate/percentage detected.".to_string(),
            };
        }

        let old_fixed_rate = bond.fixed_rate_pct / 100.0;
        let old_composite_rate = bond.composite_rate_pct / 100.0;
        let new_fixed_rate = self.parameters.new_fixed_rate();
        let tax_rate = self.parameters.tax_rate();

        let age = match HoldingPeriod::between(bond.issue_date, self.valuation_date) {
            Some(age) => age,
            None => {
                return RotationStatus::InvalidInput {
                    message: format!(
                        "Could not calculate age from issue date {}: after valuation date {}",
                        bond.issue_date, self.valuation_date
                    ),
                };
            }
        };
        let months_held = age.total_months();

        let accrued_interest = bond.accrued_interest();
        let taxes_owed = accrued_interest * tax_rate;

        if months_held < MIN_HOLDING_MONTHS {
            return RotationStatus::NotYetRedeemable {
                age,
                accrued_interest,
                taxes_owed,
                net_proceeds: bond.current_value - taxes_owed,
            };
        }

        let penalty_applies = months_held < PENALTY_FREE_MONTHS;
        let penalty = if penalty_applies {
            bond.current_value * old_composite_rate * PENALTY_INTEREST_MONTHS / 12.0
        } else {
            0.0
        };

        let immediate_cost = penalty + taxes_owed;
        let costs = CostBreakdown {
            penalty_applies,
            penalty,
            accrued_interest,
            taxes_owed,
            immediate_cost,
            net_proceeds: bond.current_value - immediate_cost,
        };

        if costs.net_proceeds <= 0.0 {
            return RotationStatus::ProceedsNonPositive {
                age,
                costs,
                net_gain_or_loss: -immediate_cost,
            };
        }

        let horizon_years = self.parameters.investment_horizon_years;
        if horizon_years == 0 {
            return RotationStatus::InvalidHorizon {
                age,
                costs,
                horizon_years,
            };
        }

        let compounded_benefit =
            match compounded_benefit(costs.net_proceeds, new_fixed_rate, old_fixed_rate, horizon_years) {
                Some(benefit) => benefit,
                None => {
                    return RotationStatus::NumericOverflow {
                        age,
                        costs,
                        message: "Calculation resulted in overflow (likely very large horizon or rates)."
                            .to_string(),
                    };
                }
            };

        let net_gain_or_loss = compounded_benefit - immediate_cost;
        let break_even = find_break_even(costs.net_proceeds, new_fixed_rate, old_fixed_rate, immediate_cost);
        let recommendation = recommend(net_gain_or_loss, &costs, compounded_benefit, new_fixed_rate, old_fixed_rate);

        RotationStatus::Computed(RotationMetrics {
            age,
            costs,
            horizon_years,
            compounded_benefit,
            net_gain_or_loss,
            break_even,
            recommendation,
        })
    }
}

/// Difference between annually compounded future values at the new and old
/// fixed rates, or None if either side is not finite.
pub fn compounded_benefit(principal: f64, new_rate: f64, old_rate: f64, years: u32) -> Option<f64> {
    let years = i32::try_from(years).ok()?;
    let fv_new = principal * (1.0 + new_rate).powi(years);
    let fv_old = principal * (1.0 + old_rate).powi(years);
    let benefit = fv_new - fv_old;

    if fv_new.is_finite() && fv_old.is_finite() && benefit.is_finite() {
        Some(benefit)
    } else {
        None
    }
}

/// First year in 1..=MAX_BREAK_EVEN_YEARS whose compounded benefit covers
/// the immediate cost
pub fn find_break_even(net_proceeds: f64, new_rate: f64, old_rate: f64, immediate_cost: f64) -> BreakEven {
    if new_rate <= old_rate {
        return BreakEven::NotApplicable;
    }
    if immediate_cost <= 0.0 {
        return BreakEven::Immediate;
    }

    for year in 1..=MAX_BREAK_EVEN_YEARS {
        match compounded_benefit(net_proceeds, new_rate, old_rate, year) {
            Some(benefit) if benefit >= immediate_cost => return BreakEven::Years(year),
            Some(_) => {}
            None => return BreakEven::CalculationError,
        }
    }

    BreakEven::NotFound {
        searched: MAX_BREAK_EVEN_YEARS,
    }
}

fn recommend(
    net_gain_or_loss: f64,
    costs: &CostBreakdown,
    compounded_benefit: f64,
    new_rate: f64,
    old_rate: f64,
) -> Recommendation {
    if net_gain_or_loss > 0.0 {
        Recommendation::ConsiderRotating
    } else if net_gain_or_loss < 0.0 {
        let reason = if old_rate >= new_rate {
            Some(LossReason::RateNotHigher)
        } else if costs.immediate_cost > compounded_benefit {
            Some(LossReason::CostsOutweighBenefit)
        } else {
            None
        };
        Recommendation::DoNotRotate { reason }
    } else {
        Recommendation::Neutral
    }
}
