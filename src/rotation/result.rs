//! Result structures for a single bond's rotation analysis

use super::age::HoldingPeriod;
use serde::Serialize;
use std::fmt;

/// Upfront cost of redeeming the old bond now
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CostBreakdown {
    /// Held less than 60 months
    pub penalty_applies: bool,
    /// Estimated early-redemption penalty (3 months of interest)
    pub penalty: f64,
    pub accrued_interest: f64,
    pub taxes_owed: f64,
    /// penalty + taxes_owed
    pub immediate_cost: f64,
    /// current value - immediate_cost
    pub net_proceeds: f64,
}

/// Year in which the compounded benefit first covers the immediate cost
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BreakEven {
    /// Nothing to recoup and the new rate is higher
    Immediate,
    Years(u32),
    /// New rate is not higher than the old one
    NotApplicable,
    NotFound { searched: u32 },
    CalculationError,
}

/// Why a loss-making rotation loses money
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LossReason {
    RateNotHigher,
    CostsOutweighBenefit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Recommendation {
    /// Positive net gain over the horizon
    ConsiderRotating,
    /// Negative net gain over the horizon
    DoNotRotate { reason: Option<LossReason> },
    Neutral,
}

/// Full metrics for a bond whose analysis ran to completion
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RotationMetrics {
    pub age: HoldingPeriod,
    pub costs: CostBreakdown,
    pub horizon_years: u32,
    /// FV at the new fixed rate minus FV at the old fixed rate
    pub compounded_benefit: f64,
    pub net_gain_or_loss: f64,
    pub break_even: BreakEven,
    pub recommendation: Recommendation,
}

/// Outcome of the analysis. Each variant carries only what was computed
/// before the analysis stopped.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum RotationStatus {
    Computed(RotationMetrics),

    /// Held less than 12 months. Figures are what a later redemption would
    /// owe; nothing is rotated.
    NotYetRedeemable {
        age: HoldingPeriod,
        accrued_interest: f64,
        taxes_owed: f64,
        net_proceeds: f64,
    },

    /// Costs consume the whole redemption value
    ProceedsNonPositive {
        age: HoldingPeriod,
        costs: CostBreakdown,
        net_gain_or_loss: f64,
    },

    InvalidHorizon {
        age: HoldingPeriod,
        costs: CostBreakdown,
        horizon_years: u32,
    },

    NumericOverflow {
        age: HoldingPeriod,
        costs: CostBreakdown,
        message: String,
    },

    InvalidInput { message: String },
}

impl RotationStatus {
    /// Human-readable explanation for every status other than `Computed`
    pub fn message(&self) -> Option<String> {
        match self {
            RotationStatus::Computed(_) => None,
            RotationStatus::NotYetRedeemable { .. } => {
                Some("Cannot be redeemed (held less than 12 months).".to_string())
            }
            RotationStatus::ProceedsNonPositive { .. } => Some(
                "Calculated Net Proceeds are zero or negative after costs. Rotation not possible/sensible."
                    .to_string(),
            ),
            RotationStatus::InvalidHorizon { horizon_years, .. } => Some(format!(
                "Investment horizon must be a positive integer (got {}).",
                horizon_years
            )),
            RotationStatus::NumericOverflow { message, .. } => Some(message.clone()),
            RotationStatus::InvalidInput { message } => Some(message.clone()),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RotationStatus::Computed(_) => "computed",
            RotationStatus::NotYetRedeemable { .. } => "not_yet_redeemable",
            RotationStatus::ProceedsNonPositive { .. } => "proceeds_non_positive",
            RotationStatus::InvalidHorizon { .. } => "invalid_horizon",
            RotationStatus::NumericOverflow { .. } => "numeric_overflow",
            RotationStatus::InvalidInput { .. } => "invalid_input",
        }
    }
}

/// Data-quality and incentive remarks; they never stop the analysis
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum Advisory {
    ValueBelowPrincipal,
    RateNotHigher { new_rate_pct: f64, old_rate_pct: f64 },
}

impl Advisory {
    pub fn is_warning(&self) -> bool {
        matches!(self, Advisory::ValueBelowPrincipal)
    }
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Advisory::ValueBelowPrincipal => {
                write!(f, "Current value is less than principal. Check inputs.")
            }
            Advisory::RateNotHigher { new_rate_pct, old_rate_pct } => write!(
                f,
                "New fixed rate ({}%) is not higher than this bond's rate ({}%).",
                new_rate_pct, old_rate_pct
            ),
        }
    }
}

/// Analysis of one bond against one set of policy parameters
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RotationResult {
    pub status: RotationStatus,
    pub advisories: Vec<Advisory>,
}

impl RotationResult {
    pub(crate) fn new(status: RotationStatus, advisories: Vec<Advisory>) -> Self {
        Self { status, advisories }
    }

    pub fn is_computed(&self) -> bool {
        matches!(self.status, RotationStatus::Computed(_))
    }

    pub fn metrics(&self) -> Option<&RotationMetrics> {
        match &self.status {
            RotationStatus::Computed(metrics) => Some(metrics),
            _ => None,
        }
    }

    pub fn age(&self) -> Option<HoldingPeriod> {
        match &self.status {
            RotationStatus::Computed(m) => Some(m.age),
            RotationStatus::NotYetRedeemable { age, .. }
            | RotationStatus::ProceedsNonPositive { age, .. }
            | RotationStatus::InvalidHorizon { age, .. }
            | RotationStatus::NumericOverflow { age, .. } => Some(*age),
            RotationStatus::InvalidInput { .. } => None,
        }
    }

    /// Cost breakdown, when the analysis got as far as computing it
    pub fn costs(&self) -> Option<&CostBreakdown> {
        match &self.status {
            RotationStatus::Computed(m) => Some(&m.costs),
            RotationStatus::ProceedsNonPositive { costs, .. }
            | RotationStatus::InvalidHorizon { costs, .. }
            | RotationStatus::NumericOverflow { costs, .. } => Some(costs),
            _ => None,
        }
    }

    /// Net gain over the horizon, only for a completed analysis
    pub fn net_gain(&self) -> Option<f64> {
        self.metrics().map(|m| m.net_gain_or_loss)
    }

    pub fn warning(&self) -> Option<&Advisory> {
        self.advisories.iter().find(|a| a.is_warning())
    }

    pub fn note(&self) -> Option<&Advisory> {
        self.advisories.iter().find(|a| !a.is_warning())
    }
}
