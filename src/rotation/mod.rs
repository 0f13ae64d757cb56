//! Per-bond rotation analysis

mod age;
mod engine;
mod result;

pub use age::HoldingPeriod;
pub use engine::{
    compounded_benefit, find_break_even, RotationCalculator, MAX_BREAK_EVEN_YEARS,
    MIN_HOLDING_MONTHS, PENALTY_FREE_MONTHS, PENALTY_INTEREST_MONTHS,
};
pub use result::{
    Advisory, BreakEven, CostBreakdown, LossReason, Recommendation, RotationMetrics,
    RotationResult, RotationStatus,
};
