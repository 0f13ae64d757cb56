//! Bond records matching the holdings export format

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single savings bond held by the investor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BondInput {
    /// Confirmation number from the issuer (unique within a batch)
    pub confirmation: String,

    /// Date the bond was issued
    pub issue_date: NaiveDate,

    /// Fixed rate in percent (e.g. 0.4 for 0.4%)
    pub fixed_rate_pct: f64,

    /// Current composite rate in percent (fixed + inflation component)
    pub composite_rate_pct: f64,

    /// Original purchase amount
    pub principal: f64,

    /// Current redemption value
    pub current_value: f64,
}

impl BondInput {
    pub fn new(
        confirmation: impl Into<String>,
        issue_date: NaiveDate,
        fixed_rate_pct: f64,
        composite_rate_pct: f64,
        principal: f64,
        current_value: f64,
    ) -> Self {
        Self {
            confirmation: confirmation.into(),
            issue_date,
            fixed_rate_pct,
            composite_rate_pct,
            principal,
            current_value,
        }
    }

    /// Interest earned so far, floored at zero
    pub fn accrued_interest(&self) -> f64 {
        (self.current_value - self.principal).max(0.0)
    }

    /// True when every rate and amount is a finite number
    pub fn is_numeric(&self) -> bool {
        [
            self.fixed_rate_pct,
            self.composite_rate_pct,
            self.principal,
            self.current_value,
        ]
        .iter()
        .all(|v| v.is_finite())
    }

    /// True when any rate or amount is negative
    pub fn has_negative_values(&self) -> bool {
        self.fixed_rate_pct < 0.0
            || self.composite_rate_pct < 0.0
            || self.principal < 0.0
            || self.current_value < 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bond(principal: f64, current_value: f64) -> BondInput {
        BondInput::new(
            "I123",
            NaiveDate::from_ymd_opt(2020, 5, 1).unwrap(),
            0.0,
            3.54,
            principal,
            current_value,
        )
    }

    #[test]
    fn test_accrued_interest_floor() {
        assert_eq!(bond(1000.0, 1240.0).accrued_interest(), 240.0);
        assert_eq!(bond(1000.0, 980.0).accrued_interest(), 0.0);
    }

    #[test]
    fn test_numeric_checks() {
        assert!(bond(1000.0, 1240.0).is_numeric());
        assert!(!bond(f64::NAN, 1240.0).is_numeric());
        assert!(!bond(1000.0, f64::INFINITY).is_numeric());
        assert!(bond(-1.0, 1240.0).has_negative_values());
        assert!(!bond(1000.0, 1240.0).has_negative_values());
    }
}
