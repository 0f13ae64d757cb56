//! Calendar-aware holding period of a bond

use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Whole years and months between issue date and valuation date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoldingPeriod {
    pub years: u32,
    /// Remainder months (0-11)
    pub months: u32,
}

impl HoldingPeriod {
    /// Holding period from `issue_date` to `as_of`, or None if the bond was
    /// issued after `as_of`.
    ///
    /// A month is only counted once the issue date advanced by that many
    /// months (clamped to the end of the month) is on or before `as_of`, so
    /// 2019-01-15 to 2024-01-10 is 4 years 11 months.
    pub fn between(issue_date: NaiveDate, as_of: NaiveDate) -> Option<Self> {
        if as_of < issue_date {
            return None;
        }

        let mut total = (as_of.year() - issue_date.year()) * 12
            + as_of.month() as i32
            - issue_date.month() as i32;
        let anniversary = issue_date.checked_add_months(Months::new(total.max(0) as u32))?;
        if anniversary > as_of {
            total -= 1;
        }

        let total = u32::try_from(total).ok()?;
        Some(Self::from_total_months(total))
    }

    pub fn from_total_months(total: u32) -> Self {
        Self {
            years: total / 12,
            months: total % 12,
        }
    }

    pub fn total_months(&self) -> u32 {
        self.years * 12 + self.months
    }
}

impl fmt::Display for HoldingPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} years, {} months ({} total months)",
            self.years,
            self.months,
            self.total_months()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_day_of_month_matters() {
        let held = HoldingPeriod::between(date(2019, 1, 15), date(2024, 1, 10)).unwrap();
        assert_eq!(held.years, 4);
        assert_eq!(held.months, 11);
        assert_eq!(held.total_months(), 59);

        let held = HoldingPeriod::between(date(2019, 1, 15), date(2024, 1, 15)).unwrap();
        assert_eq!(held.total_months(), 60);
    }

    #[test]
    fn test_same_day_is_zero() {
        let held = HoldingPeriod::between(date(2024, 3, 1), date(2024, 3, 1)).unwrap();
        assert_eq!(held.total_months(), 0);
    }

    #[test]
    fn test_month_end_clamping() {
        // Jan 31 + 1 month clamps to Feb 29 in a leap year
        assert_eq!(HoldingPeriod::between(date(2024, 1, 31), date(2024, 2, 28)).unwrap().total_months(), 0);
        assert_eq!(HoldingPeriod::between(date(2024, 1, 31), date(2024, 2, 29)).unwrap().total_months(), 1);
        assert_eq!(HoldingPeriod::between(date(2023, 1, 31), date(2023, 2, 28)).unwrap().total_months(), 1);
    }

    #[test]
    fn test_future_issue_date() {
        assert!(HoldingPeriod::between(date(2024, 6, 2), date(2024, 6, 1)).is_none());
    }

    #[test]
    fn test_display() {
        let held = HoldingPeriod::from_total_months(29);
        assert_eq!(held.to_string(), "2 years, 5 months (29 total months)");
    }
}
