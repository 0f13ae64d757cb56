//! Batch runner for analyzing a whole holdings file at once
//!
//! Every bond is analyzed independently against the same parameters;
//! results come back in input order.

use crate::bond::BondInput;
use crate::parameters::PolicyParameters;
use crate::rotation::{RotationCalculator, RotationResult};
use chrono::NaiveDate;
use rayon::prelude::*;
use serde::Serialize;
use std::time::Instant;

/// One bond's confirmation number paired with its analysis
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BondOutcome {
    pub confirmation: String,
    pub result: RotationResult,
}

/// Ordered, immutable results of a batch run
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchResult {
    outcomes: Vec<BondOutcome>,
}

/// Aggregate over a batch: bonds worth rotating and their combined gain
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BatchSummary {
    pub bonds_analyzed: usize,
    /// Completed analyses with a positive net gain
    pub recommended_count: usize,
    /// Sum of the net gains of the recommended bonds
    pub total_net_gain: f64,
}

impl BatchResult {
    pub fn outcomes(&self) -> &[BondOutcome] {
        &self.outcomes
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &BondOutcome> {
        self.outcomes.iter()
    }

    pub fn get(&self, confirmation: &str) -> Option<&RotationResult> {
        self.outcomes
            .iter()
            .find(|o| o.confirmation == confirmation)
            .map(|o| &o.result)
    }

    pub fn summary(&self) -> BatchSummary {
        let gains: Vec<f64> = self
            .outcomes
            .iter()
            .filter_map(|o| o.result.net_gain())
            .filter(|&gain| gain > 0.0)
            .collect();

        BatchSummary {
            bonds_analyzed: self.outcomes.len(),
            recommended_count: gains.len(),
            total_net_gain: gains.iter().sum(),
        }
    }
}

/// Runs the rotation analysis for many bonds with shared parameters
#[derive(Debug, Clone)]
pub struct BatchRunner {
    calculator: RotationCalculator,
}

impl BatchRunner {
    pub fn new(parameters: PolicyParameters, valuation_date: NaiveDate) -> Self {
        Self {
            calculator: RotationCalculator::new(parameters, valuation_date),
        }
    }

    pub fn with_calculator(calculator: RotationCalculator) -> Self {
        Self { calculator }
    }

    /// Analyze a single bond
    pub fn run(&self, bond: &BondInput) -> RotationResult {
        self.calculator.compute(bond)
    }

    /// Analyze every bond. Confirmation numbers are expected to be unique;
    /// the loader enforces this.
    pub fn run_batch(&self, bonds: &[BondInput]) -> BatchResult {
        let start = Instant::now();
        log::info!(
            "Analyzing {} bonds (new rate {}%, tax {}%, horizon {} years, as of {})",
            bonds.len(),
            self.calculator.parameters().new_fixed_rate_pct,
            self.calculator.parameters().federal_tax_rate_pct,
            self.calculator.parameters().investment_horizon_years,
            self.calculator.valuation_date(),
        );

        let outcomes: Vec<BondOutcome> = bonds
            .par_iter()
            .map(|bond| {
                let result = self.calculator.compute(bond);
                log::debug!("{}: {}", bond.confirmation, result.status.label());
                BondOutcome {
                    confirmation: bond.confirmation.clone(),
                    result,
                }
            })
            .collect();

        log::info!("Analysis complete in {:?}", start.elapsed());
        BatchResult { outcomes }
    }

    pub fn calculator(&self) -> &RotationCalculator {
        &self.calculator
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rotation::RotationStatus;
    use approx::assert_abs_diff_eq;

    fn as_of() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    fn bond(conf: &str, issued: (i32, u32, u32), fixed: f64, value: f64) -> BondInput {
        let (y, m, d) = issued;
        BondInput::new(conf, NaiveDate::from_ymd_opt(y, m, d).unwrap(), fixed, 4.0, 1000.0, value)
    }

    fn holdings() -> Vec<BondInput> {
        vec![
            // Old zero-fixed-rate bond: rotating pays off
            bond("A", (2014, 1, 1), 0.0, 1300.0),
            // Too new to redeem
            bond("B", (2024, 1, 1), 0.0, 1020.0),
            // Already has a better fixed rate: loss
            bond("C", (2018, 1, 1), 1.5, 1200.0),
            // Another winner
            bond("D", (2016, 6, 1), 0.1, 1250.0),
        ]
    }

    #[test]
    fn test_batch_preserves_order() {
        let runner = BatchRunner::new(PolicyParameters::default(), as_of());
        let batch = runner.run_batch(&holdings());

        let order: Vec<_> = batch.iter().map(|o| o.confirmation.as_str()).collect();
        assert_eq!(order, vec!["A", "B", "C", "D"]);
        assert!(matches!(
            batch.get("B").unwrap().status,
            RotationStatus::NotYetRedeemable { .. }
        ));
        assert!(batch.get("Z").is_none());
    }

    #[test]
    fn test_summary_counts_only_computed_gains() {
        let runner = BatchRunner::new(PolicyParameters::default(), as_of());
        let batch = runner.run_batch(&holdings());
        let summary = batch.summary();

        let gain_a = batch.get("A").unwrap().net_gain().unwrap();
        let gain_c = batch.get("C").unwrap().net_gain().unwrap();
        let gain_d = batch.get("D").unwrap().net_gain().unwrap();
        assert!(gain_a > 0.0);
        assert!(gain_c < 0.0);
        assert!(gain_d > 0.0);

        assert_eq!(summary.bonds_analyzed, 4);
        assert_eq!(summary.recommended_count, 2);
        assert_abs_diff_eq!(summary.total_net_gain, gain_a + gain_d, epsilon = 1e-9);
    }

    #[test]
    fn test_single_run_matches_batch() {
        let runner = BatchRunner::new(PolicyParameters::default(), as_of());
        let bonds = holdings();
        let batch = runner.run_batch(&bonds);
        assert_eq!(&runner.run(&bonds[3]), batch.get("D").unwrap());
    }

    #[test]
    fn test_empty_batch() {
        let runner = BatchRunner::new(PolicyParameters::default(), as_of());
        let batch = runner.run_batch(&[]);
        assert!(batch.is_empty());
        assert_eq!(
            batch.summary(),
            BatchSummary { bonds_analyzed: 0, recommended_count: 0, total_net_gain: 0.0 }
        );
    }
}
