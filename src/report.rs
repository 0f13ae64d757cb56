//! Plain-text rendering of analysis results

use crate::batch::BatchSummary;
use crate::bond::{BondInput, SkippedRow};
use crate::parameters::PolicyParameters;
use crate::rotation::{
    BreakEven, LossReason, Recommendation, RotationMetrics, RotationResult, RotationStatus,
};
use std::fmt::Write;

const RULE: &str = "-------------------------";

pub const DISCLAIMERS: [&str; 9] = [
    "Select a bond with --bond to see only its analysis.",
    "This is an estimation based on the inputs and assumptions provided.",
    "Penalty calculation is an estimate based on the CURRENT composite rate (3 months of interest).",
    "Assumes the reinvested amount ('Net Proceeds') matches the new bond purchase.",
    "Does NOT account for state/local taxes (I Bond interest is typically exempt).",
    "Does NOT factor in the annual $10,000 purchase limit per SSN.",
    "Does NOT compare returns against other potential investments.",
    "Market conditions and future inflation rates can change.",
    "Consult with a qualified financial advisor before making decisions.",
];

/// Dollar amount with thousands separators, e.g. `$1,234.50`
pub fn format_currency(amount: f64) -> String {
    let s = format!("{:.2}", amount.abs());
    let (integer_part, decimal_part) = s.split_once('.').unwrap_or((s.as_str(), "00"));

    let digits: Vec<char> = integer_part.chars().collect();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(*c);
    }

    let sign = if amount < 0.0 && s.bytes().any(|b| b != b'0' && b != b'.') {
        "-"
    } else {
        ""
    };
    format!("${}{}.{}", sign, grouped, decimal_part)
}

/// Detailed analysis of one bond
pub fn format_bond_details(bond: &BondInput, result: &RotationResult, params: &PolicyParameters) -> String {
    let mut lines = Vec::new();
    lines.push(format!("--- Details for Bond (Conf: {}) ---", bond.confirmation));
    lines.push(format!(
        "    (Issued: {}, Fixed Rate: {}%)",
        bond.issue_date, bond.fixed_rate_pct
    ));
    lines.push(format!(
        "    (Principal: {}, Current Value: {})",
        format_currency(bond.principal),
        format_currency(bond.current_value)
    ));

    if let Some(warning) = result.warning() {
        lines.push(format!("\nInput Warning: {}", warning));
    }
    if let Some(note) = result.note() {
        lines.push(format!("Note: {}", note));
    }

    let age = result
        .age()
        .map(|a| a.to_string())
        .unwrap_or_else(|| "N/A".to_string());
    lines.push(format!("\nBond Age: {}", age));

    match &result.status {
        RotationStatus::NotYetRedeemable { accrued_interest, taxes_owed, .. } => {
            if let Some(message) = result.status.message() {
                lines.push(format!("Status: {}", message));
            }
            lines.push(format!("Accrued Interest: {}", format_currency(*accrued_interest)));
            lines.push(format!(
                "Estimated Federal Taxes Owed (if redeemed later): {}",
                format_currency(*taxes_owed)
            ));
            lines.push(RULE.to_string());
            lines.push("Conclusion: Cannot rotate now.".to_string());
        }
        RotationStatus::Computed(metrics) => {
            push_metrics(&mut lines, bond, metrics, params);
        }
        status => {
            if let Some(message) = status.message() {
                lines.push(format!("\nAnalysis Error: {}", message));
            }
        }
    }

    lines.join("\n")
}

fn push_metrics(lines: &mut Vec<String>, bond: &BondInput, m: &RotationMetrics, params: &PolicyParameters) {
    let costs = &m.costs;
    if costs.penalty_applies {
        lines.push("Penalty Applies (Held < 5 years): YES".to_string());
        lines.push(format!("  Estimated Penalty: {}", format_currency(costs.penalty)));
    } else {
        lines.push("Penalty Applies (Held >= 5 years): NO".to_string());
        lines.push(format!("  Estimated Penalty: {}", format_currency(0.0)));
    }

    lines.push(format!("Accrued Interest: {}", format_currency(costs.accrued_interest)));
    lines.push(format!(
        "Estimated Federal Taxes Owed (at {:.1}%): {}",
        params.federal_tax_rate_pct,
        format_currency(costs.taxes_owed)
    ));
    lines.push(format!(
        "Total Immediate Cost of Selling: {}",
        format_currency(costs.immediate_cost)
    ));
    lines.push(format!("Net Proceeds to Reinvest: {}", format_currency(costs.net_proceeds)));
    lines.push(RULE.to_string());
    lines.push(format!("Analysis for {}-Year Horizon:", m.horizon_years));

    let rate_not_higher = params.new_fixed_rate_pct <= bond.fixed_rate_pct;
    let break_even = match m.break_even {
        BreakEven::Immediate => "Immediate (Year 0)".to_string(),
        BreakEven::Years(years) => format!("Approx. {} years", years),
        BreakEven::CalculationError => "Could not calculate accurately.".to_string(),
        BreakEven::NotFound { searched } => format!("Not reached within {} years.", searched),
        BreakEven::NotApplicable if rate_not_higher && costs.immediate_cost > 0.0 => {
            "Not applicable (New fixed rate not higher)".to_string()
        }
        BreakEven::NotApplicable => "Not applicable (No cost, new rate not higher)".to_string(),
    };
    lines.push(format!("Estimated Break-Even Point: {}", break_even));

    lines.push(format!(
        "Compounded Benefit from Higher Fixed Rate: {}",
        format_currency(m.compounded_benefit)
    ));
    lines.push(format!(
        "Net Financial Gain/(Loss) from Rotation: {}",
        format_currency(m.net_gain_or_loss)
    ));
    lines.push(RULE.to_string());

    lines.push("Conclusion for this Bond:".to_string());
    match m.recommendation {
        Recommendation::ConsiderRotating => {
            lines.push("  >> CONSIDER ROTATING: Potential net GAIN over horizon.".to_string());
            if let BreakEven::Years(years) = m.break_even {
                if m.horizon_years < years {
                    lines.push(format!(
                        "     (Note: Horizon {} yrs is SHORTER than break-even {} yrs)",
                        m.horizon_years, years
                    ));
                } else {
                    lines.push(format!(
                        "     (Note: Horizon {} yrs is LONGER than/equal to break-even {} yrs)",
                        m.horizon_years, years
                    ));
                }
            }
        }
        Recommendation::DoNotRotate { reason } => {
            lines.push("  >> LIKELY DO NOT ROTATE: Potential net LOSS over horizon.".to_string());
            match reason {
                Some(LossReason::RateNotHigher) => {
                    lines.push("     (Reason: New fixed rate isn't higher)".to_string())
                }
                Some(LossReason::CostsOutweighBenefit) => {
                    lines.push("     (Reason: Immediate costs outweigh fixed-rate benefit)".to_string())
                }
                None => {}
            }
        }
        Recommendation::Neutral => {
            lines.push("  >> NEUTRAL: Estimated benefits roughly equal costs over horizon.".to_string());
        }
    }
}

/// Skipped-row warnings collected while loading the CSV
pub fn format_skipped(skipped: &[SkippedRow]) -> String {
    let mut out = String::from("--- CSV Read Warnings ---\n");
    for row in skipped {
        let _ = writeln!(out, "{}", row);
    }
    out.push_str(RULE);
    out.push('\n');
    out
}

pub fn format_summary(summary: &BatchSummary) -> String {
    let mut out = String::from("--- Overall Summary ---\n");
    let _ = writeln!(out, "Bonds Analyzed: {}", summary.bonds_analyzed);
    let _ = writeln!(out, "Bonds Recommended for Rotation: {} bond(s)", summary.recommended_count);
    let _ = writeln!(
        out,
        "Total Estimated Net Gain (Horizon): {}",
        format_currency(summary.total_net_gain)
    );
    out
}

pub fn format_disclaimers() -> String {
    let mut out = String::from("--- Important Disclaimers ---\n");
    for line in DISCLAIMERS {
        let _ = writeln!(out, "* {}", line);
    }
    out
}
