//! Load bonds from a holdings CSV export
//!
//! Rows that cannot be turned into a valid [`BondInput`] are skipped and
//! reported; they never abort the rest of the file.

use super::BondInput;
use crate::error::{LoadError, RowError};
use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord, Trim};
use std::collections::HashSet;
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;

pub const COL_CONFIRMATION: &str = "Confirmation";
pub const COL_ISSUE_DATE: &str = "Issue Date";
pub const COL_FIXED_RATE: &str = "Fixed Rate";
pub const COL_COMPOSITE_RATE: &str = "Composite Interest rate";
pub const COL_PRINCIPAL: &str = "Original amount";
pub const COL_CURRENT_VALUE: &str = "Current Value";

/// Columns that must be present in the header, in display order
pub const REQUIRED_COLUMNS: [&str; 6] = [
    COL_CONFIRMATION,
    COL_ISSUE_DATE,
    COL_FIXED_RATE,
    COL_COMPOSITE_RATE,
    COL_PRINCIPAL,
    COL_CURRENT_VALUE,
];

const ISSUE_DATE_FORMAT: &str = "%Y-%m-%d";

/// Raw CSV row matching the holdings export columns
#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    #[serde(rename = "Confirmation")]
    confirmation: String,
    #[serde(rename = "Issue Date")]
    issue_date: String,
    #[serde(rename = "Fixed Rate")]
    fixed_rate: String,
    #[serde(rename = "Composite Interest rate")]
    composite_rate: String,
    #[serde(rename = "Original amount")]
    principal: String,
    #[serde(rename = "Current Value")]
    current_value: String,
}

impl CsvRow {
    fn to_bond(self, as_of: NaiveDate) -> Result<BondInput, RowError> {
        let confirmation = self.confirmation.trim().to_string();
        if confirmation.is_empty() {
            return Err(RowError::BlankConfirmation);
        }

        let issue_date = NaiveDate::parse_from_str(self.issue_date.trim(), ISSUE_DATE_FORMAT)
            .map_err(|_| RowError::InvalidField {
                field: COL_ISSUE_DATE,
                value: self.issue_date.clone(),
            })?;

        let bond = BondInput {
            confirmation,
            issue_date,
            fixed_rate_pct: parse_number(COL_FIXED_RATE, &self.fixed_rate)?,
            composite_rate_pct: parse_number(COL_COMPOSITE_RATE, &self.composite_rate)?,
            principal: parse_number(COL_PRINCIPAL, &self.principal)?,
            current_value: parse_number(COL_CURRENT_VALUE, &self.current_value)?,
        };

        if bond.has_negative_values() {
            return Err(RowError::NegativeValue);
        }
        if bond.issue_date > as_of {
            return Err(RowError::FutureIssueDate);
        }

        Ok(bond)
    }
}

fn parse_number(field: &'static str, raw: &str) -> Result<f64, RowError> {
    raw.trim().parse::<f64>().map_err(|_| RowError::InvalidField {
        field,
        value: raw.to_string(),
    })
}

/// A CSV row that was not loaded
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedRow {
    /// 1-based line number in the file (the header is line 1)
    pub line: u64,
    /// Confirmation number, when the row had a non-blank one
    pub confirmation: Option<String>,
    pub reason: RowError,
}

impl fmt::Display for SkippedRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.confirmation {
            Some(conf) => write!(f, "Skipping CSV line {} (Conf: {}): {}", self.line, conf, self.reason),
            None => write!(f, "Skipping CSV line {}: {}", self.line, self.reason),
        }
    }
}

/// Bonds accepted from a file plus the rows that were skipped
#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    /// Accepted bonds in file order, confirmation numbers unique
    pub bonds: Vec<BondInput>,
    pub skipped: Vec<SkippedRow>,
}

/// Load all bonds from a CSV file. Issue dates after `as_of` are rejected.
pub fn load_bonds<P: AsRef<Path>>(path: P, as_of: NaiveDate) -> Result<LoadReport, LoadError> {
    let path = path.as_ref();
    log::info!("Reading holdings from {}", path.display());
    let file = File::open(path)?;
    load_bonds_from_reader(file, as_of)
}

/// Load bonds from any reader (e.g., string buffer, uploaded file)
pub fn load_bonds_from_reader<R: Read>(reader: R, as_of: NaiveDate) -> Result<LoadReport, LoadError> {
    let mut csv_reader = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers = normalize_headers(csv_reader.headers()?);
    if headers.is_empty() || headers.iter().all(str::is_empty) {
        return Err(LoadError::MissingHeader);
    }
    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|col| !headers.iter().any(|h| h == **col))
        .map(|col| col.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(LoadError::MissingColumns(missing));
    }

    let mut report = LoadReport::default();
    let mut seen = HashSet::new();
    let mut record = StringRecord::new();

    loop {
        let line = csv_reader.position().line();
        match csv_reader.read_record(&mut record) {
            Ok(false) => break,
            Ok(true) => {}
            Err(e) if e.is_io_error() => return Err(e.into()),
            Err(e) => {
                report.skip(line, None, RowError::Malformed(e.to_string()));
                continue;
            }
        }
        let line = record.position().map(|p| p.line()).unwrap_or(line);

        let row: CsvRow = match record.deserialize(Some(&headers)) {
            Ok(row) => row,
            Err(e) => {
                report.skip(line, None, RowError::Malformed(e.to_string()));
                continue;
            }
        };

        let confirmation = Some(row.confirmation.trim().to_string()).filter(|c| !c.is_empty());
        match row.to_bond(as_of) {
            Ok(bond) if !seen.insert(bond.confirmation.clone()) => {
                report.skip(line, confirmation, RowError::DuplicateConfirmation);
            }
            Ok(bond) => report.bonds.push(bond),
            Err(reason) => report.skip(line, confirmation, reason),
        }
    }

    log::info!(
        "Loaded {} bonds ({} rows skipped)",
        report.bonds.len(),
        report.skipped.len()
    );
    Ok(report)
}

impl LoadReport {
    fn skip(&mut self, line: u64, confirmation: Option<String>, reason: RowError) {
        let row = SkippedRow { line, confirmation, reason };
        log::warn!("{}", row);
        self.skipped.push(row);
    }
}

/// Strip the UTF-8 byte order mark some spreadsheet exports prepend
fn normalize_headers(raw: &StringRecord) -> StringRecord {
    raw.iter()
        .map(|h| h.trim_start_matches('\u{feff}').trim())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str =
        "Confirmation,Issue Date,Fixed Rate,Composite Interest rate,Original amount,Current Value\n";

    fn as_of() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    fn load(body: &str) -> Result<LoadReport, LoadError> {
        let data = format!("{}{}", HEADER, body);
        load_bonds_from_reader(data.as_bytes(), as_of())
    }

    #[test]
    fn test_load_valid_rows() {
        let report = load(
            "I001,2019-01-15,0.0,4.3,1000,1250.40\n\
             I002 , 2023-11-01 , 0.4 , 5.27 , 500 , 524.00\n",
        )
        .unwrap();

        assert_eq!(report.bonds.len(), 2);
        assert!(report.skipped.is_empty());

        let b = &report.bonds[1];
        assert_eq!(b.confirmation, "I002");
        assert_eq!(b.issue_date, NaiveDate::from_ymd_opt(2023, 11, 1).unwrap());
        assert_eq!(b.fixed_rate_pct, 0.4);
        assert_eq!(b.composite_rate_pct, 5.27);
        assert_eq!(b.principal, 500.0);
        assert_eq!(b.current_value, 524.0);
    }

    #[test]
    fn test_columns_in_any_order_with_bom() {
        let data = "\u{feff}Current Value,Original amount,Composite Interest rate,Fixed Rate,Issue Date,Confirmation,Notes\n\
                    1100,1000,3.1,0.1,2020-02-01,I9,gift\n";
        let report = load_bonds_from_reader(data.as_bytes(), as_of()).unwrap();
        assert_eq!(report.bonds.len(), 1);
        assert_eq!(report.bonds[0].confirmation, "I9");
        assert_eq!(report.bonds[0].current_value, 1100.0);
    }

    #[test]
    fn test_missing_columns() {
        let data = "Confirmation,Issue Date,Fixed Rate\nI1,2020-01-01,0.0\n";
        match load_bonds_from_reader(data.as_bytes(), as_of()) {
            Err(LoadError::MissingColumns(cols)) => {
                assert_eq!(cols, vec![COL_COMPOSITE_RATE, COL_PRINCIPAL, COL_CURRENT_VALUE]);
            }
            other => panic!("expected missing columns, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_file() {
        let result = load_bonds_from_reader("".as_bytes(), as_of());
        assert!(matches!(result, Err(LoadError::MissingHeader)));
    }

    #[test]
    fn test_bad_rows_are_skipped() {
        let report = load(
            ",2020-01-01,0,3,1000,1100\n\
             I2,01/05/2020,0,3,1000,1100\n\
             I3,2020-01-01,abc,3,1000,1100\n\
             I4,2020-01-01,0,3,-5,1100\n\
             I5,2025-01-01,0,3,1000,1100\n\
             I6,2020-01-01,0,3,1000,1100\n\
             I6,2021-01-01,0,3,1000,1100\n",
        )
        .unwrap();

        assert_eq!(report.bonds.len(), 1);
        assert_eq!(report.bonds[0].confirmation, "I6");
        assert_eq!(report.bonds[0].issue_date, NaiveDate::from_ymd_opt(2020, 1, 1).unwrap());

        let reasons: Vec<_> = report.skipped.iter().map(|s| s.reason.clone()).collect();
        assert_eq!(reasons[0], RowError::BlankConfirmation);
        assert!(matches!(reasons[1], RowError::InvalidField { field: COL_ISSUE_DATE, .. }));
        assert!(matches!(reasons[2], RowError::InvalidField { field: COL_FIXED_RATE, .. }));
        assert_eq!(reasons[3], RowError::NegativeValue);
        assert_eq!(reasons[4], RowError::FutureIssueDate);
        assert_eq!(reasons[5], RowError::DuplicateConfirmation);

        assert_eq!(report.skipped[0].line, 2);
        assert_eq!(report.skipped[0].confirmation, None);
        assert_eq!(report.skipped[5].line, 8);
        assert_eq!(
            report.skipped[2].to_string(),
            "Skipping CSV line 4 (Conf: I3): Data conversion error - invalid Fixed Rate 'abc'."
        );
        assert_eq!(
            report.skipped[0].to_string(),
            "Skipping CSV line 2: Blank confirmation number."
        );
    }

    #[test]
    fn test_load_sample_file() {
        let report = load_bonds("data/my_i_bonds.csv", as_of()).expect("Failed to load sample bonds");
        assert_eq!(report.bonds.len(), 5);
        assert!(report.skipped.is_empty());
        assert_eq!(report.bonds[1].confirmation, "I0000012346");
        assert_eq!(report.bonds[1].issue_date, NaiveDate::from_ymd_opt(2019, 1, 15).unwrap());
    }

    #[test]
    fn test_missing_file() {
        let result = load_bonds("data/does_not_exist.csv", as_of());
        assert!(matches!(result, Err(LoadError::Io(_))));
    }

    #[test]
    fn test_issue_date_equal_to_as_of_is_accepted() {
        let report = load("I1,2024-06-01,0,3,1000,1000\n").unwrap();
        assert_eq!(report.bonds.len(), 1);
    }
}
