use rust_decimal::Decimal;
use serde::{ser::SerializeMap, Serialize, Serializer};
use serde_json::Value;
use std::path::PathBuf;
use thiserror::Error;

pub const INCOME_COLUMN: &str = "Total Monthly Income";
pub const EXPENSE_COLUMN: &str = "Total";

/// One accounting period of the financial summary. Only the two columns we
/// aggregate are kept, everything else in the table is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct SummaryRow {
    pub income: Decimal,
    pub expense: Decimal,
}

/// One row of the contributions table, as `(column, value)` pairs in the
/// column order of the source table. We don't know anything about the
/// columns, so this is a list rather than a struct, and it serializes as a
/// JSON object keeping that order.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct ContributionRow {
    pub fields: Vec<(String, Value)>,
}

impl Serialize for ContributionRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (column, value) in &self.fields {
            map.serialize_entry(column, value)?;
        }
        map.end()
    }
}

/// The document handed to the dashboard. Like the balance in a bank account,
/// `total_balance` is not stored: it's always `inflows - outflows`, so it's
/// only computed when serializing. See `ReportSerializer`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(into = "ReportSerializer")]
pub(crate) struct Report {
    pub inflows: i64,
    pub outflows: i64,
    pub member_contributions: Vec<ContributionRow>,
}

/// Serialization proxy for `Report`; field order here is the key order of
/// the output document.
#[derive(Serialize)]
pub(crate) struct ReportSerializer {
    pub total_balance: i64,
    pub inflows: i64,
    pub outflows: i64,
    pub member_contributions: Vec<ContributionRow>,
}

impl From<Report> for ReportSerializer {
    fn from(report: Report) -> Self {
        Self {
            // `Report::new` refuses totals whose difference overflows
            total_balance: report.inflows - report.outflows,
            inflows: report.inflows,
            outflows: report.outflows,
            member_contributions: report.member_contributions,
        }
    }
}

/// Everything that can go wrong with the shape or content of the input tables.
#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("Column `{0}` is missing from the table header")]
    MissingColumn(String),
    #[error("Line {line}: no value in column `{column}`")]
    MissingValue { column: String, line: u64 },
    #[error("Line {line}: value {value:?} in column `{column}` is not a number")]
    NotNumeric {
        column: String,
        line: u64,
        value: String,
    },
    #[error("Sum of column `{0}` doesn't fit in a 64-bit integer")]
    Overflow(String),
    #[error("Table has no header row")]
    NoHeader,
    #[error("Line {line}: {found} fields while the header has {expected}")]
    TooManyFields {
        line: u64,
        expected: usize,
        found: usize,
    },
    #[error("Malformed table: {0}")]
    Malformed(#[from] csv::Error),
}

/// Top-level failures of a run; none of them are recovered from.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Input file {} not found", .0.display())]
    FileNotFound(PathBuf),
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),
    #[error("Cannot serialize report: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl Error {
    /// Helper for `map_err`, attaching the path being worked on.
    pub fn io(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.into();
        move |source| Self::Io { path, source }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn balance_is_computed_at_serialization() {
        let report = Report {
            inflows: 1500,
            outflows: 500,
            member_contributions: vec![],
        };
        assert_eq!(
            serde_json::to_value(&report).unwrap(),
            json!({
                "total_balance": 1000,
                "inflows": 1500,
                "outflows": 500,
                "member_contributions": [],
            })
        );
    }

    #[test]
    fn key_order() {
        let report = Report {
            inflows: 1,
            outflows: 2,
            member_contributions: vec![ContributionRow {
                fields: vec![
                    ("zeta".to_string(), json!("last letter")),
                    ("alpha".to_string(), json!(1)),
                ],
            }],
        };
        assert_eq!(
            serde_json::to_string(&report).unwrap(),
            r#"{"total_balance":-1,"inflows":1,"outflows":2,"member_contributions":[{"zeta":"last letter","alpha":1}]}"#
        );
    }

    #[test]
    fn error_messages() {
        let err: Error = SchemaError::MissingColumn(EXPENSE_COLUMN.to_string()).into();
        assert!(err.to_string().contains("`Total`"));
        let err = Error::FileNotFound(PathBuf::from("data/financial_summary.csv"));
        assert_eq!(
            err.to_string(),
            "Input file data/financial_summary.csv not found"
        );
    }
}
