use std::path::PathBuf;

pub const DEFAULT_SUMMARY_PATH: &str = "data/financial_summary.csv";
pub const DEFAULT_CONTRIBUTIONS_PATH: &str = "data/member_contributions.csv";
pub const DEFAULT_OUTPUT_PATH: &str = "docs/js/data.json";

/// Where to read the two tables from and where to put the report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Config {
    pub summary_path: PathBuf,
    pub contributions_path: PathBuf,
    pub output_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            summary_path: DEFAULT_SUMMARY_PATH.into(),
            contributions_path: DEFAULT_CONTRIBUTIONS_PATH.into(),
            output_path: DEFAULT_OUTPUT_PATH.into(),
        }
    }
}
