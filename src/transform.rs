use crate::{
    compute::Totals,
    config::Config,
    data::{Error, Report},
    read::{open_input, read_contributions, read_summary},
    write::save_report,
};
use tracing::info;

/// Runs the whole conversion: both tables are read and aggregated before
/// anything is written, so a failure leaves any previous report untouched.
pub(crate) fn transform(config: &Config) -> Result<Report, Error> {
    let mut totals = Totals::default();
    read_summary(open_input(&config.summary_path)?, &mut totals)?;
    info!(
        "summary {}: inflows {}, outflows {}",
        config.summary_path.display(),
        totals.inflows,
        totals.outflows
    );

    let member_contributions = read_contributions(open_input(&config.contributions_path)?)?;
    info!(
        "contributions {}: {} records",
        config.contributions_path.display(),
        member_contributions.len()
    );

    let report = Report::new(totals, member_contributions)?;
    save_report(&config.output_path, &report)?;
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::SchemaError;
    use std::{fs, path::Path};

    const SUMMARY: &str = "\
Month,Total Monthly Income,Rent,Total
2024-01,1000,100,300
2024-02,500,100,200.7
";
    const CONTRIBUTIONS: &str = "\
name,amount
Alice,50
Bob,25
";

    fn setup(root: &Path, summary: &str, contributions: &str) -> Config {
        let data = root.join("data");
        fs::create_dir_all(&data).unwrap();
        fs::write(data.join("financial_summary.csv"), summary).unwrap();
        fs::write(data.join("member_contributions.csv"), contributions).unwrap();
        Config {
            summary_path: data.join("financial_summary.csv"),
            contributions_path: data.join("member_contributions.csv"),
            output_path: root.join("docs").join("js").join("data.json"),
        }
    }

    #[test]
    fn full_run() {
        let dir = tempfile::tempdir().unwrap();
        let config = setup(dir.path(), SUMMARY, CONTRIBUTIONS);
        let report = transform(&config).unwrap();
        assert_eq!((report.inflows, report.outflows), (1500, 500));
        assert_eq!(
            fs::read_to_string(&config.output_path).unwrap(),
            r#"{
  "total_balance": 1000,
  "inflows": 1500,
  "outflows": 500,
  "member_contributions": [
    {
      "name": "Alice",
      "amount": 50
    },
    {
      "name": "Bob",
      "amount": 25
    }
  ]
}"#
        );
    }

    #[test]
    fn idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let config = setup(dir.path(), SUMMARY, CONTRIBUTIONS);
        transform(&config).unwrap();
        let first = fs::read(&config.output_path).unwrap();
        // the output directory exists now, that must not be a problem
        transform(&config).unwrap();
        let second = fs::read(&config.output_path).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn schema_error_leaves_previous_output() {
        let dir = tempfile::tempdir().unwrap();
        let config = setup(dir.path(), SUMMARY, CONTRIBUTIONS);
        transform(&config).unwrap();
        let before = fs::read(&config.output_path).unwrap();

        fs::write(&config.summary_path, "Month,Total Monthly Income\n2024-01,1000\n").unwrap();
        let err = transform(&config).unwrap_err();
        assert!(matches!(err, Error::Schema(SchemaError::MissingColumn(c)) if c == "Total"));
        assert_eq!(fs::read(&config.output_path).unwrap(), before);
    }

    #[test]
    fn schema_error_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let config = setup(dir.path(), "Total Monthly Income,Total\n10,abc\n", CONTRIBUTIONS);
        assert!(matches!(
            transform(&config),
            Err(Error::Schema(SchemaError::NotNumeric { .. }))
        ));
        assert!(!config.output_path.exists());
    }

    #[test]
    fn missing_input() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = setup(dir.path(), SUMMARY, CONTRIBUTIONS);
        config.contributions_path = dir.path().join("data").join("nope.csv");
        assert!(matches!(
            transform(&config),
            Err(Error::FileNotFound(p)) if p == config.contributions_path
        ));
        assert!(!config.output_path.exists());
    }

    #[test]
    fn defaults() {
        let config = Config::default();
        assert_eq!(config.summary_path, Path::new("data/financial_summary.csv"));
        assert_eq!(config.contributions_path, Path::new("data/member_contributions.csv"));
        assert_eq!(config.output_path, Path::new("docs/js/data.json"));
    }
}
